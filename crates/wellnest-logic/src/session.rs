//! Route table, login gate and login form validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    Dashboard,
    Blog,
    Badges,
    MenstrualTracker,
    Games,
    FoodSorting,
    HydrationHero,
    MindfulnessMaze,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Login,
        Route::Dashboard,
        Route::Blog,
        Route::Badges,
        Route::MenstrualTracker,
        Route::Games,
        Route::FoodSorting,
        Route::HydrationHero,
        Route::MindfulnessMaze,
        Route::NotFound,
    ];

    /// Match a path. Unknown paths fall through to [`Route::NotFound`].
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/blog" => Route::Blog,
            "/badges" => Route::Badges,
            "/menstrual-tracker" => Route::MenstrualTracker,
            "/games" => Route::Games,
            "/games/food-sorting" => Route::FoodSorting,
            "/games/hydration-hero" => Route::HydrationHero,
            "/games/mindfulness-maze" => Route::MindfulnessMaze,
            _ => Route::NotFound,
        }
    }

    /// Canonical path. `NotFound` has no path of its own and maps to `*`.
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Dashboard => "/dashboard",
            Route::Blog => "/blog",
            Route::Badges => "/badges",
            Route::MenstrualTracker => "/menstrual-tracker",
            Route::Games => "/games",
            Route::FoodSorting => "/games/food-sorting",
            Route::HydrationHero => "/games/hydration-hero",
            Route::MindfulnessMaze => "/games/mindfulness-maze",
            Route::NotFound => "*",
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// What the router should do with a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

/// Resolve `path` for a visitor. Anything but `/` needs a session, and a
/// signed-in visitor at `/` goes straight to the dashboard.
pub fn resolve(path: &str, logged_in: bool) -> RouteDecision {
    let route = Route::from_path(path);
    if route == Route::Login && logged_in {
        RouteDecision::Redirect(Route::Dashboard)
    } else if route.requires_auth() && !logged_in {
        RouteDecision::Redirect(Route::Login)
    } else {
        RouteDecision::Render(route)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please enter your email address")]
    EmailRequired,
    #[error("Please enter your password")]
    PasswordRequired,
}

pub fn validate_login(email: &str, password: &str) -> Result<(), LoginError> {
    if email.trim().is_empty() {
        return Err(LoginError::EmailRequired);
    }
    if password.is_empty() {
        return Err(LoginError::PasswordRequired);
    }
    Ok(())
}
