//! Achievement evaluation: six fixed milestones derived from tracker state.
//!
//! Nothing here is stored. Achievements are recomputed from the cycle record
//! and point total on every read.

use serde::Serialize;

use crate::cycle::CycleData;

/// The quantity an achievement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    CyclesTracked,
    SymptomsLogged,
    DaysLogged,
    Points,
}

/// Static definition of an achievement.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Reward shown alongside the achievement.
    pub required_points: u32,
    pub metric: Metric,
    pub threshold: u32,
}

pub const ACHIEVEMENTS: [AchievementDef; 6] = [
    AchievementDef {
        id: "first-cycle",
        title: "Cycle Starter",
        description: "Track your first complete menstrual cycle",
        icon: "🌱",
        required_points: 25,
        metric: Metric::CyclesTracked,
        threshold: 1,
    },
    AchievementDef {
        id: "cycle-streak",
        title: "Consistent Tracker",
        description: "Track 3 consecutive cycles",
        icon: "📊",
        required_points: 75,
        metric: Metric::CyclesTracked,
        threshold: 3,
    },
    AchievementDef {
        id: "symptom-logger",
        title: "Symptom Sleuth",
        description: "Log 20 different symptoms",
        icon: "🔍",
        required_points: 50,
        metric: Metric::SymptomsLogged,
        threshold: 20,
    },
    AchievementDef {
        id: "data-queen",
        title: "Data Queen",
        description: "Log data for 30 days",
        icon: "👑",
        required_points: 100,
        metric: Metric::DaysLogged,
        threshold: 30,
    },
    AchievementDef {
        id: "wellness-warrior",
        title: "Wellness Warrior",
        description: "Earn 200 points",
        icon: "⚔️",
        required_points: 200,
        metric: Metric::Points,
        threshold: 200,
    },
    AchievementDef {
        id: "cycle-master",
        title: "Cycle Master",
        description: "Track 6 complete cycles",
        icon: "🔮",
        required_points: 150,
        metric: Metric::CyclesTracked,
        threshold: 6,
    },
];

/// An evaluated achievement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub required_points: u32,
    /// Percentage towards the threshold, 0..=100.
    pub progress: f64,
    pub completed: bool,
}

/// Current value of every metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricTotals {
    pub cycles_tracked: u32,
    pub symptoms_logged: u32,
    pub days_logged: u32,
    pub points: u32,
}

impl MetricTotals {
    pub fn collect(points: u32, data: &CycleData) -> Self {
        Self {
            cycles_tracked: count(data.cycles_tracked()),
            symptoms_logged: count(data.symptoms_logged()),
            days_logged: count(data.days_logged()),
            points,
        }
    }

    pub fn value(&self, metric: Metric) -> u32 {
        match metric {
            Metric::CyclesTracked => self.cycles_tracked,
            Metric::SymptomsLogged => self.symptoms_logged,
            Metric::DaysLogged => self.days_logged,
            Metric::Points => self.points,
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Evaluate all achievements against the given state.
pub fn evaluate(points: u32, data: &CycleData) -> Vec<Achievement> {
    let totals = MetricTotals::collect(points, data);
    ACHIEVEMENTS
        .iter()
        .map(|def| evaluate_one(def, &totals))
        .collect()
}

pub fn evaluate_one(def: &AchievementDef, totals: &MetricTotals) -> Achievement {
    let actual = totals.value(def.metric);
    Achievement {
        id: def.id,
        title: def.title,
        description: def.description,
        icon: def.icon,
        required_points: def.required_points,
        progress: progress(actual, def.threshold),
        completed: actual >= def.threshold,
    }
}

fn progress(actual: u32, threshold: u32) -> f64 {
    if threshold == 0 {
        return 100.0;
    }
    (100.0 * f64::from(actual) / f64::from(threshold)).min(100.0)
}

/// Unlocked count over total, for the gallery header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementSummary {
    pub unlocked: usize,
    pub total: usize,
    pub percent: f64,
}

pub fn summarize(achievements: &[Achievement]) -> AchievementSummary {
    let unlocked = achievements.iter().filter(|a| a.completed).count();
    let total = achievements.len();
    let percent = if total == 0 {
        0.0
    } else {
        unlocked as f64 / total as f64 * 100.0
    };
    AchievementSummary {
        unlocked,
        total,
        percent,
    }
}

/// Locked achievements, closest to completion first.
pub fn locked_by_progress(achievements: &[Achievement]) -> Vec<&Achievement> {
    let mut locked: Vec<&Achievement> = achievements.iter().filter(|a| !a.completed).collect();
    locked.sort_by(|a, b| b.progress.total_cmp(&a.progress));
    locked
}
