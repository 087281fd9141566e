//! Food Sorting - classify foods as healthy or unhealthy.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use wellnest_logic::constants::games::FOOD_SORT_ROUNDS;
use wellnest_logic::notify::Notification;

const CATALOG_JSON: &str = include_str!("../../../../data/food_catalog.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Healthy,
    Unhealthy,
}

impl FoodCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FoodCategory::Healthy => "healthy",
            FoodCategory::Unhealthy => "unhealthy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub image: String,
    #[serde(rename = "type")]
    pub category: FoodCategory,
}

/// The bundled food catalog.
pub fn default_catalog() -> Result<Vec<FoodItem>, serde_json::Error> {
    serde_json::from_str(CATALOG_JSON)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPhase {
    NotStarted,
    Playing,
    Finished,
}

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortVerdict {
    pub food: FoodItem,
    pub correct: bool,
    pub notification: Notification,
}

#[derive(Debug, Clone)]
pub struct FoodSortGame {
    catalog: Vec<FoodItem>,
    deck: Vec<FoodItem>,
    rounds: usize,
    score: u32,
    attempts: usize,
    phase: SortPhase,
}

impl FoodSortGame {
    pub fn new(catalog: Vec<FoodItem>) -> Self {
        Self {
            catalog,
            deck: Vec::new(),
            rounds: FOOD_SORT_ROUNDS,
            score: 0,
            attempts: 0,
            phase: SortPhase::NotStarted,
        }
    }

    /// Shuffle the catalog and play up to ten rounds. An empty catalog
    /// finishes immediately.
    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        self.deck = self.catalog.clone();
        self.deck.shuffle(rng);
        self.rounds = FOOD_SORT_ROUNDS.min(self.deck.len());
        self.score = 0;
        self.attempts = 0;
        self.phase = if self.rounds == 0 {
            SortPhase::Finished
        } else {
            SortPhase::Playing
        };
    }

    /// The food waiting to be classified.
    pub fn current(&self) -> Option<&FoodItem> {
        match self.phase {
            SortPhase::Playing => self.deck.get(self.attempts),
            _ => None,
        }
    }

    /// Classify the current food. `None` when no round is in progress.
    pub fn classify(&mut self, choice: FoodCategory) -> Option<SortVerdict> {
        let food = self.current()?.clone();
        let correct = food.category == choice;

        let notification = if correct {
            self.score += 1;
            Notification::info("Correct!", format!("{} is {}!", food.name, food.category.as_str()))
        } else {
            Notification::destructive(
                "Incorrect",
                format!("{} is actually {}!", food.name, food.category.as_str()),
            )
        };

        self.attempts += 1;
        if self.attempts >= self.rounds {
            self.phase = SortPhase::Finished;
            log::info!("Food sorting finished: {}/{}", self.score, self.rounds);
        }

        Some(SortVerdict {
            food,
            correct,
            notification,
        })
    }

    pub fn phase(&self) -> SortPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn percentage(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        f64::from(self.score) / self.rounds as f64 * 100.0
    }

    pub fn score_message(&self) -> &'static str {
        let pct = self.percentage();
        if pct >= 90.0 {
            "Amazing! You're a nutrition expert!"
        } else if pct >= 70.0 {
            "Great job! You know your foods well!"
        } else if pct >= 50.0 {
            "Good effort! Keep learning about nutrition!"
        } else {
            "Keep practicing! Learning about healthy foods is important!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn play(game: &mut FoodSortGame, correct_answers: usize) {
        let mut answered = 0;
        while let Some(food) = game.current().cloned() {
            let choice = if answered < correct_answers {
                food.category
            } else {
                match food.category {
                    FoodCategory::Healthy => FoodCategory::Unhealthy,
                    FoodCategory::Unhealthy => FoodCategory::Healthy,
                }
            };
            game.classify(choice).unwrap();
            answered += 1;
        }
    }

    #[test]
    fn test_catalog_is_balanced() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.len(), 14);
        let healthy = catalog
            .iter()
            .filter(|f| f.category == FoodCategory::Healthy)
            .count();
        assert_eq!(healthy, 7);
    }

    #[test]
    fn test_ten_rounds_then_finished() {
        let mut game = FoodSortGame::new(default_catalog().unwrap());
        assert!(game.current().is_none());
        game.start(&mut StdRng::seed_from_u64(11));

        let mut seen = Vec::new();
        while let Some(food) = game.current().cloned() {
            seen.push(food.name.clone());
            let verdict = game.classify(food.category).unwrap();
            assert!(verdict.correct);
            assert_eq!(verdict.notification.title, "Correct!");
        }

        assert_eq!(game.phase(), SortPhase::Finished);
        assert_eq!(game.attempts(), 10);
        assert_eq!(game.score(), 10);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 10, "each round shows a different food");
        assert!(game.classify(FoodCategory::Healthy).is_none());
    }

    #[test]
    fn test_score_message_tiers() {
        let catalog = default_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for (correct, message) in [
            (9, "Amazing! You're a nutrition expert!"),
            (7, "Great job! You know your foods well!"),
            (5, "Good effort! Keep learning about nutrition!"),
            (4, "Keep practicing! Learning about healthy foods is important!"),
        ] {
            let mut game = FoodSortGame::new(catalog.clone());
            game.start(&mut rng);
            play(&mut game, correct);
            assert_eq!(game.score(), correct as u32);
            assert_eq!(game.score_message(), message);
        }
    }

    #[test]
    fn test_wrong_answer_is_destructive() {
        let catalog = vec![FoodItem {
            name: "Donut".into(),
            image: "🍩".into(),
            category: FoodCategory::Unhealthy,
        }];
        let mut game = FoodSortGame::new(catalog);
        game.start(&mut StdRng::seed_from_u64(0));
        assert_eq!(game.rounds(), 1);

        let verdict = game.classify(FoodCategory::Healthy).unwrap();
        assert!(!verdict.correct);
        assert_eq!(verdict.notification.description, "Donut is actually unhealthy!");
        assert_eq!(game.phase(), SortPhase::Finished);
    }
}
