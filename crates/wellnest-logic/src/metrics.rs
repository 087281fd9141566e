//! Dashboard goal progress.

use serde::{Deserialize, Serialize};

use crate::constants::goals;

/// Rounded percentage of `goal` reached, capped at 100.
pub fn percent_of_goal(value: f64, goal: f64) -> u32 {
    if goal <= 0.0 || value <= 0.0 {
        return 0;
    }
    (value / goal * 100.0).round().min(100.0) as u32
}

pub fn step_progress(steps: u32) -> u32 {
    percent_of_goal(f64::from(steps), f64::from(goals::DAILY_STEPS))
}

pub fn water_progress(glasses: u32) -> u32 {
    percent_of_goal(f64::from(glasses), f64::from(goals::DAILY_WATER_GLASSES))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Fitness,
    Mindfulness,
    Nutrition,
    Sleep,
}

/// A tracked goal with its completed and target amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub category: GoalCategory,
    pub done: f64,
    pub target: f64,
}

impl Goal {
    pub fn progress(&self) -> u32 {
        percent_of_goal(self.done, self.target)
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.target
    }
}

/// Average progress across goals, rounded.
pub fn overall_progress(goals: &[Goal]) -> u32 {
    if goals.is_empty() {
        return 0;
    }
    let sum: u32 = goals.iter().map(Goal::progress).sum();
    (f64::from(sum) / goals.len() as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_and_water_goals() {
        assert_eq!(step_progress(8420), 84);
        assert_eq!(step_progress(12_000), 100);
        assert_eq!(water_progress(5), 63);
        assert_eq!(water_progress(0), 0);
    }

    #[test]
    fn goals_average() {
        let goals = vec![
            Goal {
                name: "Weekly Workout Goal".into(),
                category: GoalCategory::Fitness,
                done: 3.0,
                target: 4.0,
            },
            Goal {
                name: "Water Intake".into(),
                category: GoalCategory::Nutrition,
                done: 5.0,
                target: 8.0,
            },
        ];
        assert_eq!(goals[0].progress(), 75);
        assert!(!goals[1].is_complete());
        assert_eq!(overall_progress(&goals), 69);
        assert_eq!(overall_progress(&[]), 0);
    }
}
