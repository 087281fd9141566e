//! Tunable settings for the cycle tracker and the Hydration Hero loop.
//!
//! Both structs deserialize with every field optional, so a config file only
//! needs the values it overrides. Validation collects every problem instead
//! of stopping at the first one.
//!
//! ```
//! use wellnest_logic::config::{validate_tracker_config, TrackerConfig};
//!
//! let mut config = TrackerConfig::default();
//! config.default_cycle_length = 30;
//! assert!(validate_tracker_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{cycle, hydration, points};

/// Points granted for each tracker action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointAwards {
    pub start_cycle: u32,
    pub end_cycle: u32,
    pub log_symptom: u32,
    pub set_flow: u32,
}

impl Default for PointAwards {
    fn default() -> Self {
        Self {
            start_cycle: points::START_CYCLE,
            end_cycle: points::END_CYCLE,
            log_symptom: points::LOG_SYMPTOM,
            set_flow: points::SET_FLOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Average cycle length (days) used until history allows a real average.
    pub default_cycle_length: u32,
    /// Characters of note text copied into the symptom log.
    pub notes_excerpt_chars: usize,
    /// Local zone, in minutes east of UTC, that stored timestamps were
    /// written from. Only documents from older builds carry timestamps.
    pub legacy_utc_offset_minutes: i32,
    pub awards: PointAwards,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: cycle::DEFAULT_CYCLE_LENGTH,
            notes_excerpt_chars: cycle::NOTES_EXCERPT_CHARS,
            legacy_utc_offset_minutes: cycle::LEGACY_UTC_OFFSET_MINUTES,
            awards: PointAwards::default(),
        }
    }
}

/// Per-frame tuning of the hydration game, in board-percentage units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationConfig {
    pub max_hydration: f32,
    pub decay_per_frame: f32,
    pub drop_interval_ms: u64,
    pub hazard_interval_ms: u64,
    pub drop_speed: f32,
    pub hazard_speed: f32,
    pub player_radius: f32,
    pub item_radius: f32,
    pub drop_score: u32,
    pub drop_hydration: f32,
    pub hazard_penalty: f32,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            max_hydration: hydration::MAX_HYDRATION,
            decay_per_frame: hydration::DECAY_PER_FRAME,
            drop_interval_ms: hydration::DROP_INTERVAL_MS,
            hazard_interval_ms: hydration::HAZARD_INTERVAL_MS,
            drop_speed: hydration::DROP_SPEED,
            hazard_speed: hydration::HAZARD_SPEED,
            player_radius: hydration::PLAYER_RADIUS,
            item_radius: hydration::ITEM_RADIUS,
            drop_score: hydration::DROP_SCORE,
            drop_hydration: hydration::DROP_HYDRATION,
            hazard_penalty: hydration::HAZARD_PENALTY,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("default cycle length {0} is outside 1..=90 days")]
    CycleLengthOutOfRange(u32),
    #[error("notes excerpt length must be at least one character")]
    EmptyNotesExcerpt,
    #[error("legacy UTC offset of {0} minutes is beyond +/-14 hours")]
    LegacyOffsetOutOfRange(i32),
    #[error("maximum hydration must be positive")]
    NonPositiveMaxHydration,
    #[error("hydration decay must not be negative")]
    NegativeDecay,
    #[error("spawn interval for {0} must be positive")]
    ZeroSpawnInterval(&'static str),
    #[error("fall speed for {0} must be positive")]
    NonPositiveSpeed(&'static str),
    #[error("collision radius for {0} must be positive")]
    NonPositiveRadius(&'static str),
    #[error("hydration adjustment for {0} must not be negative")]
    NegativeAdjustment(&'static str),
}

pub fn validate_tracker_config(config: &TrackerConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !(1..=90).contains(&config.default_cycle_length) {
        errors.push(ConfigError::CycleLengthOutOfRange(
            config.default_cycle_length,
        ));
    }
    if config.notes_excerpt_chars == 0 {
        errors.push(ConfigError::EmptyNotesExcerpt);
    }
    if config.legacy_utc_offset_minutes.abs() > cycle::MAX_UTC_OFFSET_MINUTES {
        errors.push(ConfigError::LegacyOffsetOutOfRange(
            config.legacy_utc_offset_minutes,
        ));
    }

    errors
}

pub fn validate_hydration_config(config: &HydrationConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.max_hydration <= 0.0 {
        errors.push(ConfigError::NonPositiveMaxHydration);
    }
    if config.decay_per_frame < 0.0 {
        errors.push(ConfigError::NegativeDecay);
    }
    if config.drop_interval_ms == 0 {
        errors.push(ConfigError::ZeroSpawnInterval("water drops"));
    }
    if config.hazard_interval_ms == 0 {
        errors.push(ConfigError::ZeroSpawnInterval("unhealthy items"));
    }
    if config.drop_speed <= 0.0 {
        errors.push(ConfigError::NonPositiveSpeed("water drops"));
    }
    if config.hazard_speed <= 0.0 {
        errors.push(ConfigError::NonPositiveSpeed("unhealthy items"));
    }
    if config.player_radius <= 0.0 {
        errors.push(ConfigError::NonPositiveRadius("player"));
    }
    if config.item_radius <= 0.0 {
        errors.push(ConfigError::NonPositiveRadius("items"));
    }
    if config.drop_hydration < 0.0 {
        errors.push(ConfigError::NegativeAdjustment("water drops"));
    }
    if config.hazard_penalty < 0.0 {
        errors.push(ConfigError::NegativeAdjustment("unhealthy items"));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_tracker_config(&TrackerConfig::default()).is_empty());
        assert!(validate_hydration_config(&HydrationConfig::default()).is_empty());
    }

    #[test]
    fn default_awards_match_point_table() {
        let awards = PointAwards::default();
        assert_eq!(
            (
                awards.start_cycle,
                awards.end_cycle,
                awards.log_symptom,
                awards.set_flow
            ),
            (10, 15, 5, 3)
        );
    }

    #[test]
    fn cycle_length_out_of_range() {
        let mut config = TrackerConfig::default();
        config.default_cycle_length = 0;
        assert!(validate_tracker_config(&config).contains(&ConfigError::CycleLengthOutOfRange(0)));
        config.default_cycle_length = 120;
        assert!(
            validate_tracker_config(&config).contains(&ConfigError::CycleLengthOutOfRange(120))
        );
    }

    #[test]
    fn legacy_offset_limited_to_real_zones() {
        let mut config = TrackerConfig::default();
        config.legacy_utc_offset_minutes = -600;
        assert!(validate_tracker_config(&config).is_empty());
        config.legacy_utc_offset_minutes = 15 * 60;
        assert_eq!(
            validate_tracker_config(&config),
            vec![ConfigError::LegacyOffsetOutOfRange(900)]
        );
    }

    #[test]
    fn hydration_collects_every_error() {
        let config = HydrationConfig {
            decay_per_frame: -1.0,
            drop_interval_ms: 0,
            hazard_speed: 0.0,
            item_radius: 0.0,
            ..HydrationConfig::default()
        };
        let errors = validate_hydration_config(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ConfigError::NegativeDecay));
        assert!(errors.contains(&ConfigError::ZeroSpawnInterval("water drops")));
    }

    #[test]
    fn zero_decay_is_allowed() {
        let config = HydrationConfig {
            decay_per_frame: 0.0,
            ..HydrationConfig::default()
        };
        assert!(validate_hydration_config(&config).is_empty());
    }
}
