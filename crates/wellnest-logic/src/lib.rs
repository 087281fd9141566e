//! Pure wellness tracking logic for Wellnest.
//!
//! This crate contains all domain logic that is independent of storage,
//! randomness, or any UI. Functions take plain data and return results,
//! making them unit-testable and usable from the engine crate, the headless
//! harness, and any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`achievements`] | Six fixed milestones derived from tracker state |
//! | [`config`] | Tracker and Hydration Hero tuning with validation |
//! | [`constants`] | Storage keys, point awards, game sizes, goals |
//! | [`cycle`] | Cycle record store, explicit cycle phase, tracker actions |
//! | [`hydration`] | Hydration Hero decay, pickups, collisions, pointer mapping |
//! | [`metrics`] | Dashboard goal progress |
//! | [`notify`] | Notifications and the `Notifier` collaborator |
//! | [`predictor`] | Average cycle length and next-period prediction |
//! | [`session`] | Route table, login gate, login form validation |
//! | [`stats`] | Cycle duration, length history, top symptoms, flow mix |

pub mod achievements;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod hydration;
pub mod metrics;
pub mod notify;
pub mod predictor;
pub mod session;
pub mod stats;
