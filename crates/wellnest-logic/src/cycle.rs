//! Cycle record store: cycle boundaries, per-day logs and the points counter.
//!
//! [`CycleTracker`] owns a [`CycleData`] and the user's point total. Every
//! mutation is a synchronous state replacement that either succeeds and
//! returns an [`Award`] or leaves the state untouched and returns a
//! [`TrackerError`]. Persisting the result is the caller's business.
//!
//! The open/closed state of the current cycle is an explicit
//! [`CyclePhase`] rather than two nullable dates:
//!
//! | Phase | start | end |
//! |-------|-------|-----|
//! | `Idle` | – | – |
//! | `Open` | set | – |
//! | `Closed` | set | set |

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TrackerConfig;
use crate::constants::cycle::NOTES_PREFIX;
use crate::notify::Notification;
use crate::predictor;

/// Bleeding volume on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Light,
    Medium,
    Heavy,
}

impl Flow {
    pub fn as_str(self) -> &'static str {
        match self {
            Flow::Light => "light",
            Flow::Medium => "medium",
            Flow::Heavy => "heavy",
        }
    }
}

/// Everything logged for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub flow: Option<Flow>,
    /// Symptoms and note excerpts, in the order they were logged.
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CycleDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            flow: None,
            symptoms: Vec::new(),
            notes: None,
        }
    }
}

/// A completed cycle. Never modified after it is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleHistoryEntry {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CycleHistoryEntry {
    /// Inclusive length in days.
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// State of the most recent cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePhase {
    /// No cycle has been started.
    #[default]
    Idle,
    /// A cycle is in progress.
    Open { start: NaiveDate },
    /// The last cycle was ended and no new one has started.
    Closed { start: NaiveDate, end: NaiveDate },
}

impl CyclePhase {
    /// Rebuild the phase from the nullable start/end pair of the stored layout.
    ///
    /// An end date without a start date carries no meaning and is dropped.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), None) => CyclePhase::Open { start },
            (Some(start), Some(end)) => CyclePhase::Closed { start, end },
            (None, _) => CyclePhase::Idle,
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            CyclePhase::Idle => None,
            CyclePhase::Open { start } | CyclePhase::Closed { start, .. } => Some(start),
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match *self {
            CyclePhase::Closed { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, CyclePhase::Open { .. })
    }
}

/// The full cycle record. Days are keyed by calendar date, so a date can
/// hold at most one [`CycleDay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleData {
    pub phase: CyclePhase,
    pub days: BTreeMap<NaiveDate, CycleDay>,
    pub predicted_next_date: Option<NaiveDate>,
    pub average_cycle_length: u32,
    pub cycle_history: Vec<CycleHistoryEntry>,
}

impl CycleData {
    pub fn new(default_cycle_length: u32) -> Self {
        Self {
            phase: CyclePhase::Idle,
            days: BTreeMap::new(),
            predicted_next_date: None,
            average_cycle_length: default_cycle_length,
            cycle_history: Vec::new(),
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.phase.start_date()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.phase.end_date()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CycleDay> {
        self.days.get(&date)
    }

    pub fn cycles_tracked(&self) -> usize {
        self.cycle_history.len()
    }

    pub fn days_logged(&self) -> usize {
        self.days.len()
    }

    /// Every symptom entry across all days, note excerpts included.
    pub fn symptoms_logged(&self) -> usize {
        self.days.values().map(|d| d.symptoms.len()).sum()
    }

    /// Recompute the derived prediction from the current start and average.
    pub fn refresh_prediction(&mut self) {
        self.predicted_next_date = predictor::predicted_next_date(self);
    }

    fn day_mut(&mut self, date: NaiveDate) -> &mut CycleDay {
        self.days
            .entry(date)
            .or_insert_with(|| CycleDay::new(date))
    }
}

impl Default for CycleData {
    fn default() -> Self {
        Self::new(crate::constants::cycle::DEFAULT_CYCLE_LENGTH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("a cycle started on {0} is still open")]
    CycleAlreadyOpen(NaiveDate),
    #[error("there is no open cycle to end")]
    NoOpenCycle,
    #[error("cycle cannot end on {end} before it started on {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("symptom text is empty")]
    EmptySymptom,
}

/// Result of a successful tracker action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Award {
    /// Points added by this action.
    pub points: u32,
    /// Messages to show, action confirmation first.
    pub notifications: Vec<Notification>,
}

/// Cycle record plus point total, mutated only through tracker actions.
#[derive(Debug, Clone)]
pub struct CycleTracker {
    data: CycleData,
    points: u32,
    config: TrackerConfig,
}

impl CycleTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            data: CycleData::new(config.default_cycle_length),
            points: 0,
            config,
        }
    }

    /// Resume from previously stored state.
    pub fn from_parts(data: CycleData, points: u32, config: TrackerConfig) -> Self {
        Self {
            data,
            points,
            config,
        }
    }

    pub fn data(&self) -> &CycleData {
        &self.data
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn into_parts(self) -> (CycleData, u32) {
        (self.data, self.points)
    }

    /// Begin a cycle on `date`.
    ///
    /// Rejected while another cycle is open. The day is marked with medium
    /// flow, keeping any symptoms already logged for it.
    pub fn start_cycle(&mut self, date: NaiveDate) -> Result<Award, TrackerError> {
        if let CyclePhase::Open { start } = self.data.phase {
            return Err(TrackerError::CycleAlreadyOpen(start));
        }

        self.data.phase = CyclePhase::Open { start: date };
        self.data.day_mut(date).flow = Some(Flow::Medium);
        self.data.predicted_next_date =
            predictor::predict_next_date(date, self.data.average_cycle_length);

        log::debug!(
            "cycle started on {date}, next predicted {:?}",
            self.data.predicted_next_date
        );

        let notice = Notification::info(
            "Cycle Tracking Started",
            format!("Started tracking from {}", long_date(date)),
        );
        Ok(self.award(self.config.awards.start_cycle, notice))
    }

    /// Close the open cycle on `date`, archive it and refresh the average.
    pub fn end_cycle(&mut self, date: NaiveDate) -> Result<Award, TrackerError> {
        let start = match self.data.phase {
            CyclePhase::Open { start } => start,
            _ => return Err(TrackerError::NoOpenCycle),
        };
        if date < start {
            return Err(TrackerError::EndBeforeStart { start, end: date });
        }

        self.data
            .cycle_history
            .push(CycleHistoryEntry { start, end: date });
        self.data.average_cycle_length = predictor::average_cycle_length(
            &self.data.cycle_history,
            self.data.average_cycle_length,
        );
        self.data.phase = CyclePhase::Closed { start, end: date };
        self.data.predicted_next_date =
            predictor::predict_next_date(start, self.data.average_cycle_length);

        log::debug!(
            "cycle {start}..{date} archived, average now {} days",
            self.data.average_cycle_length
        );

        let notice = Notification::info(
            "Cycle Ended",
            format!("Cycle ended on {}", long_date(date)),
        );
        Ok(self.award(self.config.awards.end_cycle, notice))
    }

    /// Append a symptom to the day's log. Repeats are kept.
    pub fn log_symptom(&mut self, date: NaiveDate, text: &str) -> Result<Award, TrackerError> {
        let symptom = text.trim();
        if symptom.is_empty() {
            return Err(TrackerError::EmptySymptom);
        }

        self.data.day_mut(date).symptoms.push(symptom.to_string());

        let notice = Notification::info(
            "Symptom Logged",
            format!("Added {symptom} for {}", short_date(date)),
        );
        Ok(self.award(self.config.awards.log_symptom, notice))
    }

    /// Record free-text notes as an excerpt entry in the day's symptom log.
    ///
    /// The excerpt is cut from the text as typed, so leading whitespace
    /// counts toward its length.
    pub fn log_notes(&mut self, date: NaiveDate, text: &str) -> Result<Award, TrackerError> {
        if text.trim().is_empty() {
            return Err(TrackerError::EmptySymptom);
        }
        let entry = notes_entry(text, self.config.notes_excerpt_chars);
        self.log_symptom(date, &entry)
    }

    /// Set the day's flow, replacing any earlier value.
    pub fn set_flow(&mut self, date: NaiveDate, flow: Flow) -> Result<Award, TrackerError> {
        self.data.day_mut(date).flow = Some(flow);

        let notice = Notification::info(
            "Flow Intensity Updated",
            format!("Set {} flow for {}", flow.as_str(), short_date(date)),
        );
        Ok(self.award(self.config.awards.set_flow, notice))
    }

    fn award(&mut self, amount: u32, notice: Notification) -> Award {
        self.points = self.points.saturating_add(amount);
        Award {
            points: amount,
            notifications: vec![
                notice,
                Notification::info(
                    "Points Earned!",
                    format!("+{amount} points added to your wellness score"),
                ),
            ],
        }
    }
}

impl Default for CycleTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

/// Build the symptom entry that stands in for a note.
pub fn notes_entry(text: &str, excerpt_chars: usize) -> String {
    let excerpt: String = text.chars().take(excerpt_chars).collect();
    let truncated = text.chars().count() > excerpt_chars;
    format!(
        "{NOTES_PREFIX}{excerpt}{}",
        if truncated { "..." } else { "" }
    )
}

/// Whether a symptom entry is a note excerpt rather than a symptom.
pub fn is_notes_entry(entry: &str) -> bool {
    entry.starts_with(NOTES_PREFIX.trim_end())
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn start_opens_cycle_and_marks_medium_flow() {
        let mut tracker = CycleTracker::default();
        let award = tracker.start_cycle(d(2023, 1, 1)).unwrap();

        assert_eq!(award.points, 10);
        assert_eq!(tracker.points(), 10);
        assert_eq!(tracker.data().phase, CyclePhase::Open { start: d(2023, 1, 1) });
        assert_eq!(tracker.data().day(d(2023, 1, 1)).unwrap().flow, Some(Flow::Medium));
        assert_eq!(tracker.data().predicted_next_date, Some(d(2023, 1, 29)));
        assert!(tracker.data().cycle_history.is_empty());
    }

    #[test]
    fn start_while_open_is_rejected() {
        let mut tracker = CycleTracker::default();
        tracker.start_cycle(d(2023, 1, 1)).unwrap();
        let before = tracker.data().clone();

        let err = tracker.start_cycle(d(2023, 1, 3)).unwrap_err();
        assert_eq!(err, TrackerError::CycleAlreadyOpen(d(2023, 1, 1)));
        assert_eq!(tracker.data(), &before);
        assert_eq!(tracker.points(), 10);
    }

    #[test]
    fn start_keeps_existing_symptoms() {
        let mut tracker = CycleTracker::default();
        tracker.log_symptom(d(2023, 1, 1), "Cramps").unwrap();
        tracker.start_cycle(d(2023, 1, 1)).unwrap();

        let day = tracker.data().day(d(2023, 1, 1)).unwrap();
        assert_eq!(day.symptoms, vec!["Cramps"]);
        assert_eq!(day.flow, Some(Flow::Medium));
        assert_eq!(tracker.data().days_logged(), 1);
    }

    #[test]
    fn end_requires_open_cycle() {
        let mut tracker = CycleTracker::default();
        assert_eq!(
            tracker.end_cycle(d(2023, 1, 5)).unwrap_err(),
            TrackerError::NoOpenCycle
        );

        tracker.start_cycle(d(2023, 1, 1)).unwrap();
        tracker.end_cycle(d(2023, 1, 5)).unwrap();
        assert_eq!(
            tracker.end_cycle(d(2023, 1, 6)).unwrap_err(),
            TrackerError::NoOpenCycle
        );
        assert_eq!(tracker.data().cycle_history.len(), 1);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut tracker = CycleTracker::default();
        tracker.start_cycle(d(2023, 1, 10)).unwrap();
        let err = tracker.end_cycle(d(2023, 1, 9)).unwrap_err();
        assert!(matches!(err, TrackerError::EndBeforeStart { .. }));
        assert!(tracker.data().phase.is_open());
    }

    #[test]
    fn single_end_keeps_default_average() {
        let mut tracker = CycleTracker::default();
        tracker.start_cycle(d(2023, 1, 1)).unwrap();
        tracker.end_cycle(d(2023, 1, 5)).unwrap();

        let data = tracker.data();
        assert_eq!(data.average_cycle_length, 28);
        assert_eq!(
            data.phase,
            CyclePhase::Closed {
                start: d(2023, 1, 1),
                end: d(2023, 1, 5)
            }
        );
        assert_eq!(data.predicted_next_date, Some(d(2023, 1, 29)));
    }

    #[test]
    fn two_cycles_give_gap_average_and_prediction() {
        let mut tracker = CycleTracker::default();
        tracker.start_cycle(d(2023, 1, 1)).unwrap();
        tracker.end_cycle(d(2023, 1, 5)).unwrap();
        tracker.start_cycle(d(2023, 1, 29)).unwrap();
        tracker.end_cycle(d(2023, 2, 2)).unwrap();

        let data = tracker.data();
        assert_eq!(
            data.cycle_history,
            vec![
                CycleHistoryEntry {
                    start: d(2023, 1, 1),
                    end: d(2023, 1, 5)
                },
                CycleHistoryEntry {
                    start: d(2023, 1, 29),
                    end: d(2023, 2, 2)
                },
            ]
        );
        assert_eq!(data.average_cycle_length, 28);
        assert_eq!(data.predicted_next_date, Some(d(2023, 2, 26)));
    }

    #[test]
    fn irregular_gap_shifts_prediction() {
        let mut tracker = CycleTracker::default();
        tracker.start_cycle(d(2023, 1, 1)).unwrap();
        tracker.end_cycle(d(2023, 1, 5)).unwrap();
        tracker.start_cycle(d(2023, 1, 31)).unwrap();
        tracker.end_cycle(d(2023, 2, 4)).unwrap();

        assert_eq!(tracker.data().average_cycle_length, 30);
        assert_eq!(tracker.data().predicted_next_date, Some(d(2023, 3, 2)));
    }

    #[test]
    fn points_for_standard_session() {
        let mut tracker = CycleTracker::default();
        let day = d(2023, 1, 2);
        tracker.start_cycle(d(2023, 1, 1)).unwrap();
        tracker.end_cycle(d(2023, 1, 5)).unwrap();
        tracker.log_symptom(day, "Cramps").unwrap();
        tracker.log_symptom(day, "Fatigue").unwrap();
        tracker.set_flow(day, Flow::Light).unwrap();
        assert_eq!(tracker.points(), 38);
    }

    #[test]
    fn set_flow_last_write_wins() {
        let mut tracker = CycleTracker::default();
        let day = d(2023, 3, 4);
        tracker.set_flow(day, Flow::Heavy).unwrap();
        tracker.set_flow(day, Flow::Light).unwrap();
        assert_eq!(tracker.data().day(day).unwrap().flow, Some(Flow::Light));
        assert_eq!(tracker.data().days_logged(), 1);
    }

    #[test]
    fn symptoms_append_without_dedup() {
        let mut tracker = CycleTracker::default();
        let day = d(2023, 3, 4);
        for s in ["Headache", "Bloating", "Headache"] {
            tracker.log_symptom(day, s).unwrap();
        }
        assert_eq!(
            tracker.data().day(day).unwrap().symptoms,
            vec!["Headache", "Bloating", "Headache"]
        );
    }

    #[test]
    fn blank_symptom_is_rejected_without_points() {
        let mut tracker = CycleTracker::default();
        assert_eq!(
            tracker.log_symptom(d(2023, 3, 4), "   ").unwrap_err(),
            TrackerError::EmptySymptom
        );
        assert_eq!(tracker.points(), 0);
        assert_eq!(tracker.data().days_logged(), 0);
    }

    #[test]
    fn notes_are_excerpted_into_symptoms() {
        let mut tracker = CycleTracker::default();
        let day = d(2023, 3, 4);
        tracker
            .log_notes(day, "Felt tired all afternoon after lunch")
            .unwrap();
        tracker.log_notes(day, "Short note").unwrap();

        let symptoms = &tracker.data().day(day).unwrap().symptoms;
        assert_eq!(symptoms[0], "Notes added: Felt tired all after...");
        assert_eq!(symptoms[1], "Notes added: Short note");
        assert!(is_notes_entry(&symptoms[0]));
        assert_eq!(tracker.points(), 10);
    }

    #[test]
    fn notes_excerpt_keeps_leading_whitespace() {
        let mut tracker = CycleTracker::default();
        let day = d(2023, 3, 5);
        tracker.log_notes(day, "   Slept badly again last night").unwrap();
        tracker.log_notes(day, "Short   ").unwrap();
        assert!(tracker.log_notes(day, " \t ").is_err());

        let symptoms = &tracker.data().day(day).unwrap().symptoms;
        assert_eq!(symptoms[0], "Notes added:    Slept badly again...");
        assert_eq!(symptoms[1], "Notes added: Short");
    }

    #[test]
    fn notes_excerpt_counts_characters() {
        assert_eq!(notes_entry("ééééé", 3), "Notes added: ééé...");
        assert_eq!(notes_entry("exactly twenty chars", 20), "Notes added: exactly twenty chars");
    }

    #[test]
    fn award_carries_confirmation_then_points() {
        let mut tracker = CycleTracker::default();
        let award = tracker.set_flow(d(2023, 1, 9), Flow::Heavy).unwrap();
        assert_eq!(award.points, 3);
        assert_eq!(award.notifications[0].title, "Flow Intensity Updated");
        assert_eq!(award.notifications[0].description, "Set heavy flow for Jan 9");
        assert_eq!(award.notifications[1].title, "Points Earned!");
    }

    #[test]
    fn phase_from_bounds() {
        assert_eq!(CyclePhase::from_bounds(None, None), CyclePhase::Idle);
        assert_eq!(CyclePhase::from_bounds(None, Some(d(2023, 1, 1))), CyclePhase::Idle);
        assert!(CyclePhase::from_bounds(Some(d(2023, 1, 1)), None).is_open());
        assert_eq!(
            CyclePhase::from_bounds(Some(d(2023, 1, 1)), Some(d(2023, 1, 4))).end_date(),
            Some(d(2023, 1, 4))
        );
    }
}
