//! Tracker service - cycle tracking bound to storage and a notifier
//!
//! Actions apply to the selected calendar date. With no date selected an
//! action is a no-op and returns `Ok(None)`. After every successful action
//! the cycle data and points are written back to storage and the award
//! notifications are forwarded to the notifier. An action is committed only
//! once its write succeeds.

use chrono::NaiveDate;
use thiserror::Error;
use wellnest_logic::achievements::{self, Achievement, AchievementSummary};
use wellnest_logic::config::TrackerConfig;
use wellnest_logic::cycle::{Award, CycleData, CycleTracker, Flow, TrackerError};
use wellnest_logic::notify::Notifier;
use wellnest_logic::stats;

use crate::config::LoadPolicy;
use crate::persistence::{self, KeyValueStorage, PersistenceError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct TrackerService<S: KeyValueStorage, N: Notifier> {
    tracker: CycleTracker,
    storage: S,
    notifier: N,
    selected: Option<NaiveDate>,
}

impl<S: KeyValueStorage, N: Notifier> TrackerService<S, N> {
    /// Load stored state (empty when absent). Undecodable state is an error
    /// under [`LoadPolicy::Strict`] and discarded under
    /// [`LoadPolicy::ResetOnCorrupt`].
    pub fn open(
        storage: S,
        notifier: N,
        config: TrackerConfig,
        policy: LoadPolicy,
    ) -> Result<Self, ServiceError> {
        let loaded = persistence::load_cycle_data(&storage, &config)
            .and_then(|data| Ok((data, persistence::load_points(&storage)?)));

        let (data, points) = match (loaded, policy) {
            (Ok(state), _) => state,
            (Err(e), LoadPolicy::Strict) => return Err(e.into()),
            (Err(e), LoadPolicy::ResetOnCorrupt) => {
                log::warn!("Discarding unreadable tracker state: {e}");
                (CycleData::new(config.default_cycle_length), 0)
            }
        };

        log::info!(
            "Tracker opened: {} cycles, {} days logged, {} points",
            data.cycles_tracked(),
            data.days_logged(),
            points
        );

        Ok(Self {
            tracker: CycleTracker::from_parts(data, points, config),
            storage,
            notifier,
            selected: None,
        })
    }

    pub fn select_date(&mut self, date: Option<NaiveDate>) {
        self.selected = date;
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn start_cycle(&mut self) -> Result<Option<Award>, ServiceError> {
        self.apply(|tracker, date| tracker.start_cycle(date))
    }

    pub fn end_cycle(&mut self) -> Result<Option<Award>, ServiceError> {
        self.apply(|tracker, date| tracker.end_cycle(date))
    }

    pub fn log_symptom(&mut self, text: &str) -> Result<Option<Award>, ServiceError> {
        self.apply(|tracker, date| tracker.log_symptom(date, text))
    }

    pub fn log_notes(&mut self, text: &str) -> Result<Option<Award>, ServiceError> {
        self.apply(|tracker, date| tracker.log_notes(date, text))
    }

    pub fn set_flow(&mut self, flow: Flow) -> Result<Option<Award>, ServiceError> {
        self.apply(|tracker, date| tracker.set_flow(date, flow))
    }

    fn apply<F>(&mut self, action: F) -> Result<Option<Award>, ServiceError>
    where
        F: FnOnce(&mut CycleTracker, NaiveDate) -> Result<Award, TrackerError>,
    {
        let Some(date) = self.selected else {
            log::debug!("No date selected, action skipped");
            return Ok(None);
        };

        // Work on a copy so a failed write leaves the live state untouched.
        let mut next = self.tracker.clone();
        let award = action(&mut next, date)?;
        save_state(&mut self.storage, &next)?;
        self.tracker = next;

        self.notifier.notify_all(award.notifications.iter().cloned());
        Ok(Some(award))
    }

    /// Write cycle data and points back to storage.
    pub fn persist(&mut self) -> Result<(), PersistenceError> {
        save_state(&mut self.storage, &self.tracker)
    }

    pub fn data(&self) -> &CycleData {
        self.tracker.data()
    }

    pub fn points(&self) -> u32 {
        self.tracker.points()
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        achievements::evaluate(self.points(), self.data())
    }

    pub fn achievement_summary(&self) -> AchievementSummary {
        achievements::summarize(&self.achievements())
    }

    pub fn current_cycle_duration(&self, today: NaiveDate) -> i64 {
        stats::current_cycle_duration(self.data(), today)
    }

    pub fn days_until_predicted(&self, today: NaiveDate) -> Option<i64> {
        stats::days_until_predicted(self.data(), today)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn save_state<S: KeyValueStorage>(
    storage: &mut S,
    tracker: &CycleTracker,
) -> Result<(), PersistenceError> {
    persistence::save_cycle_data(storage, tracker.data())?;
    persistence::save_points(storage, tracker.points())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use wellnest_logic::constants::storage_keys;
    use wellnest_logic::notify::CollectingNotifier;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn open(storage: MemoryStorage) -> TrackerService<MemoryStorage, CollectingNotifier> {
        TrackerService::open(
            storage,
            CollectingNotifier::new(),
            TrackerConfig::default(),
            LoadPolicy::Strict,
        )
        .unwrap()
    }

    #[test]
    fn test_no_selection_is_noop() {
        let mut service = open(MemoryStorage::new());
        assert_eq!(service.start_cycle().unwrap(), None);
        assert_eq!(service.points(), 0);
        assert!(service.storage().entries().is_empty());
        assert!(service.notifier().received.is_empty());
    }

    #[test]
    fn test_actions_persist_and_notify() {
        let mut service = open(MemoryStorage::new());
        service.select_date(Some(d(2023, 3, 1)));
        service.start_cycle().unwrap();
        service.log_symptom("Cramps").unwrap();
        service.log_symptom("Headache").unwrap();
        service.set_flow(Flow::Heavy).unwrap();
        service.select_date(Some(d(2023, 3, 5)));
        service.end_cycle().unwrap();

        assert_eq!(service.points(), 38);
        assert_eq!(service.notifier().received.len(), 10);
        assert_eq!(service.notifier().titles()[0], "Cycle Tracking Started");

        let storage = service.into_storage();
        assert_eq!(storage.entries()[storage_keys::POINTS], "38");

        let reopened = open(storage);
        assert_eq!(reopened.points(), 38);
        assert_eq!(reopened.data().cycles_tracked(), 1);
        assert_eq!(
            reopened.data().day(d(2023, 3, 1)).unwrap().symptoms,
            vec!["Cramps".to_string(), "Headache".to_string()]
        );
        assert_eq!(reopened.achievement_summary().unlocked, 1);
    }

    #[test]
    fn test_rejected_action_leaves_storage_alone() {
        let mut service = open(MemoryStorage::new());
        service.select_date(Some(d(2023, 3, 1)));
        let err = service.end_cycle().unwrap_err();
        assert!(matches!(err, ServiceError::Tracker(TrackerError::NoOpenCycle)));
        assert!(service.storage().entries().is_empty());
    }

    /// Reads like an empty store, refuses every write.
    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }

        fn remove(&mut self, _key: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_keeps_state_unchanged() {
        let mut service = TrackerService::open(
            ReadOnlyStorage,
            CollectingNotifier::new(),
            TrackerConfig::default(),
            LoadPolicy::Strict,
        )
        .unwrap();
        service.select_date(Some(d(2023, 3, 1)));

        for _ in 0..2 {
            let err = service.log_symptom("Cramps").unwrap_err();
            assert!(matches!(err, ServiceError::Persistence(PersistenceError::Io(_))));
        }
        assert!(service.start_cycle().is_err());

        assert_eq!(service.points(), 0);
        assert_eq!(service.data().days_logged(), 0);
        assert!(service.data().start_date().is_none());
        assert!(service.notifier().received.is_empty());
    }

    #[test]
    fn test_corrupt_state_respects_policy() {
        let mut storage = MemoryStorage::new();
        storage.set(storage_keys::CYCLE_DATA, "{broken").unwrap();
        storage.set(storage_keys::POINTS, "12").unwrap();

        let strict = TrackerService::open(
            storage.clone(),
            CollectingNotifier::new(),
            TrackerConfig::default(),
            LoadPolicy::Strict,
        );
        assert!(matches!(strict, Err(ServiceError::Persistence(PersistenceError::Json(_)))));

        let lenient = TrackerService::open(
            storage,
            CollectingNotifier::new(),
            TrackerConfig::default(),
            LoadPolicy::ResetOnCorrupt,
        )
        .unwrap();
        assert_eq!(lenient.points(), 0);
        assert_eq!(lenient.data(), &CycleData::default());
    }
}
