//! Persisting tracker state in a key-value store
//!
//! Cycle data is stored as a versioned camelCase JSON document under
//! [`storage_keys::CYCLE_DATA`]; points as a decimal string under
//! [`storage_keys::POINTS`]. Documents written by older builds (no
//! `version`, ISO timestamps instead of dates, missing fields) are migrated
//! on load.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wellnest_logic::config::TrackerConfig;
use wellnest_logic::constants::storage_keys;
use wellnest_logic::cycle::{CycleData, CycleDay, CycleHistoryEntry, CyclePhase, Flow};

/// Version number for the cycle data format (increment when format changes)
pub const CYCLE_DATA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("stored cycle data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored date {0:?} is neither a date nor a timestamp")]
    InvalidDate(String),
    #[error("stored points value {0:?} is not a whole number")]
    InvalidPoints(String),
    #[error("cycle data version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("storage key {0:?} may only contain letters, digits, '-' and '_'")]
    InvalidKey(String),
}

// ── Storage backends ──────────────────────────────────────────────────

/// String key-value storage, the shape of browser local storage.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        (**self).remove(key)
    }
}

/// In-process storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        // write-then-rename so a crash never leaves a torn value
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Stored document ───────────────────────────────────────────────────

/// Serializable form of [`CycleData`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCycleData {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub days: Vec<StoredCycleDay>,
    #[serde(default)]
    pub predicted_next_date: Option<String>,
    #[serde(default)]
    pub average_cycle_length: Option<u32>,
    #[serde(default)]
    pub cycle_history: Vec<StoredCycleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCycleDay {
    pub date: String,
    #[serde(default)]
    pub flow: Option<Flow>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCycleEntry {
    pub start: String,
    pub end: String,
}

fn legacy_version() -> u32 {
    1
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accept `YYYY-MM-DD` or an RFC 3339 timestamp. A timestamp is moved into
/// `offset` before being cut to its date, so `2023-01-01T22:30:00Z` read at
/// UTC+2 is January 2nd.
pub fn parse_stored_date(text: &str, offset: FixedOffset) -> Result<NaiveDate, PersistenceError> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&offset).date_naive())
        .map_err(|_| PersistenceError::InvalidDate(text.to_string()))
}

fn parse_optional_date(
    text: Option<&str>,
    offset: FixedOffset,
) -> Result<Option<NaiveDate>, PersistenceError> {
    text.map(|text| parse_stored_date(text, offset)).transpose()
}

/// Zone legacy timestamps are read in. Out-of-range values fall back to UTC.
pub fn legacy_offset(config: &TrackerConfig) -> FixedOffset {
    config
        .legacy_utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

impl From<&CycleData> for StoredCycleData {
    fn from(data: &CycleData) -> Self {
        Self {
            version: CYCLE_DATA_VERSION,
            start_date: data.start_date().map(format_date),
            end_date: data.end_date().map(format_date),
            days: data
                .days
                .values()
                .map(|day| StoredCycleDay {
                    date: format_date(day.date),
                    flow: day.flow,
                    symptoms: day.symptoms.clone(),
                    notes: day.notes.clone(),
                })
                .collect(),
            predicted_next_date: data.predicted_next_date.map(format_date),
            average_cycle_length: Some(data.average_cycle_length),
            cycle_history: data
                .cycle_history
                .iter()
                .map(|entry| StoredCycleEntry {
                    start: format_date(entry.start),
                    end: format_date(entry.end),
                })
                .collect(),
        }
    }
}

impl StoredCycleData {
    /// Rebuild tracker state. Days sharing a date are merged in list order;
    /// the prediction is recomputed rather than trusted.
    pub fn into_cycle_data(self, config: &TrackerConfig) -> Result<CycleData, PersistenceError> {
        if self.version > CYCLE_DATA_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                supported: CYCLE_DATA_VERSION,
            });
        }

        let offset = legacy_offset(config);
        let start = parse_optional_date(self.start_date.as_deref(), offset)?;
        let end = parse_optional_date(self.end_date.as_deref(), offset)?;
        let average = self
            .average_cycle_length
            .filter(|len| *len > 0)
            .unwrap_or(config.default_cycle_length);

        let mut data = CycleData::new(average);
        data.phase = CyclePhase::from_bounds(start, end);

        for stored in self.days {
            let date = parse_stored_date(&stored.date, offset)?;
            let day = data.days.entry(date).or_insert_with(|| CycleDay::new(date));
            if stored.flow.is_some() {
                day.flow = stored.flow;
            }
            day.symptoms.extend(stored.symptoms);
            if stored.notes.is_some() {
                day.notes = stored.notes;
            }
        }

        for entry in self.cycle_history {
            data.cycle_history.push(CycleHistoryEntry {
                start: parse_stored_date(&entry.start, offset)?,
                end: parse_stored_date(&entry.end, offset)?,
            });
        }

        data.refresh_prediction();
        Ok(data)
    }
}

pub fn encode_cycle_data(data: &CycleData) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&StoredCycleData::from(data))?)
}

pub fn decode_cycle_data(text: &str, config: &TrackerConfig) -> Result<CycleData, PersistenceError> {
    let stored: StoredCycleData = serde_json::from_str(text)?;
    stored.into_cycle_data(config)
}

pub fn encode_points(points: u32) -> String {
    points.to_string()
}

/// Parse a stored points string. Blank counts as zero.
pub fn decode_points(text: &str) -> Result<u32, PersistenceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| PersistenceError::InvalidPoints(trimmed.to_string()))
}

// ── Load / save ───────────────────────────────────────────────────────

/// Load cycle data, or fresh state when nothing is stored.
pub fn load_cycle_data<S: KeyValueStorage + ?Sized>(
    storage: &S,
    config: &TrackerConfig,
) -> Result<CycleData, PersistenceError> {
    match storage.get(storage_keys::CYCLE_DATA)? {
        Some(text) => decode_cycle_data(&text, config),
        None => Ok(CycleData::new(config.default_cycle_length)),
    }
}

/// Load the points balance, zero when nothing is stored.
pub fn load_points<S: KeyValueStorage + ?Sized>(storage: &S) -> Result<u32, PersistenceError> {
    match storage.get(storage_keys::POINTS)? {
        Some(text) => decode_points(&text),
        None => Ok(0),
    }
}

pub fn save_cycle_data<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    data: &CycleData,
) -> Result<(), PersistenceError> {
    storage.set(storage_keys::CYCLE_DATA, &encode_cycle_data(data)?)
}

pub fn save_points<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    points: u32,
) -> Result<(), PersistenceError> {
    storage.set(storage_keys::POINTS, &encode_points(points))
}
