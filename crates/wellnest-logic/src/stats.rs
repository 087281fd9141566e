//! Derived cycle statistics for the stats view.
//!
//! All functions are read-only over [`CycleData`]; `today` is passed in so
//! results are deterministic.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::cycle::{is_notes_entry, CycleData, Flow};

/// Inclusive length of the current (or last closed) cycle. 0 when idle.
pub fn current_cycle_duration(data: &CycleData, today: NaiveDate) -> i64 {
    match data.start_date() {
        None => 0,
        Some(start) => {
            let end = data.end_date().unwrap_or(today);
            (end - start).num_days() + 1
        }
    }
}

/// One bar of the cycle length history chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleLengthPoint {
    pub label: String,
    pub days: i64,
    pub average: u32,
}

pub fn cycle_lengths(data: &CycleData) -> Vec<CycleLengthPoint> {
    data.cycle_history
        .iter()
        .enumerate()
        .map(|(i, cycle)| CycleLengthPoint {
            label: format!("Cycle {}", i + 1),
            days: cycle.length_days(),
            average: data.average_cycle_length,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomCount {
    pub name: String,
    pub count: usize,
}

/// Most frequent symptoms, note excerpts excluded. Ties break by name.
pub fn top_symptoms(data: &CycleData, limit: usize) -> Vec<SymptomCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for symptom in data.days.values().flat_map(|d| d.symptoms.iter()) {
        if !is_notes_entry(symptom) {
            *counts.entry(symptom.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<SymptomCount> = counts
        .into_iter()
        .map(|(name, count)| SymptomCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}

/// Days logged per flow level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlowDistribution {
    pub light: usize,
    pub medium: usize,
    pub heavy: usize,
}

impl FlowDistribution {
    pub fn get(&self, flow: Flow) -> usize {
        match flow {
            Flow::Light => self.light,
            Flow::Medium => self.medium,
            Flow::Heavy => self.heavy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.light + self.medium + self.heavy == 0
    }

    /// Bar width for `flow` relative to the most common level, 0..=100.
    pub fn relative_percent(&self, flow: Flow) -> f64 {
        let max = self.light.max(self.medium).max(self.heavy);
        if max == 0 {
            return 0.0;
        }
        self.get(flow) as f64 / max as f64 * 100.0
    }
}

pub fn flow_distribution(data: &CycleData) -> FlowDistribution {
    let mut dist = FlowDistribution::default();
    for flow in data.days.values().filter_map(|d| d.flow) {
        match flow {
            Flow::Light => dist.light += 1,
            Flow::Medium => dist.medium += 1,
            Flow::Heavy => dist.heavy += 1,
        }
    }
    dist
}

/// Days from `today` to the predicted start. Negative once it has passed.
pub fn days_until_predicted(data: &CycleData, today: NaiveDate) -> Option<i64> {
    data.predicted_next_date
        .map(|next| (next - today).num_days())
}
