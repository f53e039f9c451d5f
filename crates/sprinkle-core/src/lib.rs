//! Core domain types for the sprinkle mock controller.
//!
//! This crate holds everything the HTTP layer mutates:
//!
//! - [`Plant`] and [`WateringEvent`] — the records served by `/api/plants`
//! - [`PlantStore`] — the fixed-length plant list and its validate-then-mutate operations
//! - [`PlantError`] — rejection reasons, whose messages are the wire error strings
//!
//! # Example
//!
//! ```rust
//! use sprinkle_core::{PlantStore, HISTORY_CAPACITY};
//!
//! let mut store = PlantStore::with_sample_data(1_700_000_000.0);
//! store.set_interval_days(1, 7.0).unwrap();
//! assert_eq!(store.plants()[1].interval_minutes, 10080);
//!
//! store.water_now(0, 1_700_000_100.0).unwrap();
//! assert_eq!(store.plants()[0].watering_history.len(), HISTORY_CAPACITY);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of watering events kept per plant.
pub const HISTORY_CAPACITY: usize = 5;

/// Minutes in one day, used to convert `intervalDays` payloads.
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Reasons a plant operation is rejected.
///
/// The `Display` strings are sent verbatim in `{ "error": ... }` bodies.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantError {
    /// Index missing, non-numeric, negative, or out of bounds.
    #[error("Invalid plant index")]
    InvalidIndex,

    /// `ozPerWatering` missing, not a number, or not positive.
    #[error("Invalid watering amount")]
    InvalidAmount,

    /// `intervalDays` missing, not a number, or not positive.
    #[error("Invalid interval")]
    InvalidInterval,

    /// `name` missing, not a string, or blank after trimming.
    #[error("Invalid name")]
    InvalidName,
}

/// One historical watering occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WateringEvent {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    /// Ounces dispensed.
    pub amount: f64,
}

/// A watering-schedule record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub name: String,
    pub oz_per_watering: f64,
    pub interval_minutes: u32,
    /// Most recent first, never longer than [`HISTORY_CAPACITY`].
    #[serde(default)]
    pub watering_history: Vec<WateringEvent>,
}

impl Plant {
    /// Creates a plant with an empty watering history.
    pub fn new(name: impl Into<String>, oz_per_watering: f64, interval_minutes: u32) -> Self {
        Self {
            name: name.into(),
            oz_per_watering,
            interval_minutes,
            watering_history: Vec::new(),
        }
    }

    /// Timestamp of the most recent watering, if any.
    pub fn last_watered(&self) -> Option<f64> {
        self.watering_history.first().map(|e| e.timestamp)
    }

    /// Returns true when the plant was never watered or its interval has elapsed.
    pub fn needs_watering(&self, now: f64) -> bool {
        match self.last_watered() {
            None => true,
            Some(last) => now - last >= f64::from(self.interval_minutes) * 60.0,
        }
    }

    /// Prepends an event and drops the oldest ones beyond the capacity.
    pub fn record_watering(&mut self, event: WateringEvent) {
        self.watering_history.insert(0, event);
        self.watering_history.truncate(HISTORY_CAPACITY);
    }
}

/// Seconds since the Unix epoch as a real number.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Built-in sample plants: name, dose, interval and history offsets in seconds.
const SAMPLE_PLANTS: [(&str, f64, u32, [f64; HISTORY_CAPACITY]); 3] = [
    ("Prickly Pear", 3.0, 20160, [86400.0, 172800.0, 259200.0, 345600.0, 432000.0]),
    ("Rosemary", 4.0, 10080, [43200.0, 129600.0, 216000.0, 302400.0, 388800.0]),
    ("Fittonia", 2.5, 1440, [3600.0, 90000.0, 176400.0, 262800.0, 349200.0]),
];

/// The fixed-length, ordered plant list.
///
/// Every mutating operation validates the index and the payload before
/// touching the record, so a rejected call leaves the store unchanged.
#[derive(Debug, Clone, Default)]
pub struct PlantStore {
    plants: Vec<Plant>,
}

impl PlantStore {
    /// Creates a store over the given plants. Order is kept for the store's lifetime.
    pub fn new(plants: Vec<Plant>) -> Self {
        Self { plants }
    }

    /// Creates the three sample plants with five synthetic waterings each,
    /// timestamped relative to `now`.
    pub fn with_sample_data(now: f64) -> Self {
        let plants = SAMPLE_PLANTS
            .iter()
            .map(|(name, oz, interval, offsets)| Plant {
                name: (*name).to_string(),
                oz_per_watering: *oz,
                interval_minutes: *interval,
                watering_history: offsets
                    .iter()
                    .map(|offset| WateringEvent {
                        timestamp: now - offset,
                        amount: *oz,
                    })
                    .collect(),
            })
            .collect();
        Self::new(plants)
    }

    /// All plants in storage order.
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Parses a raw path segment into an in-range index.
    ///
    /// Anything that is not a non-negative integer below `len()` is rejected.
    pub fn resolve_index(&self, raw: &str) -> Result<usize, PlantError> {
        let index: usize = raw.trim().parse().map_err(|_| PlantError::InvalidIndex)?;
        self.check_index(index)
    }

    fn check_index(&self, index: usize) -> Result<usize, PlantError> {
        if index < self.plants.len() {
            Ok(index)
        } else {
            Err(PlantError::InvalidIndex)
        }
    }

    /// Gets a plant by index.
    pub fn get(&self, index: usize) -> Result<&Plant, PlantError> {
        self.plants.get(index).ok_or(PlantError::InvalidIndex)
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Plant, PlantError> {
        self.plants.get_mut(index).ok_or(PlantError::InvalidIndex)
    }

    /// Sets the dose dispensed per watering.
    pub fn set_amount(&mut self, index: usize, oz_per_watering: f64) -> Result<(), PlantError> {
        let index = self.check_index(index)?;
        if !oz_per_watering.is_finite() || oz_per_watering <= 0.0 {
            return Err(PlantError::InvalidAmount);
        }
        self.plants[index].oz_per_watering = oz_per_watering;
        Ok(())
    }

    /// Sets the watering interval from a day count and returns the stored minutes.
    ///
    /// Fractional days are rounded to the nearest whole minute; anything that
    /// rounds to zero or does not fit in a `u32` is rejected.
    pub fn set_interval_days(&mut self, index: usize, interval_days: f64) -> Result<u32, PlantError> {
        let index = self.check_index(index)?;
        if !interval_days.is_finite() || interval_days <= 0.0 {
            return Err(PlantError::InvalidInterval);
        }
        let minutes = (interval_days * MINUTES_PER_DAY).round();
        if minutes < 1.0 || minutes > f64::from(u32::MAX) {
            return Err(PlantError::InvalidInterval);
        }
        let minutes = minutes as u32;
        self.plants[index].interval_minutes = minutes;
        Ok(minutes)
    }

    /// Records an immediate watering using the plant's current dose.
    pub fn water_now(&mut self, index: usize, now: f64) -> Result<WateringEvent, PlantError> {
        let plant = self.get_mut(index)?;
        let event = WateringEvent {
            timestamp: now,
            amount: plant.oz_per_watering,
        };
        plant.record_watering(event);
        Ok(event)
    }

    /// Renames a plant, storing the trimmed name. Returns the stored value.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<&str, PlantError> {
        let index = self.check_index(index)?;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PlantError::InvalidName);
        }
        let plant = &mut self.plants[index];
        plant.name = trimmed.to_string();
        Ok(&plant.name)
    }

    /// Clears a plant's watering history.
    pub fn reset_history(&mut self, index: usize) -> Result<(), PlantError> {
        self.get_mut(index)?.watering_history.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: f64 = 1_700_000_000.0;

    fn store() -> PlantStore {
        PlantStore::with_sample_data(NOW)
    }

    #[test]
    fn sample_data_matches_controller_defaults() {
        let store = store();
        let names: Vec<&str> = store.plants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Prickly Pear", "Rosemary", "Fittonia"]);

        let fittonia = &store.plants()[2];
        assert_eq!(fittonia.interval_minutes, 1440);
        assert_eq!(fittonia.watering_history.len(), HISTORY_CAPACITY);
        assert_eq!(fittonia.last_watered(), Some(NOW - 3600.0));
        assert!(fittonia.watering_history.iter().all(|e| e.amount == 2.5));
    }

    #[test]
    fn sample_history_is_most_recent_first() {
        for plant in store().plants() {
            let stamps: Vec<f64> = plant.watering_history.iter().map(|e| e.timestamp).collect();
            assert!(stamps.windows(2).all(|w| w[0] > w[1]), "{}", plant.name);
        }
    }

    #[test]
    fn resolve_index_rejects_non_numeric_negative_and_out_of_range() {
        let store = store();
        assert_eq!(store.resolve_index("0"), Ok(0));
        assert_eq!(store.resolve_index("2"), Ok(2));
        for raw in ["3", "-1", "abc", "", "1.5", "99999999999999999999999"] {
            assert_eq!(store.resolve_index(raw), Err(PlantError::InvalidIndex), "{raw:?}");
        }
    }

    #[test]
    fn set_amount_updates_positive_values_only() {
        let mut store = store();
        store.set_amount(0, 5.5).unwrap();
        assert_eq!(store.plants()[0].oz_per_watering, 5.5);

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(store.set_amount(0, bad), Err(PlantError::InvalidAmount));
        }
        assert_eq!(store.plants()[0].oz_per_watering, 5.5);
    }

    #[test]
    fn out_of_range_index_leaves_store_unchanged() {
        let mut store = store();
        let before = store.plants().to_vec();

        assert_eq!(store.set_amount(3, 1.0), Err(PlantError::InvalidIndex));
        assert_eq!(store.set_interval_days(3, 1.0), Err(PlantError::InvalidIndex));
        assert_eq!(store.water_now(3, NOW), Err(PlantError::InvalidIndex));
        assert_eq!(store.rename(3, "Basil"), Err(PlantError::InvalidIndex));
        assert_eq!(store.reset_history(3), Err(PlantError::InvalidIndex));

        assert_eq!(store.plants(), before.as_slice());
    }

    #[test]
    fn index_is_checked_before_payload() {
        let mut store = store();
        assert_eq!(store.set_amount(7, -1.0), Err(PlantError::InvalidIndex));
        assert_eq!(store.rename(7, "   "), Err(PlantError::InvalidIndex));
    }

    #[test]
    fn interval_converts_days_to_minutes() {
        let mut store = store();
        assert_eq!(store.set_interval_days(1, 7.0), Ok(10080));
        assert_eq!(store.plants()[1].interval_minutes, 10080);

        assert_eq!(store.set_interval_days(1, 0.5), Ok(720));
    }

    #[test]
    fn interval_rejects_non_positive_and_sub_minute_values() {
        let mut store = store();
        for bad in [0.0, -2.0, 0.0001, f64::NAN, 1e12] {
            assert_eq!(store.set_interval_days(0, bad), Err(PlantError::InvalidInterval), "{bad}");
        }
        assert_eq!(store.plants()[0].interval_minutes, 20160);
    }

    #[test]
    fn water_now_prepends_with_current_dose() {
        let mut store = store();
        store.set_amount(1, 6.0).unwrap();
        let event = store.water_now(1, NOW + 10.0).unwrap();

        let history = &store.plants()[1].watering_history;
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history[0], event);
        assert_eq!(event, WateringEvent { timestamp: NOW + 10.0, amount: 6.0 });
        assert_eq!(history[1].timestamp, NOW - 43200.0);
    }

    #[test]
    fn six_waterings_evict_every_synthetic_event() {
        let mut store = store();
        for i in 1..=6 {
            store.water_now(0, NOW + f64::from(i)).unwrap();
        }

        let stamps: Vec<f64> = store.plants()[0]
            .watering_history
            .iter()
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(stamps, [NOW + 6.0, NOW + 5.0, NOW + 4.0, NOW + 3.0, NOW + 2.0]);
    }

    #[test]
    fn rename_trims_and_rejects_blank_names() {
        let mut store = store();
        assert_eq!(store.rename(2, "  Basil  "), Ok("Basil"));
        assert_eq!(store.plants()[2].name, "Basil");

        assert_eq!(store.rename(2, ""), Err(PlantError::InvalidName));
        assert_eq!(store.rename(2, " \t\n "), Err(PlantError::InvalidName));
        assert_eq!(store.plants()[2].name, "Basil");
    }

    #[test]
    fn reset_history_clears_and_flags_for_watering() {
        let mut store = store();
        assert!(!store.plants()[0].needs_watering(NOW));

        store.reset_history(0).unwrap();
        assert!(store.plants()[0].watering_history.is_empty());
        assert!(store.plants()[0].needs_watering(NOW));
    }

    #[test]
    fn needs_watering_once_interval_elapsed() {
        let mut plant = Plant::new("Thyme", 3.0, 60);
        plant.record_watering(WateringEvent { timestamp: NOW, amount: 3.0 });

        assert!(!plant.needs_watering(NOW + 3599.0));
        assert!(plant.needs_watering(NOW + 3600.0));
    }

    #[test]
    fn plant_serializes_with_camel_case_fields() {
        let plant = Plant::new("Mint", 3.5, 2880);
        let json = serde_json::to_value(&plant).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Mint",
                "ozPerWatering": 3.5,
                "intervalMinutes": 2880,
                "wateringHistory": []
            })
        );
    }

    #[test]
    fn error_messages_match_wire_strings() {
        assert_eq!(PlantError::InvalidIndex.to_string(), "Invalid plant index");
        assert_eq!(PlantError::InvalidAmount.to_string(), "Invalid watering amount");
        assert_eq!(PlantError::InvalidInterval.to_string(), "Invalid interval");
        assert_eq!(PlantError::InvalidName.to_string(), "Invalid name");
    }
}
