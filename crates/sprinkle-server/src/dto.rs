//! Data transfer objects for HTTP message serialization.
//!
//! Request bodies keep their fields as raw JSON values: the type check is part
//! of the per-endpoint validation, not a deserialization failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sprinkle_core::Plant;

/// Parses a request body, treating anything unusable as an empty object.
pub fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

// === Plant Types ===

/// A plant as returned by `GET /api/plants`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantInfo {
    #[serde(flatten)]
    pub plant: Plant,
    pub needs_watering: bool,
}

impl PlantInfo {
    pub fn new(plant: &Plant, now: f64) -> Self {
        Self {
            plant: plant.clone(),
            needs_watering: plant.needs_watering(now),
        }
    }
}

// === Mutation Types ===

/// Body of `PUT /api/plants/{index}/amount`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAmountRequest {
    #[serde(default)]
    pub oz_per_watering: Option<Value>,
}

impl UpdateAmountRequest {
    /// The dose, if the field is a JSON number.
    pub fn amount(&self) -> Option<f64> {
        self.oz_per_watering.as_ref().and_then(Value::as_f64)
    }
}

/// Body of `PUT /api/plants/{index}/interval`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntervalRequest {
    #[serde(default)]
    pub interval_days: Option<Value>,
}

impl UpdateIntervalRequest {
    pub fn days(&self) -> Option<f64> {
        self.interval_days.as_ref().and_then(Value::as_f64)
    }
}

/// Body of `PUT /api/plants/{index}/name`.
#[derive(Debug, Default, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub name: Option<Value>,
}

impl RenameRequest {
    /// The new name, if the field is a JSON string.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }
}

/// Response from every successful mutation.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
