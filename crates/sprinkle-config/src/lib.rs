//! Server configuration and plant seed files.
//!
//! - [`ServerConfig`] — bind address, static asset directory and optional seed file,
//!   read from environment variables
//! - [`load_seed_file`] — replaces the built-in sample plants with a JSON file
//! - [`ConfigError`] — everything that can go wrong before the server starts
//!
//! # Seed files
//!
//! A seed file is a JSON array of plants in the same shape `/api/plants` returns:
//!
//! ```json
//! [
//!   { "name": "Thyme", "ozPerWatering": 3.0, "intervalMinutes": 10080 },
//!   { "name": "Mint", "ozPerWatering": 3.5, "intervalMinutes": 2880,
//!     "wateringHistory": [{ "timestamp": 1700000000, "amount": 3.5 }] }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use sprinkle_core::{unix_now, Plant, PlantStore, HISTORY_CAPACITY};
use tracing::{info, warn};

/// Largest single watering amount accepted from a seed file.
const MAX_SEED_AMOUNT: f64 = 100.0;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DATA_DIR: &str = "data";
const HOMEPAGE_FILE: &str = "homepage.html";

/// Errors that can occur while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON.
    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidVar { name: &'static str, value: String },

    /// Seed file content violates a plant invariant.
    #[error("Invalid seed file '{path}': {message}")]
    Validation { path: String, message: String },
}

impl ConfigError {
    /// Creates an IO error with path context.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a validation error.
    pub fn validation(path: &Path, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Runtime configuration for the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as static files; holds `homepage.html`.
    pub data_dir: PathBuf,
    /// Optional JSON file replacing the sample plants.
    pub plants_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            plants_file: None,
        }
    }
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `DATA_DIR` and `PLANTS_FILE` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            data_dir: var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            plants_file: var("PLANTS_FILE").map(PathBuf::from),
        })
    }

    /// `host:port` for binding the listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path of the page served at `/`.
    pub fn homepage(&self) -> PathBuf {
        self.data_dir.join(HOMEPAGE_FILE)
    }

    /// Builds the initial plant store: the seed file when configured, sample data otherwise.
    pub fn initial_store(&self) -> Result<PlantStore, ConfigError> {
        let now = unix_now();
        match &self.plants_file {
            Some(path) => {
                let plants = load_seed_file(path, now)?;
                info!("Loaded {} plants from {}", plants.len(), path.display());
                Ok(PlantStore::new(plants))
            }
            None => Ok(PlantStore::with_sample_data(now)),
        }
    }
}

/// Loads and validates plants from a JSON seed file.
///
/// Plants with a blank name, a non-positive dose or a zero interval fail the
/// load. A history holding any event from the future, before the epoch, or
/// with an amount outside `(0, 100]` is discarded for that plant only.
pub fn load_seed_file(path: &Path, now: f64) -> Result<Vec<Plant>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let plants: Vec<Plant> = serde_json::from_str(&content)?;
    validate_seed(path, plants, now)
}

fn validate_seed(path: &Path, plants: Vec<Plant>, now: f64) -> Result<Vec<Plant>, ConfigError> {
    if plants.is_empty() {
        return Err(ConfigError::validation(path, "no plants defined"));
    }

    plants
        .into_iter()
        .enumerate()
        .map(|(i, mut plant)| {
            plant.name = plant.name.trim().to_string();
            if plant.name.is_empty() {
                return Err(ConfigError::validation(path, format!("plant {i} has an empty name")));
            }
            if !plant.oz_per_watering.is_finite() || plant.oz_per_watering <= 0.0 {
                return Err(ConfigError::validation(
                    path,
                    format!("plant {i} ({}) has a non-positive ozPerWatering", plant.name),
                ));
            }
            if plant.interval_minutes == 0 {
                return Err(ConfigError::validation(
                    path,
                    format!("plant {i} ({}) has a zero intervalMinutes", plant.name),
                ));
            }

            let history_ok = plant.watering_history.iter().all(|e| {
                e.timestamp >= 0.0 && e.timestamp <= now && e.amount > 0.0 && e.amount <= MAX_SEED_AMOUNT
            });
            if history_ok {
                plant
                    .watering_history
                    .sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));
                plant.watering_history.truncate(HISTORY_CAPACITY);
            } else {
                warn!("Discarding invalid watering history for {}", plant.name);
                plant.watering_history.clear();
            }
            Ok(plant)
        })
        .collect()
}
