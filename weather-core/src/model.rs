use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorReason;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// A one-shot location fix.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
    pub accuracy_meters: Option<f64>,
    /// When the fix was taken, which may predate the request for a cached fix.
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn now(coords: Coordinates) -> Self {
        Self { coords, accuracy_meters: None, timestamp: Utc::now() }
    }

    /// Age of the fix relative to `now`; a fix stamped in the future counts as fresh.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the provider may return instead of acquiring a new one.
    pub max_cached_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(15_000),
            max_cached_age: Duration::from_millis(10_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    FineLocation,
    CoarseLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionDecision {
    Granted,
    Denied,
    NeverAskAgain,
}

impl PermissionDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionDecision::Granted)
    }
}

/// A fully validated weather reading. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    temperature_celsius: f64,
    description: String,
    humidity_percent: f64,
    wind_speed_kmh: f64,
    icon_url: String,
}

impl WeatherSnapshot {
    pub fn new(
        temperature_celsius: f64,
        description: String,
        humidity_percent: f64,
        wind_speed_kmh: f64,
        icon_url: String,
    ) -> Self {
        Self { temperature_celsius, description, humidity_percent, wind_speed_kmh, icon_url }
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn humidity_percent(&self) -> f64 {
        self.humidity_percent
    }

    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed_kmh
    }

    pub fn icon_url(&self) -> &str {
        &self.icon_url
    }
}

/// What the screen shows. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Loading,
    Ready(WeatherSnapshot),
    Failed(ErrorReason),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// `Ready` and `Failed` are final for the lifetime of a mount.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }
}
