//! Failure types for each stage of the screen's initialization sequence.
//!
//! Stage errors (`LocationError`, `FetchError`) keep full detail for logging;
//! `ErrorReason` is the coarse, user-facing classification stored in
//! [`ViewState::Failed`](crate::model::ViewState::Failed).

use serde::Serialize;
use thiserror::Error;

/// Terminal failure classification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    PermissionDenied,
    LocationUnavailable,
    WeatherFetchError,
}

impl ErrorReason {
    /// Short message that replaces the weather card.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorReason::PermissionDenied => "Location permission denied",
            ErrorReason::LocationUnavailable => "Error getting location",
            ErrorReason::WeatherFetchError => "Error fetching weather data",
        }
    }
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

/// Numeric error codes reported by mobile geolocation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    PlayServiceNotAvailable,
    SettingsNotSatisfied,
    InternalError,
}

impl LocationErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            LocationErrorCode::PermissionDenied => 1,
            LocationErrorCode::PositionUnavailable => 2,
            LocationErrorCode::Timeout => 3,
            LocationErrorCode::PlayServiceNotAvailable => 4,
            LocationErrorCode::SettingsNotSatisfied => 5,
            LocationErrorCode::InternalError => -1,
        }
    }
}

/// A failed one-shot position request.
#[derive(Debug, Clone, Error)]
#[error("location error {}: {message}", .code.code())]
pub struct LocationError {
    pub code: LocationErrorCode,
    pub message: String,
}

impl LocationError {
    pub fn new(code: LocationErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            LocationErrorCode::Timeout,
            format!("Location request timed out after {} ms", after.as_millis()),
        )
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(LocationErrorCode::PositionUnavailable, message)
    }
}

/// A failed weather service exchange. All variants surface as
/// [`ErrorReason::WeatherFetchError`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send request to weather service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Weather request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse weather JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Weather response is missing `{0}`")]
    MissingField(&'static str),
}

impl FetchError {
    pub fn reason(&self) -> ErrorReason {
        ErrorReason::WeatherFetchError
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_have_distinct_messages() {
        let denied = ErrorReason::PermissionDenied.user_message();
        let location = ErrorReason::LocationUnavailable.user_message();
        let fetch = ErrorReason::WeatherFetchError.user_message();

        assert_ne!(denied, location);
        assert_ne!(location, fetch);
        assert_ne!(denied, fetch);
    }

    #[test]
    fn location_error_display_includes_code() {
        let err = LocationError::timeout(std::time::Duration::from_millis(15000));
        let msg = err.to_string();
        assert!(msg.contains("location error 3"));
        assert!(msg.contains("15000 ms"));
    }

    #[test]
    fn every_fetch_error_maps_to_weather_fetch_error() {
        let missing = FetchError::MissingField("main.temp");
        let status = FetchError::Status { status: 401, body: String::new() };
        assert_eq!(missing.reason(), ErrorReason::WeatherFetchError);
        assert_eq!(status.reason(), ErrorReason::WeatherFetchError);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
