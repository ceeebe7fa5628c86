use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tokio::sync::Mutex;

use crate::{
    error::{LocationError, LocationErrorCode},
    model::{Coordinates, Position, PositionOptions},
};

pub const DEFAULT_IP_ENDPOINT: &str = "http://ip-api.com/json";

/// Platform capability that produces a single position fix.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError>;
}

/// Always reports the same coordinates, stamped at request time.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coords: Coordinates,
}

impl FixedLocation {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, LocationError> {
        Ok(Position::now(self.coords))
    }
}

/// Resolves the device position from its public IP address.
///
/// The last fix is kept so that requests within `max_cached_age` of it are
/// answered without a network round trip.
#[derive(Debug)]
pub struct IpLocationProvider {
    endpoint: String,
    http: Client,
    last_fix: Mutex<Option<Position>>,
}

impl IpLocationProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new(), last_fix: Mutex::new(None) }
    }

    async fn lookup(&self, options: &PositionOptions) -> Result<Position, LocationError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("fields", "status,message,lat,lon")])
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, options))?;

        let status = res.status();
        if !status.is_success() {
            return Err(LocationError::unavailable(format!(
                "IP geolocation failed with status {status}"
            )));
        }

        let body: IpLookupResponse = res.json().await.map_err(|e| transport_error(e, options))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Position {
                coords: Coordinates::new(lat, lon),
                accuracy_meters: None,
                timestamp: Utc::now(),
            }),
            _ => Err(LocationError::unavailable(
                body.message.unwrap_or_else(|| "IP geolocation returned no position".to_string()),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn transport_error(err: reqwest::Error, options: &PositionOptions) -> LocationError {
    if err.is_timeout() {
        LocationError::timeout(options.timeout)
    } else {
        LocationError::new(LocationErrorCode::InternalError, err.to_string())
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, LocationError> {
        if options.high_accuracy {
            tracing::trace!("high accuracy requested; IP geolocation is city-level at best");
        }

        let mut last_fix = self.last_fix.lock().await;
        if let Some(cached) = last_fix.as_ref() {
            let age = cached.age_at(Utc::now());
            if age <= options.max_cached_age {
                tracing::debug!(age_ms = age.as_millis() as u64, "reusing cached position");
                return Ok(cached.clone());
            }
        }

        let position = self.lookup(options).await?;
        *last_fix = Some(position.clone());
        Ok(position)
    }
}
