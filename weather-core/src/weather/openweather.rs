use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::{FetchError, truncate_body},
    model::{Coordinates, Units},
};

use super::{CurrentConditions, WeatherService};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_ICON_BASE_URL: &str = "http://openweathermap.org/img/wn";

/// OpenWeather current-weather endpoint.
///
/// No request timeout is configured: a stalled exchange keeps the caller
/// waiting until the connection itself fails.
#[derive(Debug, Clone)]
pub struct OpenWeatherService {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherService {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Self {
        Self { api_key, endpoint: endpoint.into(), http: Client::new() }
    }
}

#[async_trait]
impl WeatherService for OpenWeatherService {
    async fn current_conditions(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<CurrentConditions, FetchError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
