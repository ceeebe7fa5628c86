use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::FetchError,
    model::{Coordinates, Units, WeatherSnapshot},
};

pub mod openweather;

pub use openweather::OpenWeatherService;

/// Remote source of current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    async fn current_conditions(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<CurrentConditions, FetchError>;
}

/// Current-conditions body as sent by the service.
///
/// Every field is optional here; presence is checked by
/// [`snapshot_from_conditions`] so a partial body fails as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    pub wind: Option<WindBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionEntry {
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindBlock {
    pub speed: Option<f64>,
}

/// `<icon-base-url>/<icon-code>@4x.png`
pub fn icon_url(icon_base_url: &str, icon_code: &str) -> String {
    format!("{}/{}@4x.png", icon_base_url.trim_end_matches('/'), icon_code)
}

/// Map a service response onto a snapshot. Values are taken verbatim; the
/// request is expected to have asked for metric units.
pub fn snapshot_from_conditions(
    conditions: &CurrentConditions,
    icon_base_url: &str,
) -> Result<WeatherSnapshot, FetchError> {
    let main = conditions.main.as_ref().ok_or(FetchError::MissingField("main"))?;
    let temperature = main.temp.ok_or(FetchError::MissingField("main.temp"))?;
    let humidity = main.humidity.ok_or(FetchError::MissingField("main.humidity"))?;

    let first = conditions.weather.first().ok_or(FetchError::MissingField("weather[0]"))?;
    let description = first
        .description
        .as_deref()
        .ok_or(FetchError::MissingField("weather[0].description"))?;
    let icon = first.icon.as_deref().ok_or(FetchError::MissingField("weather[0].icon"))?;

    let wind_speed = conditions
        .wind
        .as_ref()
        .and_then(|w| w.speed)
        .ok_or(FetchError::MissingField("wind.speed"))?;

    Ok(WeatherSnapshot::new(
        temperature,
        description.to_string(),
        humidity,
        wind_speed,
        icon_url(icon_base_url, icon),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ICONS: &str = "http://openweathermap.org/img/wn";

    fn parse(value: serde_json::Value) -> CurrentConditions {
        serde_json::from_value(value).expect("valid conditions JSON")
    }

    fn full_body() -> serde_json::Value {
        json!({
            "main": { "temp": 21.4, "humidity": 60 },
            "weather": [ { "description": "clear sky", "icon": "01d" } ],
            "wind": { "speed": 5.1 }
        })
    }

    #[test]
    fn maps_complete_response() {
        let snapshot = snapshot_from_conditions(&parse(full_body()), ICONS).unwrap();

        assert_eq!(snapshot.temperature_celsius(), 21.4);
        assert_eq!(snapshot.description(), "clear sky");
        assert_eq!(snapshot.humidity_percent(), 60.0);
        assert_eq!(snapshot.wind_speed_kmh(), 5.1);
        assert_eq!(snapshot.icon_url(), "http://openweathermap.org/img/wn/01d@4x.png");
    }

    #[test]
    fn uses_first_condition_entry() {
        let mut body = full_body();
        body["weather"] = json!([
            { "description": "light rain", "icon": "10n" },
            { "description": "mist", "icon": "50n" }
        ]);
        let snapshot = snapshot_from_conditions(&parse(body), ICONS).unwrap();
        assert_eq!(snapshot.description(), "light rain");
        assert!(snapshot.icon_url().ends_with("/10n@4x.png"));
    }

    #[test]
    fn each_missing_field_fails_closed() {
        let cases: [(&str, fn(&mut serde_json::Value)); 6] = [
            ("main.temp", |b| {
                b["main"].as_object_mut().unwrap().remove("temp");
            }),
            ("main.humidity", |b| {
                b["main"].as_object_mut().unwrap().remove("humidity");
            }),
            ("weather[0].description", |b| {
                b["weather"][0].as_object_mut().unwrap().remove("description");
            }),
            ("weather[0].icon", |b| {
                b["weather"][0].as_object_mut().unwrap().remove("icon");
            }),
            ("wind.speed", |b| {
                b["wind"].as_object_mut().unwrap().remove("speed");
            }),
            ("weather[0]", |b| {
                b["weather"] = json!([]);
            }),
        ];

        for (field, strip) in cases {
            let mut body = full_body();
            strip(&mut body);
            let err = snapshot_from_conditions(&parse(body), ICONS).unwrap_err();
            assert!(
                matches!(err, FetchError::MissingField(f) if f == field),
                "expected missing {field}, got {err:?}"
            );
        }
    }

    #[test]
    fn missing_blocks_fail_closed() {
        let err = snapshot_from_conditions(&parse(json!({})), ICONS).unwrap_err();
        assert!(matches!(err, FetchError::MissingField("main")));
    }

    #[test]
    fn icon_url_tolerates_trailing_slash() {
        assert_eq!(icon_url("https://icons.test/wn/", "04d"), "https://icons.test/wn/04d@4x.png");
    }
}
