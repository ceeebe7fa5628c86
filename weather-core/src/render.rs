//! Pure projection of a [`ViewState`] onto displayable text.

use serde::Serialize;

use crate::model::{ViewState, WeatherSnapshot};

pub const CARD_TITLE: &str = "The weather at your current location:";
pub const LOADING_TEXT: &str = "Fetching weather...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherCard {
    pub title: &'static str,
    pub temperature: String,
    pub icon_url: String,
    pub description: String,
    pub wind: String,
    pub humidity: String,
}

impl From<&WeatherSnapshot> for WeatherCard {
    fn from(s: &WeatherSnapshot) -> Self {
        Self {
            title: CARD_TITLE,
            temperature: format!("{}°C", round_half_up(s.temperature_celsius())),
            icon_url: s.icon_url().to_string(),
            description: s.description().to_string(),
            wind: format!("{} km/h", s.wind_speed_kmh()),
            humidity: format!("{} %", s.humidity_percent()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    /// Progress indicator only.
    Progress,
    Card(WeatherCard),
    Message { text: String },
}

pub fn render(state: &ViewState) -> Rendered {
    match state {
        ViewState::Loading => Rendered::Progress,
        ViewState::Ready(snapshot) => Rendered::Card(snapshot.into()),
        ViewState::Failed(reason) => Rendered::Message { text: reason.user_message().to_string() },
    }
}

/// Nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl std::fmt::Display for WeatherCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        writeln!(f, "  {}", self.temperature)?;
        writeln!(f, "  {}", self.description)?;
        writeln!(f)?;
        writeln!(f, "  Wind:     {}", self.wind)?;
        writeln!(f, "  Humidity: {}", self.humidity)?;
        write!(f, "  Icon:     {}", self.icon_url)
    }
}

impl std::fmt::Display for Rendered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rendered::Progress => f.write_str(LOADING_TEXT),
            Rendered::Card(card) => std::fmt::Display::fmt(card, f),
            Rendered::Message { text } => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorReason;

    fn snapshot(temp: f64) -> WeatherSnapshot {
        WeatherSnapshot::new(
            temp,
            "clear sky".into(),
            60.0,
            5.1,
            "http://openweathermap.org/img/wn/01d@4x.png".into(),
        )
    }

    #[test]
    fn loading_renders_progress_only() {
        assert_eq!(render(&ViewState::Loading), Rendered::Progress);
    }

    #[test]
    fn ready_renders_card_fields() {
        let Rendered::Card(card) = render(&ViewState::Ready(snapshot(21.4))) else {
            panic!("expected a card");
        };

        assert_eq!(card.temperature, "21°C");
        assert_eq!(card.description, "clear sky");
        assert_eq!(card.humidity, "60 %");
        assert_eq!(card.wind, "5.1 km/h");
        assert!(card.icon_url.ends_with("01d@4x.png"));
        assert_eq!(card.title, CARD_TITLE);
    }

    #[test]
    fn failures_render_distinct_messages() {
        let texts: Vec<String> = [
            ErrorReason::PermissionDenied,
            ErrorReason::LocationUnavailable,
            ErrorReason::WeatherFetchError,
        ]
        .into_iter()
        .map(|r| render(&ViewState::Failed(r)).to_string())
        .collect();

        assert_eq!(texts[0], "Location permission denied");
        assert_eq!(texts[1], "Error getting location");
        assert_eq!(texts[2], "Error fetching weather data");
    }

    #[test]
    fn render_is_pure() {
        let state = ViewState::Ready(snapshot(-3.5));
        assert_eq!(render(&state), render(&state));
        assert_eq!(render(&state).to_string(), render(&state).to_string());
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(21.4), 21);
        assert_eq!(round_half_up(21.5), 22);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-0.4), 0);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn negative_zero_is_not_shown() {
        let Rendered::Card(card) = render(&ViewState::Ready(snapshot(-0.3))) else {
            panic!("expected a card");
        };
        assert_eq!(card.temperature, "0°C");
    }

    #[test]
    fn card_text_lists_every_field() {
        let text = render(&ViewState::Ready(snapshot(21.4))).to_string();
        for needle in ["21°C", "clear sky", "60 %", "5.1 km/h", "01d@4x.png", CARD_TITLE] {
            assert!(text.contains(needle), "missing {needle} in {text}");
        }
    }
}
