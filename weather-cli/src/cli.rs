use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use weather_core::{
    Config, Coordinates, FixedLocation, ImplicitPermission, IpLocationProvider, LocationProvider,
    OpenWeatherService, PermissionDecision, PermissionProvider, ScreenSettings, Services,
    StaticPermission, ViewState, WeatherScreen,
};

use crate::{consent::ConsentPrompt, display::ProgressLine};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Current weather at your location")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather at the current location.
    Show(ShowArgs),

    /// Store the OpenWeather API key and an optional fixed location.
    Configure,

    /// Print the config file location.
    ConfigPath,
}

#[derive(Debug, Default, clap::Args)]
pub struct ShowArgs {
    /// Latitude of a fixed position (skips location lookup).
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of a fixed position (skips location lookup).
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Grant location permission without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Print the final state as JSON instead of a card.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Success only when the screen ends up showing weather.
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Show(ShowArgs::default())) {
            Command::Show(args) => show(args).await,
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn show(args: ShowArgs) -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;
    let api_key = config.api_key()?;

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        config.set_fixed_location(Some(Coordinates::new(lat, lon)));
    }

    let progress = ProgressLine::default();

    let permission: Arc<dyn PermissionProvider> = if !config.permission.explicit {
        Arc::new(ImplicitPermission)
    } else if args.yes {
        Arc::new(StaticPermission(PermissionDecision::Granted))
    } else {
        Arc::new(ConsentPrompt::new(progress.clone()))
    };

    let location: Arc<dyn LocationProvider> = match config.location.fixed_coordinates() {
        Some(coords) => Arc::new(FixedLocation::new(coords)),
        None => Arc::new(IpLocationProvider::new(config.location.ip_endpoint.clone())),
    };

    let weather = Arc::new(OpenWeatherService::with_endpoint(api_key, config.endpoint.clone()));

    let screen = WeatherScreen::new(
        Services { permission, location, weather },
        ScreenSettings::from(config),
    );

    let (state, ()) = tokio::join!(screen.initialize(), progress.run(screen.subscribe()));
    screen.unmount();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", weather_core::render(&state));
    }

    Ok(match state {
        ViewState::Ready(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt cancelled")?;
    config.api_key = Some(api_key.trim().to_string());

    let latitude = CustomType::<f64>::new("Fixed latitude (Esc to use network location):")
        .with_error_message("Please enter a number")
        .prompt_skippable()?;
    let longitude = match latitude {
        Some(_) => CustomType::<f64>::new("Fixed longitude:")
            .with_error_message("Please enter a number")
            .prompt_skippable()?,
        None => None,
    };
    let fixed = latitude.zip(longitude).map(|(lat, lon)| Coordinates::new(lat, lon));
    config.set_fixed_location(fixed);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_is_the_default_command() {
        let cli = Cli::try_parse_from(["geoweather"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli =
            Cli::try_parse_from(["geoweather", "show", "--lat", "40.0", "--lon", "-75.0", "-y"])
                .unwrap();
        let Some(Command::Show(args)) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.lat, Some(40.0));
        assert_eq!(args.lon, Some(-75.0));
        assert!(args.yes);
    }

    #[test]
    fn latitude_requires_longitude() {
        let err = Cli::try_parse_from(["geoweather", "show", "--lat", "40.0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
