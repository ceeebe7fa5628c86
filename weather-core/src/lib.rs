//! Core library for the `geoweather` CLI.
//!
//! This crate defines:
//! - The weather screen state machine (permission → position → fetch)
//! - Capability traits for the permission, location and weather collaborators
//! - Shared domain models and the pure rendering function
//! - Configuration & credentials handling
//!
//! It is used by `geoweather-cli`, but the screen can be driven by any front-end
//! that supplies the three collaborators.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod permission;
pub mod render;
pub mod screen;
pub mod weather;

pub use config::Config;
pub use error::{ErrorReason, FetchError, LocationError, LocationErrorCode};
pub use location::{FixedLocation, IpLocationProvider, LocationProvider};
pub use model::{
    Capability, Coordinates, PermissionDecision, Position, PositionOptions, Units, ViewState,
    WeatherSnapshot,
};
pub use permission::{ImplicitPermission, PermissionProvider, StaticPermission};
pub use render::{Rendered, WeatherCard, render};
pub use screen::{ScreenSettings, Services, WeatherScreen};
pub use weather::{CurrentConditions, OpenWeatherService, WeatherService};
