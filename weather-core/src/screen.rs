//! The current-location weather screen.
//!
//! A mounted [`WeatherScreen`] starts in [`ViewState::Loading`] and runs one
//! permission → position → fetch sequence. The sequence ends in exactly one
//! write of `Ready` or `Failed`; after that the state never changes for the
//! lifetime of the mount.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::{ErrorReason, LocationError},
    location::LocationProvider,
    model::{Capability, Position, PositionOptions, Units, ViewState, WeatherSnapshot},
    permission::PermissionProvider,
    weather::{WeatherService, snapshot_from_conditions},
};

/// The three platform collaborators a screen depends on.
#[derive(Debug, Clone)]
pub struct Services {
    pub permission: Arc<dyn PermissionProvider>,
    pub location: Arc<dyn LocationProvider>,
    pub weather: Arc<dyn WeatherService>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSettings {
    pub position: PositionOptions,
    pub icon_base_url: String,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Config::default().into()
    }
}

impl From<Config> for ScreenSettings {
    fn from(config: Config) -> Self {
        Self { position: config.location.position_options(), icon_base_url: config.icon_base_url }
    }
}

#[derive(Debug)]
pub struct WeatherScreen {
    services: Services,
    settings: ScreenSettings,
    state: watch::Sender<ViewState>,
    started: AtomicBool,
    mounted: CancellationToken,
}

impl WeatherScreen {
    /// Mount a new screen in the `Loading` state.
    pub fn new(services: Services, settings: ScreenSettings) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self {
            services,
            settings,
            state,
            started: AtomicBool::new(false),
            mounted: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        !self.mounted.is_cancelled()
    }

    /// Dispose the screen. Any in-flight stage is abandoned and its result
    /// is never written.
    pub fn unmount(&self) {
        if !self.mounted.is_cancelled() {
            tracing::debug!("weather screen unmounted");
            self.mounted.cancel();
        }
    }

    /// Run the initialization sequence and return the resulting state.
    ///
    /// Only the first call per mount has any effect; later calls return the
    /// current state.
    pub async fn initialize(&self) -> ViewState {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::warn!("weather screen already initialized for this mount");
            return self.state();
        }

        let outcome = tokio::select! {
            biased;
            _ = self.mounted.cancelled() => None,
            outcome = self.acquire() => Some(outcome),
        };

        match outcome {
            Some(Ok(snapshot)) => {
                tracing::info!(description = snapshot.description(), "weather ready");
                self.settle(ViewState::Ready(snapshot));
            }
            Some(Err(reason)) => {
                tracing::info!(?reason, "weather screen failed");
                self.settle(ViewState::Failed(reason));
            }
            None => tracing::debug!("unmounted before initialization finished"),
        }

        self.state()
    }

    /// Spawn [`initialize`](Self::initialize) on the current runtime.
    pub fn spawn_initialize(self: &Arc<Self>) -> tokio::task::JoinHandle<ViewState> {
        let screen = Arc::clone(self);
        tokio::spawn(async move { screen.initialize().await })
    }

    async fn acquire(&self) -> Result<WeatherSnapshot, ErrorReason> {
        let permission = &self.services.permission;
        if permission.requires_explicit_permission() {
            tracing::info!("requesting location permission");
            let decision = permission.request_permission(Capability::FineLocation).await;
            if !decision.is_granted() {
                tracing::warn!(?decision, "location permission not granted");
                return Err(ErrorReason::PermissionDenied);
            }
        }

        let position = self.locate().await.map_err(|e| {
            tracing::warn!(code = e.code.code(), message = %e.message, "failed to get location");
            ErrorReason::LocationUnavailable
        })?;
        tracing::info!(coords = %position.coords, "location acquired");

        let conditions = self
            .services
            .weather
            .current_conditions(position.coords, Units::Metric)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "weather request failed");
                e.reason()
            })?;

        snapshot_from_conditions(&conditions, &self.settings.icon_base_url).map_err(|e| {
            tracing::warn!(error = %e, "weather response rejected");
            e.reason()
        })
    }

    async fn locate(&self) -> Result<Position, LocationError> {
        let options = self.settings.position;
        tracing::debug!(?options, "requesting one-shot position");

        match tokio::time::timeout(
            options.timeout,
            self.services.location.current_position(&options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LocationError::timeout(options.timeout)),
        }
    }

    /// Leave `Loading`. Returns whether the write happened.
    fn settle(&self, next: ViewState) -> bool {
        if self.mounted.is_cancelled() {
            tracing::debug!("dropping state update for unmounted screen");
            return false;
        }

        self.state.send_if_modified(|current| {
            if current.is_terminal() {
                tracing::warn!(?current, "ignoring transition out of terminal state");
                return false;
            }
            *current = next;
            true
        })
    }
}

impl Drop for WeatherScreen {
    fn drop(&mut self) {
        self.mounted.cancel();
    }
}
