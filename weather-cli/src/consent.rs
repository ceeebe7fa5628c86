use async_trait::async_trait;
use inquire::Confirm;
use weather_core::{Capability, PermissionDecision, PermissionProvider};

use crate::display::ProgressLine;

/// Asks the user on the terminal before the location is read.
#[derive(Debug, Clone)]
pub struct ConsentPrompt {
    progress: ProgressLine,
}

impl ConsentPrompt {
    pub fn new(progress: ProgressLine) -> Self {
        Self { progress }
    }
}

fn prompt_text(capability: Capability) -> &'static str {
    match capability {
        Capability::FineLocation => "Allow geoweather to access your precise location?",
        Capability::CoarseLocation => "Allow geoweather to access your approximate location?",
    }
}

#[async_trait]
impl PermissionProvider for ConsentPrompt {
    async fn request_permission(&self, capability: Capability) -> PermissionDecision {
        let _paused = self.progress.pause();

        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new(prompt_text(capability))
                .with_default(true)
                .with_help_message("Your position is only sent to the weather service")
                .prompt()
        })
        .await;

        match answer {
            Ok(Ok(true)) => PermissionDecision::Granted,
            Ok(Ok(false)) => PermissionDecision::Denied,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "permission prompt not answered");
                PermissionDecision::Denied
            }
            Err(e) => {
                tracing::warn!(error = %e, "permission prompt task failed");
                PermissionDecision::Denied
            }
        }
    }
}
