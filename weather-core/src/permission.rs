use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::{Capability, PermissionDecision};

/// Platform capability that grants or refuses access to the device location.
#[async_trait]
pub trait PermissionProvider: Send + Sync + Debug {
    /// Platforms without a runtime grant dialog return `false`; the screen
    /// then never calls [`request_permission`](Self::request_permission).
    fn requires_explicit_permission(&self) -> bool {
        true
    }

    async fn request_permission(&self, capability: Capability) -> PermissionDecision;
}

/// For platforms where location access is granted out of band.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitPermission;

#[async_trait]
impl PermissionProvider for ImplicitPermission {
    fn requires_explicit_permission(&self) -> bool {
        false
    }

    async fn request_permission(&self, _capability: Capability) -> PermissionDecision {
        PermissionDecision::Granted
    }
}

/// Answers every request with the same decision.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub PermissionDecision);

#[async_trait]
impl PermissionProvider for StaticPermission {
    async fn request_permission(&self, capability: Capability) -> PermissionDecision {
        tracing::debug!(?capability, decision = ?self.0, "static permission decision");
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn implicit_permission_needs_no_prompt() {
        let p = ImplicitPermission;
        assert!(!p.requires_explicit_permission());
        assert_eq!(p.request_permission(Capability::FineLocation).await, PermissionDecision::Granted);
    }

    #[tokio::test]
    async fn static_permission_returns_its_decision() {
        let p = StaticPermission(PermissionDecision::Denied);
        assert!(p.requires_explicit_permission());
        assert_eq!(p.request_permission(Capability::FineLocation).await, PermissionDecision::Denied);
    }
}
