use async_trait::async_trait;

use crate::DynError;

/// Capability surface consumed from the external provisioning toolkit.
///
/// Whatever places network binaries, generates keys and configs, and
/// supervises node processes sits behind this trait; the harness only
/// sequences the four operations.
#[async_trait]
pub trait EnvironmentControl: Send + Sync {
    /// Materialize assets for a fresh network instance.
    async fn setup(&self, args: &[String]) -> Result<(), DynError>;

    /// Launch the network's nodes in the background.
    async fn start(&self) -> Result<(), DynError>;

    /// Release all environment resources. Must be safe to call when nothing
    /// is provisioned.
    async fn teardown(&self) -> Result<(), DynError>;

    /// Whether a network instance is currently active.
    async fn is_active(&self) -> bool {
        false
    }
}
