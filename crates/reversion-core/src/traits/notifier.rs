//! Notification trait definition.

use crate::error::NotifyError;
use async_trait::async_trait;

/// Trait for notification channels.
///
/// Accepts a preformatted text/markdown report and delivers it to a
/// configured destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message.
    async fn send(&self, text: &str) -> Result<(), NotifyError>;

    /// Get the notifier name.
    fn name(&self) -> &str;
}
