//! Async commands pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! The navigation controller returns commands, and the App spawns them and
//! feeds their results back through the [`AppMessage`] channel.

mod payment;
mod redirect;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
pub use payment::PaymentCmd;
pub use redirect::RedirectCmd;

/// Async commands that perform side effects.
///
/// Commands are spawned by the App. They report results back to the App via
/// the message channel; an `Err` is shown to the user in an error dialog.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logs and error messages.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>, message_tx: UnboundedSender<AppMessage>) -> Result<()>;
}
