use std::time::Duration;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::navigation::LoginAttempt;

/// Deferred continuation of a login submission.
///
/// Waits for the configured redirect delay and then reports the attempt as
/// completed. Cancelling the token drops the continuation without a message.
pub struct RedirectCmd {
    attempt: LoginAttempt,
    delay: Duration,
    cancel: CancellationToken,
}

impl RedirectCmd {
    pub const fn new(attempt: LoginAttempt, delay: Duration, cancel: CancellationToken) -> Self {
        Self {
            attempt,
            delay,
            cancel,
        }
    }

    #[cfg(test)]
    pub const fn attempt(&self) -> LoginAttempt {
        self.attempt
    }
}

#[async_trait]
impl Command for RedirectCmd {
    fn name(&self) -> String {
        format!("Redirecting login {}", self.attempt)
    }

    async fn execute(self: Box<Self>, message_tx: UnboundedSender<AppMessage>) -> Result<()> {
        tokio::select! {
            () = self.cancel.cancelled() => {
                tracing::debug!(attempt = %self.attempt, "Login redirect cancelled");
            }
            () = tokio::time::sleep(self.delay) => {
                message_tx.send(AppMessage::LoginCompleted(self.attempt))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reports_completion_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = RedirectCmd::new(
            LoginAttempt::new(7),
            Duration::from_millis(2000),
            CancellationToken::new(),
        );

        let handle = tokio::spawn(Box::new(cmd).execute(tx));

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        handle.await.unwrap().unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(AppMessage::LoginCompleted(attempt)) if attempt == LoginAttempt::new(7)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_redirect_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let cmd = RedirectCmd::new(
            LoginAttempt::new(1),
            Duration::from_millis(2000),
            cancel.clone(),
        );

        let handle = tokio::spawn(Box::new(cmd).execute(tx));
        tokio::time::sleep(Duration::from_millis(500)).await;
        cancel.cancel();

        handle.await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(rx.try_recv().is_err());
    }
}
