use std::time::Duration;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::navigation::PaymentAttempt;

/// Simulated payment processing.
///
/// Holds the payment for the processing delay, then reports it as settled.
/// Leaving the payment screen cancels the token and nothing is reported.
pub struct PaymentCmd {
    attempt: PaymentAttempt,
    delay: Duration,
    cancel: CancellationToken,
}

impl PaymentCmd {
    pub const fn new(attempt: PaymentAttempt, delay: Duration, cancel: CancellationToken) -> Self {
        Self {
            attempt,
            delay,
            cancel,
        }
    }

    #[cfg(test)]
    pub const fn attempt(&self) -> PaymentAttempt {
        self.attempt
    }
}

#[async_trait]
impl Command for PaymentCmd {
    fn name(&self) -> String {
        format!("Processing payment {}", self.attempt)
    }

    async fn execute(self: Box<Self>, message_tx: UnboundedSender<AppMessage>) -> Result<()> {
        tokio::select! {
            () = self.cancel.cancelled() => {
                tracing::debug!(attempt = %self.attempt, "Payment cancelled");
            }
            () = tokio::time::sleep(self.delay) => {
                message_tx.send(AppMessage::PaymentCompleted(self.attempt))?;
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
    async fn test_settles_after_processing_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cmd = PaymentCmd::new(
            PaymentAttempt::new(3),
            Duration::from_millis(1500),
            CancellationToken::new(),
        );

        let handle = tokio::spawn(Box::new(cmd).execute(tx));

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        handle.await.unwrap().unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(AppMessage::PaymentCompleted(attempt)) if attempt == PaymentAttempt::new(3)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_payment_reports_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let cmd = PaymentCmd::new(PaymentAttempt::new(1), Duration::from_millis(1500), cancel.clone());

        let handle = tokio::spawn(Box::new(cmd).execute(tx));
        cancel.cancel();

        handle.await.unwrap().unwrap();
        assert!(rx.try_recv().is_err());
    }
}
