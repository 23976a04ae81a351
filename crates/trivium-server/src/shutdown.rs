//! Shutdown signaling.
//!
//! A [`ShutdownSignal`] coordinates the serve loop and the interrupt
//! watcher: it can be cloned freely, triggered once, and awaited from any
//! number of tasks. Triggering is idempotent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// A cloneable, one-shot shutdown signal.
///
/// # Example
///
/// ```rust
/// use trivium_server::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let watcher = shutdown.clone();
///
/// shutdown.trigger();
/// assert!(watcher.is_triggered());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
    sender: broadcast::Sender<()>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Creates a signal that triggers on SIGTERM or SIGINT.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            wait_for_os_signal().await;
            trigger.trigger();
        });
        signal
    }

    /// Triggers the signal, waking all waiters. Safe to call repeatedly.
    pub fn trigger(&self) {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            // No receivers is fine: is_triggered still flips.
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` once the signal has been triggered.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Completes when the signal triggers; immediately if it already has.
    pub async fn recv(&self) {
        // Subscribe before checking the flag so a trigger between the
        // two cannot be missed.
        let mut receiver = self.sender.subscribe();
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }
        let _ = receiver.recv().await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for SIGTERM or SIGINT (Ctrl+C on non-Unix platforms).
async fn wait_for_os_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                tracing::info!("received SIGINT, initiating graceful shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to wait for Ctrl+C");
        tracing::info!("received Ctrl+C, initiating graceful shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_starts_untriggered() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_clones_share_state() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();
        signal.trigger();
        assert!(clone.is_triggered());
    }

    #[tokio::test]
    async fn test_recv_completes_after_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            signal.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), waiter.recv())
            .await
            .expect("recv should complete");
    }

    #[tokio::test]
    async fn test_recv_completes_immediately_when_already_triggered() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        tokio::time::timeout(Duration::from_millis(10), signal.recv())
            .await
            .expect("recv should complete immediately");
    }
}
