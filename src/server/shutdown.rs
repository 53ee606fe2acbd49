//! Stop-accepting signal shared by the listener and whoever requests shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// Cloneable shutdown handle.
///
/// Triggering it stops the accept loop. Connections already being handled are
/// neither cancelled nor awaited.
#[derive(Debug, Clone)]
pub struct Shutdown {
    running: Arc<AtomicBool>,
    notify: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = watch::channel(false);
        Self {
            running: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(notify),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Requests shutdown. Calling it again has no further effect.
    pub fn trigger(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!("Shutdown requested");
            self.notify.send_replace(true);
        }
    }

    /// Resolves once shutdown has been requested, including before this call.
    pub async fn triggered(&self) {
        let mut rx = self.notify.subscribe();
        // The sender lives as long as `self`, so this cannot fail while we wait.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for Ctrl+C, or SIGTERM on Unix.
pub async fn wait_for_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn triggered_resolves_after_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), shutdown.triggered())
            .await
            .expect("should already be triggered");
        assert!(!shutdown.is_running());
    }

    #[tokio::test]
    async fn clones_observe_the_same_state() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();

        let waiter = tokio::spawn(async move { observer.triggered().await });
        assert!(shutdown.is_running());

        shutdown.trigger();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
