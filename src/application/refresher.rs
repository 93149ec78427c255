//! Periodic settings refresh.
//!
//! Hosts whose preference storage changes behind the dispatcher's back can
//! reload settings on an interval instead of wiring change notifications.

use std::time::Duration;

#[cfg(feature = "async")]
use crate::application::ports::SettingsError;
#[cfg(feature = "async")]
use tokio::{sync::oneshot, task::JoinHandle, time::interval};
#[cfg(feature = "async")]
use tracing::debug;

/// Error returned when refresher configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefresherConfigError {
    /// Refresh interval duration must be greater than zero
    ZeroRefreshInterval,
}

impl std::fmt::Display for RefresherConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefresherConfigError::ZeroRefreshInterval => {
                write!(f, "refresh interval must be greater than 0")
            }
        }
    }
}

impl std::error::Error for RefresherConfigError {}

/// Configuration for periodic refresh.
#[derive(Debug, Clone)]
pub struct RefresherConfig {
    /// How often to reload
    pub interval: Duration,
    /// Skip the reload that would otherwise run immediately on start
    pub skip_first: bool,
}

impl Default for RefresherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            skip_first: false,
        }
    }
}

impl RefresherConfig {
    /// Create a config with the specified interval.
    ///
    /// # Errors
    /// Returns `RefresherConfigError::ZeroRefreshInterval` if `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self, RefresherConfigError> {
        if interval.is_zero() {
            return Err(RefresherConfigError::ZeroRefreshInterval);
        }
        Ok(Self {
            interval,
            skip_first: false,
        })
    }

    /// Do not reload at start, only after the first interval.
    pub fn with_skip_first(mut self, skip_first: bool) -> Self {
        self.skip_first = skip_first;
        self
    }
}

/// Error returned when stopping a refresher fails.
#[derive(Debug)]
pub enum ShutdownError {
    /// The refresh task panicked
    TaskPanicked,
    /// The refresh task was cancelled before shutdown
    TaskCancelled,
}

impl std::fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownError::TaskPanicked => write!(f, "settings refresh task panicked"),
            ShutdownError::TaskCancelled => write!(f, "settings refresh task was cancelled"),
        }
    }
}

impl std::error::Error for ShutdownError {}

/// Runs a reload closure periodically.
#[derive(Debug, Clone)]
pub struct SettingsRefresher {
    config: RefresherConfig,
}

impl SettingsRefresher {
    /// Create a refresher.
    pub fn new(config: RefresherConfig) -> Self {
        Self { config }
    }

    /// Get the refresher configuration.
    pub fn config(&self) -> &RefresherConfig {
        &self.config
    }

    /// Start reloading periodically.
    ///
    /// `reload` is typically `move || cache.refresh()`. Failures are already
    /// logged by the cache; the loop only counts them at debug level and
    /// keeps going.
    #[cfg(feature = "async")]
    pub fn start<F>(self, mut reload: F) -> RefresherHandle
    where
        F: FnMut() -> Result<(), SettingsError> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let config = self.config;

        let task = tokio::spawn(async move {
            let mut ticker = interval(config.interval);
            if config.skip_first {
                ticker.tick().await;
            }
            let mut failures: u64 = 0;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!(failures, "settings refresher stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if reload().is_err() {
                            failures += 1;
                            debug!(failures, "settings reload failed");
                        }
                    }
                }
            }
        });

        RefresherHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }
}

/// Handle to a running refresher.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct RefresherHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

#[cfg(feature = "async")]
impl RefresherHandle {
    /// Stop the refresher and wait for the task to exit.
    pub async fn shutdown(mut self) -> Result<(), ShutdownError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.task.await.map_err(|e| {
            if e.is_panic() {
                ShutdownError::TaskPanicked
            } else {
                ShutdownError::TaskCancelled
            }
        })
    }

    /// Check whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_zero_interval() {
        assert!(matches!(
            RefresherConfig::new(Duration::ZERO),
            Err(RefresherConfigError::ZeroRefreshInterval)
        ));
    }

    #[test]
    fn test_config_valid_interval() {
        let config = RefresherConfig::new(Duration::from_secs(5))
            .unwrap()
            .with_skip_first(true);
        assert_eq!(config.interval, Duration::from_secs(5));
        assert!(config.skip_first);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_reloads_until_shutdown() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = RefresherConfig::new(Duration::from_millis(50)).unwrap();

        let handle = SettingsRefresher::new(config).start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        tokio::time::sleep(Duration::from_millis(180)).await;
        handle.shutdown().await.unwrap();

        let seen = calls.load(Ordering::SeqCst);
        assert!(seen >= 2);
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = RefresherConfig::new(Duration::from_millis(30)).unwrap();

        let handle = SettingsRefresher::new(config).start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(SettingsError::Unavailable("not ready".to_string()))
        });

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!handle.is_finished());
        handle.shutdown().await.unwrap();
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }
}
