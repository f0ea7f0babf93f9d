//! Session retention task
//!
//! Periodically deletes weather sessions whose last tick is older than the
//! configured maximum age.

use std::{sync::Arc, time::Duration};

use application::ports::SessionStore;
use chrono::Utc;
use tracing::{debug, error, info};

/// Spawn a background task that prunes stale weather sessions.
///
/// The first pass runs one `interval` after startup. Returns a `JoinHandle`
/// that can be used to abort the task when shutting down.
///
/// # Example
///
/// ```ignore
/// let retention = spawn_session_retention_task(
///     sessions,
///     chrono::Duration::days(30),
///     Duration::from_secs(3600),
/// );
///
/// // On shutdown:
/// retention.abort();
/// ```
pub fn spawn_session_retention_task(
    sessions: Arc<dyn SessionStore>,
    max_age: chrono::Duration,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(
        max_age_days = max_age.num_days(),
        interval_secs = interval.as_secs(),
        "Starting session retention task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Don't run immediately on startup
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
                error!(
                    max_age_days = max_age.num_days(),
                    "Retention age out of range, skipping run"
                );
                continue;
            };
            debug!(cutoff = %cutoff, "Running session retention");

            match sessions.prune_older_than(cutoff).await {
                Ok(0) => debug!("No sessions to prune"),
                Ok(removed) => info!(removed, "Pruned stale weather sessions"),
                Err(e) => error!(error = %e, "Failed to prune weather sessions"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use application::error::ApplicationError;
    use async_trait::async_trait;
    use chrono::DateTime;
    use domain::{AggregatedTick, LocationId, SessionId, WeatherSession};
    use tokio::sync::Mutex;

    use super::*;

    struct RecordingSessionStore {
        prune_calls: AtomicUsize,
        cutoffs: Mutex<Vec<DateTime<Utc>>>,
        fail: bool,
    }

    impl RecordingSessionStore {
        fn new(fail: bool) -> Self {
            Self {
                prune_calls: AtomicUsize::new(0),
                cutoffs: Mutex::new(Vec::new()),
                fail,
            }
        }

        fn prune_call_count(&self) -> usize {
            self.prune_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionStore for RecordingSessionStore {
        async fn append_tick(
            &self,
            _: &SessionId,
            _: &LocationId,
            _: &AggregatedTick,
        ) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn get(&self, _: &SessionId) -> Result<Option<WeatherSession>, ApplicationError> {
            Ok(None)
        }

        async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, ApplicationError> {
            self.prune_calls.fetch_add(1, Ordering::SeqCst);
            self.cutoffs.lock().await.push(cutoff);
            if self.fail {
                Err(ApplicationError::PersistenceFailure("locked".into()))
            } else {
                Ok(2)
            }
        }
    }

    #[tokio::test]
    async fn prunes_periodically_with_age_cutoff() {
        let store = Arc::new(RecordingSessionStore::new(false));
        let started = Utc::now();

        let handle = spawn_session_retention_task(
            store.clone(),
            chrono::Duration::days(30),
            Duration::from_millis(50),
        );
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert!(store.prune_call_count() >= 1);
        let cutoffs = store.cutoffs.lock().await;
        let expected = started - chrono::Duration::days(30);
        assert!(cutoffs.iter().all(|c| *c >= expected));
    }

    #[tokio::test]
    async fn does_not_run_on_startup() {
        let store = Arc::new(RecordingSessionStore::new(false));

        let handle = spawn_session_retention_task(
            store.clone(),
            chrono::Duration::days(1),
            Duration::from_secs(3600),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();

        assert_eq!(store.prune_call_count(), 0);
    }

    #[tokio::test]
    async fn keeps_running_after_store_error() {
        let store = Arc::new(RecordingSessionStore::new(true));

        let handle = spawn_session_retention_task(
            store.clone(),
            chrono::Duration::days(1),
            Duration::from_millis(30),
        );
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!handle.is_finished());
        handle.abort();

        assert!(store.prune_call_count() >= 2);
    }

    #[tokio::test]
    async fn out_of_range_age_skips_runs_without_dying() {
        let store = Arc::new(RecordingSessionStore::new(false));

        let handle = spawn_session_retention_task(
            store.clone(),
            chrono::Duration::days(i64::from(u32::MAX)),
            Duration::from_millis(30),
        );
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!handle.is_finished());
        handle.abort();

        assert_eq!(store.prune_call_count(), 0);
    }
}
