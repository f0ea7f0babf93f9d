//! Aggregation service - the per-subscription fetch, predict and emit loop
//!
//! A subscription first resolves its location and baseline, then ticks on a
//! fixed interval. Each tick fans out to every provider, predicts the next
//! hour, persists the tick and hands it to the subscriber. Persistence and
//! delivery failures end the loop; provider failures only shrink the tick.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use domain::{
    entities::{AggregatedTick, HourlyProfile, Location, Observation},
    value_objects::{LocationId, SessionId},
};
use futures::future::join_all;
use serde::Serialize;
use tokio::{
    sync::watch,
    time::{Instant, MissedTickBehavior, interval_at, timeout},
};
use tracing::{debug, error, info, instrument, warn};

use super::{BaselineService, PredictionEngine};
use crate::{
    error::ApplicationError,
    ports::{LocationStore, SessionStore, TickSink, WeatherProviderPort},
};

/// Default time between ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Default bound on a single provider fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Timing parameters for the loop
#[derive(Debug, Clone, Copy)]
pub struct AggregationSettings {
    pub tick_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// State of one subscription after a successful start
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub session_id: SessionId,
    pub location: Location,
    pub profile: HourlyProfile,
    next_sequence: u64,
}

impl ActiveSession {
    /// Sequence number of the next tick
    pub const fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Ticks produced so far
    pub const fn ticks_emitted(&self) -> u64 {
        self.next_sequence - 1
    }
}

/// Outcome of a loop that stopped through cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub location_id: LocationId,
    pub ticks_emitted: u64,
}

/// Runs aggregation loops against a fixed set of providers
pub struct AggregationService {
    providers: Vec<Arc<dyn WeatherProviderPort>>,
    locations: Arc<dyn LocationStore>,
    sessions: Arc<dyn SessionStore>,
    baseline: Arc<BaselineService>,
    prediction: PredictionEngine,
    settings: AggregationSettings,
}

impl std::fmt::Debug for AggregationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationService")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.source()).collect::<Vec<_>>(),
            )
            .field("prediction", &self.prediction)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AggregationService {
    pub fn new(
        providers: Vec<Arc<dyn WeatherProviderPort>>,
        locations: Arc<dyn LocationStore>,
        sessions: Arc<dyn SessionStore>,
        baseline: Arc<BaselineService>,
        prediction: PredictionEngine,
        settings: AggregationSettings,
    ) -> Self {
        Self {
            providers,
            locations,
            sessions,
            baseline,
            prediction,
            settings,
        }
    }

    /// Identifiers of the registered providers
    pub fn sources(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Load the location, make sure it has a baseline and open a session
    #[instrument(skip(self), fields(location_id = %location_id))]
    pub async fn start(&self, location_id: &LocationId) -> Result<ActiveSession, ApplicationError> {
        let location = self
            .locations
            .get(location_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("location {location_id}")))?;

        let profile = self.baseline.ensure_profile(&location).await?;
        let session_id = SessionId::new();
        info!(%session_id, city = %location.name, "Aggregation session started");

        Ok(ActiveSession {
            session_id,
            location,
            profile,
            next_sequence: 1,
        })
    }

    /// Start a session and tick until cancelled or a fatal error occurs
    pub async fn run(
        &self,
        location_id: &LocationId,
        sink: Arc<dyn TickSink>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<SessionSummary, ApplicationError> {
        let session = self.start(location_id).await?;
        self.run_session(session, sink, shutdown).await
    }

    /// Tick an already started session until cancelled or a fatal error
    ///
    /// The first tick fires one interval after the call. Missed ticks are
    /// delayed rather than bursted.
    #[instrument(skip_all, fields(session_id = %session.session_id, location_id = %session.location.id))]
    pub async fn run_session(
        &self,
        mut session: ActiveSession,
        sink: Arc<dyn TickSink>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<SessionSummary, ApplicationError> {
        let period = self.settings.tick_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancelled(&mut shutdown) => break,
                _ = ticker.tick() => {},
            }

            tokio::select! {
                biased;
                () = cancelled(&mut shutdown) => break,
                result = self.run_tick(&mut session, sink.as_ref()) => {
                    if let Err(e) = result {
                        error!(error = %e, "Aggregation loop terminated");
                        return Err(e);
                    }
                },
            }
        }

        info!(ticks = session.ticks_emitted(), "Aggregation session cancelled");
        Ok(SessionSummary {
            session_id: session.session_id,
            location_id: session.location.id,
            ticks_emitted: session.ticks_emitted(),
        })
    }

    /// Run exactly one cycle: fetch, predict, persist, emit
    ///
    /// A tick with no observations is still persisted and emitted.
    pub async fn run_tick(
        &self,
        session: &mut ActiveSession,
        sink: &dyn TickSink,
    ) -> Result<AggregatedTick, ApplicationError> {
        let observations = self.fetch_all(&session.location).await;
        let observations = self
            .prediction
            .annotate(observations, &session.profile, Utc::now());
        let tick = AggregatedTick::new(session.next_sequence, observations);

        self.sessions
            .append_tick(&session.session_id, &session.location.id, &tick)
            .await
            .map_err(|e| match e {
                ApplicationError::PersistenceFailure(_) => e,
                other => ApplicationError::PersistenceFailure(other.to_string()),
            })?;

        sink.emit(&tick).await.map_err(|e| match e {
            ApplicationError::DeliveryFailure(_) => e,
            other => ApplicationError::DeliveryFailure(other.to_string()),
        })?;

        session.next_sequence += 1;
        debug!(sequence = tick.sequence, sources = tick.len(), "Tick emitted");
        Ok(tick)
    }

    /// Query every provider concurrently, dropping failures and timeouts
    async fn fetch_all(&self, location: &Location) -> Vec<Observation> {
        let limit = self.settings.fetch_timeout;
        let fetches = self.providers.iter().map(|provider| async move {
            let source = provider.source();
            match timeout(limit, provider.fetch(location)).await {
                Ok(Ok(observation)) => Some(observation),
                Ok(Err(e)) => {
                    warn!(source, error = %e, "Provider fetch failed");
                    None
                },
                Err(_) => {
                    warn!(source, timeout = ?limit, "Provider fetch timed out");
                    None
                },
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }
}

/// Resolves once cancellation is requested or the sender is gone
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
