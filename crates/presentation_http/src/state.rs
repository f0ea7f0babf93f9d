//! Application state shared across handlers

use std::sync::Arc;

use application::{
    AggregationService, ApplicationError, BaselineService, CatalogService, PredictionEngine,
    ports::{ArchivePort, DatabaseHealthPort, LocationStore, SessionStore, WeatherProviderPort},
};
use infrastructure::{
    AppConfig, AsyncDatabase, SqliteDatabaseHealth, SqliteLocationStore, SqliteSessionStore,
    build_archive, build_providers,
};
use tokio::sync::watch;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Aggregation loop driver for websocket subscribers
    pub aggregation: Arc<AggregationService>,
    /// Country and city listings
    pub catalog: Arc<CatalogService>,
    /// Readiness probe backend
    pub database_health: Arc<dyn DatabaseHealthPort>,
    /// Flips to `true` when the server begins shutting down
    pub shutdown: watch::Receiver<bool>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("aggregation", &self.aggregation)
            .field("catalog", &self.catalog)
            .field("shutting_down", &*self.shutdown.borrow())
            .finish_non_exhaustive()
    }
}

/// Ports the services are assembled from
pub struct Ports {
    pub providers: Vec<Arc<dyn WeatherProviderPort>>,
    pub archive: Arc<dyn ArchivePort>,
    pub locations: Arc<dyn LocationStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub database_health: Arc<dyn DatabaseHealthPort>,
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports")
            .field("providers", &self.providers.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire services over the given ports
    pub fn from_ports(
        config: &AppConfig,
        ports: Ports,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, ApplicationError> {
        let timezone = config
            .aggregation
            .timezone()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        let baseline = Arc::new(BaselineService::new(
            ports.archive,
            Arc::clone(&ports.locations),
            config.aggregation.lookback_years,
        ));
        let aggregation = AggregationService::new(
            ports.providers,
            Arc::clone(&ports.locations),
            ports.sessions,
            baseline,
            PredictionEngine::new(timezone),
            config.aggregation.settings(),
        );

        Ok(Self {
            aggregation: Arc::new(aggregation),
            catalog: Arc::new(CatalogService::new(ports.locations)),
            database_health: ports.database_health,
            shutdown,
        })
    }

    /// Wire the production adapters: HTTP providers and SQLite stores
    pub fn from_config(
        config: &AppConfig,
        db: &AsyncDatabase,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, ApplicationError> {
        let pool = db.pool().clone();
        let ports = Ports {
            providers: build_providers(&config.weather)?,
            archive: build_archive(&config.weather)?,
            locations: Arc::new(SqliteLocationStore::new(pool.clone())),
            sessions: Arc::new(SqliteSessionStore::new(pool.clone())),
            database_health: Arc::new(SqliteDatabaseHealth::new(pool)),
        };
        Self::from_ports(config, ports, shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wires_production_adapters() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let (_tx, rx) = watch::channel(false);

        let state = AppState::from_config(&AppConfig::default(), &db, rx).unwrap();
        assert_eq!(state.aggregation.sources(), ["openmeteo"]);
        assert!(state.database_health.is_available().await);
    }

    #[tokio::test]
    async fn rejects_unknown_timezone() {
        let db = AsyncDatabase::in_memory().await.unwrap();
        let (_tx, rx) = watch::channel(false);
        let mut config = AppConfig::default();
        config.aggregation.prediction_timezone = "Mars/Olympus".to_string();

        let err = AppState::from_config(&config, &db, rx).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
