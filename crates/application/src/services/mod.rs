//! Application services - Use case implementations

mod aggregation_service;
mod baseline_service;
mod catalog_service;
mod prediction_engine;

pub use aggregation_service::{
    ActiveSession, AggregationService, AggregationSettings, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_TICK_INTERVAL, SessionSummary,
};
pub use baseline_service::{BaselineService, DEFAULT_LOOKBACK_YEARS, same_day_years_ago};
pub use catalog_service::CatalogService;
pub use prediction_engine::{PredictionEngine, predict};
