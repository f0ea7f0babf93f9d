//! SQLite session store
//!
//! Each append is one transaction: the session row is created on first use
//! and its `updated_at` advanced, then the tick is inserted. The
//! `(session_id, sequence)` uniqueness constraint rejects a duplicate tick.

use application::{error::ApplicationError, ports::SessionStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AggregatedTick, LocationId, Observation, SessionId, WeatherSession};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use super::error::{format_datetime, map_json_error, map_sqlx_error, parse_datetime};

/// Session store backed by the shared sqlx pool
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    #[instrument(skip(self, tick), fields(session_id = %session_id, sequence = tick.sequence))]
    async fn append_tick(
        &self,
        session_id: &SessionId,
        location_id: &LocationId,
        tick: &AggregatedTick,
    ) -> Result<(), ApplicationError> {
        let sources =
            serde_json::to_string(&tick.sources).map_err(|e| map_json_error("sources", &e))?;
        let sequence = i64::try_from(tick.sequence).map_err(|_| {
            ApplicationError::PersistenceFailure(format!("sequence {} out of range", tick.sequence))
        })?;
        let recorded_at = format_datetime(tick.recorded_at);

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r"
            INSERT INTO weather_sessions (id, location_id, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT(id) DO UPDATE SET updated_at = excluded.updated_at
            ",
        )
        .bind(session_id.to_string())
        .bind(location_id.to_string())
        .bind(&recorded_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r"
            INSERT INTO session_ticks (session_id, sequence, recorded_at, sources)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(session_id.to_string())
        .bind(sequence)
        .bind(&recorded_at)
        .bind(sources)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(sources = tick.len(), "Tick appended");
        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn get(&self, id: &SessionId) -> Result<Option<WeatherSession>, ApplicationError> {
        let session_row: Option<SessionRow> = sqlx::query_as(
            r"
            SELECT location_id, created_at, updated_at
            FROM weather_sessions WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = session_row else {
            debug!("Session not found");
            return Ok(None);
        };

        let tick_rows: Vec<TickRow> = sqlx::query_as(
            r"
            SELECT sequence, recorded_at, sources
            FROM session_ticks WHERE session_id = $1
            ORDER BY sequence ASC
            ",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut ticks = Vec::with_capacity(tick_rows.len());
        for tick_row in tick_rows {
            ticks.push(tick_row.into_tick()?);
        }

        let location_id = LocationId::parse(&row.location_id).map_err(|e| {
            ApplicationError::PersistenceFailure(format!("Invalid location ID: {e}"))
        })?;

        Ok(Some(WeatherSession {
            id: *id,
            location_id,
            ticks,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        }))
    }

    #[instrument(skip(self))]
    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, ApplicationError> {
        // Ticks go with their session via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM weather_sessions WHERE updated_at < $1")
            .bind(format_datetime(cutoff))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let removed = result.rows_affected();
        if removed > 0 {
            info!(removed, "Pruned stale sessions");
        }
        Ok(removed)
    }
}

/// Row type for session queries
#[derive(sqlx::FromRow)]
struct SessionRow {
    location_id: String,
    created_at: String,
    updated_at: String,
}

/// Row type for tick queries
#[derive(sqlx::FromRow)]
struct TickRow {
    sequence: i64,
    recorded_at: String,
    sources: String,
}

impl TickRow {
    fn into_tick(self) -> Result<AggregatedTick, ApplicationError> {
        let sources: Vec<Observation> =
            serde_json::from_str(&self.sources).map_err(|e| map_json_error("sources", &e))?;
        let sequence = u64::try_from(self.sequence).map_err(|_| {
            ApplicationError::PersistenceFailure(format!("negative sequence {}", self.sequence))
        })?;
        Ok(AggregatedTick {
            sources,
            sequence,
            recorded_at: parse_datetime(&self.recorded_at)?,
        })
    }
}
