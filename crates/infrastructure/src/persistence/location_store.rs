//! SQLite location catalog
//!
//! Catalog columns are stored flat; the hourly profile and the yearly
//! records it was folded from are JSON columns written together.

use application::{error::ApplicationError, ports::LocationStore};
use async_trait::async_trait;
use chrono::Utc;
use domain::{GeoLocation, HourlyProfile, Location, LocationId, YearlyArchiveRecord};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::{map_json_error, map_sqlx_error};

const SELECT_COLUMNS: &str = r"
    SELECT id, name, name_ascii, country, iso2, iso3, admin_name, capital,
           population, latitude, longitude, hourly_profile, yearly_records
    FROM locations
";

/// Location store backed by the shared sqlx pool
#[derive(Debug, Clone)]
pub struct SqliteLocationStore {
    pool: SqlitePool,
}

impl SqliteLocationStore {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationStore for SqliteLocationStore {
    #[instrument(skip(self), fields(location_id = %id))]
    async fn get(&self, id: &LocationId) -> Result<Option<Location>, ApplicationError> {
        let row: Option<LocationRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(LocationRow::into_location).transpose()
    }

    #[instrument(skip(self, profile, records), fields(location_id = %id, records = records.len()))]
    async fn save_baseline(
        &self,
        id: &LocationId,
        profile: &HourlyProfile,
        records: &[YearlyArchiveRecord],
    ) -> Result<(), ApplicationError> {
        let profile_json =
            serde_json::to_string(profile).map_err(|e| map_json_error("hourly_profile", &e))?;
        let records_json =
            serde_json::to_string(records).map_err(|e| map_json_error("yearly_records", &e))?;

        let result = sqlx::query(
            r"
            UPDATE locations
            SET hourly_profile = $1, yearly_records = $2, updated_at = $3
            WHERE id = $4
            ",
        )
        .bind(profile_json)
        .bind(records_json)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(ApplicationError::NotFound(format!("location {id}")));
        }
        debug!("Baseline saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn countries(&self) -> Result<Vec<String>, ApplicationError> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT country FROM locations ORDER BY country")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    #[instrument(skip(self))]
    async fn cities_by_country(&self, country: &str) -> Result<Vec<Location>, ApplicationError> {
        let rows: Vec<LocationRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE country = $1 COLLATE NOCASE ORDER BY name"
        ))
        .bind(country)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(count = rows.len(), "Listed cities");
        rows.into_iter().map(LocationRow::into_location).collect()
    }

    #[instrument(skip(self, location), fields(location_id = %location.id))]
    async fn upsert(&self, location: &Location) -> Result<(), ApplicationError> {
        let profile_json = location
            .hourly_profile
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| map_json_error("hourly_profile", &e))?;
        let records_json = serde_json::to_string(&location.yearly_records)
            .map_err(|e| map_json_error("yearly_records", &e))?;
        let population = location
            .population
            .map(|p| i64::try_from(p).unwrap_or(i64::MAX));

        // A catalog refresh without a baseline keeps the cached one
        sqlx::query(
            r"
            INSERT INTO locations (
                id, name, name_ascii, country, iso2, iso3, admin_name, capital,
                population, latitude, longitude, hourly_profile, yearly_records, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                name_ascii = excluded.name_ascii,
                country = excluded.country,
                iso2 = excluded.iso2,
                iso3 = excluded.iso3,
                admin_name = excluded.admin_name,
                capital = excluded.capital,
                population = excluded.population,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                yearly_records = CASE
                    WHEN excluded.hourly_profile IS NULL THEN locations.yearly_records
                    ELSE excluded.yearly_records
                END,
                hourly_profile = COALESCE(excluded.hourly_profile, locations.hourly_profile),
                updated_at = excluded.updated_at
            ",
        )
        .bind(location.id.to_string())
        .bind(&location.name)
        .bind(&location.name_ascii)
        .bind(&location.country)
        .bind(&location.iso2)
        .bind(&location.iso3)
        .bind(&location.admin_name)
        .bind(&location.capital)
        .bind(population)
        .bind(location.coordinates.latitude())
        .bind(location.coordinates.longitude())
        .bind(profile_json)
        .bind(records_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Location upserted");
        Ok(())
    }
}

/// Row type for location queries
#[derive(sqlx::FromRow)]
struct LocationRow {
    id: String,
    name: String,
    name_ascii: String,
    country: String,
    iso2: Option<String>,
    iso3: Option<String>,
    admin_name: Option<String>,
    capital: Option<String>,
    population: Option<i64>,
    latitude: f64,
    longitude: f64,
    hourly_profile: Option<String>,
    yearly_records: String,
}

impl LocationRow {
    fn into_location(self) -> Result<Location, ApplicationError> {
        let id = LocationId::parse(&self.id).map_err(|e| {
            ApplicationError::PersistenceFailure(format!("Invalid location ID {}: {e}", self.id))
        })?;
        let coordinates = GeoLocation::new(self.latitude, self.longitude)
            .map_err(|e| ApplicationError::PersistenceFailure(e.to_string()))?;
        let hourly_profile = self
            .hourly_profile
            .as_deref()
            .map(serde_json::from_str::<HourlyProfile>)
            .transpose()
            .map_err(|e| map_json_error("hourly_profile", &e))?;
        let yearly_records: Vec<YearlyArchiveRecord> = serde_json::from_str(&self.yearly_records)
            .map_err(|e| map_json_error("yearly_records", &e))?;

        Ok(Location {
            id,
            name: self.name,
            name_ascii: self.name_ascii,
            country: self.country,
            iso2: self.iso2,
            iso3: self.iso3,
            admin_name: self.admin_name,
            capital: self.capital,
            population: self.population.and_then(|p| u64::try_from(p).ok()),
            coordinates,
            hourly_profile,
            yearly_records,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::persistence::async_connection::AsyncDatabase;

    async fn setup_test_db() -> (AsyncDatabase, SqliteLocationStore) {
        let db = AsyncDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let store = SqliteLocationStore::new(db.pool().clone());
        (db, store)
    }

    fn city(name: &str, country: &str, lat: f64, lon: f64) -> Location {
        Location::new(name, country, GeoLocation::new(lat, lon).unwrap())
    }

    fn baseline() -> (HourlyProfile, Vec<YearlyArchiveRecord>) {
        let samples: Vec<f64> = (0..24).map(|h| 10.0 + f64::from(h)).collect();
        let record =
            YearlyArchiveRecord::from_samples(NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(), samples)
                .unwrap();
        let profile = HourlyProfile::from_records(std::slice::from_ref(&record)).unwrap();
        (profile, vec![record])
    }

    #[tokio::test]
    async fn upsert_and_get() {
        let (_db, store) = setup_test_db().await;
        let mut lisbon = city("Lisbon", "Portugal", 38.7452, -9.1604);
        lisbon.iso2 = Some("PT".to_string());
        lisbon.population = Some(506_654);
        store.upsert(&lisbon).await.unwrap();

        let loaded = store.get(&lisbon.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Lisbon");
        assert_eq!(loaded.iso2.as_deref(), Some("PT"));
        assert_eq!(loaded.population, Some(506_654));
        assert!((loaded.coordinates.latitude() - 38.7452).abs() < 1e-9);
        assert!(!loaded.has_profile());
    }

    #[tokio::test]
    async fn get_unknown_returns_none() {
        let (_db, store) = setup_test_db().await;
        assert!(store.get(&LocationId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn baseline_round_trips() {
        let (_db, store) = setup_test_db().await;
        let lisbon = city("Lisbon", "Portugal", 38.7452, -9.1604);
        store.upsert(&lisbon).await.unwrap();

        let (profile, records) = baseline();
        store.save_baseline(&lisbon.id, &profile, &records).await.unwrap();

        let loaded = store.get(&lisbon.id).await.unwrap().unwrap();
        let stored = loaded.hourly_profile.unwrap();
        assert_eq!(stored.record_count, 1);
        assert_eq!(stored.hourly_average_delta_ratio.len(), 23);
        for (a, b) in stored
            .hourly_average_delta_ratio
            .iter()
            .zip(&profile.hourly_average_delta_ratio)
        {
            assert!((a.unwrap() - b.unwrap()).abs() < 1e-12);
        }
        assert_eq!(loaded.yearly_records.len(), 1);
        assert_eq!(loaded.yearly_records[0].date, records[0].date);
    }

    #[tokio::test]
    async fn save_baseline_for_unknown_location_fails() {
        let (_db, store) = setup_test_db().await;
        let (profile, records) = baseline();
        let err = store
            .save_baseline(&LocationId::new(), &profile, &records)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn catalog_refresh_keeps_cached_baseline() {
        let (_db, store) = setup_test_db().await;
        let mut lisbon = city("Lisbon", "Portugal", 38.7452, -9.1604);
        store.upsert(&lisbon).await.unwrap();
        let (profile, records) = baseline();
        store.save_baseline(&lisbon.id, &profile, &records).await.unwrap();

        lisbon.name = "Lisboa".to_string();
        store.upsert(&lisbon).await.unwrap();

        let loaded = store.get(&lisbon.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Lisboa");
        assert!(loaded.has_profile());
        assert_eq!(loaded.yearly_records.len(), 1);
    }

    #[tokio::test]
    async fn countries_are_distinct_and_sorted() {
        let (_db, store) = setup_test_db().await;
        for loc in [
            city("Porto", "Portugal", 41.15, -8.61),
            city("Tokyo", "Japan", 35.6897, 139.6922),
            city("Lisbon", "Portugal", 38.7452, -9.1604),
        ] {
            store.upsert(&loc).await.unwrap();
        }

        assert_eq!(store.countries().await.unwrap(), ["Japan", "Portugal"]);
    }

    #[tokio::test]
    async fn cities_sorted_by_name_ignoring_country_case() {
        let (_db, store) = setup_test_db().await;
        for loc in [
            city("Porto", "Portugal", 41.15, -8.61),
            city("Braga", "Portugal", 41.55, -8.42),
            city("Tokyo", "Japan", 35.6897, 139.6922),
        ] {
            store.upsert(&loc).await.unwrap();
        }

        let cities = store.cities_by_country("portugal").await.unwrap();
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Braga", "Porto"]);
        assert!(store.cities_by_country("Atlantis").await.unwrap().is_empty());
    }
}
