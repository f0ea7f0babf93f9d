//! Baseline service - builds and caches the per-location hourly profile
//!
//! The profile is built once per location from `lookback_years` archived
//! copies of today's calendar date. Concurrent first subscribers for the same
//! location share a single in-flight build.

use std::{collections::HashMap, sync::Arc};

use chrono::{Datelike, NaiveDate, Utc};
use domain::{
    entities::{HourlyProfile, Location, YearlyArchiveRecord},
    value_objects::LocationId,
};
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ArchivePort, LocationStore},
};

/// Default number of past years folded into a profile
pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;

/// Same calendar day `years` years before `today`
///
/// Feb 29 falls back to Feb 28 when the target year is not a leap year.
pub fn same_day_years_ago(today: NaiveDate, years: u32) -> Option<NaiveDate> {
    let year = today.year() - i32::try_from(years).ok()?;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), today.day() - 1))
}

/// Builds hourly profiles with a per-location single-flight guard
pub struct BaselineService {
    archive: Arc<dyn ArchivePort>,
    locations: Arc<dyn LocationStore>,
    lookback_years: u32,
    inflight: Mutex<HashMap<LocationId, Arc<OnceCell<HourlyProfile>>>>,
}

impl std::fmt::Debug for BaselineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaselineService")
            .field("lookback_years", &self.lookback_years)
            .field("inflight", &self.inflight.lock().len())
            .finish_non_exhaustive()
    }
}

impl BaselineService {
    pub fn new(
        archive: Arc<dyn ArchivePort>,
        locations: Arc<dyn LocationStore>,
        lookback_years: u32,
    ) -> Self {
        Self {
            archive,
            locations,
            lookback_years,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub const fn lookback_years(&self) -> u32 {
        self.lookback_years
    }

    /// Return the location's profile, building and storing it if needed
    ///
    /// A location that already carries a profile never touches the archive.
    /// A failed build is not cached, so a later call retries.
    #[instrument(skip(self, location), fields(location_id = %location.id))]
    pub async fn ensure_profile(&self, location: &Location) -> Result<HourlyProfile, ApplicationError> {
        if let Some(profile) = &location.hourly_profile {
            debug!("Using cached hourly profile");
            return Ok(profile.clone());
        }

        let cell = {
            let mut inflight = self.inflight.lock();
            Arc::clone(inflight.entry(location.id).or_default())
        };

        let profile = cell
            .get_or_try_init(|| async {
                let (profile, records) = self.build(location, Utc::now().date_naive()).await?;
                self.locations
                    .save_baseline(&location.id, &profile, &records)
                    .await?;
                info!(
                    records = profile.record_count,
                    average_sd = profile.average_standard_deviation,
                    "Built hourly profile"
                );
                Ok::<_, ApplicationError>(profile)
            })
            .await?
            .clone();

        // Persisted now, so later subscribers load it from the store
        self.release(&location.id, &cell);
        Ok(profile)
    }

    fn release(&self, id: &LocationId, cell: &Arc<OnceCell<HourlyProfile>>) {
        let mut inflight = self.inflight.lock();
        if inflight.get(id).is_some_and(|current| Arc::ptr_eq(current, cell)) {
            inflight.remove(id);
        }
    }

    /// Locations with a build in progress or a failed build awaiting retry
    #[must_use]
    pub fn inflight_count(&self) -> usize {
        self.inflight.lock().len()
    }

    /// Fetch the archive for each lookback year and fold the usable ones
    ///
    /// Years whose fetch or statistics fail are logged and skipped.
    pub async fn build(
        &self,
        location: &Location,
        today: NaiveDate,
    ) -> Result<(HourlyProfile, Vec<YearlyArchiveRecord>), ApplicationError> {
        let dates: Vec<NaiveDate> = (1..=self.lookback_years)
            .filter_map(|years| same_day_years_ago(today, years))
            .collect();

        let fetches = dates.iter().map(|date| async move {
            let samples = self.archive.fetch_day(&location.coordinates, *date).await?;
            YearlyArchiveRecord::from_samples(*date, samples).map_err(ApplicationError::from)
        });

        let mut records = Vec::with_capacity(dates.len());
        for (date, result) in dates.iter().zip(join_all(fetches).await) {
            match result {
                Ok(record) => records.push(record),
                Err(e) => warn!(%date, error = %e, "Skipping archive year"),
            }
        }

        if records.is_empty() {
            return Err(ApplicationError::InsufficientHistory(format!(
                "no usable archive data for {} in the last {} years",
                location.name, self.lookback_years
            )));
        }

        let profile = HourlyProfile::from_records(&records)?;
        Ok((profile, records))
    }
}
