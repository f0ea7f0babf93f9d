//! Domain entities - Objects with identity and lifecycle

mod aggregated_tick;
mod hourly_profile;
mod location;
mod observation;
mod weather_session;
mod yearly_archive_record;

pub use aggregated_tick::AggregatedTick;
pub use hourly_profile::{HOURLY_DELTA_SLOTS, HourlyProfile};
pub use location::Location;
pub use observation::Observation;
pub use weather_session::WeatherSession;
pub use yearly_archive_record::{
    HOURS_PER_DAY, YearlyArchiveRecord, mean, population_standard_deviation,
};
