//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod location_id;
mod session_id;
mod timezone;

pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use location_id::LocationId;
pub use session_id::SessionId;
pub use timezone::{InvalidTimezone, Timezone};
