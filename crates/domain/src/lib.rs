//! Domain layer for Stratus
//!
//! Contains the weather aggregation entities, value objects and the pure
//! statistics behind the hourly baseline. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
