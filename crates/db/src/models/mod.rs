//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Plain DTO structs for inserts and state changes

pub mod listing;
pub mod payment;
pub mod rental;
