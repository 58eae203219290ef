//! Domain rules for the Rentify marketplace.
//!
//! Pure logic only: status state machines, money conversion, payment
//! signature checks, and the shared error taxonomy. No I/O lives here so the
//! database, gateway, and API crates can all depend on it.

pub mod error;
pub mod listing;
pub mod money;
pub mod pagination;
pub mod payment;
pub mod rental;
pub mod roles;
pub mod signature;
pub mod types;
