pub mod admin;
pub mod listings;
pub mod payments;
pub mod rentals;
