//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod listing_repo;
pub mod payment_repo;
pub mod rental_repo;
pub mod user_role_repo;

pub use listing_repo::ListingRepo;
pub use payment_repo::PaymentRepo;
pub use rental_repo::RentalRepo;
pub use user_role_repo::UserRoleRepo;
