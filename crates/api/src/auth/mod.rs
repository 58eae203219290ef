//! Authentication primitives.
//!
//! Users sign in with the external identity provider; this service only
//! validates the HS256 access tokens it issues. See [`jwt`].

pub mod jwt;
