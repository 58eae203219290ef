//! Well-known role name constants.
//!
//! These must match the `user_roles.role` check constraint in
//! `20261001000004_create_user_roles_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
