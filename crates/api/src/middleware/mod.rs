//! Request authentication extractors.
//!
//! - [`auth::ApiKey`] -- Requires the shared secret in the `Authorization` header.

pub mod auth;
