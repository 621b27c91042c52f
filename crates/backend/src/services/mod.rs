//! Backend services.

pub mod auth;
