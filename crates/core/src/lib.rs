//! CMS Starter Core - Shared types library.
//!
//! This crate provides common types used across all CMS Starter components:
//! - `backend` - Headless CMS backend (bootstrap, REST API)
//! - `client` - REST client, session storage and fetch resources
//! - `web` - Server-rendered frontend and API reverse proxy
//! - `cli` - Command-line tools for migrations and auth
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. Both sides of the REST contract serialize through these
//! types, so the wire format is defined in exactly one place.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles, permission actions, content and
//!   API envelope types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
