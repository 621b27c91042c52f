//! Core types for CMS Starter.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! JSON shapes exchanged between the backend and its clients.

pub mod api;
pub mod content;
pub mod email;
pub mod id;
pub mod permission;
pub mod role;
pub mod user;

pub use api::{
    ApiErrorBody, ApiErrorDetail, AuthResponse, DataPayload, Envelope, LoginRequest, Meta,
    Pagination, RegisterRequest,
};
pub use content::{HomeContent, HomeInput};
pub use email::{Email, EmailError};
pub use id::*;
pub use permission::{PermissionAction, PermissionActionError};
pub use role::{AdminRoleCode, RoleType, RoleTypeError};
pub use user::User;
