//! Backend domain models.

pub mod admin;
pub mod role;
pub mod user;

pub use admin::NewAdmin;
pub use role::{Permission, Role};
pub use user::UserRecord;
