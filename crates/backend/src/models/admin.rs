//! Admin panel account models.

use cms_starter_core::AdminRoleId;

/// Attributes of an administrator to create.
///
/// `email` is lowercased when it parses as an address. `password_hash` is an
/// Argon2id PHC string; plaintext never reaches the repository layer.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub password_hash: String,
    pub firstname: String,
    pub lastname: String,
    pub is_active: bool,
    pub role_id: AdminRoleId,
}
