//! Session-related types for the admin panel.
//!
//! Holds the logged-in admin identity and the one-shot flash messages the
//! POST-redirect-GET cycle leaves behind for the next page render.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use sunset_bazaar_core::{Email, Role, UserId};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Admin's role (always [`Role::Admin`] once logged in).
    pub role: Role,
}

/// Session keys for admin panel session data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the one-shot success flash message.
    pub const FLASH_SUCCESS: &str = "flash_success";

    /// Key for the one-shot error flash message.
    pub const FLASH_ERROR: &str = "flash_error";
}

/// Flash messages taken from the session for a single render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Store a success flash message for the next page render.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn flash_success(
    session: &Session,
    message: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::FLASH_SUCCESS, message).await
}

/// Store an error flash message for the next page render.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn flash_error(
    session: &Session,
    message: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::FLASH_ERROR, message).await
}

/// Take (and clear) any flash messages from the session.
///
/// Flash messages are one-shot: reading them removes them, so a reload of
/// the page renders clean. Session failures degrade to no messages.
pub async fn take_flash(session: &Session) -> Flash {
    let success = match session.remove::<String>(keys::FLASH_SUCCESS).await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to take success flash: {e}");
            None
        }
    };
    let error = match session.remove::<String>(keys::FLASH_ERROR).await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to take error flash: {e}");
            None
        }
    };

    Flash { success, error }
}
