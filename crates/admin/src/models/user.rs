//! Store user domain types.
//!
//! The domain [`User`] never carries the password hash; hashes stay inside
//! the repository layer and the login flow.

use chrono::{DateTime, Utc};

use sunset_bazaar_core::{Email, Role, UserId};

/// A store user account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique across accounts).
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Whether the account is flagged as a seller storefront.
    ///
    /// Kept separate from [`Role::Seller`]: an admin can also run a seller
    /// storefront.
    pub is_seller: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
