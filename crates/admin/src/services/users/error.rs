//! User management error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during user management operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] sunset_bazaar_core::EmailError),

    /// Display name is missing or blank.
    #[error("name cannot be empty")]
    EmptyName,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Another account already uses this email address.
    #[error("email address already exists")]
    DuplicateEmail,

    /// Deleting this account would leave the store without an admin.
    #[error("cannot delete the last admin user")]
    LastAdmin,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account is valid but does not hold the admin role.
    #[error("account is not an admin")]
    NotAnAdmin,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
