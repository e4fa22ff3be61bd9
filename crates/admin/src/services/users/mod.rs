//! User management service.
//!
//! Owns the business rules of the users page: duplicate-email checks before
//! insert/update, password hashing (rehash only when a new password is
//! supplied), the last-admin delete guard, and panel login.

mod error;

pub use error::UserError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use sunset_bazaar_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// User management service.
///
/// Wraps the repository with validation and the page's business rules.
pub struct UserService<'a> {
    users: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    // =========================================================================
    // Account Management
    // =========================================================================

    /// Create a new user account.
    ///
    /// The duplicate-email check runs before the insert; a unique-index
    /// violation from a concurrent insert surfaces as the same error.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyName` / `UserError::InvalidEmail` /
    /// `UserError::WeakPassword` if the input fails validation.
    /// Returns `UserError::DuplicateEmail` if the email is already taken.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        is_seller: bool,
    ) -> Result<User, UserError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        if self.users.email_in_use(&email, None).await? {
            return Err(UserError::DuplicateEmail);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash, role, is_seller)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => UserError::DuplicateEmail,
                other => UserError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Update an existing user account.
    ///
    /// The password is rehashed only when `password` is a non-empty string;
    /// otherwise the stored hash is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `UserError::UserNotFound` if the user doesn't exist.
    /// Returns `UserError::DuplicateEmail` if another account already uses
    /// the email.
    pub async fn update_user(
        &self,
        id: UserId,
        name: &str,
        email: &str,
        password: Option<&str>,
        role: Role,
        is_seller: bool,
    ) -> Result<User, UserError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;

        if self.users.email_in_use(&email, Some(id)).await? {
            return Err(UserError::DuplicateEmail);
        }

        let result = match password.filter(|p| !p.is_empty()) {
            Some(new_password) => {
                validate_password(new_password)?;
                let password_hash = hash_password(new_password)?;
                self.users
                    .update_with_password(id, name, &email, &password_hash, role, is_seller)
                    .await
            }
            None => self.users.update(id, name, &email, role, is_seller).await,
        };

        let user = result.map_err(|e| match e {
            RepositoryError::NotFound => UserError::UserNotFound,
            RepositoryError::Conflict(_) => UserError::DuplicateEmail,
            other => UserError::Repository(other),
        })?;

        tracing::info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    /// Delete a user account.
    ///
    /// Refuses to delete the last remaining admin: the panel must always be
    /// reachable by someone.
    ///
    /// # Errors
    ///
    /// Returns `UserError::UserNotFound` if the user doesn't exist.
    /// Returns `UserError::LastAdmin` if the target is the only admin.
    pub async fn delete_user(&self, id: UserId) -> Result<(), UserError> {
        let user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(UserError::UserNotFound)?;

        if user.role == Role::Admin && self.users.count_admins().await? <= 1 {
            return Err(UserError::LastAdmin);
        }

        self.users.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => UserError::UserNotFound,
            other => UserError::Repository(other),
        })?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    // =========================================================================
    // Panel Login
    // =========================================================================

    /// Verify email and password for panel login.
    ///
    /// Only accounts holding the admin role may enter the panel.
    ///
    /// # Errors
    ///
    /// Returns `UserError::InvalidCredentials` if the email/password is wrong.
    /// Returns `UserError::NotAnAdmin` if the account is not an admin.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, UserError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .password_hash_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if user.role != Role::Admin {
            return Err(UserError::NotAnAdmin);
        }

        Ok(user)
    }
}

// =============================================================================
// Validation & Hashing
// =============================================================================

/// Validate and trim a display name.
fn validate_name(name: &str) -> Result<&str, UserError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(UserError::EmptyName);
    }
    Ok(trimmed)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), UserError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Public so the CLI bootstrap command can hash the first admin's password
/// the same way the panel does.
///
/// # Errors
///
/// Returns `UserError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| UserError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), UserError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| UserError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| UserError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_verifies() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_verify_password_rejects_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(UserError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(UserError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hash_password_is_salted() {
        // Same password must not produce the same hash twice
        let a = hash_password("correct horse battery").unwrap();
        let b = hash_password("correct horse battery").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(UserError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_validate_name() {
        assert!(matches!(validate_name("   "), Err(UserError::EmptyName)));
        assert_eq!(validate_name("  Ada Lovelace ").unwrap(), "Ada Lovelace");
    }
}
