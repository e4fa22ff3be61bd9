//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create the first admin account (the panel cannot create one before
//! # any admin can log in)
//! sb-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string

use sqlx::PgPool;
use thiserror::Error;

use sunset_bazaar_admin::services::users::hash_password;
use sunset_bazaar_core::{Email, Role};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: user, admin, seller")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] sunset_bazaar_core::EmailError),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Failed to hash password")]
    Hash,
}

/// Create a new user account from the command line.
///
/// # Arguments
///
/// * `email` - Email address
/// * `name` - Display name
/// * `password` - Plaintext password, hashed with Argon2id before storage
/// * `role` - Account role (`user`, `admin`, or `seller`)
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `AdminError` if the input is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &str,
    role: &str,
) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    // Parse and validate inputs before touching the database
    let role: Role = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email)?;

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .map_err(|_| AdminError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating user: {} ({})", email, role);

    // Check if user already exists
    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::UserExists(email.into_inner()));
    }

    let password_hash = hash_password(password).map_err(|_| AdminError::Hash)?;

    // Create the user
    let user_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (name, email, password_hash, role) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user_id,
        email,
        role
    );

    Ok(user_id)
}
