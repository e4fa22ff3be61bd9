//! Seed the database with sample users for development.
//!
//! Inserts one admin and a handful of shopper/seller accounts, all sharing
//! a fixed development password. Never run against production.

use sqlx::PgPool;

use sunset_bazaar_admin::services::users::hash_password;
use sunset_bazaar_core::Role;

use super::admin::AdminError;

/// Password shared by all seeded accounts.
pub const DEV_PASSWORD: &str = "sunset-dev-password";

/// Sample accounts: (name, email, role, is_seller).
const SAMPLE_USERS: &[(&str, &str, Role, bool)] = &[
    ("Avery Cole", "admin@sunsetbazaar.shop", Role::Admin, false),
    ("Noor Haddad", "noor@example.com", Role::User, false),
    ("Tomás Rivera", "tomas@example.com", Role::Seller, true),
    ("June Park", "june@example.com", Role::User, true),
];

/// Insert the sample users, skipping any email that already exists.
///
/// # Errors
///
/// Returns `AdminError` if the environment is missing or the database is
/// unreachable.
pub async fn users() -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .map_err(|_| AdminError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    let pool = PgPool::connect(&database_url).await?;

    let password_hash = hash_password(DEV_PASSWORD).map_err(|_| AdminError::Hash)?;

    let mut inserted = 0_u32;
    for (name, email, role, is_seller) in SAMPLE_USERS {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role, is_seller) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(role)
        .bind(is_seller)
        .execute(&pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
            tracing::info!("  seeded {email} ({role})");
        } else {
            tracing::info!("  skipped {email} (already exists)");
        }
    }

    tracing::info!("Seeding complete! {inserted} user(s) inserted.");
    tracing::info!("All seeded accounts use the password: {DEV_PASSWORD}");

    Ok(())
}
