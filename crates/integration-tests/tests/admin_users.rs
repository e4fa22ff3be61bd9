//! Integration tests for the admin user management page.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p sunset-bazaar-cli -- migrate)
//! - A freshly seeded database (cargo run -p sunset-bazaar-cli -- seed users);
//!   the last-admin test assumes the seed's single admin account
//! - The admin server running (cargo run -p sunset-bazaar-admin)
//!
//! Run with: cargo test -p sunset-bazaar-integration-tests -- --ignored

use reqwest::{Client, redirect::Policy};
use uuid::Uuid;

/// Base URL for the admin panel (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Credentials of the seeded admin account.
fn admin_credentials() -> (String, String) {
    let email = std::env::var("ADMIN_TEST_EMAIL")
        .unwrap_or_else(|_| "admin@sunsetbazaar.shop".to_string());
    let password =
        std::env::var("ADMIN_TEST_PASSWORD").unwrap_or_else(|_| "sunset-dev-password".to_string());
    (email, password)
}

/// Build a client that keeps cookies and does NOT follow redirects, so the
/// POST-redirect-GET cycle stays observable.
fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Log a client in with the given credentials; panics if login is rejected.
async fn login(client: &Client, email: &str, password: &str) {
    let base_url = admin_base_url();
    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to post login form");

    assert!(resp.status().is_redirection(), "login should redirect");
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/users", "login rejected for {email}: {location}");
}

/// Build an authenticated client logged in as the seeded admin.
async fn authenticated_client() -> Client {
    let client = new_client();
    let (email, password) = admin_credentials();
    login(&client, &email, &password).await;
    client
}

/// Fetch the users page body.
async fn users_page(client: &Client) -> String {
    let base_url = admin_base_url();
    let resp = client
        .get(format!("{base_url}/users"))
        .send()
        .await
        .expect("Failed to get users page");
    assert!(resp.status().is_success());
    resp.text().await.expect("Failed to read users page")
}

/// Generate a unique throwaway email address.
fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}

/// Post one users-page action and return the redirect target.
async fn post_action(client: &Client, fields: &[(&str, &str)]) -> String {
    let base_url = admin_base_url();
    let resp = client
        .post(format!("{base_url}/users"))
        .form(fields)
        .send()
        .await
        .expect("Failed to post users action");

    assert!(
        resp.status().is_redirection(),
        "users POST should redirect, got {}",
        resp.status()
    );
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Pull a user's ID out of the rendered page by locating their edit modal.
///
/// The edit form renders `name="id" value="N"` before the email input
/// carrying `value="<email>"`.
fn extract_user_id(body: &str, email: &str) -> Option<i32> {
    let email_pos = body.find(&format!("value=\"{email}\""))?;
    let head = body.get(..email_pos)?;
    let marker = "name=\"id\" value=\"";
    let id_start = head.rfind(marker)? + marker.len();
    let tail = body.get(id_start..)?;
    let id_end = tail.find('"')?;
    tail.get(..id_end)?.parse().ok()
}

// ============================================================================
// Duplicate Email Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_duplicate_email_rejected_on_add() {
    let client = authenticated_client().await;
    let email = unique_email("dup-add");

    post_action(
        &client,
        &[
            ("action", "add"),
            ("name", "First Copy"),
            ("email", &email),
            ("password", "password-one"),
            ("role", "user"),
        ],
    )
    .await;
    let body = users_page(&client).await;
    assert!(body.contains("User added successfully"));

    // Second add with the same email must be rejected
    post_action(
        &client,
        &[
            ("action", "add"),
            ("name", "Second Copy"),
            ("email", &email),
            ("password", "password-two"),
            ("role", "user"),
        ],
    )
    .await;
    let body = users_page(&client).await;
    assert!(body.contains("Email address already exists"));
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_duplicate_email_rejected_on_edit() {
    let client = authenticated_client().await;
    let first_email = unique_email("dup-edit-a");
    let second_email = unique_email("dup-edit-b");

    for (name, email) in [("Holder", &first_email), ("Editee", &second_email)] {
        post_action(
            &client,
            &[
                ("action", "add"),
                ("name", name),
                ("email", email),
                ("password", "password-one"),
                ("role", "user"),
            ],
        )
        .await;
    }

    let body = users_page(&client).await;
    let second_id = extract_user_id(&body, &second_email)
        .expect("created user should appear on the page")
        .to_string();

    // Editing the second user onto the first user's email must be rejected
    post_action(
        &client,
        &[
            ("action", "edit"),
            ("id", &second_id),
            ("name", "Editee"),
            ("email", &first_email),
            ("role", "user"),
        ],
    )
    .await;
    let body = users_page(&client).await;
    assert!(body.contains("Email address already exists"));

    // Editing without changing the email is fine (self-exclusion)
    post_action(
        &client,
        &[
            ("action", "edit"),
            ("id", &second_id),
            ("name", "Editee Renamed"),
            ("email", &second_email),
            ("role", "user"),
        ],
    )
    .await;
    let body = users_page(&client).await;
    assert!(body.contains("User updated successfully"));
}

// ============================================================================
// Last Admin Guard
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and a freshly seeded database (exactly one admin)"]
async fn test_last_admin_cannot_be_deleted() {
    let client = authenticated_client().await;
    let (admin_email, _) = admin_credentials();

    let body = users_page(&client).await;
    let admin_id = extract_user_id(&body, &admin_email)
        .expect("seeded admin should appear on the page")
        .to_string();

    post_action(&client, &[("action", "delete"), ("id", &admin_id)]).await;
    let body = users_page(&client).await;
    assert!(body.contains("Cannot delete the last admin user"));

    // With a second admin present, deleting one succeeds
    let second_admin = unique_email("second-admin");
    post_action(
        &client,
        &[
            ("action", "add"),
            ("name", "Backup Admin"),
            ("email", &second_admin),
            ("password", "backup-admin-pass"),
            ("role", "admin"),
        ],
    )
    .await;
    let body = users_page(&client).await;
    let second_id = extract_user_id(&body, &second_admin)
        .expect("second admin should appear on the page")
        .to_string();

    post_action(&client, &[("action", "delete"), ("id", &second_id)]).await;
    let body = users_page(&client).await;
    assert!(body.contains("User deleted successfully"));
}

// ============================================================================
// Password Rehash Semantics
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_password_rehashed_only_when_supplied() {
    let client = authenticated_client().await;
    let email = unique_email("rehash");
    let original_password = "original-password";
    let new_password = "rotated-password";

    // Create an admin account we can log in as
    post_action(
        &client,
        &[
            ("action", "add"),
            ("name", "Rehash Target"),
            ("email", &email),
            ("password", original_password),
            ("role", "admin"),
        ],
    )
    .await;
    let body = users_page(&client).await;
    let id = extract_user_id(&body, &email)
        .expect("created admin should appear on the page")
        .to_string();

    // Edit with a blank password: the stored hash must be untouched
    post_action(
        &client,
        &[
            ("action", "edit"),
            ("id", &id),
            ("name", "Rehash Target"),
            ("email", &email),
            ("password", ""),
            ("role", "admin"),
        ],
    )
    .await;

    let probe = new_client();
    login(&probe, &email, original_password).await;

    // Edit with a new password: the old one stops working
    post_action(
        &client,
        &[
            ("action", "edit"),
            ("id", &id),
            ("name", "Rehash Target"),
            ("email", &email),
            ("password", new_password),
            ("role", "admin"),
        ],
    )
    .await;

    let probe = new_client();
    let base_url = admin_base_url();
    let resp = probe
        .post(format!("{base_url}/login"))
        .form(&[("email", email.as_str()), ("password", original_password)])
        .send()
        .await
        .expect("Failed to post login form");
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        location.starts_with("/login?error="),
        "old password should be rejected after rotation, got {location}"
    );

    let probe = new_client();
    login(&probe, &email, new_password).await;

    // Cleanup
    post_action(&client, &[("action", "delete"), ("id", &id)]).await;
}

// ============================================================================
// Redirect & Flash Lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_successful_add_redirects_and_clears_flash() {
    let client = authenticated_client().await;
    let email = unique_email("flash");

    let location = post_action(
        &client,
        &[
            ("action", "add"),
            ("name", "Flash Check"),
            ("email", &email),
            ("password", "password-one"),
            ("role", "user"),
        ],
    )
    .await;
    assert_eq!(location, "/users", "POST must redirect back to the page");

    // First render shows the flash...
    let body = users_page(&client).await;
    assert!(body.contains("User added successfully"));

    // ...and a reload renders clean
    let body = users_page(&client).await;
    assert!(!body.contains("User added successfully"));
    assert!(body.contains(&email), "created user remains in the table");
}
