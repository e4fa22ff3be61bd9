//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (in main.rs)
//! GET  /health/ready           - Readiness check (in main.rs)
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Verify email + password
//! POST /logout                 - Logout
//!
//! # Users
//! GET  /                       - Redirect to /users
//! GET  /users                  - User table + add/edit modals + flash
//! POST /users                  - Action dispatch: add | edit | delete
//! ```

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

pub mod auth;
pub mod users;

/// Build the admin panel router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/users", get(users::index).post(users::submit))
}

/// The panel has a single page; the root just forwards to it.
async fn root() -> Redirect {
    Redirect::to("/users")
}
