//! Authentication route handlers.
//!
//! Email + password login for the admin panel. Only accounts holding the
//! admin role may enter.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::{UserError, UserService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Map a login error code from the redirect query into display text.
fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password",
        "forbidden" => "This account does not have admin access",
        "session" => "Could not start a session, please try again",
        _ => "Login failed",
    }
}

/// Display the login page.
///
/// An already-authenticated browser is sent straight to the panel.
pub async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/users").into_response();
    }

    LoginTemplate {
        error: query.error.as_deref().map(|code| error_message(code).to_string()),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = UserService::new(state.pool());

    match service.login(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentAdmin {
                id: user.id,
                email: user.email.clone(),
                name: user.name.clone(),
                role: user.role,
            };

            if let Err(e) = set_current_admin(&session, &current).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/login?error=session").into_response();
            }

            tracing::info!(user_id = %user.id, "admin logged in");
            Redirect::to("/users").into_response()
        }
        Err(UserError::NotAnAdmin) => {
            tracing::warn!("Login rejected: account is not an admin");
            Redirect::to("/login?error=forbidden").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Redirect::to("/login?error=credentials").into_response()
        }
    }
}

/// Handle logout.
///
/// Clears the admin identity and destroys the session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/login").into_response()
}
