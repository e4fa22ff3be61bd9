//! User management route handlers.
//!
//! One page: a table of store user accounts with add/edit modals. Mutations
//! arrive as a single POST carrying an `action` field (`add`, `edit`,
//! `delete`); every branch leaves a flash message in the session and
//! redirects back to the page (POST-redirect-GET).

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sunset_bazaar_core::{Role, UserId};

use crate::{
    db::UserRepository,
    error::AppError,
    filters,
    middleware::auth::RequireAdminAuth,
    models::session::{Flash, flash_error, flash_success, take_flash},
    models::user::User,
    services::{UserError, UserService},
    state::AppState,
};

// =============================================================================
// View Types
// =============================================================================

/// User row view for the table and its edit modal.
#[derive(Debug, Clone)]
pub struct UserListItem {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Form value for the role select (`user` / `admin` / `seller`).
    pub role_value: String,
    /// Badge text for the table (`User` / `Admin` / `Seller`).
    pub role_label: String,
    pub is_admin: bool,
    pub is_seller: bool,
    /// Creation date preformatted for the table, e.g. "Mar 04, 2026".
    pub created_display: String,
    /// Whether the delete button is shown: admins are not deletable once
    /// they are the last one left.
    pub deletable: bool,
}

impl UserListItem {
    fn from_user(user: &User, admin_count: i64) -> Self {
        let is_admin = user.role == Role::Admin;
        Self {
            id: user.id.as_i32(),
            name: user.name.clone(),
            email: user.email.to_string(),
            role_value: user.role.to_string(),
            role_label: user.role.label().to_string(),
            is_admin,
            is_seller: user.is_seller,
            created_display: user.created_at.format("%b %d, %Y").to_string(),
            deletable: !is_admin || admin_count > 1,
        }
    }
}

/// Users page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub admin_name: String,
    pub flash: Flash,
    pub users: Vec<UserListItem>,
}

// =============================================================================
// Form Types
// =============================================================================

/// The single action-dispatch form posted by the page.
///
/// Every field except `action` is optional because the three branches post
/// different subsets; each branch validates what it needs. A missing
/// checkbox means unchecked.
#[derive(Debug, Deserialize)]
pub struct UserActionForm {
    pub action: String,
    pub id: Option<i32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub is_seller: Option<String>,
}

/// The three mutation branches of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserOp {
    Add,
    Edit,
    Delete,
}

impl UserOp {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Self::Add),
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    const fn success_flash(self) -> &'static str {
        match self {
            Self::Add => "User added successfully",
            Self::Edit => "User updated successfully",
            Self::Delete => "User deleted successfully",
        }
    }

    const fn failure_flash(self) -> &'static str {
        match self {
            Self::Add => "Error adding user",
            Self::Edit => "Error updating user",
            Self::Delete => "Error deleting user",
        }
    }
}

/// Flatten a typed error into the page's flash string.
fn error_flash(op: UserOp, err: &UserError) -> String {
    match err {
        UserError::DuplicateEmail => "Email address already exists".to_string(),
        UserError::LastAdmin => "Cannot delete the last admin user".to_string(),
        UserError::EmptyName => "Name cannot be empty".to_string(),
        UserError::InvalidEmail(e) => format!("Invalid email address: {e}"),
        UserError::WeakPassword(msg) => msg.clone(),
        _ => op.failure_flash().to_string(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Users page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let repo = UserRepository::new(state.pool());

    let users = repo.list_all().await?;
    let admin_count = repo.count_admins().await?;
    let flash = take_flash(&session).await;

    let template = UsersIndexTemplate {
        admin_name: admin.name,
        flash,
        users: users
            .iter()
            .map(|u| UserListItem::from_user(u, admin_count))
            .collect(),
    };

    Ok(Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {e}");
        "Internal Server Error".to_string()
    })))
}

/// Action dispatch handler: add / edit / delete, then redirect to the page.
#[instrument(skip(_admin, state, session, form), fields(action = %form.action))]
pub async fn submit(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserActionForm>,
) -> Redirect {
    let Some(op) = UserOp::parse(&form.action) else {
        tracing::warn!("unknown user action");
        return Redirect::to("/users");
    };

    let service = UserService::new(state.pool());

    match apply(&service, op, &form).await {
        Ok(()) => {
            if let Err(e) = flash_success(&session, op.success_flash()).await {
                tracing::error!("Failed to set flash: {e}");
            }
        }
        Err(message) => {
            if let Err(e) = flash_error(&session, &message).await {
                tracing::error!("Failed to set flash: {e}");
            }
        }
    }

    Redirect::to("/users")
}

/// Run one branch; returns the error flash string on failure.
async fn apply(
    service: &UserService<'_>,
    op: UserOp,
    form: &UserActionForm,
) -> Result<(), String> {
    match op {
        UserOp::Add => {
            let role = parse_role(form).ok_or_else(|| op.failure_flash().to_string())?;
            service
                .create_user(
                    form.name.as_deref().unwrap_or_default(),
                    form.email.as_deref().unwrap_or_default(),
                    form.password.as_deref().unwrap_or_default(),
                    role,
                    form.is_seller.is_some(),
                )
                .await
                .map(drop)
                .map_err(|e| error_flash(op, &e))
        }
        UserOp::Edit => {
            let id = form_id(form).ok_or_else(|| op.failure_flash().to_string())?;
            let role = parse_role(form).ok_or_else(|| op.failure_flash().to_string())?;
            service
                .update_user(
                    id,
                    form.name.as_deref().unwrap_or_default(),
                    form.email.as_deref().unwrap_or_default(),
                    form.password.as_deref(),
                    role,
                    form.is_seller.is_some(),
                )
                .await
                .map(drop)
                .map_err(|e| error_flash(op, &e))
        }
        UserOp::Delete => {
            let id = form_id(form).ok_or_else(|| op.failure_flash().to_string())?;
            service.delete_user(id).await.map_err(|e| error_flash(op, &e))
        }
    }
}

fn form_id(form: &UserActionForm) -> Option<UserId> {
    form.id.map(UserId::new)
}

fn parse_role(form: &UserActionForm) -> Option<Role> {
    form.role.as_deref()?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_op_parse() {
        assert_eq!(UserOp::parse("add"), Some(UserOp::Add));
        assert_eq!(UserOp::parse("edit"), Some(UserOp::Edit));
        assert_eq!(UserOp::parse("delete"), Some(UserOp::Delete));
        assert_eq!(UserOp::parse("drop"), None);
        assert_eq!(UserOp::parse(""), None);
    }

    #[test]
    fn test_success_flash_strings() {
        assert_eq!(UserOp::Add.success_flash(), "User added successfully");
        assert_eq!(UserOp::Edit.success_flash(), "User updated successfully");
        assert_eq!(UserOp::Delete.success_flash(), "User deleted successfully");
    }

    #[test]
    fn test_error_flash_duplicate_email() {
        let msg = error_flash(UserOp::Add, &UserError::DuplicateEmail);
        assert_eq!(msg, "Email address already exists");
        // Same message on edit
        let msg = error_flash(UserOp::Edit, &UserError::DuplicateEmail);
        assert_eq!(msg, "Email address already exists");
    }

    #[test]
    fn test_error_flash_last_admin() {
        let msg = error_flash(UserOp::Delete, &UserError::LastAdmin);
        assert_eq!(msg, "Cannot delete the last admin user");
    }

    #[test]
    fn test_error_flash_falls_back_per_operation() {
        assert_eq!(
            error_flash(UserOp::Add, &UserError::UserNotFound),
            "Error adding user"
        );
        assert_eq!(
            error_flash(UserOp::Edit, &UserError::UserNotFound),
            "Error updating user"
        );
        assert_eq!(
            error_flash(UserOp::Delete, &UserError::UserNotFound),
            "Error deleting user"
        );
    }

    #[test]
    fn test_deletable_flags() {
        use chrono::Utc;
        use sunset_bazaar_core::Email;

        let user = User {
            id: UserId::new(1),
            name: "Solo Admin".to_string(),
            email: Email::parse("solo@example.com").unwrap(),
            role: Role::Admin,
            is_seller: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // The last admin's row hides the delete button
        assert!(!UserListItem::from_user(&user, 1).deletable);
        // With a second admin around it reappears
        assert!(UserListItem::from_user(&user, 2).deletable);

        let shopper = User {
            role: Role::User,
            ..user
        };
        assert!(UserListItem::from_user(&shopper, 1).deletable);
    }
}
