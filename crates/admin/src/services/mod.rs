//! Business services for the admin panel.

pub mod users;

pub use users::{UserError, UserService};
