//! Integration tests for Sunset Bazaar.
//!
//! The actual tests live in `tests/`. They drive a running admin server
//! over HTTP and are `#[ignore]`d by default; see `tests/admin_users.rs`
//! for the required setup.
