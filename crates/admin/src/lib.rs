//! Sunset Bazaar Admin library.
//!
//! This crate provides the admin panel functionality as a library,
//! allowing it to be tested and reused from the CLI.
//!
//! # Security
//!
//! This crate manages store user accounts, including password hashes and
//! role assignment. Only deploy on VPN-protected infrastructure.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
