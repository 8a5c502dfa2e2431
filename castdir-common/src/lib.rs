//! # castdir Common Library
//!
//! Shared code for the castdir service:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Database initialization
//! - Timestamp formatting helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
