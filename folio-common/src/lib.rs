//! # Folio Common Library
//!
//! Shared code for the folio portfolio services:
//! - Error and result types
//! - Layered configuration loading (defaults, TOML, environment)
//! - Database initialization and schema

pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
