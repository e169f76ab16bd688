//! Common utilities shared by the account service crates.
//!
//! This crate provides:
//! - Unified error handling with stable error kinds
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
