//! # tramita-core
//!
//! Core crate for Tramita, an immigration case-tracking backend. Contains
//! the store and file-storage traits, configuration schemas, typed
//! identifiers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Tramita crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
