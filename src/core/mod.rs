//! Core types for the feature builder
//!
//! This module holds the error types shared by every other module:
//!
//! - [`BuilderError`] - Enumerated failures raised by the builder itself
//! - [`ErrorContext`] - User-friendly wrapper with details and suggestions
//! - [`user_friendly_error`] - Convert any error into an [`ErrorContext`]

pub mod error;

pub use error::{BuilderError, ErrorContext, user_friendly_error};
