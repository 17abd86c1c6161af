//! Shared primitives for droidbuild tools
//!
//! This crate provides the functionality shared by the descriptor-facing
//! crates:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery
//!   suggestions
//! - **Validation**: A fluent builder collecting hard errors and advisory
//!   warnings over descriptor fields

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};
pub use validation::{ValidationError, ValidationResult, Validator};
