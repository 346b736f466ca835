//! Error Handling Module
//!
//! This module provides the error taxonomy for the generation pipeline:
//! - Core error type (`GenError`) and its structured classification (`FailureClass`)
//! - Type conversions from common error types
//! - A last-resort message matcher for balance failures that arrive unclassified
//!
//! # Example
//!
//! ```rust,ignore
//! use dreamgen::error::{FailureClass, GenError};
//!
//! let error = GenError::ContentFiltered { fail_code: "2038".into() };
//! assert_eq!(error.failure_class(), FailureClass::ContentFiltered);
//! ```

pub mod compat;
mod conversions;
pub mod types;

pub use types::*;
