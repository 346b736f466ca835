//! Parameter Resolution Module
//!
//! Turns caller hints and free-text prompts into concrete provider parameters.
//! - `aspect` - ratio detection, tier selection and the fixed dimension tables

pub mod aspect;

pub use aspect::{detect_ratio, dimensions, resolve, select_tier};
