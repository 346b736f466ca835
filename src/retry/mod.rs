//! Retry module
//! - fallback.rs: credit-aware resolution tier downgrade

pub mod fallback;

pub use fallback::*;
