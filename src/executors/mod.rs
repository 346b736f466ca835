//! Executors Layer
//!
//! Remote orchestration that wires transformers with provider endpoints:
//! job submission, status polling and credit checks.

pub mod credit;
pub mod polling;
pub mod submission;

#[cfg(test)]
pub(crate) mod test_support;

pub use credit::{HttpCreditService, check_balances};
pub use polling::JobPoller;
pub use submission::JobSubmitter;
