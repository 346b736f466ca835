//! Collaborator capability traits
//!
//! The pipeline depends on these seams rather than on concrete services:
//! reference upload and the account credit store live outside this crate.

pub mod credit;
pub mod uploader;

pub use credit::{CreditBalance, CreditService};
pub use uploader::ReferenceUploader;
