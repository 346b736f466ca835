//! Transformers layer
//!
//! Converts between caller-facing types and provider payloads.
//! - `draft` - typed draft envelope and ability graph
//! - `request` - builds job envelopes from generation requests
//! - `response` - extracts job handles and job records

pub mod draft;
pub mod request;
pub mod response;

pub use draft::{Ability, JobEnvelope};
pub use request::JobRequestBuilder;
pub use response::{HistoryRecord, extract_history_record, extract_job_handle};
