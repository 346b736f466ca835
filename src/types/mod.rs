//! Core data types
//!
//! - `credential` - session credential wrapper
//! - `request` - caller-facing generation request and reference image source
//! - `geometry` - aspect codes, resolution tiers and resolved output geometry
//! - `job` - job handle, evolving job status and result items

pub mod credential;
pub mod geometry;
pub mod job;
pub mod request;

pub use credential::Credential;
pub use geometry::{AspectRatio, ResolutionTier, ResolvedGeometry};
pub use job::{JobHandle, JobPhase, JobStatus, ResultItem, status};
pub use request::{GenerationRequest, GenerationRequestBuilder, ReferenceImage, UploadedImage};
