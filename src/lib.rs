//! # Dreamgen - Async Image Generation Orchestration
//!
//! Dreamgen submits image-generation jobs to a remote generation service,
//! polls them to completion and retries at a lower resolution tier when the
//! account cannot pay for the requested one.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Typed Drafts**: text-to-image and reference-blend jobs are distinct variants of one ability type.
//! - **Bounded Polling**: fixed interval, fixed attempt budget, strict request/response ordering.
//! - **Credit Fallback**: insufficient-credit failures re-run the whole pipeline one tier lower.
//! - **Structured Failures**: content filtering, timeouts and balance problems are classified as data.
//! - **Injectable Collaborators**: transport, uploader, credit service, identifiers, seeds and clock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dreamgen::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DreamgenClient::builder().build()?;
//!
//!     let request = GenerationRequest::builder("a lighthouse at dusk, 16:9", Credential::new("session-token"))
//!         .model("jimeng-4.0")
//!         .build()?;
//!
//!     for url in client.generate_image_urls(&request).await?.into_iter().flatten() {
//!         println!("{url}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod executors;
pub mod model_constants;
pub mod params;
pub mod retry;
pub mod telemetry;
pub mod traits;
pub mod transformers;
pub mod transport;
pub mod types;
pub mod utils;

pub use builder::DreamgenBuilder;
pub use client::DreamgenClient;
pub use error::{FailureClass, GenError};

/// Commonly used types
pub mod prelude {
    pub use crate::builder::DreamgenBuilder;
    pub use crate::client::DreamgenClient;
    pub use crate::config::{ClientConfig, PollConfig};
    pub use crate::error::{FailureClass, GenError};
    pub use crate::traits::{CreditBalance, CreditService, ReferenceUploader};
    pub use crate::transport::{HttpTransport, RequestOptions, Transport};
    pub use crate::types::{
        AspectRatio, Credential, GenerationRequest, ReferenceImage, ResolutionTier, ResultItem,
        UploadedImage,
    };
}
