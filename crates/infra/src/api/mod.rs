//! Authenticated resource API access
//!
//! # Architecture
//!
//! - [`RequestPipeline`] turns an `Operation` into one HTTP call (two when
//!   the first is rejected with 401)
//! - Tokens come from the shared `TokenCache`
//! - Every attempt is handed to the `AuditRecorder`, success or failure
//! - Outcomes are classified into [`ApiError`] categories

pub mod errors;
pub mod pipeline;

pub use errors::{ApiError, ApiErrorCategory};
pub use pipeline::{ApiResponse, RequestPipeline};
