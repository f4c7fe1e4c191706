//! Provider-facing half of the argus pipeline.
//!
//! Turns an [`AnalysisRequest`] into a provider-ready [`RequestDescriptor`],
//! executes it through the [`Transport`] seam, and recovers a findings array
//! from whatever text the provider sent back — clean JSON, fenced JSON,
//! JSON buried in prose, or JSON cut off mid-token.

mod decode;
pub mod error;
mod extract;
mod payload;
mod prompt;
mod request;
pub mod scan;
mod transport;

pub use crate::decode::decode_content;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::extract::Extraction;
pub use crate::extract::extract_findings;
pub use crate::prompt::TRUNCATION_MARKER;
pub use crate::prompt::truncate_source;
pub use crate::request::AnalysisRequest;
pub use crate::request::RequestDescriptor;
pub use crate::request::build_request;
pub use crate::transport::HttpTransport;
pub use crate::transport::Transport;
pub use crate::transport::TransportResponse;
