//! Analysis core: validation, risk scoring, and orchestration.
//!
//! The crates below this one know nothing about batches or scores;
//! `argus-core` ties request building, transport, and extraction into the
//! per-file pipeline and the sequential batch loop with its hard-stop
//! semantics for credential errors.

mod config;
mod orchestrator;
mod score;
mod sinks;
mod validate;

pub use crate::config::AnalysisConfig;
pub use crate::orchestrator::BatchReport;
pub use crate::orchestrator::Orchestrator;
pub use crate::score::folder_risk_score;
pub use crate::score::project_average;
pub use crate::score::risk_score;
pub use crate::sinks::ActivitySink;
pub use crate::sinks::HistorySink;
pub use crate::validate::Validated;
pub use crate::validate::validate_findings;
