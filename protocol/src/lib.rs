//! Shared data types for the argus analysis pipeline.
//!
//! Everything that crosses a crate boundary lives here: the canonical
//! [`Finding`] record produced by validation, the severity scale with its
//! risk weights, and the per-file/per-project result and history shapes.

mod finding;
mod records;

pub use crate::finding::Finding;
pub use crate::finding::Severity;
pub use crate::records::ActivityKind;
pub use crate::records::ActivityRecord;
pub use crate::records::FileAnalysisResult;
pub use crate::records::ProjectHistoryRecord;
pub use crate::records::ProjectType;
pub use crate::records::SourceFile;
