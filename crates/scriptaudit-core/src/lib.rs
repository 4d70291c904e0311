//! scriptaudit-core — rubric, evaluation session, aggregation, persistence
//! and export.
//!
//! This crate holds everything about a sales-call script audit except how it
//! is displayed: the fixed rubric, the session an auditor fills in, the store
//! that mutates it, the derived summary, draft persistence and the export
//! document.

pub mod config;
pub mod error;
pub mod export;
pub mod persistence;
pub mod rubric;
pub mod session;
pub mod store;
pub mod summary;

pub use error::{SessionError, ShapeError};
pub use export::ExportDocument;
pub use persistence::{FileStorage, KeyValueStorage, LoadOutcome, MemoryStorage, Persistence};
pub use rubric::{Rubric, StageDefinition};
pub use session::{EvaluationSession, StageEvaluation};
pub use store::EvaluationStore;
pub use summary::{StageProgress, Summary};
