//! annodiff core - comparison engine for annotated-text datasets
//!
//! This crate provides:
//! - The JSONL record model and loader
//! - Text, metadata, subject and PII comparators
//! - The report aggregator and its JSON / Markdown output
//! - Change-type classifiers over finished reports
//! - The error facility, logging facility and `annodiff.toml` configuration

pub mod config;
pub mod diff;
pub mod errors;
pub mod loader;
pub mod logging_facility;
pub mod model;
pub mod postprocess;

pub use annodiff_core_types as core_types;

// Re-export commonly used types
pub use config::{AnnodiffConfig, CompareOptions, RecordCoverage};
pub use diff::{compare, serialize, Comparator, Report};
pub use errors::{AnnoError, AnnoErrorKind, AnnodiffError, Result};
pub use model::{Pii, Record, Subject, SubjectId};
pub use postprocess::{summarize_change_types, ChangeClassifier, ChangeTypeSummary};
