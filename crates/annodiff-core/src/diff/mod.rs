//! Dataset diff engine.
//!
//! Compares an original and an exported annotation dataset and produces a
//! structured, deterministic change report.
//!
//! ## Entry point
//!
//! ```ignore
//! use annodiff_core::diff::{Comparator, render_human_summary, RenderOptions};
//!
//! let report = Comparator::default().compare_files(original, exported)?;
//! annodiff_core::diff::serialize(&report, std::io::stdout())?;
//! let summary = render_human_summary(&report, &RenderOptions::default());
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: two runs over the same inputs differ only in
//!   `comparison_timestamp`.
//! - **Original-side coverage**: under the default coverage every entry in
//!   `changes_by_record` names a record of the original dataset.
//! - **Empty-value reclassification**: a PII whose keyword goes from empty
//!   to filled is reported as added, never as modified.

pub mod engine;
pub mod human_summary;
pub mod metadata;
pub mod model;
pub mod pii;
pub mod sequence;
pub mod subjects;
pub mod text;
pub mod values;

pub use engine::{compare, deserialize, serialize, to_json_string, Comparator};
pub use human_summary::{render_human_summary, RenderOptions};
pub use model::Report;
pub use text::diff_text;
