//! Change report types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Keyed collections use `BTreeMap` so serialized reports are deterministic.
//! Field names are the report's wire format; consumers key on them.

use crate::config::RecordCoverage;
use crate::model::{Pii, SubjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The full comparison output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    /// Per-record changes keyed by `data_id`; only records with a difference appear
    pub changes_by_record: BTreeMap<String, RecordChanges>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    pub comparison_timestamp: DateTime<Utc>,
    /// Base name of the original dataset
    pub original_file: String,
    /// Base name of the exported dataset
    pub exported_file: String,
    /// Number of records in the original dataset (duplicates included)
    pub total_records: usize,
    pub records_with_changes: usize,
    pub ignored_fields: Vec<String>,
    #[serde(default)]
    pub record_coverage: RecordCoverage,
}

/// Dataset-wide counters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    /// Metadata keys present in original but absent from exported
    pub missing_metadata_fields: usize,
    /// Records whose subject list length changed
    pub subject_count_changes: usize,
    /// Subject entries carrying at least one PII change
    pub pii_annotation_changes: usize,
    /// Matched records whose text is identical
    pub identical_text_content: usize,
    /// Subject entries carrying a description change (added and missing subjects included)
    pub description_changes: usize,
    /// Matched records whose text differs
    pub text_changes: usize,
    /// Original ids absent from exported (union coverage only)
    #[serde(default)]
    pub data_ids_removed: usize,
    /// Exported ids absent from original (union coverage only)
    #[serde(default)]
    pub data_ids_added: usize,
}

/// Everything that changed for one `data_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordChanges {
    /// Set only for ids present on one side, under union coverage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_status: Option<RecordStatus>,
    pub metadata_changes: BTreeMap<String, MetadataChange>,
    pub subject_count_change: Option<SubjectCountChange>,
    pub text_identical: bool,
    pub text_changes: Option<TextDiff>,
    pub subject_changes: Vec<SubjectChange>,
}

impl RecordChanges {
    /// True if any comparator produced output for this record
    pub fn has_changes(&self) -> bool {
        self.record_status.is_some()
            || !self.metadata_changes.is_empty()
            || self.subject_count_change.is_some()
            || self.text_changes.is_some()
            || !self.subject_changes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    MissingInExported,
    AddedInExported,
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Result of comparing two texts
///
/// Identical texts serialize as `{"identical": true}` with no details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextDiff {
    pub identical: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub details: Option<TextDiffDetails>,
}

impl TextDiff {
    pub fn identical() -> Self {
        Self {
            identical: true,
            details: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextDiffDetails {
    /// Length in Unicode scalar values
    pub original_length: usize,
    pub exported_length: usize,
    pub length_difference: i64,
    pub line_differences: Vec<LineDifference>,
    pub character_changes: Vec<CharacterChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineDifference {
    #[serde(rename = "type")]
    pub kind: LineChangeKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineChangeKind {
    Removed,
    Added,
}

/// One non-equal span of the character alignment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterChange {
    #[serde(rename = "type")]
    pub kind: CharChangeKind,
    pub original_text: String,
    pub exported_text: String,
    /// Start offset in the original, in Unicode scalar values
    pub original_position: usize,
    /// Start offset in the exported text, in Unicode scalar values
    pub exported_position: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CharChangeKind {
    Replace,
    Delete,
    Insert,
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetadataChange {
    /// Key present in original only
    Missing { original_value: Value },
    /// Key present in exported only
    Added { new_value: Value },
    /// Key present in both with different values
    Modified {
        original_value: Value,
        new_value: Value,
    },
}

impl MetadataChange {
    pub fn is_missing(&self) -> bool {
        matches!(self, MetadataChange::Missing { .. })
    }
}

// ---------------------------------------------------------------------------
// Subjects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectCountChange {
    pub original: usize,
    pub exported: usize,
    pub difference: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectChange {
    pub subject_id: SubjectId,
    pub changes: SubjectChangeDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubjectChangeDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<DescriptionChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pii_changes: Option<BTreeMap<String, PiiChange>>,
}

impl SubjectChangeDetail {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.description.is_none() && self.pii_changes.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubjectStatus {
    AddedInExported,
    MissingInExported,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescriptionChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<String>,
    pub change_type: DescriptionChangeType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionChangeType {
    Added,
    Removed,
    Modified,
}

// ---------------------------------------------------------------------------
// PII
// ---------------------------------------------------------------------------

/// Change to one PII tag of a matched subject
///
/// `Added`/`Removed` carry both records when the tag exists on both sides
/// and was reclassified by the empty-keyword rule; otherwise only the side
/// that has it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PiiChange {
    Added {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original_value: Option<Pii>,
        exported_value: Pii,
    },
    Removed {
        original_value: Pii,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        exported_value: Option<Pii>,
    },
    Modified {
        field_changes: BTreeMap<String, FieldChange>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub original: Value,
    pub exported: Value,
}
