//! Report aggregator.
//!
//! [`Comparator`] pairs the records of two datasets by `data_id`, runs the
//! text, metadata and subject comparators on each pair, and folds their
//! output into a [`Report`].

use crate::config::{CompareOptions, RecordCoverage};
use crate::core_types::RunId;
use crate::diff::metadata::compare_metadata;
use crate::diff::model::{RecordChanges, RecordStatus, Report, ReportMetadata, ReportSummary};
use crate::diff::subjects::compare_subjects;
use crate::diff::text::diff_text;
use crate::errors::{AnnodiffError, Result};
use crate::loader::{display_name, load_records, load_records_from_path};
use crate::model::Record;
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Read, Write};
use std::path::Path;
use std::time::Instant;

/// Compares datasets under one set of options
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    options: CompareOptions,
}

/// Records keyed by id, remembering first-occurrence order
///
/// A repeated id keeps its first position but takes the later record.
struct Lookup<'a> {
    order: Vec<&'a str>,
    by_id: HashMap<&'a str, &'a Record>,
}

impl<'a> Lookup<'a> {
    fn build(records: &'a [Record], source: &str) -> Self {
        let mut order = Vec::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            let id = record.data_id();
            if by_id.insert(id, record).is_some() {
                tracing::debug!(
                    data_id = id,
                    source,
                    "duplicate data_id, keeping last occurrence"
                );
            } else {
                order.push(id);
            }
        }
        Self { order, by_id }
    }

    fn get(&self, id: &str) -> Option<&'a Record> {
        self.by_id.get(id).copied()
    }

    fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare one matched pair of records
    ///
    /// The returned entry may be empty; check [`RecordChanges::has_changes`].
    pub fn compare_record_pair(&self, original: &Record, exported: &Record) -> RecordChanges {
        let text_identical = original.text == exported.text;
        let text_changes = if text_identical {
            None
        } else {
            Some(diff_text(&original.text, &exported.text))
        };

        let metadata_changes = compare_metadata(
            original.metadata.fields(),
            exported.metadata.fields(),
            &self.options,
        );
        let (subject_count_change, subject_changes) =
            compare_subjects(&original.subjects, &exported.subjects);

        RecordChanges {
            record_status: None,
            metadata_changes,
            subject_count_change,
            text_identical,
            text_changes,
            subject_changes,
        }
    }

    /// Compare two loaded datasets
    ///
    /// `original_name` and `exported_name` are copied into the report
    /// metadata. Comparison itself cannot fail.
    pub fn compare_records(
        &self,
        original: &[Record],
        exported: &[Record],
        original_name: &str,
        exported_name: &str,
    ) -> Report {
        let run_id = RunId::new();
        let span = tracing::info_span!("compare", run_id = %run_id);
        let _guard = span.enter();

        log_op_start!(
            "compare",
            original = original_name,
            exported = exported_name,
            coverage = self.options.record_coverage.as_str()
        );
        let start = Instant::now();

        let orig_lookup = Lookup::build(original, original_name);
        let exp_lookup = Lookup::build(exported, exported_name);

        let mut summary = ReportSummary::default();
        let mut changes_by_record = BTreeMap::new();

        for &id in &orig_lookup.order {
            let (Some(orig), Some(exp)) = (orig_lookup.get(id), exp_lookup.get(id)) else {
                continue;
            };

            let changes = self.compare_record_pair(orig, exp);
            tally(&mut summary, &changes);

            if changes.has_changes() {
                tracing::debug!(data_id = id, "record changed");
                changes_by_record.insert(id.to_string(), changes);
            }
        }

        if self.options.record_coverage == RecordCoverage::Union {
            for &id in &orig_lookup.order {
                if !exp_lookup.contains(id) {
                    summary.data_ids_removed += 1;
                    changes_by_record.insert(
                        id.to_string(),
                        unmatched(RecordStatus::MissingInExported),
                    );
                }
            }
            for &id in &exp_lookup.order {
                if !orig_lookup.contains(id) {
                    summary.data_ids_added += 1;
                    changes_by_record
                        .insert(id.to_string(), unmatched(RecordStatus::AddedInExported));
                }
            }
        }

        let report = Report {
            metadata: ReportMetadata {
                comparison_timestamp: Utc::now(),
                original_file: original_name.to_string(),
                exported_file: exported_name.to_string(),
                total_records: original.len(),
                records_with_changes: changes_by_record.len(),
                ignored_fields: self.options.ignored_fields.clone(),
                record_coverage: self.options.record_coverage,
            },
            summary,
            changes_by_record,
        };

        log_op_end!(
            "compare",
            duration_ms = start.elapsed().as_millis() as u64,
            record_count = report.metadata.total_records,
            changed_count = report.metadata.records_with_changes
        );
        report
    }

    /// Load both datasets from readers and compare them
    ///
    /// # Errors
    ///
    /// Any loader error for either source; no partial report is produced.
    pub fn compare_readers<A: BufRead, B: BufRead>(
        &self,
        original: A,
        original_name: &str,
        exported: B,
        exported_name: &str,
    ) -> Result<Report> {
        let original = load_records(original, original_name)?;
        let exported = load_records(exported, exported_name)?;
        Ok(self.compare_records(&original, &exported, original_name, exported_name))
    }

    /// Load both datasets from files and compare them
    ///
    /// The report records the base names of the two paths.
    ///
    /// # Errors
    ///
    /// - `Io`: either file cannot be opened or read
    /// - `Parse` / `MissingField`: a line of either file is malformed
    pub fn compare_files(&self, original: &Path, exported: &Path) -> Result<Report> {
        let start = Instant::now();
        let loaded = load_records_from_path(original)
            .and_then(|o| load_records_from_path(exported).map(|e| (o, e)));

        match loaded {
            Ok((orig, exp)) => Ok(self.compare_records(
                &orig,
                &exp,
                &display_name(original),
                &display_name(exported),
            )),
            Err(e) => {
                log_op_error!(
                    "compare",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }
}

fn tally(summary: &mut ReportSummary, changes: &RecordChanges) {
    if changes.text_identical {
        summary.identical_text_content += 1;
    } else {
        summary.text_changes += 1;
    }
    summary.missing_metadata_fields += changes
        .metadata_changes
        .values()
        .filter(|c| c.is_missing())
        .count();
    if changes.subject_count_change.is_some() {
        summary.subject_count_changes += 1;
    }
    for subject in &changes.subject_changes {
        if subject.changes.description.is_some() {
            summary.description_changes += 1;
        }
        if subject.changes.pii_changes.is_some() {
            summary.pii_annotation_changes += 1;
        }
    }
}

fn unmatched(status: RecordStatus) -> RecordChanges {
    RecordChanges {
        record_status: Some(status),
        metadata_changes: BTreeMap::new(),
        subject_count_change: None,
        text_identical: false,
        text_changes: None,
        subject_changes: Vec::new(),
    }
}

/// Compare two files with the default options
///
/// # Errors
///
/// See [`Comparator::compare_files`].
pub fn compare(original: &Path, exported: &Path) -> Result<Report> {
    Comparator::default().compare_files(original, exported)
}

/// Write `report` as pretty-printed JSON (two-space indent, non-ASCII kept)
///
/// # Errors
///
/// - `Serialization`: encoding failed
/// - `Io`: the sink failed
pub fn serialize<W: Write>(report: &Report, mut sink: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut sink, report).map_err(|e| {
        if e.is_io() {
            AnnodiffError::Io {
                op: "write_report".to_string(),
                message: e.to_string(),
            }
        } else {
            AnnodiffError::from(e)
        }
    })?;
    sink.write_all(b"\n")
        .and_then(|_| sink.flush())
        .map_err(|e| crate::errors::io_error("write_report", e))
}

/// Read a report previously written by [`serialize`]
///
/// # Errors
///
/// - `Serialization`: the source is not a valid report
/// - `Io`: the source failed
pub fn deserialize<R: Read>(source: R) -> Result<Report> {
    serde_json::from_reader(source).map_err(|e| {
        if e.is_io() {
            AnnodiffError::Io {
                op: "read_report".to_string(),
                message: e.to_string(),
            }
            .into()
        } else {
            AnnodiffError::from(e).into()
        }
    })
}

/// Serialize `report` to a pretty-printed JSON string
///
/// # Errors
///
/// - `Serialization`: encoding failed
pub fn to_json_string(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AnnodiffError::from(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: serde_json::Value) -> Record {
        serde_json::from_value(v).unwrap()
    }

    fn basic(id: &str, text: &str) -> Record {
        record(json!({
            "metadata": {"data_id": id, "provenance": "tool-a"},
            "text": text,
            "subjects": []
        }))
    }

    #[test]
    fn test_identical_datasets_produce_no_entries() {
        let data = vec![basic("a", "x"), basic("b", "y")];
        let report = Comparator::default().compare_records(&data, &data, "o", "e");
        assert!(report.changes_by_record.is_empty());
        assert_eq!(report.summary.identical_text_content, 2);
        assert_eq!(report.metadata.total_records, 2);
        assert_eq!(report.metadata.records_with_changes, 0);
    }

    #[test]
    fn test_text_change_counted_once() {
        let orig = vec![basic("a", "hello")];
        let exp = vec![basic("a", "hallo")];
        let report = Comparator::default().compare_records(&orig, &exp, "o", "e");
        assert_eq!(report.summary.text_changes, 1);
        assert_eq!(report.summary.identical_text_content, 0);
        let entry = &report.changes_by_record["a"];
        assert!(!entry.text_identical);
        assert!(entry.text_changes.is_some());
    }

    #[test]
    fn test_unmatched_ids_skipped_by_default() {
        let orig = vec![basic("a", "x"), basic("gone", "y")];
        let exp = vec![basic("a", "x"), basic("new", "z")];
        let report = Comparator::default().compare_records(&orig, &exp, "o", "e");
        assert!(report.changes_by_record.is_empty());
        assert_eq!(report.summary.data_ids_removed, 0);
        assert_eq!(report.summary.data_ids_added, 0);
    }

    #[test]
    fn test_union_coverage_reports_unmatched_ids() {
        let orig = vec![basic("a", "x"), basic("gone", "y")];
        let exp = vec![basic("a", "x"), basic("new", "z")];
        let options = CompareOptions {
            record_coverage: RecordCoverage::Union,
            ..CompareOptions::default()
        };
        let report = Comparator::new(options).compare_records(&orig, &exp, "o", "e");
        assert_eq!(report.summary.data_ids_removed, 1);
        assert_eq!(report.summary.data_ids_added, 1);
        assert_eq!(
            report.changes_by_record["gone"].record_status,
            Some(RecordStatus::MissingInExported)
        );
        assert_eq!(
            report.changes_by_record["new"].record_status,
            Some(RecordStatus::AddedInExported)
        );
        assert_eq!(report.metadata.records_with_changes, 2);
    }

    #[test]
    fn test_duplicate_ids_take_last_record() {
        let orig = vec![basic("a", "old"), basic("a", "x")];
        let exp = vec![basic("a", "x")];
        let report = Comparator::default().compare_records(&orig, &exp, "o", "e");
        assert!(report.changes_by_record.is_empty());
        assert_eq!(report.metadata.total_records, 2);
        assert_eq!(report.summary.identical_text_content, 1);
    }

    #[test]
    fn test_serialize_is_pretty_and_keeps_non_ascii() {
        let orig = vec![basic("a", "Turkey")];
        let exp = vec![basic("a", "Türkiye")];
        let report = Comparator::default().compare_records(&orig, &exp, "o", "e");
        let mut buf = Vec::new();
        serialize(&report, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Türkiye"));
        assert!(out.contains("\n  \"metadata\": {"));
        assert!(out.ends_with("}\n"));
    }
}
