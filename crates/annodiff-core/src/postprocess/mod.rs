//! Post-processing over finished reports.
//!
//! Counts change categories across a [`Report`] and runs the domain
//! classifiers over every modified PII annotation.

pub mod classifiers;

pub use classifiers::{default_classifiers, ChangeClassifier};

use crate::diff::model::{PiiChange, Report};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category counts over a report
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeTypeCounts {
    /// Records whose subject list length changed
    pub subject_count_changes: usize,
    /// `modified` PII changes
    pub pii_modifications: usize,
    /// Records with at least one metadata change
    pub other_metadata_changes: usize,
    /// Subject entries carrying a description change
    pub description_changes: usize,
    /// Records with a text diff
    pub text_changes: usize,
    /// Matches per classifier name
    #[serde(flatten)]
    pub classified: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilesCompared {
    pub original: String,
    pub exported: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordCounts {
    pub total_records: usize,
    pub records_with_changes: usize,
    pub records_with_identical_text: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeTypeSummary {
    pub timestamp: DateTime<Utc>,
    pub files_compared: FilesCompared,
    pub ignored_fields: Vec<String>,
    pub record_counts: RecordCounts,
    pub change_type_counts: ChangeTypeCounts,
    pub key_findings: Vec<String>,
}

/// Serialized form: `{"file_comparison_summary": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryDocument {
    pub file_comparison_summary: ChangeTypeSummary,
}

impl From<ChangeTypeSummary> for SummaryDocument {
    fn from(summary: ChangeTypeSummary) -> Self {
        Self {
            file_comparison_summary: summary,
        }
    }
}

/// Count change categories in `report` and apply `classifiers`
pub fn summarize_change_types(
    report: &Report,
    classifiers: &[Box<dyn ChangeClassifier>],
) -> ChangeTypeSummary {
    let mut counts = ChangeTypeCounts {
        classified: classifiers
            .iter()
            .map(|c| (c.name().to_string(), 0))
            .collect(),
        ..ChangeTypeCounts::default()
    };

    for changes in report.changes_by_record.values() {
        if !changes.metadata_changes.is_empty() {
            counts.other_metadata_changes += 1;
        }
        if changes.subject_count_change.is_some() {
            counts.subject_count_changes += 1;
        }
        if changes.text_changes.is_some() {
            counts.text_changes += 1;
        }

        for subject in &changes.subject_changes {
            if subject.changes.description.is_some() {
                counts.description_changes += 1;
            }
            for (tag, change) in subject.changes.pii_changes.iter().flatten() {
                let PiiChange::Modified { field_changes } = change else {
                    continue;
                };
                counts.pii_modifications += 1;
                for classifier in classifiers {
                    if classifier.classify(tag, field_changes) {
                        *counts
                            .classified
                            .entry(classifier.name().to_string())
                            .or_default() += 1;
                    }
                }
            }
        }
    }

    let key_findings = key_findings(report, &counts, classifiers);

    ChangeTypeSummary {
        timestamp: Utc::now(),
        files_compared: FilesCompared {
            original: report.metadata.original_file.clone(),
            exported: report.metadata.exported_file.clone(),
        },
        ignored_fields: report.metadata.ignored_fields.clone(),
        record_counts: RecordCounts {
            total_records: report.metadata.total_records,
            records_with_changes: report.metadata.records_with_changes,
            records_with_identical_text: report.summary.identical_text_content,
        },
        change_type_counts: counts,
        key_findings,
    }
}

fn key_findings(
    report: &Report,
    counts: &ChangeTypeCounts,
    classifiers: &[Box<dyn ChangeClassifier>],
) -> Vec<String> {
    let mut findings = vec![
        format!(
            "{} records have different subject counts",
            counts.subject_count_changes
        ),
        format!(
            "{} subjects have description changes",
            counts.description_changes
        ),
        format!("{} records have text content changes", counts.text_changes),
    ];
    for classifier in classifiers {
        let n = counts
            .classified
            .get(classifier.name())
            .copied()
            .unwrap_or(0);
        findings.push(classifier.describe(n));
    }
    findings.push(format!(
        "{} records have other metadata changes",
        counts.other_metadata_changes
    ));
    findings.push(format!(
        "Text content identical in {} records",
        report.summary.identical_text_content
    ));
    if !report.metadata.ignored_fields.is_empty() {
        findings.push(format!(
            "Ignored metadata fields: {}",
            report.metadata.ignored_fields.join(", ")
        ));
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::Comparator;
    use crate::model::Record;
    use serde_json::{json, Value};

    fn record(id: &str, country: &str, age: Value, extra_meta: Value) -> Record {
        let mut metadata = json!({"data_id": id});
        if let (Some(m), Some(extra)) = (metadata.as_object_mut(), extra_meta.as_object()) {
            m.extend(extra.clone());
        }
        serde_json::from_value(json!({
            "metadata": metadata,
            "text": "t",
            "subjects": [{
                "id": 1,
                "description": "d",
                "PIIs": [
                    {"tag": "COUNTRY", "keyword": country, "certainty": 3, "hardness": 1},
                    {"tag": "AGE", "keyword": age, "certainty": 3, "hardness": 1}
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_counts_and_classifiers() {
        let orig = vec![
            record("r1", "Turkey", json!("34"), json!({})),
            record("r2", "Korea", json!(50), json!({"lang": "ko"})),
        ];
        let exp = vec![
            record("r1", "Türkiye", json!("30-39"), json!({})),
            record("r2", "Korea", json!(50), json!({"lang": "en"})),
        ];
        let report = Comparator::default().compare_records(&orig, &exp, "o.jsonl", "e.jsonl");
        let summary = summarize_change_types(&report, &default_classifiers());

        let counts = &summary.change_type_counts;
        assert_eq!(counts.pii_modifications, 2);
        assert_eq!(counts.classified["turkey_to_turkiye"], 1);
        assert_eq!(counts.classified["age_format_changes"], 1);
        assert_eq!(counts.classified["occupation_changes"], 0);
        assert_eq!(counts.other_metadata_changes, 1);
        assert_eq!(counts.text_changes, 0);
        assert_eq!(summary.record_counts.total_records, 2);
        assert_eq!(summary.record_counts.records_with_changes, 2);
        assert!(summary
            .key_findings
            .contains(&"1 location changes from Turkey → Türkiye".to_string()));
    }

    #[test]
    fn test_summary_document_shape() {
        let data = vec![record("r1", "Korea", json!(1), json!({}))];
        let report = Comparator::default().compare_records(&data, &data, "o", "e");
        let doc = SummaryDocument::from(summarize_change_types(&report, &default_classifiers()));
        let v = serde_json::to_value(&doc).unwrap();
        let inner = &v["file_comparison_summary"];
        assert_eq!(inner["files_compared"]["original"], json!("o"));
        assert_eq!(inner["change_type_counts"]["turkey_to_turkiye"], json!(0));
        assert_eq!(inner["record_counts"]["records_with_identical_text"], json!(1));
    }

    #[test]
    fn test_added_and_removed_pii_are_not_modifications() {
        let orig = vec![record("r1", "Korea", json!("0"), json!({}))];
        let exp = vec![record("r1", "Korea", json!("42"), json!({}))];
        let report = Comparator::default().compare_records(&orig, &exp, "o", "e");
        let summary = summarize_change_types(&report, &default_classifiers());
        assert_eq!(summary.change_type_counts.pii_modifications, 0);
    }
}
