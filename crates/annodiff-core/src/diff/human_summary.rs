//! Human-readable summary renderer for change reports.

use crate::config::RecordCoverage;
use crate::core_types::Sensitive;
use crate::diff::model::{
    DescriptionChangeType, LineChangeKind, MetadataChange, PiiChange, RecordChanges,
    RecordStatus, Report, SubjectChange, SubjectStatus,
};
use crate::diff::values::display_value;
use serde_json::Value;

/// Options for [`render_human_summary`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Replace PII keywords, subject descriptions and text lines with a
    /// redaction marker
    pub redact: bool,
}

/// Render a Markdown review summary of a [`Report`].
///
/// Informational only; the JSON report stays the source of truth.
pub fn render_human_summary(report: &Report, options: &RenderOptions) -> String {
    let mut out = String::new();
    let meta = &report.metadata;
    let summary = &report.summary;

    out.push_str("## Annotation Diff\n\n");
    out.push_str(&format!(
        "**Original**: `{}`  \n**Exported**: `{}`  \n**Compared at**: {}\n\n",
        meta.original_file,
        meta.exported_file,
        meta.comparison_timestamp.to_rfc3339()
    ));
    if !meta.ignored_fields.is_empty() {
        out.push_str(&format!(
            "_Ignored metadata fields_: {}\n\n",
            meta.ignored_fields.join(", ")
        ));
    }

    out.push_str("### Summary\n\n| | Count |\n|---|---|\n");
    let mut rows = vec![
        ("Total records", meta.total_records),
        ("Records with changes", meta.records_with_changes),
        ("Identical text", summary.identical_text_content),
        ("Text changes", summary.text_changes),
        ("Missing metadata fields", summary.missing_metadata_fields),
        ("Subject count changes", summary.subject_count_changes),
        ("Description changes", summary.description_changes),
        ("PII annotation changes", summary.pii_annotation_changes),
    ];
    if meta.record_coverage == RecordCoverage::Union {
        rows.push(("Records missing in exported", summary.data_ids_removed));
        rows.push(("Records added in exported", summary.data_ids_added));
    }
    for (label, count) in rows {
        out.push_str(&format!("| {label} | {count} |\n"));
    }
    out.push('\n');

    if report.changes_by_record.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    for (data_id, changes) in &report.changes_by_record {
        render_record(&mut out, data_id, changes, options);
    }

    out
}

fn render_record(
    out: &mut String,
    data_id: &str,
    changes: &RecordChanges,
    options: &RenderOptions,
) {
    out.push_str(&format!("### Record `{data_id}`\n\n"));

    match changes.record_status {
        Some(RecordStatus::MissingInExported) => {
            out.push_str("- **Missing in exported**\n\n");
            return;
        }
        Some(RecordStatus::AddedInExported) => {
            out.push_str("- **Added in exported**\n\n");
            return;
        }
        None => {}
    }

    let text_details = changes
        .text_changes
        .as_ref()
        .and_then(|t| t.details.as_ref());
    if let Some(details) = text_details {
        out.push_str(&format!(
            "- **Text**: {} → {} characters, {} character change(s)\n",
            details.original_length,
            details.exported_length,
            details.character_changes.len()
        ));
        for line in &details.line_differences {
            let sign = match line.kind {
                LineChangeKind::Removed => '-',
                LineChangeKind::Added => '+',
            };
            out.push_str(&format!("  - `{sign}` {}\n", redacted(&line.content, options)));
        }
    }

    for (key, change) in &changes.metadata_changes {
        let line = match change {
            MetadataChange::Missing { original_value } => {
                format!("missing (was `{}`)", display_value(original_value))
            }
            MetadataChange::Added { new_value } => {
                format!("added `{}`", display_value(new_value))
            }
            MetadataChange::Modified {
                original_value,
                new_value,
            } => format!(
                "`{}` → `{}`",
                display_value(original_value),
                display_value(new_value)
            ),
        };
        out.push_str(&format!("- **Metadata** `{key}`: {line}\n"));
    }

    if let Some(count) = &changes.subject_count_change {
        out.push_str(&format!(
            "- **Subjects**: {} → {} ({:+})\n",
            count.original, count.exported, count.difference
        ));
    }

    for subject in &changes.subject_changes {
        render_subject(out, subject, options);
    }

    out.push('\n');
}

fn render_subject(out: &mut String, subject: &SubjectChange, options: &RenderOptions) {
    let detail = &subject.changes;
    let status = match detail.status {
        Some(SubjectStatus::AddedInExported) => " (added in exported)",
        Some(SubjectStatus::MissingInExported) => " (missing in exported)",
        None => "",
    };
    out.push_str(&format!("- **Subject `{}`**{status}\n", subject.subject_id));

    if let Some(desc) = &detail.description {
        let orig = desc.original.as_deref().map(|d| redacted(d, options));
        let exp = desc.exported.as_deref().map(|d| redacted(d, options));
        let line = match desc.change_type {
            DescriptionChangeType::Added => format!("added \"{}\"", exp.unwrap_or_default()),
            DescriptionChangeType::Removed => format!("removed \"{}\"", orig.unwrap_or_default()),
            DescriptionChangeType::Modified => format!(
                "\"{}\" → \"{}\"",
                orig.unwrap_or_default(),
                exp.unwrap_or_default()
            ),
        };
        out.push_str(&format!("  - description: {line}\n"));
    }

    for (tag, change) in detail.pii_changes.iter().flatten() {
        let line = match change {
            PiiChange::Added { exported_value, .. } => {
                format!("added `{}`", keyword(&exported_value.keyword, options))
            }
            PiiChange::Removed { original_value, .. } => {
                format!("removed `{}`", keyword(&original_value.keyword, options))
            }
            PiiChange::Modified { field_changes } => field_changes
                .iter()
                .map(|(field, fc)| {
                    if field == "keyword" {
                        format!(
                            "keyword `{}` → `{}`",
                            keyword(&fc.original, options),
                            keyword(&fc.exported, options)
                        )
                    } else {
                        format!(
                            "{field} `{}` → `{}`",
                            display_value(&fc.original),
                            display_value(&fc.exported)
                        )
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        };
        out.push_str(&format!("  - PII `{tag}`: {line}\n"));
    }
}

fn keyword(value: &Value, options: &RenderOptions) -> String {
    redacted(&display_value(value), options)
}

fn redacted(text: &str, options: &RenderOptions) -> String {
    if options.redact {
        Sensitive::new(text).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::engine::Comparator;
    use crate::model::Record;
    use serde_json::json;

    fn record(id: &str, text: &str, keyword: &str) -> Record {
        serde_json::from_value(json!({
            "metadata": {"data_id": id},
            "text": text,
            "subjects": [{
                "id": 1,
                "description": "a resident",
                "PIIs": [{"tag": "CITY", "keyword": keyword, "certainty": 3, "hardness": 1}]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_without_changes() {
        let data = vec![record("r1", "same", "Seoul")];
        let report = Comparator::default().compare_records(&data, &data, "a.jsonl", "b.jsonl");
        let s = render_human_summary(&report, &RenderOptions::default());
        assert!(s.contains("## Annotation Diff"));
        assert!(s.contains("`a.jsonl`"));
        assert!(s.contains("| Total records | 1 |"));
        assert!(s.contains("_No changes detected._"));
    }

    #[test]
    fn test_summary_lists_record_changes() {
        let orig = vec![record("r1", "lives in Seoul", "Seoul")];
        let exp = vec![record("r1", "lives in Busan", "Busan")];
        let report = Comparator::default().compare_records(&orig, &exp, "a", "b");
        let s = render_human_summary(&report, &RenderOptions::default());
        assert!(s.contains("### Record `r1`"));
        assert!(s.contains("- **Subject `1`**"));
        assert!(s.contains("PII `CITY`: keyword `Seoul` → `Busan`"));
        assert!(s.contains("`-` lives in Seoul"));
    }

    #[test]
    fn test_redaction_hides_keywords_and_text() {
        let orig = vec![record("r1", "lives in Seoul", "Seoul")];
        let exp = vec![record("r1", "lives in Busan", "Busan")];
        let report = Comparator::default().compare_records(&orig, &exp, "a", "b");
        let s = render_human_summary(&report, &RenderOptions { redact: true });
        assert!(!s.contains("Seoul"));
        assert!(!s.contains("Busan"));
        assert!(s.contains("***REDACTED***"));
    }
}
