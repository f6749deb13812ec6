//! Change-type classifiers applied to modified PII annotations.

use crate::diff::model::FieldChange;
use crate::diff::values::display_value;
use std::collections::BTreeMap;

/// Recognises one domain-specific kind of PII modification
///
/// Classifiers only see `modified` PII changes: the tag and the per-field
/// `{original, exported}` pairs.
pub trait ChangeClassifier: Send + Sync {
    /// Key under which matches are counted
    fn name(&self) -> &str;

    fn classify(&self, tag: &str, field_changes: &BTreeMap<String, FieldChange>) -> bool;

    /// One line for the summary's key findings
    fn describe(&self, count: usize) -> String {
        format!("{count} PII modifications classified as {}", self.name())
    }
}

/// The classifiers run when the caller does not choose
pub fn default_classifiers() -> Vec<Box<dyn ChangeClassifier>> {
    vec![
        Box::new(TurkeyToTurkiye),
        Box::new(AgeFormatChange),
        Box::new(OccupationChange),
    ]
}

fn keyword_change(field_changes: &BTreeMap<String, FieldChange>) -> Option<(String, String)> {
    field_changes
        .get("keyword")
        .map(|fc| (display_value(&fc.original), display_value(&fc.exported)))
}

/// Country name respelled from "Turkey" to "Türkiye"
pub struct TurkeyToTurkiye;

impl ChangeClassifier for TurkeyToTurkiye {
    fn name(&self) -> &str {
        "turkey_to_turkiye"
    }

    fn classify(&self, _tag: &str, field_changes: &BTreeMap<String, FieldChange>) -> bool {
        keyword_change(field_changes)
            .is_some_and(|(orig, exp)| orig.contains("Turkey") && exp.contains("Türkiye"))
    }

    fn describe(&self, count: usize) -> String {
        format!("{count} location changes from Turkey → Türkiye")
    }
}

/// Single age rewritten as a range, e.g. `34` → `30-39`
pub struct AgeFormatChange;

impl ChangeClassifier for AgeFormatChange {
    fn name(&self) -> &str {
        "age_format_changes"
    }

    fn classify(&self, tag: &str, field_changes: &BTreeMap<String, FieldChange>) -> bool {
        tag == "AGE"
            && keyword_change(field_changes).is_some_and(|(orig, exp)| {
                !orig.is_empty() && orig.bytes().all(|b| b.is_ascii_digit()) && exp.contains('-')
            })
    }

    fn describe(&self, count: usize) -> String {
        format!("{count} records have age format changes (single age → range)")
    }
}

/// Any keyword change on an occupation or position tag
pub struct OccupationChange;

impl ChangeClassifier for OccupationChange {
    fn name(&self) -> &str {
        "occupation_changes"
    }

    fn classify(&self, tag: &str, field_changes: &BTreeMap<String, FieldChange>) -> bool {
        matches!(tag, "OCCUPATION" | "POSITION") && field_changes.contains_key("keyword")
    }

    fn describe(&self, count: usize) -> String {
        format!("{count} occupation or position keywords changed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn keyword(orig: Value, exp: Value) -> BTreeMap<String, FieldChange> {
        BTreeMap::from([(
            "keyword".to_string(),
            FieldChange {
                original: orig,
                exported: exp,
            },
        )])
    }

    #[test]
    fn test_turkey() {
        let c = TurkeyToTurkiye;
        assert!(c.classify(
            "COUNTRY",
            &keyword(json!("Ankara, Turkey"), json!("Ankara, Türkiye"))
        ));
        assert!(!c.classify("COUNTRY", &keyword(json!("Turkey"), json!("Greece"))));
    }

    #[test]
    fn test_age_format() {
        let c = AgeFormatChange;
        assert!(c.classify("AGE", &keyword(json!("34"), json!("30-39"))));
        assert!(c.classify("AGE", &keyword(json!(34), json!("30-39"))));
        assert!(!c.classify("AGE", &keyword(json!("thirty"), json!("30-39"))));
        assert!(!c.classify("BIRTH_YEAR", &keyword(json!("1990"), json!("1990-1999"))));
    }

    #[test]
    fn test_occupation_needs_keyword_change() {
        let c = OccupationChange;
        assert!(c.classify("POSITION", &keyword(json!("nurse"), json!("head nurse"))));
        let certainty_only = BTreeMap::from([(
            "certainty".to_string(),
            FieldChange {
                original: json!(1),
                exported: json!(2),
            },
        )]);
        assert!(!c.classify("OCCUPATION", &certainty_only));
    }

    #[test]
    fn test_default_set_names() {
        let names: Vec<String> = default_classifiers()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "turkey_to_turkiye",
                "age_format_changes",
                "occupation_changes"
            ]
        );
    }
}
