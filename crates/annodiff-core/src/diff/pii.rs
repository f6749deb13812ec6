//! PII annotation comparator.
//!
//! Annotations are matched by `tag`. For a tag on both sides, an empty
//! original keyword that becomes non-empty is an addition and the reverse is
//! a removal; only otherwise are the compared fields diffed one by one.

use crate::diff::model::{FieldChange, PiiChange};
use crate::diff::values::{is_empty_value, json_equal};
use crate::model::Pii;
use std::collections::{BTreeMap, BTreeSet};

/// Build a tag lookup; a repeated tag replaces the earlier annotation.
pub fn index_by_tag(piis: &[Pii]) -> BTreeMap<&str, &Pii> {
    let mut lookup = BTreeMap::new();
    for pii in piis {
        if lookup.insert(pii.tag.as_str(), pii).is_some() {
            tracing::debug!(
                pii_tag = %pii.tag,
                "duplicate PII tag, keeping last occurrence"
            );
        }
    }
    lookup
}

/// Compare two PII lists; returns tag → change, empty when nothing changed.
pub fn compare_piis(original: &[Pii], exported: &[Pii]) -> BTreeMap<String, PiiChange> {
    let orig_by_tag = index_by_tag(original);
    let exp_by_tag = index_by_tag(exported);

    let tags: BTreeSet<&str> = orig_by_tag
        .keys()
        .chain(exp_by_tag.keys())
        .copied()
        .collect();

    let mut changes = BTreeMap::new();
    for tag in tags {
        let change = match (orig_by_tag.get(tag), exp_by_tag.get(tag)) {
            (None, Some(exp)) => Some(PiiChange::Added {
                original_value: None,
                exported_value: (*exp).clone(),
            }),
            (Some(orig), None) => Some(PiiChange::Removed {
                original_value: (*orig).clone(),
                exported_value: None,
            }),
            (Some(orig), Some(exp)) => compare_matched(orig, exp),
            (None, None) => None,
        };
        if let Some(change) = change {
            changes.insert(tag.to_string(), change);
        }
    }
    changes
}

fn compare_matched(orig: &Pii, exp: &Pii) -> Option<PiiChange> {
    let orig_empty = is_empty_value(&orig.keyword);
    let exp_empty = is_empty_value(&exp.keyword);

    if orig_empty && !exp_empty {
        return Some(PiiChange::Added {
            original_value: Some(orig.clone()),
            exported_value: exp.clone(),
        });
    }
    if !orig_empty && exp_empty {
        return Some(PiiChange::Removed {
            original_value: orig.clone(),
            exported_value: Some(exp.clone()),
        });
    }

    let mut field_changes = BTreeMap::new();
    for field in Pii::COMPARED_FIELDS {
        if let (Some(o), Some(e)) = (orig.field(field), exp.field(field)) {
            if !json_equal(o, e) {
                field_changes.insert(
                    field.to_string(),
                    FieldChange {
                        original: o.clone(),
                        exported: e.clone(),
                    },
                );
            }
        }
    }

    if field_changes.is_empty() {
        None
    } else {
        Some(PiiChange::Modified { field_changes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn pii(tag: &str, keyword: Value, certainty: Value, hardness: Value) -> Pii {
        serde_json::from_value(json!({
            "tag": tag,
            "keyword": keyword,
            "certainty": certainty,
            "hardness": hardness,
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_keyword_becoming_filled_is_added() {
        let orig = vec![pii("AGE", json!("0"), json!(1), json!(1))];
        let exp = vec![pii("AGE", json!("42"), json!(5), json!(1))];
        let changes = compare_piis(&orig, &exp);
        assert_eq!(
            changes["AGE"],
            PiiChange::Added {
                original_value: Some(orig[0].clone()),
                exported_value: exp[0].clone(),
            }
        );
    }

    #[test]
    fn test_filled_keyword_becoming_empty_is_removed() {
        let orig = vec![pii("CITY", json!("Seoul"), json!(3), json!(2))];
        let exp = vec![pii("CITY", json!("  "), json!(3), json!(2))];
        let changes = compare_piis(&orig, &exp);
        assert!(matches!(
            changes["CITY"],
            PiiChange::Removed {
                exported_value: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_both_empty_falls_through_to_field_compare() {
        let orig = vec![pii("AGE", json!(0), json!(1), json!(1))];
        let exp = vec![pii("AGE", json!(""), json!(1), json!(1))];
        let changes = compare_piis(&orig, &exp);
        let PiiChange::Modified { field_changes } = &changes["AGE"] else {
            panic!("expected modified, got {:?}", changes["AGE"]);
        };
        assert_eq!(field_changes.len(), 1);
        assert_eq!(field_changes["keyword"].original, json!(0));
        assert_eq!(field_changes["keyword"].exported, json!(""));
    }

    #[test]
    fn test_only_differing_fields_listed() {
        let orig = vec![pii("NAME", json!("Kim"), json!(3), json!(1))];
        let exp = vec![pii("NAME", json!("Kim"), json!(4), json!(1.0))];
        let changes = compare_piis(&orig, &exp);
        let PiiChange::Modified { field_changes } = &changes["NAME"] else {
            panic!("expected modified");
        };
        assert_eq!(field_changes.keys().collect::<Vec<_>>(), vec!["certainty"]);
    }

    #[test]
    fn test_unmatched_tags() {
        let orig = vec![pii("NAME", json!("Kim"), json!(3), json!(1))];
        let exp = vec![pii("CITY", json!("Busan"), json!(3), json!(1))];
        let changes = compare_piis(&orig, &exp);
        assert!(matches!(
            changes["NAME"],
            PiiChange::Removed {
                exported_value: None,
                ..
            }
        ));
        assert!(matches!(
            changes["CITY"],
            PiiChange::Added {
                original_value: None,
                ..
            }
        ));
    }

    #[test]
    fn test_identical_lists_yield_nothing() {
        let piis = vec![
            pii("NAME", json!("Kim"), json!(3), json!(1)),
            pii("AGE", json!(30), json!(2), json!(1)),
        ];
        assert!(compare_piis(&piis, &piis).is_empty());
    }

    #[test]
    fn test_duplicate_tag_last_wins() {
        let orig = vec![
            pii("NAME", json!("Lee"), json!(3), json!(1)),
            pii("NAME", json!("Kim"), json!(3), json!(1)),
        ];
        let exp = vec![pii("NAME", json!("Kim"), json!(3), json!(1))];
        assert!(compare_piis(&orig, &exp).is_empty());
    }
}
