//! Subject set comparator.

use crate::diff::model::{
    DescriptionChange, DescriptionChangeType, SubjectChange, SubjectChangeDetail,
    SubjectCountChange, SubjectStatus,
};
use crate::diff::pii::compare_piis;
use crate::model::{Subject, SubjectId};
use std::collections::{BTreeMap, BTreeSet};

/// Build an id lookup; a repeated id replaces the earlier subject.
pub fn index_by_id(subjects: &[Subject]) -> BTreeMap<&SubjectId, &Subject> {
    let mut lookup = BTreeMap::new();
    for subject in subjects {
        if lookup.insert(&subject.id, subject).is_some() {
            tracing::debug!(
                subject_id = %subject.id,
                "duplicate subject id, keeping last occurrence"
            );
        }
    }
    lookup
}

/// Compare two subject lists.
///
/// Returns the count change (only when the list lengths differ) and one
/// entry per subject id that changed, in id order. Lengths are taken before
/// duplicate ids collapse.
pub fn compare_subjects(
    original: &[Subject],
    exported: &[Subject],
) -> (Option<SubjectCountChange>, Vec<SubjectChange>) {
    let count_change = if original.len() == exported.len() {
        None
    } else {
        Some(SubjectCountChange {
            original: original.len(),
            exported: exported.len(),
            difference: exported.len() as i64 - original.len() as i64,
        })
    };

    let orig_by_id = index_by_id(original);
    let exp_by_id = index_by_id(exported);
    let ids: BTreeSet<&SubjectId> = orig_by_id
        .keys()
        .chain(exp_by_id.keys())
        .copied()
        .collect();

    let mut changes = Vec::new();
    for id in ids {
        let detail = match (orig_by_id.get(id), exp_by_id.get(id)) {
            (None, Some(exp)) => SubjectChangeDetail {
                status: Some(SubjectStatus::AddedInExported),
                description: Some(DescriptionChange {
                    original: None,
                    exported: Some(exp.description.clone()),
                    change_type: DescriptionChangeType::Added,
                }),
                pii_changes: None,
            },
            (Some(orig), None) => SubjectChangeDetail {
                status: Some(SubjectStatus::MissingInExported),
                description: Some(DescriptionChange {
                    original: Some(orig.description.clone()),
                    exported: None,
                    change_type: DescriptionChangeType::Removed,
                }),
                pii_changes: None,
            },
            (Some(orig), Some(exp)) => compare_matched(orig, exp),
            (None, None) => continue,
        };

        if !detail.is_empty() {
            changes.push(SubjectChange {
                subject_id: id.clone(),
                changes: detail,
            });
        }
    }

    (count_change, changes)
}

fn compare_matched(orig: &Subject, exp: &Subject) -> SubjectChangeDetail {
    let description = (orig.description != exp.description).then(|| DescriptionChange {
        original: Some(orig.description.clone()),
        exported: Some(exp.description.clone()),
        change_type: DescriptionChangeType::Modified,
    });

    let pii_changes = compare_piis(&orig.piis, &exp.piis);

    SubjectChangeDetail {
        status: None,
        description,
        pii_changes: (!pii_changes.is_empty()).then_some(pii_changes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn subject(id: Value, description: &str, piis: Value) -> Subject {
        serde_json::from_value(json!({"id": id, "description": description, "PIIs": piis}))
            .unwrap()
    }

    #[test]
    fn test_added_subject_and_count_change() {
        let orig = vec![subject(json!(1), "a teacher", json!([]))];
        let exp = vec![
            subject(json!(1), "a teacher", json!([])),
            subject(json!(2), "a student", json!([])),
        ];
        let (count, changes) = compare_subjects(&orig, &exp);
        assert_eq!(
            count,
            Some(SubjectCountChange {
                original: 1,
                exported: 2,
                difference: 1
            })
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].subject_id, SubjectId::Int(2));
        assert_eq!(
            changes[0].changes.status,
            Some(SubjectStatus::AddedInExported)
        );
        let desc = changes[0].changes.description.as_ref().unwrap();
        assert_eq!(desc.change_type, DescriptionChangeType::Added);
        assert_eq!(desc.exported.as_deref(), Some("a student"));
        assert!(desc.original.is_none());
    }

    #[test]
    fn test_missing_subject() {
        let orig = vec![subject(json!("s1"), "old", json!([]))];
        let (count, changes) = compare_subjects(&orig, &[]);
        assert_eq!(count.unwrap().difference, -1);
        assert_eq!(
            changes[0].changes.status,
            Some(SubjectStatus::MissingInExported)
        );
        let desc = changes[0].changes.description.as_ref().unwrap();
        assert_eq!(desc.change_type, DescriptionChangeType::Removed);
    }

    #[test]
    fn test_matched_subject_with_description_and_pii_changes() {
        let orig = vec![subject(
            json!(1),
            "lives in Turkey",
            json!([{"tag": "COUNTRY", "keyword": "Turkey", "certainty": 5, "hardness": 1}]),
        )];
        let exp = vec![subject(
            json!(1),
            "lives in Türkiye",
            json!([{"tag": "COUNTRY", "keyword": "Türkiye", "certainty": 5, "hardness": 1}]),
        )];
        let (count, changes) = compare_subjects(&orig, &exp);
        assert!(count.is_none());
        assert_eq!(changes.len(), 1);
        let detail = &changes[0].changes;
        assert!(detail.status.is_none());
        assert_eq!(
            detail.description.as_ref().unwrap().change_type,
            DescriptionChangeType::Modified
        );
        assert!(detail.pii_changes.as_ref().unwrap().contains_key("COUNTRY"));
    }

    #[test]
    fn test_unchanged_subjects_not_emitted() {
        let subjects = vec![
            subject(json!(1), "x", json!([])),
            subject(json!(2), "y", json!([])),
        ];
        let (count, changes) = compare_subjects(&subjects, &subjects);
        assert!(count.is_none());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_duplicate_ids_collapse_but_count_uses_raw_length() {
        let orig = vec![
            subject(json!(1), "first", json!([])),
            subject(json!(1), "second", json!([])),
        ];
        let exp = vec![subject(json!(1), "second", json!([]))];
        let (count, changes) = compare_subjects(&orig, &exp);
        assert_eq!(count.unwrap().difference, -1);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_int_and_string_ids_do_not_match() {
        let orig = vec![subject(json!(1), "x", json!([]))];
        let exp = vec![subject(json!("1"), "x", json!([]))];
        let (_, changes) = compare_subjects(&orig, &exp);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].subject_id, SubjectId::Int(1));
        assert_eq!(changes[1].subject_id, SubjectId::Text("1".into()));
    }

    #[test]
    fn test_numeric_ids_match_by_value() {
        let big = json!(u64::MAX);
        let orig = vec![
            subject(json!(1), "x", json!([])),
            subject(big.clone(), "y", json!([])),
        ];
        let exp = vec![
            subject(json!(1.0), "x", json!([])),
            subject(big, "z", json!([])),
        ];
        let (count, changes) = compare_subjects(&orig, &exp);
        assert!(count.is_none());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].subject_id, SubjectId::UInt(u64::MAX));
    }
}
