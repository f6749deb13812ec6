//! Metadata comparator.

use crate::config::CompareOptions;
use crate::diff::model::MetadataChange;
use crate::diff::values::json_equal;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Compare two metadata mappings key by key.
///
/// Keys in `options.ignored_fields` are skipped on both sides. An
/// original-only key is `missing`, an exported-only key is `added`, and a key
/// on both sides with unequal values is `modified`.
pub fn compare_metadata(
    original: &Map<String, Value>,
    exported: &Map<String, Value>,
    options: &CompareOptions,
) -> BTreeMap<String, MetadataChange> {
    let mut changes = BTreeMap::new();

    for (key, orig_value) in original {
        if options.is_ignored(key) {
            continue;
        }
        match exported.get(key) {
            None => {
                changes.insert(
                    key.clone(),
                    MetadataChange::Missing {
                        original_value: orig_value.clone(),
                    },
                );
            }
            Some(exp_value) if !json_equal(orig_value, exp_value) => {
                changes.insert(
                    key.clone(),
                    MetadataChange::Modified {
                        original_value: orig_value.clone(),
                        new_value: exp_value.clone(),
                    },
                );
            }
            Some(_) => {}
        }
    }

    for (key, exp_value) in exported {
        if options.is_ignored(key) || original.contains_key(key) {
            continue;
        }
        changes.insert(
            key.clone(),
            MetadataChange::Added {
                new_value: exp_value.clone(),
            },
        );
    }

    changes
}
