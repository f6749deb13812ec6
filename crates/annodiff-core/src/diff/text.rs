//! Text differ: line-level and character-level edits between two strings.
//!
//! Lengths and offsets count Unicode scalar values, not bytes.

use crate::diff::model::{
    CharChangeKind, CharacterChange, LineChangeKind, LineDifference, TextDiff, TextDiffDetails,
};
use crate::diff::sequence::{OpTag, SequenceMatcher};

/// Characters that end a line, besides `\r\n`
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Compare two texts
///
/// Byte-identical inputs short-circuit to `{identical: true}`. Otherwise the
/// line and character alignments are computed independently and may disagree
/// on exact boundaries.
pub fn diff_text(original: &str, exported: &str) -> TextDiff {
    if original == exported {
        return TextDiff::identical();
    }

    let orig_chars: Vec<char> = original.chars().collect();
    let exp_chars: Vec<char> = exported.chars().collect();

    TextDiff {
        identical: false,
        details: Some(TextDiffDetails {
            original_length: orig_chars.len(),
            exported_length: exp_chars.len(),
            length_difference: exp_chars.len() as i64 - orig_chars.len() as i64,
            line_differences: line_differences(original, exported),
            character_changes: character_changes(&orig_chars, &exp_chars),
        }),
    }
}

/// Removed and added lines, in edit-script order, without context
pub fn line_differences(original: &str, exported: &str) -> Vec<LineDifference> {
    let a = split_lines_keep_ends(original);
    let b = split_lines_keep_ends(exported);

    let removed = |line: &str| LineDifference {
        kind: LineChangeKind::Removed,
        content: strip_line_break(line).to_string(),
    };
    let added = |line: &str| LineDifference {
        kind: LineChangeKind::Added,
        content: strip_line_break(line).to_string(),
    };

    let mut out = Vec::new();
    for op in SequenceMatcher::new(&a, &b).opcodes() {
        match op.tag {
            OpTag::Equal => {}
            OpTag::Delete => out.extend(a[op.i1..op.i2].iter().map(|l| removed(l))),
            OpTag::Insert => out.extend(b[op.j1..op.j2].iter().map(|l| added(l))),
            OpTag::Replace => {
                out.extend(a[op.i1..op.i2].iter().map(|l| removed(l)));
                out.extend(b[op.j1..op.j2].iter().map(|l| added(l)));
            }
        }
    }
    out
}

/// Non-equal spans of the character alignment
pub fn character_changes(original: &[char], exported: &[char]) -> Vec<CharacterChange> {
    SequenceMatcher::new(original, exported)
        .opcodes()
        .into_iter()
        .filter_map(|op| {
            let kind = match op.tag {
                OpTag::Equal => return None,
                OpTag::Replace => CharChangeKind::Replace,
                OpTag::Delete => CharChangeKind::Delete,
                OpTag::Insert => CharChangeKind::Insert,
            };
            Some(CharacterChange {
                kind,
                original_text: original[op.i1..op.i2].iter().collect(),
                exported_text: exported[op.j1..op.j2].iter().collect(),
                original_position: op.i1,
                exported_position: op.j1,
            })
        })
        .collect()
}

/// Split into lines, keeping each line's terminator
///
/// `\r\n` counts as one terminator. A trailing terminator does not produce
/// an empty final line.
pub fn split_lines_keep_ends(s: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut iter = s.char_indices().peekable();

    while let Some((idx, c)) = iter.next() {
        if !LINE_BREAKS.contains(&c) {
            continue;
        }
        let mut end = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(next_idx, '\n')) = iter.peek() {
                end = next_idx + 1;
                iter.next();
            }
        }
        lines.push(&s[start..end]);
        start = end;
    }
    if start < s.len() {
        lines.push(&s[start..]);
    }
    lines
}

fn strip_line_break(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix(LINE_BREAKS))
        .unwrap_or(line)
}
