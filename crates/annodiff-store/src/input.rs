//! Input file-name filter

use std::path::Path;

const ALLOWED_EXTENSIONS: [&str; 2] = ["json", "jsonl"];

/// True if `name` has a `.json` or `.jsonl` extension (any case)
pub fn allowed_input_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
