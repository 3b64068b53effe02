//! Bundled filesystem path suggestion provider.
//!
//! An example external suggestion source, not core engine logic: given the
//! partial path typed so far, it lists entries of the containing directory
//! whose names start with the typed fragment, appending a trailing `/` to
//! directories so completion can continue into them.

use std::fs;
use std::path::Path;

use log::debug;

use crate::autocomplete::AcPattern;
use crate::error::PatternError;

/// Suggest filesystem paths completing `text`.
///
/// Relative fragments are resolved against the current working directory.
/// Unreadable directories yield no suggestions. Results are sorted by name.
pub fn file_path_suggestions(_name: &str, text: &str) -> Vec<String> {
    let (dir_part, fragment) = match text.rfind('/') {
        Some(idx) => text.split_at(idx + 1),
        None => ("", text),
    };
    let search_dir = if dir_part.is_empty() {
        Path::new(".")
    } else {
        Path::new(dir_part)
    };

    let entries = match fs::read_dir(search_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("cannot list {}: {err}", search_dir.display());
            return Vec::new();
        }
    };

    let mut suggestions: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(fragment) {
                return None;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let suffix = if is_dir { "/" } else { "" };
            Some(format!("{dir_part}{name}{suffix}"))
        })
        .collect();
    suggestions.sort_unstable();
    suggestions
}

/// An autocompletion pattern completing filesystem paths after `prefix`.
pub fn file_path_pattern(name: &str, prefix: &str) -> Result<AcPattern, PatternError> {
    AcPattern::new(name, file_path_suggestions).prefix(prefix)
}

// ============================================================================
// Tests
// ============================================================================
