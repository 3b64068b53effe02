//! Input history with a mutable scratch slot and traversal cursor.
//!
//! Index 0 is the scratch slot holding the not-yet-submitted input; indices
//! >= 1 are past submissions, most recent first. An optional append-only log
//! file makes the history durable across sessions: UTF-8, one entry per
//! line, most recent appended last.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use log::{debug, warn};

/// Which way to move through past entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Travel {
    Older,
    Newer,
}

/// Ordered list of past inputs plus the live scratch slot.
#[derive(Debug)]
pub struct History {
    /// `entries[0]` is the scratch slot, the rest are most-recent-first.
    entries: Vec<String>,
    index: usize,
    log_file: Option<PathBuf>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// An empty history: just the scratch slot.
    pub fn new() -> Self {
        Self {
            entries: vec![String::new()],
            index: 0,
            log_file: None,
        }
    }

    /// A history backed by an append-only log file.
    ///
    /// Prior entries are loaded in reverse order so the freshest one sits
    /// immediately after the scratch slot. A missing or unreadable file
    /// starts the history empty.
    pub fn with_log_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = vec![String::new()];
        match fs::read_to_string(&path) {
            Ok(contents) => {
                entries.extend(contents.lines().rev().map(str::to_string));
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no history log at {}, starting empty", path.display());
            }
            Err(err) => {
                warn!("failed to read history log {}: {err}", path.display());
            }
        }
        Self {
            entries,
            index: 0,
            log_file: Some(path),
        }
    }

    /// Number of entries, scratch slot included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when only the scratch slot exists.
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Move to an older entry, clamped at the oldest. Returns the entry the
    /// cursor now points at, or `None` when there is nothing to browse.
    pub fn older(&mut self) -> Option<&str> {
        self.travel(Travel::Older)
    }

    /// Move to a newer entry, clamped at the scratch slot.
    pub fn newer(&mut self) -> Option<&str> {
        self.travel(Travel::Newer)
    }

    fn travel(&mut self, direction: Travel) -> Option<&str> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.index = match direction {
            Travel::Older => (self.index + 1).min(self.entries.len() - 1),
            Travel::Newer => self.index.saturating_sub(1),
        };
        Some(&self.entries[self.index])
    }

    /// Re-anchor the scratch slot to the current input and stop browsing.
    ///
    /// Called for every ordinary edit so text typed while not browsing is
    /// never lost. Idempotent.
    pub fn reset_travel(&mut self, current_input: &str) {
        self.index = 0;
        self.entries[0] = current_input.to_string();
    }

    /// Record a submitted line as the new most-recent entry and reset the
    /// scratch slot.
    pub fn record(&mut self, text: &str) {
        self.entries[0] = text.to_string();
        self.entries.insert(0, String::new());
        self.append_to_log(text);
    }

    fn append_to_log(&self, text: &str) {
        let Some(path) = &self.log_file else {
            return;
        };
        let result = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{text}"));
        if let Err(err) = result {
            // The in-memory history is already updated; losing the durable
            // copy is not fatal.
            warn!("failed to append to history log {}: {err}", path.display());
        }
    }

    #[cfg(test)]
    fn entry(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_has_scratch_slot() {
        let history = History::new();
        assert_eq!(history.len(), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_record_then_older_round_trip() {
        let mut history = History::new();
        history.record("g hello");
        assert_eq!(history.older(), Some("g hello"));
    }

    #[test]
    fn test_record_resets_scratch_slot() {
        let mut history = History::new();
        history.reset_travel("half-typed");
        history.record("f");
        assert_eq!(history.entry(0), Some(""));
        assert_eq!(history.entry(1), Some("f"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_traversal_noop_with_only_scratch() {
        let mut history = History::new();
        assert_eq!(history.older(), None);
        assert_eq!(history.newer(), None);
    }

    #[test]
    fn test_older_clamps_at_oldest() {
        let mut history = History::new();
        history.record("first");
        history.record("second");
        for _ in 0..10 {
            history.older();
        }
        // Most recent first: entry 1 = "second", entry 2 = "first".
        assert_eq!(history.older(), Some("first"));
    }

    #[test]
    fn test_newer_clamps_at_scratch() {
        let mut history = History::new();
        history.record("first");
        history.older();
        assert_eq!(history.newer(), Some(""));
        assert_eq!(history.newer(), Some(""));
    }

    #[test]
    fn test_reset_travel_is_idempotent() {
        let mut history = History::new();
        history.record("first");
        history.older();
        history.reset_travel("typing");
        let snapshot: Vec<String> = history.entries.clone();
        history.reset_travel("typing");
        assert_eq!(history.entries, snapshot);
        assert_eq!(history.entry(0), Some("typing"));
    }

    #[test]
    fn test_log_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.log");

        let mut history = History::with_log_file(&path);
        history.record("f");
        history.record("b stuff");

        let mut reloaded = History::with_log_file(&path);
        // Freshest entry sits immediately after the scratch slot.
        assert_eq!(reloaded.older(), Some("b stuff"));
        assert_eq!(reloaded.older(), Some("f"));
    }

    #[test]
    fn test_log_file_appends_most_recent_last() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.log");

        let mut history = History::with_log_file(&path);
        history.record("one");
        history.record("two");

        let contents = fs::read_to_string(&path).expect("read log");
        assert_eq!(contents, "one\ntwo\n");
    }

    #[test]
    fn test_missing_log_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let history = History::with_log_file(dir.path().join("nope.log"));
        assert!(history.is_empty());
    }
}
