//! Regex-driven contextual autocompletion with cycling.
//!
//! This module provides:
//! - [`AcPattern`] - a contextual pattern claiming a span of the input text
//! - [`AcState`] - the live completion session (suggestions plus cursor into
//!   them)
//! - [`generate_suggestions`] and [`cycle`] - pure state-transition functions
//!   driven by the engine
//!
//! Patterns are tried in registration order and the first applicable one
//! wins; the list is a priority list, not a merge. A pattern claims the
//! region of text between the last `start` regex match ending at or before
//! the cursor and the first `end` regex match starting at or after it,
//! optionally after a fixed `prefix` regex anchored at the start of the
//! input. All positions are byte offsets into the UTF-8 input text.

use regex::Regex;

use crate::command::CommandRegistry;
use crate::error::PatternError;

// ============================================================================
// Suggestion Sources
// ============================================================================

/// Where a pattern's suggestions come from.
pub enum SuggestionSource {
    /// Registered command keys, sorted, with a trailing space for commands
    /// that accept an argument.
    CommandKeys,
    /// A host-supplied provider; receives the pattern name and the matched
    /// text, returns candidate replacements.
    Provider(Box<dyn Fn(&str, &str) -> Vec<String>>),
}

// ============================================================================
// Autocompletion Patterns
// ============================================================================

/// A contextual autocompletion pattern.
///
/// Defaults: no prefix, the claimed span runs from the start of the input
/// (`^`) to its end (`$`), and no characters are illegal inside it.
pub struct AcPattern {
    name: String,
    source: SuggestionSource,
    prefix: Regex,
    start: Regex,
    end: Regex,
    illegal_chars: Vec<char>,
}

impl AcPattern {
    /// Create a pattern backed by a suggestion provider.
    pub fn new(
        name: impl Into<String>,
        provider: impl Fn(&str, &str) -> Vec<String> + 'static,
    ) -> Self {
        Self::with_source(name, SuggestionSource::Provider(Box::new(provider)))
    }

    /// Create a pattern that completes registered command keys.
    pub fn command_keys(name: impl Into<String>) -> Self {
        Self::with_source(name, SuggestionSource::CommandKeys)
    }

    fn with_source(name: impl Into<String>, source: SuggestionSource) -> Self {
        Self {
            name: name.into(),
            source,
            // The defaults are known-valid expressions.
            prefix: Regex::new("^").expect("default prefix regex"),
            start: Regex::new("^").expect("default start regex"),
            end: Regex::new("$").expect("default end regex"),
            illegal_chars: Vec::new(),
        }
    }

    /// Require `pattern` to match at the start of the input, ahead of the
    /// claimed span. The cursor must sit at or after the matched prefix.
    pub fn prefix(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.prefix = self.compile("prefix", &format!("^(?:{pattern})"))?;
        Ok(self)
    }

    /// Regex whose closest match end at or before the cursor starts the span.
    pub fn start(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.start = self.compile("start", pattern)?;
        Ok(self)
    }

    /// Regex whose first match start at or after the cursor ends the span.
    pub fn end(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.end = self.compile("end", pattern)?;
        Ok(self)
    }

    /// Characters that disqualify the claimed span when found inside it.
    pub fn illegal_chars(mut self, chars: &str) -> Self {
        self.illegal_chars = chars.chars().collect();
        self
    }

    /// The pattern's name, passed to its suggestion provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, kind: &'static str, pattern: &str) -> Result<Regex, PatternError> {
        Regex::new(pattern).map_err(|source| PatternError {
            name: self.name.clone(),
            kind,
            source,
        })
    }
}

impl std::fmt::Debug for AcPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcPattern")
            .field("name", &self.name)
            .field("prefix", &self.prefix.as_str())
            .field("start", &self.start.as_str())
            .field("end", &self.end.as_str())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Autocompletion State
// ============================================================================

/// State of the current completion session.
///
/// An empty suggestion list means "not completing". Index 0 of the
/// suggestions is always the original matched text, so cycling through the
/// whole list returns the input to its pre-cycle state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcState {
    suggestions: Vec<String>,
    index: usize,
    original_text: String,
    match_start: usize,
    match_end: usize,
}

impl AcState {
    /// Whether a completion session is running.
    pub fn is_active(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// Reset to "not completing".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The current suggestion list (index 0 = original text).
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    fn apply(&self, index: usize) -> (String, usize) {
        let prefix = &self.original_text[..self.match_start];
        let suffix = &self.original_text[self.match_end..];
        let suggestion = &self.suggestions[index];
        (
            format!("{prefix}{suggestion}{suffix}"),
            self.match_start + suggestion.len(),
        )
    }
}

/// Which way to move through the suggestion list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

// ============================================================================
// Suggestion Generation
// ============================================================================

/// Match the patterns against the input and build a suggestion list.
///
/// Patterns are tried in order; the first applicable one returns
/// `(suggestions, match_start, match_end)` where index 0 of the suggestions
/// is the matched text itself. If no pattern applies the result is
/// `([], 0, 0)`.
pub fn generate_suggestions(
    patterns: &[AcPattern],
    registry: &CommandRegistry,
    raw_text: &str,
    cursor: usize,
) -> (Vec<String>, usize, usize) {
    for pattern in patterns {
        let Some(prefix_match) = pattern.prefix.find(raw_text) else {
            continue;
        };
        let prefix_len = prefix_match.end();
        // Nothing to claim while the cursor sits inside the prefix.
        if cursor < prefix_len {
            continue;
        }
        let pos = cursor - prefix_len;
        let text = &raw_text[prefix_len..];

        let start = pattern
            .start
            .find_iter(text)
            .map(|m| m.end())
            .filter(|&end| end <= pos)
            .last();
        let Some(start) = start else {
            continue;
        };
        let Some(end) = pattern
            .end
            .find_iter(text)
            .map(|m| m.start())
            .find(|&s| s >= pos)
        else {
            continue;
        };
        if end < start {
            continue;
        }

        let matchtext = &text[start..end];
        if matchtext
            .chars()
            .any(|c| pattern.illegal_chars.contains(&c))
        {
            continue;
        }

        let mut suggestions = vec![matchtext.to_string()];
        match &pattern.source {
            SuggestionSource::CommandKeys => {
                suggestions.extend(registry.key_suggestions(matchtext));
            }
            SuggestionSource::Provider(provider) => {
                suggestions.extend(provider(&pattern.name, matchtext));
            }
        }
        return (suggestions, start + prefix_len, end + prefix_len);
    }
    (Vec::new(), 0, 0)
}

/// Start a completion session keyed off the current input and cursor.
pub fn init_state(
    patterns: &[AcPattern],
    registry: &CommandRegistry,
    raw_text: &str,
    cursor: usize,
) -> AcState {
    let (suggestions, match_start, match_end) =
        generate_suggestions(patterns, registry, raw_text, cursor);
    AcState {
        suggestions,
        index: 0,
        original_text: raw_text.to_string(),
        match_start,
        match_end,
    }
}

// ============================================================================
// Cycling
// ============================================================================

/// Move to the next or previous suggestion.
///
/// Returns the new input text, the new cursor position, and the new session
/// state. A list of exactly two suggestions (the original plus one real
/// candidate) applies the candidate immediately and clears the state; a
/// single real alternative needs no cycling UI. An empty list leaves the
/// input untouched.
pub fn cycle(
    mut state: AcState,
    raw_text: &str,
    cursor: usize,
    direction: CycleDirection,
) -> (String, usize, AcState) {
    match state.suggestions.len() {
        0 => (raw_text.to_string(), cursor, state),
        2 => {
            let (text, pos) = state.apply(1);
            (text, pos, AcState::default())
        }
        len => {
            state.index = match direction {
                CycleDirection::Forward => (state.index + 1) % len,
                CycleDirection::Backward => (state.index + len - 1) % len,
            };
            let (text, pos) = state.apply(state.index);
            (text, pos, state)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(candidates: &[&str]) -> impl Fn(&str, &str) -> Vec<String> {
        let candidates: Vec<String> = candidates.iter().map(|s| s.to_string()).collect();
        move |_name, text| {
            candidates
                .iter()
                .filter(|c| c.starts_with(text))
                .cloned()
                .collect()
        }
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::default()
    }

    #[test]
    fn test_generate_basic() {
        let patterns = vec![AcPattern::new("foo", fixed(&["abc", "bcd", "cde", "aaa"]))];
        let result = generate_suggestions(&patterns, &registry(), "a", 0);
        assert_eq!(
            result,
            (vec!["a".into(), "abc".into(), "aaa".into()], 0, 1)
        );
    }

    #[test]
    fn test_generate_with_prefix() {
        let patterns = vec![
            AcPattern::new("foo", fixed(&["abc", "bcd", "cde", "aaa"]))
                .prefix(r"x\s+")
                .unwrap(),
        ];
        let result = generate_suggestions(&patterns, &registry(), "x a", 2);
        assert_eq!(
            result,
            (vec!["a".into(), "abc".into(), "aaa".into()], 2, 3)
        );
    }

    #[test]
    fn test_generate_cursor_inside_prefix_skips() {
        let patterns = vec![
            AcPattern::new("foo", fixed(&["abc"])).prefix(r"open\s+").unwrap(),
        ];
        let result = generate_suggestions(&patterns, &registry(), "open a", 3);
        assert_eq!(result, (Vec::new(), 0, 0));
    }

    #[test]
    fn test_generate_prefix_not_matching_skips() {
        let patterns = vec![
            AcPattern::new("foo", fixed(&["abc"])).prefix(r"open\s+").unwrap(),
        ];
        let result = generate_suggestions(&patterns, &registry(), "shut a", 6);
        assert_eq!(result, (Vec::new(), 0, 0));
    }

    #[test]
    fn test_generate_illegal_chars_skip() {
        let patterns = vec![
            AcPattern::new("foo", fixed(&["abc"])).illegal_chars(" \t"),
        ];
        let result = generate_suggestions(&patterns, &registry(), "a b", 3);
        assert_eq!(result, (Vec::new(), 0, 0));
    }

    #[test]
    fn test_generate_first_pattern_wins() {
        let patterns = vec![
            AcPattern::new("first", fixed(&["alpha"])),
            AcPattern::new("second", fixed(&["always"])),
        ];
        let (suggestions, _, _) = generate_suggestions(&patterns, &registry(), "al", 2);
        assert_eq!(suggestions, vec!["al", "alpha"]);
    }

    #[test]
    fn test_generate_span_boundaries() {
        // Words separated by spaces; claim the word under the cursor.
        let patterns = vec![
            AcPattern::new("word", fixed(&["beta", "beam"]))
                .start(r"(^| )")
                .unwrap()
                .end(r"( |$)")
                .unwrap()
                .illegal_chars(" "),
        ];
        let (suggestions, start, end) =
            generate_suggestions(&patterns, &registry(), "alpha be gamma", 8);
        assert_eq!(suggestions, vec!["be", "beta", "beam"]);
        assert_eq!((start, end), (6, 8));
    }

    #[test]
    fn test_cycle_open_scenario() {
        // "open a" with candidates a.txt/ab.txt: three suggestions, the
        // first forward step lands on the first real candidate.
        let patterns = vec![
            AcPattern::new("open", fixed(&["a.txt", "ab.txt"]))
                .prefix(r"open ")
                .unwrap(),
        ];
        let state = init_state(&patterns, &registry(), "open a", 6);
        assert_eq!(
            state.suggestions(),
            &["a".to_string(), "a.txt".to_string(), "ab.txt".to_string()]
        );

        let (text, pos, state) = cycle(state, "open a", 6, CycleDirection::Forward);
        assert_eq!(text, "open a.txt");
        assert_eq!(pos, 10);
        assert!(state.is_active());
    }

    #[test]
    fn test_cycle_closure_returns_to_original() {
        let patterns = vec![AcPattern::new("foo", fixed(&["abc", "aaa"]))];
        let mut state = init_state(&patterns, &registry(), "a", 1);
        let len = state.suggestions().len();
        assert_eq!(len, 3);

        let mut text = "a".to_string();
        let mut pos = 1;
        for _ in 0..len {
            let (t, p, s) = cycle(state, &text, pos, CycleDirection::Forward);
            text = t;
            pos = p;
            state = s;
        }
        assert_eq!(text, "a");
        assert_eq!(pos, 1);
    }

    #[test]
    fn test_cycle_backward_wraps() {
        let patterns = vec![AcPattern::new("foo", fixed(&["abc", "aaa"]))];
        let state = init_state(&patterns, &registry(), "a", 1);
        let (text, _, _) = cycle(state, "a", 1, CycleDirection::Backward);
        // Backward from the original wraps to the last candidate.
        assert_eq!(text, "aaa");
    }

    #[test]
    fn test_cycle_two_suggestions_auto_commits() {
        let patterns = vec![AcPattern::new("foo", fixed(&["abc"]))];
        let state = init_state(&patterns, &registry(), "a", 1);
        assert_eq!(state.suggestions().len(), 2);

        let (text, pos, state) = cycle(state, "a", 1, CycleDirection::Forward);
        assert_eq!(text, "abc");
        assert_eq!(pos, 3);
        assert!(!state.is_active());
    }

    #[test]
    fn test_cycle_no_suggestions_is_noop() {
        let state = AcState::default();
        let (text, pos, state) = cycle(state, "xyz", 2, CycleDirection::Forward);
        assert_eq!(text, "xyz");
        assert_eq!(pos, 2);
        assert!(!state.is_active());
    }

    #[test]
    fn test_cycle_preserves_surrounding_text() {
        let patterns = vec![
            AcPattern::new("open", fixed(&["a.txt", "ab.txt"]))
                .prefix(r"open ")
                .unwrap()
                .end(r"( |$)")
                .unwrap(),
        ];
        let state = init_state(&patterns, &registry(), "open a --now", 6);
        let (text, pos, _) = cycle(state, "open a --now", 6, CycleDirection::Forward);
        assert_eq!(text, "open a.txt --now");
        assert_eq!(pos, 10);
    }

    #[test]
    fn test_invalid_pattern_regex_rejected() {
        let result = AcPattern::new("bad", fixed(&[])).prefix("(unclosed");
        assert!(result.is_err());
        let err = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("bad"));
        assert!(err.contains("prefix"));
    }
}
