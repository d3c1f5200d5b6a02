use crate::engine::matcher::{self, Classification, MatchOptions};
use crate::session::text::TargetText;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypingOptions {
    pub auto_advance: bool,
    pub strict: bool,
    pub check_diacritics: bool,
}

impl TypingOptions {
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            check_diacritics: self.check_diacritics,
            strict: self.strict,
        }
    }
}

/// One classified character entering or leaving a line buffer. `target` is
/// `None` for characters typed past the end of their line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharEvent {
    pub typed: char,
    pub target: Option<char>,
    pub classification: Classification,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeOutcome {
    /// Strict mode refused a character other than `expected`.
    Rejected { expected: Option<char> },
    Accepted { event: CharEvent, advanced: bool },
}

impl TypeOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, TypeOutcome::Accepted { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineState {
    Completed,
    Active,
    Pending,
}

/// Per-line typed buffers plus the active line cursor.
///
/// There is always exactly one buffer per target line and the cursor always
/// points at an existing line.
#[derive(Clone, Debug, Default)]
pub struct LineTracker {
    text: TargetText,
    progress: Vec<String>,
    cursor: usize,
}

impl LineTracker {
    pub fn new(text: TargetText, progress: Vec<String>, cursor: usize) -> Self {
        let mut tracker = Self {
            text,
            progress,
            cursor,
        };
        tracker.reconcile();
        tracker
    }

    pub fn from_raw(raw: &str) -> Self {
        Self::new(TargetText::new(raw), Vec::new(), 0)
    }

    /// Swap in new target text. Buffers for surviving line indices are kept.
    pub fn set_text(&mut self, raw: &str) {
        self.text = TargetText::new(raw);
        self.reconcile();
    }

    fn reconcile(&mut self) {
        let count = self.text.line_count();
        self.progress.resize(count, String::new());
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    pub fn text(&self) -> &TargetText {
        &self.text
    }

    pub fn progress(&self) -> &[String] {
        &self.progress
    }

    pub fn active_line(&self) -> usize {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.text.line_count()
    }

    pub fn buffer(&self, line: usize) -> &str {
        self.progress.get(line).map(String::as_str).unwrap_or("")
    }

    pub fn active_buffer(&self) -> &str {
        self.buffer(self.cursor)
    }

    fn typed_len(&self, line: usize) -> usize {
        self.buffer(line).chars().count()
    }

    pub fn line_state(&self, line: usize) -> LineState {
        match line.cmp(&self.cursor) {
            std::cmp::Ordering::Less => LineState::Completed,
            std::cmp::Ordering::Equal => LineState::Active,
            std::cmp::Ordering::Greater => LineState::Pending,
        }
    }

    pub fn is_line_complete(&self, line: usize) -> bool {
        self.typed_len(line) >= self.text.line_len(line)
    }

    pub fn has_next_line(&self) -> bool {
        self.cursor + 1 < self.line_count()
    }

    /// Last line reached and fully typed.
    pub fn is_complete(&self) -> bool {
        !self.has_next_line() && self.is_line_complete(self.cursor)
    }

    /// The character the active line expects next.
    pub fn expected_char(&self) -> Option<char> {
        self.text.char_at(self.cursor, self.typed_len(self.cursor))
    }

    pub fn type_char(&mut self, ch: char, options: TypingOptions) -> TypeOutcome {
        let pos = self.typed_len(self.cursor);
        let target = self.text.char_at(self.cursor, pos);

        if options.strict && target != Some(ch) {
            return TypeOutcome::Rejected { expected: target };
        }

        let classification = match target {
            Some(t) => matcher::classify(Some(ch), t, options.match_options()),
            None => Classification::default(),
        };
        self.progress[self.cursor].push(ch);

        let advanced = options.auto_advance
            && pos + 1 == self.text.line_len(self.cursor)
            && self.has_next_line();
        if advanced {
            self.cursor += 1;
        }

        TypeOutcome::Accepted {
            event: CharEvent {
                typed: ch,
                target,
                classification,
            },
            advanced,
        }
    }

    /// Remove up to `count` trailing characters from the active line, returning
    /// each removed character classified against the position it occupied.
    pub fn delete_chars(&mut self, count: usize, options: MatchOptions) -> Vec<CharEvent> {
        let buffer = &mut self.progress[self.cursor];
        let len = buffer.chars().count();
        let keep = len.saturating_sub(count);

        let split_at = buffer
            .char_indices()
            .nth(keep)
            .map(|(i, _)| i)
            .unwrap_or(buffer.len());
        let removed: String = buffer.split_off(split_at);

        removed
            .chars()
            .enumerate()
            .map(|(offset, typed)| {
                let target = self.text.char_at(self.cursor, keep + offset);
                let classification = match target {
                    Some(t) => matcher::classify(Some(typed), t, options),
                    None => Classification::default(),
                };
                CharEvent {
                    typed,
                    target,
                    classification,
                }
            })
            .collect()
    }

    pub fn advance(&mut self) -> bool {
        if self.has_next_line() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Step back to the previous line, only from an empty buffer.
    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 && self.active_buffer().is_empty() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn select_line(&mut self, line: usize) -> bool {
        if line < self.line_count() {
            self.cursor = line;
            true
        } else {
            false
        }
    }

    /// Empty every buffer and return to the first line.
    pub fn clear_progress(&mut self) {
        for buffer in &mut self.progress {
            buffer.clear();
        }
        self.cursor = 0;
    }

    /// Classifications for the first `limit` target positions of `line`.
    pub fn classify_line(&self, line: usize, limit: usize, options: MatchOptions) -> Vec<Classification> {
        let mut typed = self.buffer(line).chars();
        self.text
            .line(line)
            .iter()
            .take(limit)
            .map(|&target| matcher::classify(typed.next(), target, options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::matcher::MatchKind;

    const AUTO: TypingOptions = TypingOptions {
        auto_advance: true,
        strict: false,
        check_diacritics: false,
    };
    const MANUAL: TypingOptions = TypingOptions {
        auto_advance: false,
        strict: false,
        check_diacritics: false,
    };
    const STRICT: TypingOptions = TypingOptions {
        auto_advance: true,
        strict: true,
        check_diacritics: false,
    };
    const HARAKAT: TypingOptions = TypingOptions {
        auto_advance: true,
        strict: false,
        check_diacritics: true,
    };

    #[test]
    fn test_new_tracker() {
        let tracker = LineTracker::from_raw("اب\nتث");
        assert_eq!(tracker.line_count(), 2);
        assert_eq!(tracker.progress().len(), 2);
        assert_eq!(tracker.active_line(), 0);
        assert_eq!(tracker.expected_char(), Some('ا'));
        assert_eq!(tracker.line_state(1), LineState::Pending);
    }

    #[test]
    fn test_type_classifies_against_position() {
        let mut tracker = LineTracker::from_raw("أب");
        let outcome = tracker.type_char('ا', MANUAL);
        match outcome {
            TypeOutcome::Accepted { event, advanced } => {
                assert_eq!(event.target, Some('أ'));
                assert_eq!(event.classification.kind(), MatchKind::Close);
                assert!(!advanced);
            }
            TypeOutcome::Rejected { .. } => panic!("should accept"),
        }
        assert_eq!(tracker.active_buffer(), "ا");
    }

    #[test]
    fn test_auto_advance_on_line_completion() {
        let mut tracker = LineTracker::from_raw("اب\nتث");
        tracker.type_char('ا', AUTO);
        let outcome = tracker.type_char('ب', AUTO);
        assert!(matches!(outcome, TypeOutcome::Accepted { advanced: true, .. }));
        assert_eq!(tracker.active_line(), 1);
        assert_eq!(tracker.buffer(0), "اب");
        assert_eq!(tracker.active_buffer(), "");
        assert_eq!(tracker.line_state(0), LineState::Completed);
    }

    #[test]
    fn test_auto_advance_keeps_saved_next_buffer() {
        let text = TargetText::new("ا\nتث");
        let mut tracker = LineTracker::new(text, vec![String::new(), "ت".to_string()], 0);
        let outcome = tracker.type_char('ا', AUTO);
        assert!(matches!(outcome, TypeOutcome::Accepted { advanced: true, .. }));
        assert_eq!(tracker.active_line(), 1);
        assert_eq!(tracker.active_buffer(), "ت");
        assert_eq!(tracker.expected_char(), Some('ث'));
    }

    #[test]
    fn test_stacked_harakat_typed_as_written() {
        // beh, shadda, fatha
        let raw = "\u{0628}\u{0651}\u{064E}";
        for options in [HARAKAT, STRICT] {
            let mut tracker = LineTracker::from_raw(raw);
            for ch in raw.chars() {
                match tracker.type_char(ch, options) {
                    TypeOutcome::Accepted { event, .. } => {
                        assert!(event.classification.exact, "{ch:?} under {options:?}")
                    }
                    TypeOutcome::Rejected { .. } => panic!("{ch:?} rejected under {options:?}"),
                }
            }
            assert!(tracker.is_complete());
        }
    }

    #[test]
    fn test_auto_advance_disabled_stays() {
        let mut tracker = LineTracker::from_raw("ا\nب");
        tracker.type_char('ا', MANUAL);
        assert_eq!(tracker.active_line(), 0);
        assert!(tracker.is_line_complete(0));
    }

    #[test]
    fn test_no_advance_past_last_line() {
        let mut tracker = LineTracker::from_raw("ا");
        let outcome = tracker.type_char('ا', AUTO);
        assert!(matches!(outcome, TypeOutcome::Accepted { advanced: false, .. }));
        assert!(tracker.is_complete());
        assert!(!tracker.advance());
    }

    #[test]
    fn test_typing_past_line_end_has_no_target() {
        let mut tracker = LineTracker::from_raw("ا");
        tracker.type_char('ا', MANUAL);
        let outcome = tracker.type_char('ب', MANUAL);
        match outcome {
            TypeOutcome::Accepted { event, .. } => {
                assert_eq!(event.target, None);
                assert!(event.classification.is_wrong());
            }
            TypeOutcome::Rejected { .. } => panic!("should accept"),
        }
        assert_eq!(tracker.active_buffer(), "اب");
    }

    #[test]
    fn test_strict_rejects_wrong_char() {
        let mut tracker = LineTracker::from_raw("اب");
        let outcome = tracker.type_char('ب', STRICT);
        assert_eq!(outcome, TypeOutcome::Rejected { expected: Some('ا') });
        assert_eq!(tracker.active_buffer(), "");
        // Close matches are still rejected.
        assert!(!tracker.type_char('أ', STRICT).accepted());
        assert!(tracker.type_char('ا', STRICT).accepted());
    }

    #[test]
    fn test_strict_rejects_past_line_end() {
        let mut tracker = LineTracker::from_raw("ا");
        tracker.type_char('ا', STRICT);
        assert_eq!(
            tracker.type_char('ا', STRICT),
            TypeOutcome::Rejected { expected: None }
        );
    }

    #[test]
    fn test_delete_reports_original_positions() {
        let mut tracker = LineTracker::from_raw("ابت");
        tracker.type_char('ا', MANUAL);
        tracker.type_char('ت', MANUAL);
        tracker.type_char('ت', MANUAL);

        let events = tracker.delete_chars(2, MatchOptions::default());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].target, Some('ب'));
        assert!(events[0].classification.is_wrong());
        assert_eq!(events[1].target, Some('ت'));
        assert!(events[1].classification.exact);
        assert_eq!(tracker.active_buffer(), "ا");
    }

    #[test]
    fn test_delete_more_than_typed() {
        let mut tracker = LineTracker::from_raw("اب");
        tracker.type_char('ا', MANUAL);
        let events = tracker.delete_chars(5, MatchOptions::default());
        assert_eq!(events.len(), 1);
        assert_eq!(tracker.active_buffer(), "");
        assert!(tracker.delete_chars(1, MatchOptions::default()).is_empty());
    }

    #[test]
    fn test_retreat_requires_empty_buffer() {
        let mut tracker = LineTracker::from_raw("اب\nتث");
        tracker.type_char('ا', AUTO);
        tracker.type_char('ب', AUTO);
        tracker.type_char('ت', AUTO);
        assert!(!tracker.retreat());

        tracker.delete_chars(1, MatchOptions::default());
        assert!(tracker.retreat());
        assert_eq!(tracker.active_line(), 0);
        assert_eq!(tracker.active_buffer(), "اب");
        assert!(!tracker.retreat());
    }

    #[test]
    fn test_explicit_advance_ignores_completion() {
        let mut tracker = LineTracker::from_raw("اب\nتث\nجح");
        assert!(tracker.advance());
        assert!(tracker.advance());
        assert!(!tracker.advance());
        assert_eq!(tracker.active_line(), 2);
    }

    #[test]
    fn test_select_line() {
        let mut tracker = LineTracker::from_raw("ا\nب\nت");
        tracker.type_char('ا', MANUAL);
        assert!(tracker.select_line(2));
        assert_eq!(tracker.active_line(), 2);
        assert!(!tracker.select_line(3));
        assert_eq!(tracker.active_line(), 2);
        assert_eq!(tracker.buffer(0), "ا");
    }

    #[test]
    fn test_set_text_grows_and_keeps_buffers() {
        let mut tracker = LineTracker::from_raw("اب");
        tracker.type_char('ا', MANUAL);
        tracker.set_text("اب\nتث\nجح");
        assert_eq!(tracker.progress().len(), 3);
        assert_eq!(tracker.buffer(0), "ا");
        assert_eq!(tracker.buffer(2), "");
    }

    #[test]
    fn test_set_text_shrinks_and_clamps_cursor() {
        let mut tracker = LineTracker::from_raw("ا\nب\nت");
        tracker.select_line(2);
        tracker.set_text("ا");
        assert_eq!(tracker.progress().len(), 1);
        assert_eq!(tracker.active_line(), 0);
    }

    #[test]
    fn test_new_reconciles_loaded_state() {
        let progress = vec!["ا".to_string(), "ب".to_string(), "ت".to_string()];
        let tracker = LineTracker::new(TargetText::new("اب\nتث"), progress, 7);
        assert_eq!(tracker.progress().len(), 2);
        assert_eq!(tracker.active_line(), 1);
    }

    #[test]
    fn test_clear_progress() {
        let mut tracker = LineTracker::from_raw("ا\nب");
        tracker.type_char('ا', AUTO);
        tracker.clear_progress();
        assert_eq!(tracker.active_line(), 0);
        assert!(tracker.progress().iter().all(String::is_empty));
    }

    #[test]
    fn test_classify_line_marks_untyped_as_wrong() {
        let mut tracker = LineTracker::from_raw("ابت");
        tracker.type_char('ا', MANUAL);
        let classes = tracker.classify_line(0, 3, MatchOptions::default());
        assert_eq!(classes.len(), 3);
        assert!(classes[0].exact);
        assert!(classes[1].is_wrong());
        assert!(classes[2].is_wrong());
    }
}
