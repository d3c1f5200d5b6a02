use crate::engine::matcher::{Classification, MatchOptions};
use crate::keyboard::layout::{KeyHint, KeyboardLayout};
use crate::session::tracker::{LineState, LineTracker};

/// A target character paired with how it was typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharView {
    pub target: char,
    pub typed: Option<char>,
    pub classification: Classification,
}

/// Read model for rendering. Lines before the active one carry full
/// classifications, the active line is split at the cursor, and later lines
/// are only available as raw text in `lines`.
#[derive(Clone, Debug, PartialEq)]
pub struct PracticeView {
    pub lines: Vec<String>,
    pub active_index: usize,
    pub typed: Vec<CharView>,
    pub next_char: Option<char>,
    pub remaining: String,
    pub prior_lines: Vec<Vec<CharView>>,
    pub next_key: Option<KeyHint>,
}

impl PracticeView {
    pub fn build(tracker: &LineTracker, options: MatchOptions, layout: &KeyboardLayout) -> Self {
        let text = tracker.text();
        let active = tracker.active_line();
        let target = text.line(active);
        let pos = tracker.active_buffer().chars().count();

        let typed = char_views(tracker, active, pos, options);
        let next_char = target.get(pos).copied();
        let remaining = target.iter().skip(pos + 1).collect();
        let prior_lines = (0..text.line_count())
            .take_while(|&line| tracker.line_state(line) == LineState::Completed)
            .map(|line| char_views(tracker, line, text.line_len(line), options))
            .collect();

        Self {
            lines: (0..text.line_count()).map(|i| text.line_string(i)).collect(),
            active_index: active,
            typed,
            next_char,
            remaining,
            prior_lines,
            next_key: next_char.and_then(|ch| layout.key_for(ch)),
        }
    }
}

fn char_views(tracker: &LineTracker, line: usize, limit: usize, options: MatchOptions) -> Vec<CharView> {
    let mut typed = tracker.buffer(line).chars();
    tracker
        .text()
        .line(line)
        .iter()
        .zip(tracker.classify_line(line, limit, options))
        .map(|(&target, classification)| CharView {
            target,
            typed: typed.next(),
            classification,
        })
        .collect()
}
