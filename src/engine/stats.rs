use serde::{Deserialize, Serialize};

use crate::engine::letter_stats::LetterStatistics;
use crate::engine::matcher::{Classification, MatchKind};

/// Running totals over every classified keystroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default, alias = "correctChars")]
    pub correct_chars: u64,
    #[serde(default, alias = "closeMatches")]
    pub close_matches: u64,
    #[serde(default)]
    pub mistakes: u64,
}

impl Stats {
    pub fn total(&self) -> u64 {
        self.correct_chars + self.close_matches + self.mistakes
    }

    /// Percentage of exact keystrokes; 100 before anything was typed.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 100.0;
        }
        self.correct_chars as f64 / total as f64 * 100.0
    }

    fn counter_mut(&mut self, kind: MatchKind) -> &mut u64 {
        match kind {
            MatchKind::Exact => &mut self.correct_chars,
            MatchKind::Close => &mut self.close_matches,
            MatchKind::Wrong => &mut self.mistakes,
        }
    }
}

/// Accumulates classification events into global and per-letter counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsAggregator {
    pub stats: Stats,
    pub letters: LetterStatistics,
}

impl StatsAggregator {
    pub fn new(stats: Stats, letters: LetterStatistics) -> Self {
        Self { stats, letters }
    }

    /// `target` is `None` for input past the end of a line, which only
    /// counts against the global totals.
    pub fn record_typed(&mut self, target: Option<char>, classification: Classification) {
        *self.stats.counter_mut(classification.kind()) += 1;
        if let Some(letter) = target {
            self.letters.record(letter, classification.exact);
        }
    }

    /// Reverses the global counter only. Letter records are learning history
    /// and survive backspacing.
    pub fn record_deleted(&mut self, classification: Classification) {
        let counter = self.stats.counter_mut(classification.kind());
        *counter = counter.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.stats = Stats::default();
        self.letters.clear();
    }
}
