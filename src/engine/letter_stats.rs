use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attempts and exact hits recorded against one target letter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterStat {
    pub attempts: u64,
    pub successes: u64,
}

impl LetterStat {
    /// `None` until the letter has been attempted.
    pub fn accuracy(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.successes as f64 / self.attempts as f64)
        }
    }

    pub fn mistakes(&self) -> u64 {
        self.attempts.saturating_sub(self.successes)
    }

    /// Accuracy as a hue from red (0) to green (120).
    pub fn hue(&self) -> Option<f64> {
        self.accuracy().map(|a| a * 120.0)
    }
}

/// Per-letter learning record, keyed by the target character.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterStatistics {
    pub stats: HashMap<char, LetterStat>,
}

impl LetterStatistics {
    pub fn record(&mut self, letter: char, success: bool) {
        let stat = self.stats.entry(letter).or_default();
        stat.attempts += 1;
        if success {
            stat.successes += 1;
        }
    }

    pub fn get(&self, letter: char) -> Option<&LetterStat> {
        self.stats.get(&letter)
    }

    pub fn accuracy(&self, letter: char) -> Option<f64> {
        self.stats.get(&letter).and_then(LetterStat::accuracy)
    }

    pub fn clear(&mut self) {
        self.stats.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Attempted letters, least accurate first.
    pub fn weakest(&self, limit: usize) -> Vec<(char, LetterStat)> {
        let mut letters: Vec<(char, LetterStat)> = self
            .stats
            .iter()
            .filter(|(_, s)| s.attempts > 0)
            .map(|(&ch, &s)| (ch, s))
            .collect();
        letters.sort_by(|a, b| {
            let acc_a = a.1.accuracy().unwrap_or(0.0);
            let acc_b = b.1.accuracy().unwrap_or(0.0);
            acc_a
                .total_cmp(&acc_b)
                .then(b.1.attempts.cmp(&a.1.attempts))
                .then(a.0.cmp(&b.0))
        });
        letters.truncate(limit);
        letters
    }
}
