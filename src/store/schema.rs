use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::letter_stats::LetterStatistics;
use crate::engine::stats::Stats;
use crate::session::text::TargetText;

pub const SCHEMA_VERSION: u32 = 2;

/// Stored typing progress. Version 1 kept one string for the whole text;
/// version 2 keeps one string per line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressRecord {
    Lines(Vec<String>),
    Flat(String),
}

impl ProgressRecord {
    pub fn into_lines(self, text: &TargetText) -> Vec<String> {
        match self {
            ProgressRecord::Lines(lines) => lines,
            ProgressRecord::Flat(flat) => migrate_flat_progress(&flat, text),
        }
    }
}

/// Cut a version 1 progress string into per-line buffers. The flat string
/// held each trimmed raw line's input followed by one separator.
pub fn migrate_flat_progress(flat: &str, text: &TargetText) -> Vec<String> {
    let chars: Vec<char> = flat.chars().collect();
    let mut start = 0usize;
    let mut lines = Vec::with_capacity(text.line_count());

    for len in text.raw_line_lengths() {
        let end = start + len;
        let from = start.min(chars.len());
        let to = end.min(chars.len());
        lines.push(chars[from..to].iter().collect());
        start = end + 1;
    }
    lines
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub schema_version: u32,
    #[serde(default, alias = "currentLineIndex")]
    pub active_line: usize,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            active_line: 0,
            saved_at: None,
        }
    }
}

/// Everything a session restores on startup and hands back after each
/// mutation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistedState {
    pub config: Config,
    /// `None` when no text was ever saved.
    pub text: Option<String>,
    pub progress: Vec<String>,
    pub active_line: usize,
    pub stats: Stats,
    pub letter_stats: LetterStatistics,
}
