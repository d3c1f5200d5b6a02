use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::letter_stats::LetterStatistics;
use crate::engine::stats::Stats;
use crate::session::text::TargetText;
use crate::store::schema::{PersistedState, ProgressRecord, SCHEMA_VERSION, SessionRecord};
use crate::store::{Changed, StateStore, StoreError};

const CONFIG_FILE: &str = "config.toml";
const TEXT_FILE: &str = "text.txt";
const PROGRESS_FILE: &str = "progress.json";
const SESSION_FILE: &str = "session.json";
const STATS_FILE: &str = "stats.json";
const LETTER_STATS_FILE: &str = "letter_stats.json";

/// File-backed store: settings as TOML under the config directory, practice
/// data as JSON under the data directory.
pub struct JsonStore {
    data_dir: PathBuf,
    config_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self, StoreError> {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("khatt");
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("khatt");
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&config_dir)?;
        Ok(Self {
            data_dir,
            config_dir,
        })
    }

    /// Keep everything in one directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            data_dir: base_dir.clone(),
            config_dir: base_dir,
        })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        if name == CONFIG_FILE {
            self.config_dir.join(name)
        } else {
            self.data_dir.join(name)
        }
    }

    fn read(&self, name: &str) -> Option<String> {
        let path = self.file_path(name);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(file = name, error = %e, "unreadable store file, using defaults");
                None
            }
        }
    }

    fn load_json<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.read(name) {
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(file = name, error = %e, "malformed store file, using defaults");
                T::default()
            }),
            None => T::default(),
        }
    }

    fn write_atomic(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn save_json<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(name, json.as_bytes())
    }

    pub fn load_config(&self) -> Config {
        let mut config = match self.read(CONFIG_FILE) {
            Some(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(error = %e, "malformed config, using defaults");
                Config::default()
            }),
            None => Config::default(),
        };
        config.validate();
        config
    }

    pub fn save_config(&self, config: &Config) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(config)?;
        self.write_atomic(CONFIG_FILE, content.as_bytes())
    }

    pub fn load_text(&self) -> Option<String> {
        self.read(TEXT_FILE)
    }

    pub fn save_text(&self, raw: &str) -> Result<(), StoreError> {
        self.write_atomic(TEXT_FILE, raw.as_bytes())
    }

    /// Per-line progress for `text`. Version 1 kept any non-array value, so
    /// strings, bare scalars and content that is not JSON at all are all
    /// migrated as flat progress.
    pub fn load_progress(&self, text: &TargetText) -> Vec<String> {
        let Some(content) = self.read(PROGRESS_FILE) else {
            return Vec::new();
        };
        let record = match serde_json::from_str::<Value>(&content) {
            Err(_) => ProgressRecord::Flat(content),
            Ok(Value::String(flat)) => ProgressRecord::Flat(flat),
            Ok(Value::Number(_) | Value::Bool(_)) => ProgressRecord::Flat(content.trim().to_string()),
            Ok(Value::Null) => return Vec::new(),
            Ok(lines @ Value::Array(_)) => match serde_json::from_value(lines) {
                Ok(lines) => ProgressRecord::Lines(lines),
                Err(e) => {
                    warn!(error = %e, "malformed progress, starting fresh");
                    return Vec::new();
                }
            },
            Ok(Value::Object(_)) => {
                warn!("progress is an object, starting fresh");
                return Vec::new();
            }
        };
        if matches!(record, ProgressRecord::Flat(_)) {
            info!("migrating flat progress to per-line format");
        }
        record.into_lines(text)
    }

    pub fn save_progress(&self, progress: &[String]) -> Result<(), StoreError> {
        self.save_json(PROGRESS_FILE, &progress)
    }

    pub fn load_session(&self) -> SessionRecord {
        self.load_json(SESSION_FILE)
    }

    pub fn save_session(&self, active_line: usize) -> Result<(), StoreError> {
        self.save_json(
            SESSION_FILE,
            &SessionRecord {
                schema_version: SCHEMA_VERSION,
                active_line,
                saved_at: Some(Utc::now()),
            },
        )
    }

    pub fn load_stats(&self) -> Stats {
        self.load_json(STATS_FILE)
    }

    pub fn save_stats(&self, stats: &Stats) -> Result<(), StoreError> {
        self.save_json(STATS_FILE, stats)
    }

    pub fn load_letter_stats(&self) -> LetterStatistics {
        self.load_json(LETTER_STATS_FILE)
    }

    pub fn save_letter_stats(&self, letters: &LetterStatistics) -> Result<(), StoreError> {
        self.save_json(LETTER_STATS_FILE, letters)
    }
}

impl StateStore for JsonStore {
    fn load(&self) -> PersistedState {
        let config = self.load_config();
        let text = self.load_text();
        let target = TargetText::new(text.as_deref().unwrap_or(""));
        let progress = if text.is_some() {
            self.load_progress(&target)
        } else {
            Vec::new()
        };

        PersistedState {
            config,
            text,
            progress,
            active_line: self.load_session().active_line,
            stats: self.load_stats(),
            letter_stats: self.load_letter_stats(),
        }
    }

    fn save(&self, state: &PersistedState, changed: Changed) -> Result<(), StoreError> {
        if changed.config {
            self.save_config(&state.config)?;
        }
        if let (true, Some(text)) = (changed.text, state.text.as_deref()) {
            self.save_text(text)?;
        }
        if changed.progress {
            self.save_progress(&state.progress)?;
        }
        if changed.cursor {
            self.save_session(state.active_line)?;
        }
        if changed.stats {
            self.save_stats(&state.stats)?;
            self.save_letter_stats(&state.letter_stats)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let (_dir, store) = make_test_store();
        let state = store.load();
        assert_eq!(state, PersistedState::default());
    }

    #[test]
    fn test_round_trip_state() {
        let (_dir, store) = make_test_store();
        let mut state = PersistedState::default();
        state.config.strict_mode = true;
        state.text = Some("اب\nتث".to_string());
        state.progress = vec!["اب".to_string(), "ت".to_string()];
        state.active_line = 1;
        state.stats.correct_chars = 3;
        state.letter_stats.record('ا', true);

        store.save(&state, Changed::ALL).unwrap();
        let loaded = store.load();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_malformed_stats_fall_back_independently() {
        let (_dir, store) = make_test_store();
        let mut letters = LetterStatistics::default();
        letters.record('ب', false);
        store.save_letter_stats(&letters).unwrap();
        fs::write(store.file_path(STATS_FILE), "{ not json").unwrap();

        let state = store.load();
        assert_eq!(state.stats, Stats::default());
        assert_eq!(state.letter_stats, letters);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(CONFIG_FILE), "strict_mode = [").unwrap();
        assert_eq!(store.load_config(), Config::default());
    }

    #[test]
    fn test_config_with_unknown_layout_is_validated() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(CONFIG_FILE), r#"keyboard_layout = "gone""#).unwrap();
        assert_eq!(store.load_config().keyboard_layout, "osx-arabic");
    }

    #[test]
    fn test_flat_json_progress_is_migrated() {
        let (_dir, store) = make_test_store();
        store.save_text("اب\nتث").unwrap();
        fs::write(store.file_path(PROGRESS_FILE), r#""اب ت""#).unwrap();

        let state = store.load();
        assert_eq!(state.progress, vec!["اب", "ت"]);
    }

    #[test]
    fn test_unquoted_legacy_progress_is_migrated() {
        let (_dir, store) = make_test_store();
        store.save_text("اب\nتث").unwrap();
        fs::write(store.file_path(PROGRESS_FILE), "اب تث").unwrap();

        let state = store.load();
        assert_eq!(state.progress, vec!["اب", "تث"]);
    }

    #[test]
    fn test_scalar_json_progress_is_migrated() {
        let (_dir, store) = make_test_store();
        store.save_text("12\nاب").unwrap();
        fs::write(store.file_path(PROGRESS_FILE), "12").unwrap();

        let state = store.load();
        assert_eq!(state.progress, vec!["12", ""]);
    }

    #[test]
    fn test_wrong_shape_progress_is_dropped() {
        let (_dir, store) = make_test_store();
        store.save_text("اب").unwrap();
        fs::write(store.file_path(PROGRESS_FILE), r#"{"line": 1}"#).unwrap();
        assert!(store.load().progress.is_empty());
    }

    #[test]
    fn test_save_leaves_no_tmp_files() {
        let (dir, store) = make_test_store();
        store.save(&PersistedState::default(), Changed::ALL).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_save_writes_only_changed_pieces() {
        let (_dir, store) = make_test_store();
        let mut state = PersistedState::default();
        state.text = Some("اب".to_string());
        state.progress = vec!["ا".to_string()];
        state.stats.correct_chars = 1;

        store.save(&state, Changed::PROGRESS | Changed::STATS).unwrap();

        assert!(!store.file_path(CONFIG_FILE).exists());
        assert!(!store.file_path(TEXT_FILE).exists());
        assert!(!store.file_path(SESSION_FILE).exists());
        assert!(store.file_path(PROGRESS_FILE).exists());
        assert_eq!(store.load_stats().correct_chars, 1);
        assert!(store.file_path(LETTER_STATS_FILE).exists());
    }

    #[test]
    fn test_session_record_is_stamped() {
        let (_dir, store) = make_test_store();
        store.save_session(2).unwrap();
        let record = store.load_session();
        assert_eq!(record.active_line, 2);
        assert_eq!(record.schema_version, SCHEMA_VERSION);
        assert!(record.saved_at.is_some());
    }
}
