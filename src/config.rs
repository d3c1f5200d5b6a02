use serde::{Deserialize, Serialize};

use crate::keyboard::layout::{DEFAULT_LAYOUT_ID, is_known_layout};
use crate::session::tracker::TypingOptions;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub show_keyboard_highlight: bool,
    #[serde(default = "default_true")]
    pub show_keyboard: bool,
    #[serde(default)]
    pub check_harakat: bool,
    #[serde(default)]
    pub strict_mode: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default, alias = "use_qwerty_mapping")]
    pub use_key_mapping: bool,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
}

fn default_true() -> bool {
    true
}
fn default_keyboard_layout() -> String {
    DEFAULT_LAYOUT_ID.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_keyboard_highlight: default_true(),
            show_keyboard: default_true(),
            check_harakat: false,
            strict_mode: false,
            language: Language::default(),
            keyboard_layout: default_keyboard_layout(),
            use_key_mapping: false,
            auto_advance: default_true(),
        }
    }
}

impl Config {
    /// Reset values that no longer name anything real (stale layout ids,
    /// unsupported languages). Call after deserialization.
    pub fn validate(&mut self) {
        if !is_known_layout(&self.keyboard_layout) {
            self.keyboard_layout = default_keyboard_layout();
        }
        if self.language == Language::Unknown {
            self.language = Language::default();
        }
    }

    pub fn typing_options(&self) -> TypingOptions {
        TypingOptions {
            auto_advance: self.auto_advance,
            strict: self.strict_mode,
            check_diacritics: self.check_harakat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.auto_advance);
        assert!(!config.strict_mode);
        assert_eq!(config.keyboard_layout, "osx-arabic");
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
strict_mode = true
keyboard_layout = "arabic-101"
language = "ar"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.strict_mode);
        assert_eq!(config.keyboard_layout, "arabic-101");
        assert_eq!(config.language, Language::Ar);
        assert!(config.show_keyboard);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.check_harakat = true;
        config.use_key_mapping = true;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_old_mapping_key_is_accepted() {
        let config: Config = toml::from_str("use_qwerty_mapping = true").unwrap();
        assert!(config.use_key_mapping);
    }

    #[test]
    fn test_validate_resets_unknown_layout() {
        let mut config = Config::default();
        config.keyboard_layout = "azerty-arabic".to_string();
        config.validate();
        assert_eq!(config.keyboard_layout, "osx-arabic");
    }

    #[test]
    fn test_validate_keeps_known_layout() {
        let mut config = Config::default();
        config.keyboard_layout = "standard-arabic".to_string();
        config.validate();
        assert_eq!(config.keyboard_layout, "standard-arabic");
    }

    #[test]
    fn test_validate_resets_unknown_language() {
        let mut config: Config = toml::from_str(r#"language = "fr""#).unwrap();
        assert_eq!(config.language, Language::Unknown);
        config.validate();
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_typing_options() {
        let mut config = Config::default();
        config.strict_mode = true;
        config.check_harakat = true;
        config.auto_advance = false;
        let opts = config.typing_options();
        assert!(opts.strict);
        assert!(opts.check_diacritics);
        assert!(!opts.auto_advance);
    }
}
