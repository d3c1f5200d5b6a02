use std::time::{Duration, Instant};

use crate::config::{Config, Language};
use crate::keyboard::layout::{all_layouts, layout_by_id};
use crate::keyboard::mapper::MappingIntent;
use crate::session::practice::PracticeSession;
use crate::ui::theme::Theme;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Practice,
    Statistics,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingField {
    Layout,
    StrictMode,
    CheckHarakat,
    AutoAdvance,
    KeyMapping,
    KeyboardHighlight,
    ShowKeyboard,
    Language,
}

impl SettingField {
    pub const ALL: [SettingField; 8] = [
        SettingField::Layout,
        SettingField::StrictMode,
        SettingField::CheckHarakat,
        SettingField::AutoAdvance,
        SettingField::KeyMapping,
        SettingField::KeyboardHighlight,
        SettingField::ShowKeyboard,
        SettingField::Language,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingField::Layout => "Keyboard Layout",
            SettingField::StrictMode => "Strict Mode",
            SettingField::CheckHarakat => "Check Harakat",
            SettingField::AutoAdvance => "Auto-advance Lines",
            SettingField::KeyMapping => "QWERTY Mapping",
            SettingField::KeyboardHighlight => "Highlight Next Key",
            SettingField::ShowKeyboard => "Show Keyboard",
            SettingField::Language => "Language",
        }
    }

    pub fn value(self, config: &Config) -> String {
        let flag = |on: bool| (if on { "On" } else { "Off" }).to_string();
        match self {
            SettingField::Layout => layout_by_id(&config.keyboard_layout)
                .display_name(config.language)
                .to_string(),
            SettingField::StrictMode => flag(config.strict_mode),
            SettingField::CheckHarakat => flag(config.check_harakat),
            SettingField::AutoAdvance => flag(config.auto_advance),
            SettingField::KeyMapping => flag(config.use_key_mapping),
            SettingField::KeyboardHighlight => flag(config.show_keyboard_highlight),
            SettingField::ShowKeyboard => flag(config.show_keyboard),
            SettingField::Language => match config.language {
                Language::Ar => "العربية".to_string(),
                _ => "English".to_string(),
            },
        }
    }
}

pub struct Notification {
    pub message: String,
    expires: Instant,
}

pub struct App {
    pub session: PracticeSession,
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub notification: Option<Notification>,
    pub settings_selected: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: PracticeSession, theme: &'static Theme) -> Self {
        Self {
            session,
            screen: AppScreen::Practice,
            theme,
            notification: None,
            settings_selected: 0,
            should_quit: false,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            message: message.into(),
            expires: now + NOTIFICATION_TTL,
        });
    }

    /// Drop an expired notification.
    pub fn tick(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|n| now >= n.expires) {
            self.notification = None;
        }
    }

    fn layout_name(&self) -> &'static str {
        self.session
            .layout()
            .display_name(self.session.config().language)
    }

    pub fn type_char(&mut self, ch: char, shift: bool, now: Instant) {
        let handled = self.session.handle_char(ch, shift);
        match handled.intent {
            MappingIntent::Enable => {
                let message = format!(
                    "Latin input detected: mapping keys to {}",
                    self.layout_name()
                );
                self.notify(message, now);
            }
            MappingIntent::Disable => {
                self.notify("Arabic input detected: key mapping off", now);
            }
            MappingIntent::NoChange => {}
        }
    }

    pub fn backspace(&mut self) {
        self.session.backspace();
    }

    pub fn next_line(&mut self) {
        self.session.advance_line();
    }

    pub fn select_previous_line(&mut self) {
        let active = self.session.active_line();
        if active > 0 {
            self.session.select_line(active - 1);
        }
    }

    pub fn select_next_line(&mut self) {
        self.session.select_line(self.session.active_line() + 1);
    }

    pub fn cycle_layout(&mut self, now: Instant) {
        self.session.cycle_layout();
        let message = format!("Keyboard layout: {}", self.layout_name());
        self.notify(message, now);
    }

    pub fn toggle_mapping(&mut self, now: Instant) {
        let enabled = self.session.toggle_key_mapping();
        let message = if enabled {
            "QWERTY mapping on"
        } else {
            "QWERTY mapping off"
        };
        self.notify(message, now);
    }

    pub fn reset_all(&mut self, now: Instant) {
        self.session.reset_all();
        self.notify("Progress and statistics cleared", now);
    }

    pub fn reset_stats(&mut self, now: Instant) {
        self.session.reset_stats();
        self.notify("Statistics cleared", now);
    }

    pub fn go_to_practice(&mut self) {
        self.screen = AppScreen::Practice;
    }

    pub fn go_to_stats(&mut self) {
        self.screen = AppScreen::Statistics;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn settings_prev(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    pub fn settings_next(&mut self) {
        if self.settings_selected + 1 < SettingField::ALL.len() {
            self.settings_selected += 1;
        }
    }

    pub fn selected_setting(&self) -> SettingField {
        SettingField::ALL[self.settings_selected.min(SettingField::ALL.len() - 1)]
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.selected_setting() {
            SettingField::Layout => {
                let layouts = all_layouts();
                let current = layouts
                    .iter()
                    .position(|l| l.id == self.session.config().keyboard_layout)
                    .unwrap_or(0);
                let next = if forward {
                    (current + 1) % layouts.len()
                } else {
                    (current + layouts.len() - 1) % layouts.len()
                };
                self.session.set_layout(layouts[next].id);
            }
            SettingField::StrictMode => self.session.update_config(|c| c.strict_mode = !c.strict_mode),
            SettingField::CheckHarakat => {
                self.session.update_config(|c| c.check_harakat = !c.check_harakat)
            }
            SettingField::AutoAdvance => self.session.update_config(|c| c.auto_advance = !c.auto_advance),
            SettingField::KeyMapping => {
                self.session.toggle_key_mapping();
            }
            SettingField::KeyboardHighlight => self
                .session
                .update_config(|c| c.show_keyboard_highlight = !c.show_keyboard_highlight),
            SettingField::ShowKeyboard => self.session.update_config(|c| c.show_keyboard = !c.show_keyboard),
            SettingField::Language => self.session.update_config(|c| {
                c.language = match c.language {
                    Language::Ar => Language::En,
                    _ => Language::Ar,
                }
            }),
        }
    }

    pub fn rejection_active(&mut self, now: Instant) -> bool {
        self.session.rejection_active(now)
    }
}
