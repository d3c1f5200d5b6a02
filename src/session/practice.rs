use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::letter_stats::LetterStatistics;
use crate::engine::matcher::{self, Classification};
use crate::engine::stats::{Stats, StatsAggregator};
use crate::keyboard::layout::{KeyboardLayout, layout_by_id, next_layout_id};
use crate::keyboard::mapper::{KeyMapper, MappingIntent, mapping_intent};
use crate::session::text::{TargetText, default_text};
use crate::session::tracker::{LineTracker, TypeOutcome};
use crate::session::view::PracticeView;
use crate::store::{Changed, StateStore};
use crate::store::schema::PersistedState;

pub const REJECTION_FLASH: Duration = Duration::from_millis(500);

/// Short-lived marker raised when strict mode refuses a keystroke.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectionFlash {
    until: Option<Instant>,
}

impl RejectionFlash {
    pub fn trigger(&mut self, now: Instant) {
        self.until = Some(now + REJECTION_FLASH);
    }

    /// Clears itself once the deadline has passed.
    pub fn is_active(&mut self, now: Instant) -> bool {
        match self.until {
            Some(deadline) if now < deadline => true,
            Some(_) => {
                self.until = None;
                false
            }
            None => false,
        }
    }
}

/// What a keystroke did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEffect {
    Typed(TypeOutcome),
    /// A space on a finished line moved on to the next line.
    Advanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandledInput {
    /// Mapping change applied before the keystroke, for the host to announce.
    pub intent: MappingIntent,
    pub effect: InputEffect,
}

/// Owns everything a practice run mutates and writes it back through the
/// store after every change.
pub struct PracticeSession {
    config: Config,
    mapper: KeyMapper,
    tracker: LineTracker,
    aggregator: StatsAggregator,
    flash: RejectionFlash,
    store: Option<Box<dyn StateStore>>,
}

impl PracticeSession {
    pub fn new(config: Config, raw_text: &str) -> Self {
        Self::from_state(PersistedState {
            config,
            text: Some(raw_text.to_string()),
            ..PersistedState::default()
        })
    }

    pub fn from_state(state: PersistedState) -> Self {
        let mut config = state.config;
        config.validate();
        let raw = state.text.unwrap_or_else(default_text);

        Self {
            mapper: KeyMapper::new(&config.keyboard_layout),
            tracker: LineTracker::new(TargetText::new(&raw), state.progress, state.active_line),
            aggregator: StatsAggregator::new(state.stats, state.letter_stats),
            flash: RejectionFlash::default(),
            store: None,
            config,
        }
    }

    /// Restore from `store` and keep saving to it.
    pub fn with_store(store: Box<dyn StateStore>) -> Self {
        let mut session = Self::from_state(store.load());
        session.store = Some(store);
        session
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            config: self.config.clone(),
            text: Some(self.tracker.text().raw().to_string()),
            progress: self.tracker.progress().to_vec(),
            active_line: self.tracker.active_line(),
            stats: self.aggregator.stats,
            letter_stats: self.aggregator.letters.clone(),
        }
    }

    fn persist(&self, changed: Changed) {
        if let Some(ref store) = self.store {
            if let Err(e) = store.save(&self.snapshot(), changed) {
                warn!(error = %e, "failed to save session state");
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply a settings change, rebuilding the mapper if the layout moved.
    pub fn update_config(&mut self, update: impl FnOnce(&mut Config)) {
        update(&mut self.config);
        self.config.validate();
        if self.mapper.layout_id() != self.config.keyboard_layout {
            self.mapper.initialize(&self.config.keyboard_layout);
        }
        self.persist(Changed::CONFIG);
    }

    pub fn layout(&self) -> &'static KeyboardLayout {
        layout_by_id(&self.config.keyboard_layout)
    }

    /// Unknown ids fall back to the default layout.
    pub fn set_layout(&mut self, layout_id: &str) {
        let id = layout_by_id(layout_id).id;
        self.update_config(|config| config.keyboard_layout = id.to_string());
    }

    pub fn cycle_layout(&mut self) -> &'static KeyboardLayout {
        let next = next_layout_id(&self.config.keyboard_layout);
        self.set_layout(next);
        self.layout()
    }

    pub fn map_key(&self, label: char, shift: bool) -> Option<char> {
        self.mapper.map_key(label, shift)
    }

    pub fn classify(&self, typed: Option<char>, target: char) -> Classification {
        matcher::classify(typed, target, self.config.typing_options().match_options())
    }

    /// Replace the practice text. Buffers of surviving lines are kept but the
    /// statistics start over.
    pub fn set_text(&mut self, raw: &str) {
        self.tracker.set_text(raw);
        self.aggregator.reset();
        info!(lines = self.tracker.line_count(), "practice text replaced");
        self.persist(Changed::TEXT | Changed::PROGRESS | Changed::CURSOR | Changed::STATS);
    }

    /// Switch to `raw` unless it already is the practice text, so reopening
    /// the same file keeps statistics. Returns whether the text changed.
    pub fn use_text(&mut self, raw: &str) -> bool {
        if raw == self.tracker.text().raw() {
            return false;
        }
        self.set_text(raw);
        true
    }

    pub fn text(&self) -> &TargetText {
        self.tracker.text()
    }

    pub fn type_char(&mut self, ch: char) -> TypeOutcome {
        let outcome = self.tracker.type_char(ch, self.config.typing_options());
        match outcome {
            TypeOutcome::Accepted { event, advanced } => {
                self.aggregator.record_typed(event.target, event.classification);
                let changed = Changed::PROGRESS | Changed::STATS;
                self.persist(if advanced { changed | Changed::CURSOR } else { changed });
            }
            TypeOutcome::Rejected { expected } => {
                debug!(typed = %ch, ?expected, "strict mode rejected keystroke");
                self.flash.trigger(Instant::now());
            }
        }
        outcome
    }

    /// Entry point for raw keyboard input: applies the mapping policy, maps
    /// Latin labels when mapping is on, and advances on a space typed at the
    /// end of a finished line.
    pub fn handle_char(&mut self, ch: char, shift: bool) -> HandledInput {
        if ch == ' '
            && self.tracker.is_line_complete(self.tracker.active_line())
            && self.tracker.has_next_line()
        {
            self.advance_line();
            return HandledInput {
                intent: MappingIntent::NoChange,
                effect: InputEffect::Advanced,
            };
        }

        let intent = mapping_intent(ch, self.config.use_key_mapping);
        self.apply_mapping_intent(intent);

        let effective = if self.config.use_key_mapping {
            let shift = shift || self.mapper.is_shift_label(ch);
            self.mapper.map_key(ch, shift).unwrap_or(ch)
        } else {
            ch
        };

        HandledInput {
            intent,
            effect: InputEffect::Typed(self.type_char(effective)),
        }
    }

    pub fn apply_mapping_intent(&mut self, intent: MappingIntent) {
        let enable = match intent {
            MappingIntent::Enable => true,
            MappingIntent::Disable => false,
            MappingIntent::NoChange => return,
        };
        info!(enabled = enable, "key mapping toggled by input");
        self.update_config(|config| config.use_key_mapping = enable);
    }

    pub fn toggle_key_mapping(&mut self) -> bool {
        self.update_config(|config| config.use_key_mapping = !config.use_key_mapping);
        self.config.use_key_mapping
    }

    pub fn delete_char(&mut self, count: usize) {
        let options = self.config.typing_options().match_options();
        let removed = self.tracker.delete_chars(count, options);
        if removed.is_empty() {
            return;
        }
        for event in &removed {
            self.aggregator.record_deleted(event.classification);
        }
        self.persist(Changed::PROGRESS | Changed::STATS);
    }

    /// Delete one character, or step back a line from an empty buffer.
    pub fn backspace(&mut self) {
        if self.tracker.active_buffer().is_empty() {
            self.retreat_line();
        } else {
            self.delete_char(1);
        }
    }

    pub fn advance_line(&mut self) -> bool {
        let moved = self.tracker.advance();
        if moved {
            self.persist(Changed::CURSOR);
        }
        moved
    }

    pub fn retreat_line(&mut self) -> bool {
        let moved = self.tracker.retreat();
        if moved {
            self.persist(Changed::CURSOR);
        }
        moved
    }

    pub fn select_line(&mut self, index: usize) -> bool {
        let moved = self.tracker.select_line(index);
        if moved {
            self.persist(Changed::CURSOR);
        }
        moved
    }

    pub fn active_line(&self) -> usize {
        self.tracker.active_line()
    }

    pub fn line_count(&self) -> usize {
        self.tracker.line_count()
    }

    pub fn progress(&self) -> &[String] {
        self.tracker.progress()
    }

    pub fn view(&self) -> PracticeView {
        PracticeView::build(
            &self.tracker,
            self.config.typing_options().match_options(),
            self.layout(),
        )
    }

    pub fn stats(&self) -> Stats {
        self.aggregator.stats
    }

    pub fn letter_stats(&self) -> &LetterStatistics {
        &self.aggregator.letters
    }

    pub fn reset_stats(&mut self) {
        self.aggregator.reset();
        self.persist(Changed::STATS);
    }

    /// Statistics, every line buffer and the cursor all start over.
    pub fn reset_all(&mut self) {
        self.aggregator.reset();
        self.tracker.clear_progress();
        info!("session reset");
        self.persist(Changed::STATS | Changed::PROGRESS | Changed::CURSOR);
    }

    pub fn is_complete(&self) -> bool {
        self.tracker.is_complete()
    }

    /// Share of target characters covered by typed input, 0.0..=1.0.
    pub fn progress_ratio(&self) -> f64 {
        let text = self.tracker.text();
        let total: usize = text.lines().map(<[char]>::len).sum();
        if total == 0 {
            return 0.0;
        }
        let typed: usize = (0..text.line_count())
            .map(|line| {
                self.tracker
                    .buffer(line)
                    .chars()
                    .count()
                    .min(text.line_len(line))
            })
            .sum();
        typed as f64 / total as f64
    }

    pub fn rejection_active(&mut self, now: Instant) -> bool {
        self.flash.is_active(now)
    }
}
