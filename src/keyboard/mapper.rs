use std::collections::HashMap;

use tracing::debug;

use crate::keyboard::layout::layout_by_id;

/// Translates Latin key labels into Arabic characters for one layout.
#[derive(Clone, Debug, Default)]
pub struct KeyMapper {
    layout_id: String,
    unshifted: HashMap<char, char>,
    shifted: HashMap<char, char>,
}

/// What the caller should do with the Latin-to-Arabic mapping after seeing a
/// typed character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingIntent {
    Enable,
    Disable,
    NoChange,
}

impl KeyMapper {
    pub fn new(layout_id: &str) -> Self {
        let mut mapper = Self::default();
        mapper.initialize(layout_id);
        mapper
    }

    /// Rebuild both tables from scratch for `layout_id`.
    pub fn initialize(&mut self, layout_id: &str) {
        self.unshifted.clear();
        self.shifted.clear();

        let layout = layout_by_id(layout_id);
        for key in layout.keys() {
            self.unshifted.insert(fold_case(key.label), key.base);
            if let (Some(label), Some(ch)) = (key.shifted_label, key.shifted) {
                self.shifted.insert(label, ch);
            }
        }
        self.layout_id = layout.id.to_string();

        debug!(
            layout = layout.id,
            unshifted = self.unshifted.len(),
            shifted = self.shifted.len(),
            "key mapper initialized"
        );
    }

    /// Id of the layout the tables were built from (after fallback).
    pub fn layout_id(&self) -> &str {
        &self.layout_id
    }

    /// Shifted lookups use the label exactly as reported; everything else
    /// falls through to the case-folded unshifted table.
    pub fn map_key(&self, label: char, shift: bool) -> Option<char> {
        if shift {
            if let Some(&ch) = self.shifted.get(&label) {
                return Some(ch);
            }
        }
        self.unshifted.get(&fold_case(label)).copied()
    }

    /// Whether `label` is what the host reports for a shifted key, for hosts
    /// that deliver produced characters without a modifier flag.
    pub fn is_shift_label(&self, label: char) -> bool {
        self.shifted.contains_key(&label)
    }
}

fn fold_case(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

pub fn is_latin_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn is_arabic(ch: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&ch)
}

/// Latin letters suggest turning mapping on; Arabic-block characters suggest
/// turning it off.
pub fn mapping_intent(ch: char, mapping_active: bool) -> MappingIntent {
    if is_latin_letter(ch) && !mapping_active {
        MappingIntent::Enable
    } else if is_arabic(ch) && mapping_active {
        MappingIntent::Disable
    } else {
        MappingIntent::NoChange
    }
}
