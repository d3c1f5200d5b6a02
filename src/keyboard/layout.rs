//! Static Arabic keyboard layouts, keyed by the physical QWERTY labels printed
//! on a Latin keyboard.

use crate::config::Language;

pub const DEFAULT_LAYOUT_ID: &str = "osx-arabic";

/// One physical key: the Arabic characters it produces and the Latin labels
/// the host reports for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyDefinition {
    pub base: char,
    pub shifted: Option<char>,
    pub label: char,
    pub shifted_label: Option<char>,
}

const fn key(base: char, label: char, shifted_label: char) -> KeyDefinition {
    KeyDefinition {
        base,
        shifted: None,
        label,
        shifted_label: Some(shifted_label),
    }
}

const fn shifted(base: char, shifted: char, label: char, shifted_label: char) -> KeyDefinition {
    KeyDefinition {
        base,
        shifted: Some(shifted),
        label,
        shifted_label: Some(shifted_label),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct KeyboardLayout {
    pub id: &'static str,
    pub name: &'static str,
    pub name_ar: &'static str,
    /// Rows top to bottom, keys left to right.
    pub rows: &'static [&'static [KeyDefinition]],
}

/// Where to find a character on the physical keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyHint {
    pub label: char,
    pub needs_shift: bool,
}

impl KeyboardLayout {
    pub fn keys(&self) -> impl Iterator<Item = &KeyDefinition> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    pub fn display_name(&self, language: Language) -> &'static str {
        match language {
            Language::Ar => self.name_ar,
            _ => self.name,
        }
    }

    /// Locate the key producing `ch`. An unshifted position wins over a
    /// shifted one anywhere on the board.
    pub fn key_for(&self, ch: char) -> Option<KeyHint> {
        if let Some(key) = self.keys().find(|k| k.base == ch) {
            return Some(KeyHint {
                label: key.label,
                needs_shift: false,
            });
        }
        self.keys()
            .find(|k| k.shifted == Some(ch))
            .map(|key| KeyHint {
                label: key.shifted_label.unwrap_or(key.label),
                needs_shift: true,
            })
    }
}

pub static LAYOUTS: &[KeyboardLayout] = &[OSX_ARABIC, STANDARD_ARABIC, ARABIC_101, ARABIC_102];

pub fn all_layouts() -> &'static [KeyboardLayout] {
    LAYOUTS
}

pub fn is_known_layout(id: &str) -> bool {
    LAYOUTS.iter().any(|l| l.id == id)
}

/// Unknown ids resolve to the default layout.
pub fn layout_by_id(id: &str) -> &'static KeyboardLayout {
    LAYOUTS
        .iter()
        .find(|l| l.id == id)
        .unwrap_or(&LAYOUTS[0])
}

/// The layout after `id` in table order, wrapping around.
pub fn next_layout_id(id: &str) -> &'static str {
    let idx = LAYOUTS.iter().position(|l| l.id == id).unwrap_or(0);
    LAYOUTS[(idx + 1) % LAYOUTS.len()].id
}

pub const OSX_ARABIC: KeyboardLayout = KeyboardLayout {
    id: "osx-arabic",
    name: "OS X Arabic",
    name_ar: "نظام ماك العربي",
    rows: &[
        &[
            key('ـ', '`', '~'),
            shifted('١', '!', '1', '!'),
            shifted('٢', '@', '2', '@'),
            shifted('٣', '#', '3', '#'),
            shifted('٤', '$', '4', '$'),
            shifted('٥', '%', '5', '%'),
            shifted('٦', '^', '6', '^'),
            shifted('٧', '&', '7', '&'),
            shifted('٨', '*', '8', '*'),
            shifted('٩', ')', '9', '('),
            shifted('٠', '(', '0', ')'),
            shifted('-', '_', '-', '_'),
            shifted('=', '+', '=', '+'),
        ],
        &[
            shifted('ض', '\u{064E}', 'q', 'Q'),
            shifted('ص', '\u{064B}', 'w', 'W'),
            shifted('ث', '\u{064F}', 'e', 'E'),
            shifted('ق', '\u{064D}', 'r', 'R'),
            shifted('ف', '\u{064F}', 't', 'T'),
            shifted('غ', '\u{064C}', 'y', 'Y'),
            shifted('ع', '\u{0652}', 'u', 'U'),
            shifted('ه', '\u{0651}', 'i', 'I'),
            shifted('خ', ']', 'o', 'O'),
            shifted('ح', '[', 'p', 'P'),
            shifted('ج', '}', '[', '{'),
            shifted('ة', '{', ']', '}'),
            shifted('\\', '|', '\\', '|'),
        ],
        &[
            shifted('ش', '»', 'a', 'A'),
            shifted('س', '«', 's', 'S'),
            shifted('ي', 'ى', 'd', 'D'),
            key('ب', 'f', 'F'),
            key('ل', 'g', 'G'),
            shifted('ا', 'آ', 'h', 'H'),
            key('ت', 'j', 'J'),
            shifted('ن', '٫', 'k', 'K'),
            shifted('م', '٬', 'l', 'L'),
            shifted('ك', ':', ';', ':'),
            shifted('؛', '"', '\'', '"'),
        ],
        &[
            shifted('ظ', '\'', 'z', 'Z'),
            key('ط', 'x', 'X'),
            shifted('ذ', 'ئ', 'c', 'C'),
            shifted('د', 'ء', 'v', 'V'),
            shifted('ز', 'أ', 'b', 'B'),
            shifted('ر', 'إ', 'n', 'N'),
            shifted('و', 'ؤ', 'm', 'M'),
            shifted('،', '>', ',', '<'),
            shifted('.', '<', '.', '>'),
            shifted('/', '؟', '/', '?'),
        ],
    ],
};

pub const STANDARD_ARABIC: KeyboardLayout = KeyboardLayout {
    id: "standard-arabic",
    name: "Standard Arabic",
    name_ar: "النظام العربي القياسي",
    rows: &[
        &[
            shifted('ذ', '\u{0651}', '`', '~'),
            shifted('١', '!', '1', '!'),
            shifted('٢', '@', '2', '@'),
            shifted('٣', '#', '3', '#'),
            shifted('٤', '$', '4', '$'),
            shifted('٥', '%', '5', '%'),
            shifted('٦', '^', '6', '^'),
            shifted('٧', '&', '7', '&'),
            shifted('٨', '*', '8', '*'),
            shifted('٩', '(', '9', '('),
            shifted('٠', ')', '0', ')'),
            shifted('-', '_', '-', '_'),
            shifted('=', '+', '=', '+'),
        ],
        &[
            shifted('ض', '\u{064E}', 'q', 'Q'),
            shifted('ص', '\u{064B}', 'w', 'W'),
            shifted('ث', '\u{064F}', 'e', 'E'),
            shifted('ق', '\u{064C}', 'r', 'R'),
            shifted('ف', 'ﻹ', 't', 'T'),
            shifted('غ', 'إ', 'y', 'Y'),
            shifted('ع', '\'', 'u', 'U'),
            shifted('ه', '÷', 'i', 'I'),
            shifted('خ', '×', 'o', 'O'),
            shifted('ح', '؛', 'p', 'P'),
            shifted('ج', '<', '[', '{'),
            shifted('د', '>', ']', '}'),
            shifted('\\', '|', '\\', '|'),
        ],
        &[
            shifted('ش', '\u{0650}', 'a', 'A'),
            shifted('س', '\u{064D}', 's', 'S'),
            shifted('ي', ']', 'd', 'D'),
            shifted('ب', '[', 'f', 'F'),
            shifted('ل', 'ﻷ', 'g', 'G'),
            shifted('ا', 'أ', 'h', 'H'),
            shifted('ت', 'ـ', 'j', 'J'),
            shifted('ن', '،', 'k', 'K'),
            shifted('م', '/', 'l', 'L'),
            shifted('ك', ':', ';', ':'),
            shifted('ط', '"', '\'', '"'),
        ],
        &[
            shifted('ئ', '~', 'z', 'Z'),
            shifted('ء', '\u{0652}', 'x', 'X'),
            shifted('ؤ', '}', 'c', 'C'),
            shifted('ر', '{', 'v', 'V'),
            shifted('ﻻ', 'ﻵ', 'b', 'B'),
            shifted('ى', 'آ', 'n', 'N'),
            shifted('ة', '\'', 'm', 'M'),
            shifted('و', ',', ',', '<'),
            shifted('ز', '.', '.', '>'),
            shifted('ظ', '؟', '/', '?'),
        ],
    ],
};

pub const ARABIC_101: KeyboardLayout = KeyboardLayout {
    id: "arabic-101",
    name: "Arabic 101 (ISO105)",
    name_ar: "العربية 101 (ISO105)",
    rows: &[
        &[
            shifted('ذ', '\u{0651}', '`', '~'),
            shifted('١', '!', '1', '!'),
            shifted('٢', '@', '2', '@'),
            shifted('٣', '#', '3', '#'),
            shifted('٤', '$', '4', '$'),
            shifted('٥', '%', '5', '%'),
            shifted('٦', '^', '6', '^'),
            shifted('٧', '&', '7', '&'),
            shifted('٨', '*', '8', '*'),
            shifted('٩', '(', '9', '('),
            shifted('٠', ')', '0', ')'),
            shifted('-', '_', '-', '_'),
            shifted('=', '+', '=', '+'),
        ],
        &[
            shifted('ض', '\u{064E}', 'q', 'Q'),
            shifted('ص', '\u{064B}', 'w', 'W'),
            shifted('ث', '\u{064F}', 'e', 'E'),
            shifted('ق', '\u{064C}', 'r', 'R'),
            shifted('ف', 'ﻹ', 't', 'T'),
            shifted('غ', 'إ', 'y', 'Y'),
            shifted('ع', '\'', 'u', 'U'),
            shifted('ه', '÷', 'i', 'I'),
            shifted('خ', '×', 'o', 'O'),
            shifted('ح', '؛', 'p', 'P'),
            shifted('ج', '{', '[', '{'),
            shifted('د', '}', ']', '}'),
        ],
        &[
            shifted('ش', '\u{0650}', 'a', 'A'),
            shifted('س', '\u{064D}', 's', 'S'),
            shifted('ي', ']', 'd', 'D'),
            shifted('ب', '[', 'f', 'F'),
            shifted('ل', 'ﻷ', 'g', 'G'),
            shifted('ا', 'أ', 'h', 'H'),
            shifted('ت', 'ـ', 'j', 'J'),
            shifted('ن', '،', 'k', 'K'),
            shifted('م', '/', 'l', 'L'),
            shifted('ك', ':', ';', ':'),
            shifted('ط', '"', '\'', '"'),
            shifted('\\', '|', '#', '~'),
        ],
        &[
            shifted('\\', '|', '\\', '|'),
            shifted('ئ', '~', 'z', 'Z'),
            shifted('ء', '\u{0652}', 'x', 'X'),
            shifted('ؤ', '}', 'c', 'C'),
            shifted('ر', '{', 'v', 'V'),
            shifted('ﻻ', 'ﻵ', 'b', 'B'),
            shifted('ى', 'آ', 'n', 'N'),
            shifted('ة', '\'', 'm', 'M'),
            shifted('و', ',', ',', '<'),
            shifted('ز', '.', '.', '>'),
            shifted('ظ', '؟', '/', '?'),
        ],
    ],
};

pub const ARABIC_102: KeyboardLayout = KeyboardLayout {
    id: "arabic-102",
    name: "Arabic 102 (ISO105)",
    name_ar: "العربية 102 (ISO105)",
    rows: &[
        &[
            shifted('>', '<', '`', '~'),
            shifted('١', '!', '1', '!'),
            shifted('٢', '@', '2', '@'),
            shifted('٣', '#', '3', '#'),
            shifted('٤', '$', '4', '$'),
            shifted('٥', '%', '5', '%'),
            shifted('٦', '^', '6', '^'),
            shifted('٧', '&', '7', '&'),
            shifted('٨', '*', '8', '*'),
            shifted('٩', '(', '9', '('),
            shifted('٠', ')', '0', ')'),
            shifted('-', '_', '-', '_'),
            shifted('=', '+', '=', '+'),
        ],
        &[
            shifted('ض', '\u{064E}', 'q', 'Q'),
            shifted('ص', '\u{064B}', 'w', 'W'),
            shifted('ث', '\u{064F}', 'e', 'E'),
            shifted('ق', '\u{064C}', 'r', 'R'),
            shifted('ف', 'ﻹ', 't', 'T'),
            shifted('غ', 'إ', 'y', 'Y'),
            shifted('ع', '\'', 'u', 'U'),
            shifted('ه', '÷', 'i', 'I'),
            shifted('خ', '×', 'o', 'O'),
            shifted('ح', '؛', 'p', 'P'),
            shifted('ج', '{', '[', '{'),
            shifted('د', '}', ']', '}'),
        ],
        &[
            shifted('ش', '\u{0650}', 'a', 'A'),
            shifted('س', '\u{064D}', 's', 'S'),
            shifted('ي', ']', 'd', 'D'),
            shifted('ب', '[', 'f', 'F'),
            shifted('ل', 'ﻷ', 'g', 'G'),
            shifted('ا', 'أ', 'h', 'H'),
            shifted('ت', 'ـ', 'j', 'J'),
            shifted('ن', '،', 'k', 'K'),
            shifted('م', '/', 'l', 'L'),
            shifted('ك', ':', ';', ':'),
            shifted('ط', '"', '\'', '"'),
            shifted('ذ', '\u{064C}', '\\', '|'),
        ],
        &[
            shifted('ئ', '~', 'z', 'Z'),
            shifted('ء', '\u{0652}', 'x', 'X'),
            shifted('ؤ', '}', 'c', 'C'),
            shifted('ر', '{', 'v', 'V'),
            shifted('ﻻ', 'ﻵ', 'b', 'B'),
            shifted('ى', 'آ', 'n', 'N'),
            shifted('ة', '\'', 'm', 'M'),
            shifted('و', ',', ',', '<'),
            shifted('ز', '.', '.', '>'),
            shifted('ظ', '؟', '/', '?'),
        ],
    ],
};
