/// Outcome of comparing one typed character with one target character.
///
/// `exact` and `close` are never both set; neither set means a mistake.
/// `space` only describes the target and is independent of the outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub exact: bool,
    pub close: bool,
    pub space: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Exact,
    Close,
    Wrong,
}

impl Classification {
    pub fn kind(&self) -> MatchKind {
        if self.exact {
            MatchKind::Exact
        } else if self.close {
            MatchKind::Close
        } else {
            MatchKind::Wrong
        }
    }

    pub fn is_wrong(&self) -> bool {
        self.kind() == MatchKind::Wrong
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Harakat must be typed exactly.
    pub check_diacritics: bool,
    pub strict: bool,
}

impl MatchOptions {
    fn tolerant(&self) -> bool {
        !self.check_diacritics && !self.strict
    }
}

const ALEF: char = '\u{0627}';
const WAW: char = '\u{0648}';
const YEH: char = '\u{064A}';
const FATHA: char = '\u{064E}';
const DAMMA: char = '\u{064F}';
const KASRA: char = '\u{0650}';

/// Base letter and the forms accepted in its place (and it in theirs).
const EQUIVALENTS: &[(char, &[char])] = &[
    // hamza above, hamza below, madda, wasla
    (ALEF, &['\u{0623}', '\u{0625}', '\u{0622}', '\u{0671}']),
    // hamza on waw
    (WAW, &['\u{0624}']),
    // hamza on yeh, alef maksura
    (YEH, &['\u{0626}', '\u{0649}']),
    (FATHA, &[ALEF]),
    (DAMMA, &[WAW]),
    (KASRA, &[YEH]),
];

pub fn is_harakah(ch: char) -> bool {
    ('\u{064B}'..='\u{065F}').contains(&ch)
}

pub fn strip_harakat(text: &str) -> String {
    text.chars().filter(|&c| !is_harakah(c)).collect()
}

fn same_class(typed: char, target: char) -> bool {
    EQUIVALENTS.iter().any(|&(base, variants)| {
        (typed == base && variants.contains(&target))
            || (target == base && variants.contains(&typed))
            || (variants.contains(&typed) && variants.contains(&target))
    })
}

/// Two differing characters that are orthographic stand-ins for each other,
/// or equal once harakat are removed.
pub fn is_close_match(typed: Option<char>, target: char, options: MatchOptions) -> bool {
    let Some(typed) = typed else {
        return false;
    };
    if !options.tolerant() || typed == target {
        return false;
    }
    if same_class(typed, target) {
        return true;
    }
    // A lone haraka strips to the empty string, so a haraka typed for a
    // haraka counts as close.
    strip_harakat(&typed.to_string()) == strip_harakat(&target.to_string())
}

/// `typed` is `None` for positions the user has not reached yet.
pub fn classify(typed: Option<char>, target: char, options: MatchOptions) -> Classification {
    let exact = typed == Some(target);
    Classification {
        exact,
        close: !exact && is_close_match(typed, target, options),
        space: target == ' ',
    }
}
