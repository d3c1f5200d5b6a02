use icu_normalizer::properties::CanonicalCompositionBorrowed;
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/texts/"]
struct TextAssets;

/// The bundled welcome text used until the user supplies their own.
pub fn default_text() -> String {
    TextAssets::get("welcome.txt")
        .and_then(|file| String::from_utf8(file.data.into_owned()).ok())
        .unwrap_or_default()
}

/// Combining madda, hamza above and hamza below.
const HAMZA_MARKS: std::ops::RangeInclusive<char> = '\u{0653}'..='\u{0655}';

/// Fold a decomposed hamza or madda into the precomposed letter a keyboard
/// produces. Other marks keep their written order, so a line typed exactly
/// as written always matches it.
fn compose_hamza(line: &str) -> Vec<char> {
    let composition = CanonicalCompositionBorrowed::new();
    let mut out: Vec<char> = Vec::with_capacity(line.len());
    for ch in line.chars() {
        let composed = match out.last() {
            Some(&base) if HAMZA_MARKS.contains(&ch) => composition.compose(base, ch),
            _ => None,
        };
        match composed {
            Some(letter) => {
                out.pop();
                out.push(letter);
            }
            None => out.push(ch),
        }
    }
    out
}

/// Practice text split into lines. Keeps the raw text for persistence and
/// the trimmed lines, with hamza forms composed, used as matching targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetText {
    raw: String,
    lines: Vec<Vec<char>>,
}

impl TargetText {
    pub fn new(raw: &str) -> Self {
        let lines = raw.split('\n').map(|line| compose_hamza(line.trim())).collect();
        Self {
            raw: raw.to_string(),
            lines,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Never zero: empty input is a single empty line.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> &[char] {
        self.lines.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn line_string(&self, index: usize) -> String {
        self.line(index).iter().collect()
    }

    pub fn char_at(&self, line: usize, pos: usize) -> Option<char> {
        self.line(line).get(pos).copied()
    }

    pub fn line_len(&self, index: usize) -> usize {
        self.line(index).len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &[char]> {
        self.lines.iter().map(Vec::as_slice)
    }

    /// Character counts of the trimmed raw lines, before hamza composition.
    pub fn raw_line_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.raw.split('\n').map(|line| line.trim().chars().count())
    }
}
