// Persian text normalization
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;

const ZWNJ: char = '\u{200c}';
const KASHIDA: char = '\u{0640}';

/// Canonicalizes Persian (and mixed-script) text before tokenization.
///
/// Steps, in order:
/// - NFKC, which folds Arabic presentation forms back to base letters
/// - Arabic letter variants mapped to their Persian forms (ك → ک, ي/ى → ی)
/// - Arabic-Indic digits mapped to Persian digits
/// - harakat, superscript alef and kashida removed
/// - lowercase
/// - whitespace collapsed, stray zero-width non-joiners dropped
pub struct Normalizer {
    whitespace: Regex,
    zwnj_runs: Regex,
    zwnj_edges: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            whitespace: Regex::new(r"\s+")?,
            zwnj_runs: Regex::new("\u{200c}{2,}")?,
            zwnj_edges: Regex::new(r"\s*\u{200c}+\s+|\s+\u{200c}+\s*")?,
        })
    }

    pub fn normalize(&self, text: &str) -> String {
        let refined: String = text
            .nfkc()
            .filter_map(refine_char)
            .flat_map(char::to_lowercase)
            .collect();

        let refined = self.zwnj_runs.replace_all(&refined, ZWNJ.to_string());
        let refined = self.zwnj_edges.replace_all(&refined, " ");
        let refined = self.whitespace.replace_all(&refined, " ");

        refined
            .trim_matches(|c: char| c.is_whitespace() || c == ZWNJ)
            .to_string()
    }
}

/// Map one character to its canonical form, or drop it.
fn refine_char(c: char) -> Option<char> {
    match c {
        'ك' => Some('ک'),
        'ي' | 'ى' => Some('ی'),
        // Arabic-Indic digits ٠..٩ → Persian digits ۰..۹
        '\u{0660}'..='\u{0669}' => char::from_u32(c as u32 - 0x0660 + 0x06F0),
        // fathatan .. sukun
        '\u{064B}'..='\u{0652}' => None,
        '\u{0670}' | KASHIDA => None,
        _ => Some(c),
    }
}
