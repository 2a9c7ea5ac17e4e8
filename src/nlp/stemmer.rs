// Light Persian suffix stripper

/// Suffixes removed by the stemmer, longest first so `های` wins over `ها`.
const SUFFIXES: &[&str] = &[
    "\u{200c}هایی",
    "\u{200c}ترین",
    "\u{200c}های",
    "هایی",
    "ترین",
    "\u{200c}ها",
    "\u{200c}تر",
    "های",
    "ها",
    "تر",
];

/// Shortest stem (in characters) left after stripping.
const MIN_STEM_CHARS: usize = 3;

/// Strips plural and comparative suffixes from Persian words.
///
/// Only one suffix is removed per word and never below three characters,
/// so short words and non-Persian words pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Stemmer;

impl Stemmer {
    pub fn new() -> Self {
        Self
    }

    pub fn stem(&self, word: &str) -> String {
        let mut stem = word;

        for suffix in SUFFIXES {
            if let Some(rest) = stem.strip_suffix(suffix) {
                if rest.chars().count() >= MIN_STEM_CHARS {
                    stem = rest;
                    break;
                }
            }
        }

        let stem = stem.trim_end_matches('\u{200c}');

        // ۀ → ه once the ezafe marker is no longer meaningful
        match stem.strip_suffix('ۀ') {
            Some(rest) => format!("{}ه", rest),
            None => stem.to_string(),
        }
    }
}
