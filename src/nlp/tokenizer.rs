// Word and sentence segmentation (UAX #29)
use unicode_segmentation::UnicodeSegmentation;

/// Latin and Persian question marks.
pub const QUESTION_MARKS: [char; 2] = ['?', '؟'];

/// Split text into word tokens. Punctuation and whitespace are dropped;
/// zero-width non-joiners inside a word keep it in one piece.
pub fn word_tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_string).collect()
}

/// Split text into trimmed, non-empty sentences.
pub fn sentence_tokenize(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn is_question(sentence: &str) -> bool {
    sentence.contains(&QUESTION_MARKS[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokenize() {
        assert_eq!(word_tokenize("hello, world!"), vec!["hello", "world"]);
        assert_eq!(word_tokenize("سلام، خوبی؟"), vec!["سلام", "خوبی"]);
        assert!(word_tokenize("  ?! ").is_empty());
    }

    #[test]
    fn test_word_tokenize_keeps_zwnj_words() {
        assert_eq!(word_tokenize("می\u{200c}روم خانه"), vec!["می\u{200c}روم", "خانه"]);
    }

    #[test]
    fn test_sentence_tokenize() {
        assert_eq!(
            sentence_tokenize("Is it done? Yes it is."),
            vec!["Is it done?", "Yes it is."]
        );
        assert_eq!(sentence_tokenize("سلام؟ خوبم."), vec!["سلام؟", "خوبم."]);
        assert!(sentence_tokenize("   ").is_empty());
    }

    #[test]
    fn test_is_question() {
        assert!(is_question("hello?"));
        assert!(is_question("چطوری؟"));
        assert!(!is_question("hello world"));
    }
}
