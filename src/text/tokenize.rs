// Headline tokenizer.
//
// Lower-case, split on whitespace, keep tokens made only of letters. A token
// with any digit or punctuation mark is dropped whole ("world's", "2024",
// "u.s." all disappear) rather than cleaned.

use unicode_general_category::{get_general_category, GeneralCategory};

use super::stop_words::StopWords;

/// Tokenize one document's raw text.
///
/// Returns the surviving tokens in their original order (possibly empty).
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| is_alphabetic(token) && !stop_words.contains(token))
        .map(str::to_string)
        .collect()
}

/// Tokenize every document, keeping one sequence per document in order.
pub fn tokenize_all(documents: &[String], stop_words: &StopWords) -> Vec<Vec<String>> {
    documents
        .iter()
        .map(|doc| tokenize(doc, stop_words))
        .collect()
}

/// True if the token is non-empty and every character is a letter.
///
/// Letters are the general categories Lu, Ll, Lt, Lm and Lo. Letter-like
/// numbers (`ⅻ`) and combining marks (the vowel sign in `कि`) do not count,
/// even though `char::is_alphabetic` accepts them.
pub fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_letter)
}

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_drops_stop_words() {
        let stop = StopWords::builtin();
        assert_eq!(
            tokenize("The Cat Sat on the Mat", &stop),
            vec!["cat", "sat", "mat"]
        );
    }

    #[test]
    fn drops_tokens_with_digits_or_punctuation() {
        let stop = StopWords::builtin();
        let tokens = tokenize("Ukraine's 2024 budget talks resume, U.S. says", &stop);
        assert_eq!(tokens, vec!["budget", "talks", "says"]);
    }

    #[test]
    fn keeps_non_ascii_letters() {
        let stop = StopWords::builtin();
        assert_eq!(tokenize("São Paulo café", &stop), vec!["são", "paulo", "café"]);
    }

    #[test]
    fn drops_letter_numbers_and_combining_marks() {
        let stop = StopWords::builtin();
        assert_eq!(tokenize("Ⅻ कि news", &stop), vec!["news"]);
        assert!(!is_alphabetic("ⅻ"));
        assert!(!is_alphabetic("कि"));
        assert!(is_alphabetic("東京"));
    }

    #[test]
    fn whitespace_only_is_empty() {
        let stop = StopWords::builtin();
        assert!(tokenize(" \n\t ", &stop).is_empty());
        assert!(tokenize("", &stop).is_empty());
    }

    #[test]
    fn is_alphabetic_rejects_empty() {
        assert!(!is_alphabetic(""));
        assert!(is_alphabetic("word"));
        assert!(!is_alphabetic("word1"));
        assert!(!is_alphabetic("half-time"));
    }
}
