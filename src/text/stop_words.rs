// Stop-word sets.
//
// The built-in list is a closed set of common English function words. The
// extended list comes from the `stop-words` crate and is several times larger;
// it trades recall of short content words for cleaner topics.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// The closed built-in stop-word list.
pub const BUILTIN_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once",
];

/// An immutable set of lower-case words the tokenizer drops.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The closed built-in list.
    pub fn builtin() -> Self {
        Self::from_words(BUILTIN_STOP_WORDS.iter().copied())
    }

    /// The `stop-words` crate's English list.
    pub fn extended() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words.iter().map(String::as_str))
    }

    /// Build a set from arbitrary words. Words are lower-cased so lookups
    /// against already lower-cased tokens always match.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words.into_iter().map(str::to_lowercase).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in alphabetical order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}
