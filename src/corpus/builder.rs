// Corpus builder.
//
// One dictionary over every token sequence, then one bag per sequence. The
// output corpus keeps the input order, so corpus[i] is always document i.

use tracing::debug;

use super::dictionary::Dictionary;
use super::Corpus;

/// Build the dictionary and the positionally aligned bag-of-words corpus.
///
/// Imposes no checks of its own: an all-empty input yields an empty
/// dictionary and a corpus of empty bags.
pub fn build_corpus<S: AsRef<str>>(sequences: &[Vec<S>]) -> (Dictionary, Corpus) {
    let dictionary = Dictionary::from_sequences(sequences);
    let corpus: Corpus = sequences
        .iter()
        .map(|tokens| dictionary.doc2bow(tokens.as_slice()))
        .collect();

    debug!(
        documents = corpus.len(),
        terms = dictionary.len(),
        "Built dictionary and corpus"
    );

    (dictionary, corpus)
}
