// Term dictionary: token <-> integer id.
//
// Ids are assigned in order of first encounter across the input sequences.
// Alongside the mapping we keep the usual corpus statistics (document
// frequency per id, document count, token positions, non-zero entries),
// which the visualization uses for term frequencies.

use std::collections::{HashMap, HashSet};

use super::BagOfWords;

/// Bidirectional mapping between tokens and ids, built once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    token_to_id: HashMap<String, u32>,
    id_to_token: Vec<String>,
    /// Number of documents containing each id
    doc_freqs: Vec<u32>,
    num_docs: usize,
    num_pos: usize,
    num_nnz: usize,
}

impl Dictionary {
    /// Build a dictionary covering every distinct token in `sequences`.
    pub fn from_sequences<S: AsRef<str>>(sequences: &[Vec<S>]) -> Self {
        let mut dict = Self::default();

        for sequence in sequences {
            let mut seen_here: HashSet<u32> = HashSet::new();
            for token in sequence {
                let token = token.as_ref();
                let id = match dict.token_to_id.get(token) {
                    Some(&id) => id,
                    None => {
                        let id = dict.id_to_token.len() as u32;
                        dict.token_to_id.insert(token.to_string(), id);
                        dict.id_to_token.push(token.to_string());
                        dict.doc_freqs.push(0);
                        id
                    }
                };
                seen_here.insert(id);
            }
            for &id in &seen_here {
                dict.doc_freqs[id as usize] += 1;
            }
            dict.num_docs += 1;
            dict.num_pos += sequence.len();
            dict.num_nnz += seen_here.len();
        }

        dict
    }

    /// Convert a token sequence into a sorted bag of (id, count).
    ///
    /// Tokens not in the dictionary are ignored.
    pub fn doc2bow<S: AsRef<str>>(&self, tokens: &[S]) -> BagOfWords {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for token in tokens {
            if let Some(&id) = self.token_to_id.get(token.as_ref()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut bow: BagOfWords = counts.into_iter().collect();
        bow.sort_unstable_by_key(|&(id, _)| id);
        bow
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    /// Number of documents that contain the token with this id.
    pub fn doc_freq(&self, id: u32) -> Option<u32> {
        self.doc_freqs.get(id as usize).copied()
    }

    /// Number of documents the dictionary was built from.
    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// Total number of token positions seen.
    pub fn num_pos(&self) -> usize {
        self.num_pos
    }

    /// Number of distinct (document, token) pairs seen.
    pub fn num_nnz(&self) -> usize {
        self.num_nnz
    }

    /// Iterate (id, token) in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.id_to_token
            .iter()
            .enumerate()
            .map(|(id, token)| (id as u32, token.as_str()))
    }
}
