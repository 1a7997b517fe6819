// Corpus construction: the term dictionary and bag-of-words documents.

pub mod builder;
pub mod dictionary;

/// A document as (token-id, count) pairs, sorted by id, counts > 0.
pub type BagOfWords = Vec<(u32, u32)>;

/// One bag per document, positionally aligned with the extracted documents.
pub type Corpus = Vec<BagOfWords>;
