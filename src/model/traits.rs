// Topic model traits: the swap-ready abstraction.
//
// Like the page source, this keeps the pipeline ignorant of any particular
// model. The default implementation is variational LDA (see lda.rs); anything
// that can fit a bag-of-words corpus and report per-topic terms and
// per-document topic mixtures can stand in for it.

use crate::corpus::dictionary::Dictionary;
use crate::corpus::{BagOfWords, Corpus};
use crate::error::Result;

/// Hyperparameters passed through to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    /// Number of latent topics (default 5)
    pub num_topics: usize,
    /// Full passes over the corpus during training (default 15)
    pub passes: usize,
    /// Maximum E-step iterations per document (default 50)
    pub iterations: usize,
    /// Documents per update (default 2000, i.e. one chunk for small corpora)
    pub chunk_size: usize,
    /// E-step stops once the mean change in a document's gamma drops below this
    pub gamma_threshold: f64,
    /// Topics below this probability are left out of document distributions
    pub minimum_probability: f64,
    /// Seed for the random initialisation
    pub seed: u64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            num_topics: 5,
            passes: 15,
            iterations: 50,
            chunk_size: 2000,
            gamma_threshold: 0.001,
            minimum_probability: 0.01,
            seed: 42,
        }
    }
}

/// One topic: its id and its top (term, weight) pairs, heaviest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub id: usize,
    pub terms: Vec<(String, f64)>,
}

/// Trait for fitting a topic model over a bag-of-words corpus.
pub trait TopicModeler {
    fn fit(
        &self,
        corpus: &Corpus,
        dictionary: &Dictionary,
        params: &ModelParams,
    ) -> Result<Box<dyn TopicModel>>;
}

/// A fitted topic model.
pub trait TopicModel {
    fn num_topics(&self) -> usize;

    /// Vocabulary size the model was fitted with.
    fn num_terms(&self) -> usize;

    /// p(term | topic) for every term id, summing to 1.
    fn topic_term_distribution(&self, topic: usize) -> Vec<f64>;

    /// The `n` heaviest (term, weight) pairs of a topic.
    fn topic_terms(&self, topic: usize, n: usize) -> Vec<(String, f64)>;

    /// The full topic mixture of one document: one probability per topic,
    /// summing to 1, with nothing filtered out.
    fn document_mixture(&self, bow: &BagOfWords) -> Vec<f64>;

    /// The topic mixture of one document as (topic id, probability), sorted
    /// by topic id. Topics under the model's minimum probability are omitted.
    fn document_topics(&self, bow: &BagOfWords) -> Vec<(usize, f64)>;

    /// Every topic with its `num_words` heaviest terms.
    fn show_topics(&self, num_words: usize) -> Vec<Topic> {
        (0..self.num_topics())
            .map(|id| Topic {
                id,
                terms: self.topic_terms(id, num_words),
            })
            .collect()
    }
}
