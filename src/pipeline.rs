// The scrape → corpus → model pipeline.
//
// Strictly sequential: fetch one page, extract documents, tokenize, build the
// corpus, fit the model, render the visualization. Every stage consumes the
// previous stage's output; nothing loops back and nothing is retried.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::corpus::builder::build_corpus;
use crate::corpus::dictionary::Dictionary;
use crate::corpus::Corpus;
use crate::error::{PipelineError, Result};
use crate::model::traits::{Topic, TopicModel, TopicModeler};
use crate::report::{write_visualization, Visualizer};
use crate::scrape::extract::Extractor;
use crate::scrape::fetch::PageSource;
use crate::text::stop_words::StopWords;
use crate::text::tokenize::tokenize_all;

/// Terms shown per topic on the console.
pub const TOPIC_WORDS: usize = 10;

/// Documents turned into a dictionary and an aligned corpus.
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    /// Raw extracted text, one entry per matching element
    pub documents: Vec<String>,
    /// Token sequence per document (may be empty for some documents)
    pub sequences: Vec<Vec<String>>,
    pub dictionary: Dictionary,
    /// corpus[i] is the bag of documents[i]
    pub corpus: Corpus,
}

impl PreparedCorpus {
    /// Documents that produced no usable tokens.
    pub fn empty_documents(&self) -> usize {
        self.sequences.iter().filter(|s| s.is_empty()).count()
    }
}

/// Result of the tokenizer guard: either a corpus or the reason there isn't one.
#[derive(Debug, Clone)]
pub enum CorpusOutcome {
    Ready(PreparedCorpus),
    /// Every document (possibly zero of them) tokenized to nothing.
    /// No dictionary was built.
    NoUsableTokens { documents: usize },
}

impl CorpusOutcome {
    /// Convert the guard outcome into a Result, mapping the rejection to a
    /// validation error.
    pub fn into_result(self) -> Result<PreparedCorpus> {
        match self {
            CorpusOutcome::Ready(prepared) => Ok(prepared),
            CorpusOutcome::NoUsableTokens { documents } => Err(PipelineError::Validation(format!(
                "no usable tokens in {documents} extracted documents; \
                 check the selector and preprocessing"
            ))),
        }
    }
}

/// Tokenize documents and, if any tokens survive, build the corpus.
pub fn prepare_corpus(documents: Vec<String>, stop_words: &StopWords) -> CorpusOutcome {
    let sequences = tokenize_all(&documents, stop_words);

    if sequences.iter().all(Vec::is_empty) {
        warn!(documents = documents.len(), "No usable tokens after preprocessing");
        return CorpusOutcome::NoUsableTokens {
            documents: documents.len(),
        };
    }

    let (dictionary, corpus) = build_corpus(&sequences);
    CorpusOutcome::Ready(PreparedCorpus {
        documents,
        sequences,
        dictionary,
        corpus,
    })
}

/// Fetch the configured page and turn it into a corpus.
pub async fn collect_corpus(config: &Config, source: &dyn PageSource) -> Result<PreparedCorpus> {
    // Compile the selector first so a bad one fails before any network call
    let extractor = Extractor::new(&config.selector)?;

    let html = source.fetch(&config.url).await?;
    info!(url = %config.url, bytes = html.len(), "Fetched page");

    let documents = extractor.extract(&html);
    info!(documents = documents.len(), selector = extractor.selector(), "Extracted documents");

    let prepared = prepare_corpus(documents, &config.stop_words.load()).into_result()?;
    info!(
        documents = prepared.corpus.len(),
        empty = prepared.empty_documents(),
        terms = prepared.dictionary.len(),
        "Corpus ready"
    );
    Ok(prepared)
}

/// Everything a full run produces.
pub struct PipelineRun {
    pub prepared: PreparedCorpus,
    pub model: Box<dyn TopicModel>,
    pub topics: Vec<Topic>,
    /// Topic mixture per document, aligned with the corpus
    pub document_topics: Vec<Vec<(usize, f64)>>,
    pub visualization_path: PathBuf,
}

/// Run the whole pipeline once.
pub async fn run(
    config: &Config,
    source: &dyn PageSource,
    modeler: &dyn TopicModeler,
    visualizer: &dyn Visualizer,
) -> Result<PipelineRun> {
    let prepared = collect_corpus(config, source).await?;

    let model = modeler.fit(&prepared.corpus, &prepared.dictionary, &config.model)?;
    let topics = model.show_topics(TOPIC_WORDS);
    let document_topics = prepared
        .corpus
        .iter()
        .map(|bow| model.document_topics(bow))
        .collect();

    let html = visualizer.render(model.as_ref(), &prepared.corpus, &prepared.dictionary)?;
    write_visualization(&config.output_path, &html)?;

    Ok(PipelineRun {
        prepared,
        model,
        topics,
        document_topics,
        visualization_path: config.output_path.clone(),
    })
}
