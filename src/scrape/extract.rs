// Document extraction from HTML.
//
// The selector is coupled to the target site's markup. When the site changes,
// nothing here fails: the selector simply matches fewer (or zero) elements and
// the tokenizer guard downstream reports that no usable tokens were found.

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

/// Extracts one document per element matching a CSS selector.
#[derive(Debug)]
pub struct Extractor {
    selector: Selector,
    source: String,
}

impl Extractor {
    /// Compile the selector. An unparseable selector is a ParseError.
    pub fn new(selector: &str) -> Result<Self> {
        let compiled = Selector::parse(selector)
            .map_err(|e| PipelineError::Parse(format!("invalid selector `{selector}`: {e:?}")))?;
        Ok(Self {
            selector: compiled,
            source: selector.to_string(),
        })
    }

    /// The selector text this extractor was built from.
    pub fn selector(&self) -> &str {
        &self.source
    }

    /// Return the text of each matching element, in document order.
    ///
    /// Text is every descendant text node concatenated as-is, with no
    /// trimming or normalisation. Malformed HTML is parsed leniently and never
    /// fails; a selector mismatch yields an empty vector.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        if !document.errors.is_empty() {
            debug!(
                errors = document.errors.len(),
                "HTML parsed with recoverable errors"
            );
        }

        let documents: Vec<String> = document
            .select(&self.selector)
            .map(|element| element.text().collect::<String>())
            .collect();

        if documents.is_empty() {
            warn!(
                selector = %self.source,
                "Selector matched no elements; the page markup may have changed"
            );
        } else {
            debug!(count = documents.len(), selector = %self.source, "Extracted documents");
        }

        documents
    }
}
