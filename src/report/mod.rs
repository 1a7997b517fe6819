// Reporting: terminal output and the HTML visualization.

pub mod html;
pub mod terminal;

use std::path::Path;

use tracing::info;

use crate::corpus::dictionary::Dictionary;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::model::traits::TopicModel;

/// Trait for turning a fitted model into a standalone visualization.
pub trait Visualizer {
    /// Render the model, corpus, and dictionary into a document.
    fn render(
        &self,
        model: &dyn TopicModel,
        corpus: &Corpus,
        dictionary: &Dictionary,
    ) -> Result<String>;
}

/// Write a rendered visualization to `path`, replacing any existing file.
pub fn write_visualization(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "Visualization written");
    Ok(())
}
