use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::model::traits::ModelParams;
use crate::text::stop_words::StopWords;

/// Default page to scrape.
pub const DEFAULT_URL: &str = "https://www.bbc.com/news/world";

/// Default selector: the promo summary blocks on the world news page.
/// Coupled to the site's current markup.
pub const DEFAULT_SELECTOR: &str = "div.gs-c-promo-body";

/// Default location of the HTML visualization.
pub const DEFAULT_OUTPUT_PATH: &str = "topic_modeling_visualization.html";

/// Which stop-word list the tokenizer filters against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopWordList {
    /// The closed built-in list of common English function words
    Builtin,
    /// The `stop-words` crate's English list (much larger)
    Extended,
}

impl StopWordList {
    pub fn load(self) -> StopWords {
        match self {
            StopWordList::Builtin => StopWords::builtin(),
            StopWordList::Extended => StopWords::extended(),
        }
    }
}

/// Central pipeline configuration.
///
/// Every knob the pipeline uses lives here so tests can substitute values.
/// `Config::default()` gives the fixed constants; `Config::load()` lets the
/// environment (and a .env file, loaded by main via dotenvy) override them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page to fetch
    pub url: String,
    /// CSS selector marking one document per matching element
    pub selector: String,
    pub stop_words: StopWordList,
    /// Topic model hyperparameters (topic count, passes, seed, ...)
    pub model: ModelParams,
    /// Where the HTML visualization is written (overwritten without asking)
    pub output_path: PathBuf,
    /// Request timeout. None leaves it to the transport's own defaults.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            selector: DEFAULT_SELECTOR.to_string(),
            stop_words: StopWordList::Builtin,
            model: ModelParams::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to the defaults. Set-but-malformed numbers
    /// are errors rather than silently ignored.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let stop_words = match env::var("HEADLINE_TOPICS_STOP_WORDS").as_deref() {
            Ok("extended") => StopWordList::Extended,
            Ok("builtin") | Err(_) => StopWordList::Builtin,
            Ok(other) => anyhow::bail!(
                "HEADLINE_TOPICS_STOP_WORDS must be `builtin` or `extended`, got `{other}`"
            ),
        };

        let mut model = defaults.model;
        if let Some(num_topics) = parse_var("HEADLINE_TOPICS_NUM_TOPICS")? {
            model.num_topics = num_topics;
        }
        if let Some(passes) = parse_var("HEADLINE_TOPICS_PASSES")? {
            model.passes = passes;
        }
        if let Some(seed) = parse_var("HEADLINE_TOPICS_SEED")? {
            model.seed = seed;
        }

        let timeout = parse_var::<u64>("HEADLINE_TOPICS_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            url: env::var("HEADLINE_TOPICS_URL").unwrap_or(defaults.url),
            selector: env::var("HEADLINE_TOPICS_SELECTOR").unwrap_or(defaults.selector),
            stop_words,
            model,
            output_path: env::var("HEADLINE_TOPICS_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            timeout,
        })
    }
}

/// Read an optional numeric environment variable.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{name} is not a valid number: `{raw}`")),
        Err(_) => Ok(None),
    }
}
