// Composition tests: the stages chained together.
//
// Runs the pipeline end to end against canned HTML:
//   PageSource -> Extractor -> Tokenizer -> Corpus -> LDA -> Reporter
// without network access. Visualization files go to the system temp dir.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use headline_topics::config::Config;
use headline_topics::error::{PipelineError, Result};
use headline_topics::model::lda::VariationalLda;
use headline_topics::model::traits::{ModelParams, TopicModel, TopicModeler};
use headline_topics::pipeline::{self, prepare_corpus, CorpusOutcome};
use headline_topics::report::html::HtmlReport;
use headline_topics::report::terminal::{format_document_topics, format_topic};
use headline_topics::report::Visualizer;
use headline_topics::scrape::fetch::{PageSource, StaticPageSource};
use headline_topics::text::stop_words::StopWords;

/// Counts fetches so tests can prove the network was (or wasn't) touched.
struct CountingSource {
    body: String,
    calls: AtomicUsize,
}

impl CountingSource {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for CountingSource {
    async fn fetch(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

struct FailingSource;

#[async_trait]
impl PageSource for FailingSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        Err(PipelineError::Network(format!("{url} returned 503 Service Unavailable")))
    }
}

fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "headline-topics-{}-{name}.html",
        std::process::id()
    ))
}

fn config_with_output(name: &str) -> Config {
    Config {
        output_path: temp_output(name),
        ..Config::default()
    }
}

fn promo_page(headlines: &[&str]) -> String {
    let mut html = String::from("<html><body><main>");
    for h in headlines {
        html.push_str(&format!(
            "<div class=\"gs-c-promo-body\"><h3 class=\"gs-c-promo-heading\">{h}</h3></div>"
        ));
    }
    html.push_str("</main></body></html>");
    html
}

const HEADLINES: &[&str] = &[
    "Floods force thousands from homes as rivers burst banks",
    "Rivers rise again as floods spread north",
    "Rescue teams reach flooded villages after heavy rain",
    "Heavy rain warning issued as rivers keep rising",
    "Election results delayed as counting continues",
    "Counting resumes after election delays",
    "Opposition disputes election count in capital",
    "Voters queue for hours as election turnout soars",
];

// ============================================================
// Validation guard
// ============================================================

#[tokio::test]
async fn zero_matching_elements_is_a_validation_error() {
    let config = config_with_output("no-match");
    let source = CountingSource::new("<html><body><div class=\"renamed\">News</div></body></html>");

    let err = pipeline::run(&config, &source, &VariationalLda, &HtmlReport::default())
        .await
        .err()
        .unwrap();

    assert!(matches!(err, PipelineError::Validation(_)), "got {err:?}");
    // One attempt, no retries, nothing written
    assert_eq!(source.calls(), 1);
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn stop_words_only_page_is_a_validation_error() {
    let config = config_with_output("stop-only");
    let source = StaticPageSource::new(promo_page(&["The and of", "Is it on?", "2024 — 11:30"]));

    let err = pipeline::collect_corpus(&config, &source).await.unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
}

#[test]
fn guard_outcome_is_explicit() {
    match prepare_corpus(Vec::new(), &StopWords::builtin()) {
        CorpusOutcome::NoUsableTokens { documents } => assert_eq!(documents, 0),
        CorpusOutcome::Ready(_) => panic!("empty input must not produce a corpus"),
    }
}

// ============================================================
// Failure propagation
// ============================================================

#[tokio::test]
async fn network_failure_propagates_without_retry() {
    let config = config_with_output("network");
    let err = pipeline::run(&config, &FailingSource, &VariationalLda, &HtmlReport::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, PipelineError::Network(_)));
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn bad_selector_fails_before_fetching() {
    let config = Config {
        selector: "div[".to_string(),
        ..config_with_output("bad-selector")
    };
    let source = CountingSource::new(&promo_page(HEADLINES));

    let err = pipeline::collect_corpus(&config, &source).await.unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn unwritable_output_is_an_io_error() {
    let config = Config {
        output_path: std::env::temp_dir()
            .join("headline-topics-missing-dir")
            .join("nested")
            .join("out.html"),
        ..Config::default()
    };
    let source = StaticPageSource::new(promo_page(HEADLINES));

    let err = pipeline::run(&config, &source, &VariationalLda, &HtmlReport::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, PipelineError::Io(_)), "got {err:?}");
}

// ============================================================
// Full run
// ============================================================

#[tokio::test]
async fn full_run_produces_aligned_results_and_a_visualization() {
    let config = config_with_output("full-run");
    let source = StaticPageSource::new(promo_page(HEADLINES));

    let run = pipeline::run(&config, &source, &VariationalLda, &HtmlReport::default())
        .await
        .unwrap();

    assert_eq!(run.prepared.documents.len(), HEADLINES.len());
    assert_eq!(run.prepared.corpus.len(), HEADLINES.len());
    assert_eq!(run.document_topics.len(), HEADLINES.len());
    assert_eq!(run.topics.len(), config.model.num_topics);
    for topic in &run.topics {
        assert_eq!(topic.terms.len(), pipeline::TOPIC_WORDS);
        assert!(format_topic(topic).starts_with(&format!("Topic {}: ", topic.id)));
    }

    for (i, topics) in run.document_topics.iter().enumerate() {
        let lines = format_document_topics(i, topics);
        assert_eq!(lines[0], format!("Document {i}:"));
        assert_eq!(lines.len(), topics.len() + 1);
    }

    let html = std::fs::read_to_string(&run.visualization_path).unwrap();
    std::fs::remove_file(&run.visualization_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("id=\"ldavis-data\""));
    for rank in 1..=config.model.num_topics {
        assert!(html.contains(&format!("id=\"topic-{rank}\"")));
    }
}

#[tokio::test]
async fn rerun_overwrites_the_visualization() {
    let config = config_with_output("overwrite");
    std::fs::write(&config.output_path, "stale").unwrap();
    let source = StaticPageSource::new(promo_page(HEADLINES));

    pipeline::run(&config, &source, &VariationalLda, &HtmlReport::default())
        .await
        .unwrap();

    let html = std::fs::read_to_string(&config.output_path).unwrap();
    std::fs::remove_file(&config.output_path).unwrap();
    assert!(html.contains("ldavis-data"));
    assert!(!html.starts_with("stale"));
}

// ============================================================
// Visualization data
// ============================================================

#[test]
fn visualization_data_is_consistent() {
    let docs: Vec<String> = HEADLINES.iter().map(|h| h.to_string()).collect();
    let prepared = prepare_corpus(docs, &StopWords::builtin())
        .into_result()
        .unwrap();
    let params = ModelParams {
        num_topics: 3,
        ..ModelParams::default()
    };
    let model = VariationalLda
        .fit(&prepared.corpus, &prepared.dictionary, &params)
        .unwrap();

    let report = HtmlReport::default();
    let data = report
        .prepare(model.as_ref(), &prepared.corpus, &prepared.dictionary)
        .unwrap();

    assert_eq!(data.topics.len(), 3);
    let total: f64 = data.topics.iter().map(|t| t.prevalence).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for pair in data.topics.windows(2) {
        assert!(pair[0].prevalence >= pair[1].prevalence);
    }
    for (i, row) in data.distances.iter().enumerate() {
        assert!(row[i].abs() < 1e-12);
        for (j, &d) in row.iter().enumerate() {
            assert!((d - data.distances[j][i]).abs() < 1e-12);
            assert!((0.0..=1.0 + 1e-12).contains(&d));
        }
    }
    let tokens: usize = prepared.sequences.iter().map(Vec::len).sum();
    assert_eq!(data.num_tokens as usize, tokens);

    // The embedded JSON parses back
    let html = report
        .render(model.as_ref(), &prepared.corpus, &prepared.dictionary)
        .unwrap();
    let start = html.find("id=\"ldavis-data\">").unwrap() + "id=\"ldavis-data\">".len();
    let end = html[start..].find("</script>").unwrap() + start;
    let json: serde_json::Value = serde_json::from_str(html[start..end].trim()).unwrap();
    assert_eq!(json["topics"].as_array().unwrap().len(), 3);
    assert_eq!(json["num_documents"], 8);
}

#[test]
fn prevalence_counts_every_topic_in_each_mixture() {
    let docs: Vec<String> = HEADLINES.iter().map(|h| h.to_string()).collect();
    let prepared = prepare_corpus(docs, &StopWords::builtin())
        .into_result()
        .unwrap();
    // Many topics over few documents leaves plenty of sub-threshold mass
    let params = ModelParams {
        num_topics: 10,
        ..ModelParams::default()
    };
    let model = VariationalLda
        .fit(&prepared.corpus, &prepared.dictionary, &params)
        .unwrap();

    let mut mass = vec![0.0; params.num_topics];
    for bow in &prepared.corpus {
        let len: u32 = bow.iter().map(|&(_, c)| c).sum();
        let mixture = model.document_mixture(bow);
        assert_eq!(mixture.len(), params.num_topics);
        assert!((mixture.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        for (slot, p) in mass.iter_mut().zip(mixture) {
            *slot += p * f64::from(len);
        }
    }
    let total: f64 = mass.iter().sum();

    let data = HtmlReport::default()
        .prepare(model.as_ref(), &prepared.corpus, &prepared.dictionary)
        .unwrap();
    for view in &data.topics {
        let expected = mass[view.topic_id] / total;
        assert!(
            (view.prevalence - expected).abs() < 1e-9,
            "topic {}: {} vs {expected}",
            view.topic_id,
            view.prevalence
        );
        assert!(view.prevalence > 0.0);
    }
}
