// Terminal output for topics and document mixtures.
//
// Formatting lives in plain functions returning Strings so it can be tested;
// the display_* functions just print them.

use colored::Colorize;

use crate::corpus::{BagOfWords, Corpus};
use crate::model::traits::Topic;

/// `Topic 0: 0.045*"election" + 0.031*"vote" + ...`
pub fn format_topic(topic: &Topic) -> String {
    let terms: Vec<String> = topic
        .terms
        .iter()
        .map(|(term, weight)| format!("{weight:.3}*\"{term}\""))
        .collect();
    format!("Topic {}: {}", topic.id, terms.join(" + "))
}

/// `[(0, 1), (3, 2)]`
pub fn format_bow(bow: &BagOfWords) -> String {
    let pairs: Vec<String> = bow
        .iter()
        .map(|(id, count)| format!("({id}, {count})"))
        .collect();
    format!("[{}]", pairs.join(", "))
}

/// The `Document i:` header followed by one `Topic t: p` line per topic.
pub fn format_document_topics(index: usize, topics: &[(usize, f64)]) -> Vec<String> {
    let mut lines = Vec::with_capacity(topics.len() + 1);
    lines.push(format!("Document {index}:"));
    for (topic, prob) in topics {
        lines.push(format!("Topic {topic}: {prob:.4}"));
    }
    lines
}

/// Print every topic with its weighted terms.
pub fn display_topics(topics: &[Topic]) {
    println!("\n{}", format!("=== Topics ({}) ===", topics.len()).bold());
    for topic in topics {
        println!("{}", format_topic(topic));
    }
}

/// Print the first document's bag of words (a peek at the document-term matrix).
pub fn display_bow_preview(corpus: &Corpus) {
    if let Some(first) = corpus.first() {
        println!("\n{}", "=== Document-term matrix (document 0) ===".bold());
        println!("{}", format_bow(first));
    }
}

/// Lines for every document's topic mixture, in corpus order.
pub fn format_all_document_topics(document_topics: &[Vec<(usize, f64)>]) -> Vec<String> {
    document_topics
        .iter()
        .enumerate()
        .flat_map(|(i, topics)| format_document_topics(i, topics))
        .collect()
}

/// Print the already-inferred topic mixture of every document.
pub fn display_document_topics(document_topics: &[Vec<(usize, f64)>]) {
    println!("\n{}", "=== Document topics ===".bold());
    for line in format_all_document_topics(document_topics) {
        println!("{line}");
    }
}

/// One-line summary of what went into the corpus.
pub fn display_corpus_summary(documents: usize, empty: usize, terms: usize) {
    println!(
        "{} {} documents ({} with no usable tokens), {} distinct terms",
        "Corpus:".bold(),
        documents,
        empty,
        terms
    );
    if empty > 0 {
        println!(
            "{}",
            "  Documents with no usable tokens stay in the corpus as empty bags.".dimmed()
        );
    }
}
