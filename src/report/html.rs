// Self-contained HTML visualization of a fitted topic model.
//
// Modeled on the usual LDA topic explorers: topics are ordered by prevalence
// and numbered from 1, each topic lists its terms ranked by relevance
//
//   relevance(w, t) = λ·log p(w|t) + (1 − λ)·log(p(w|t) / p(w))
//
// the page lists the most salient terms across the corpus, and a matrix of
// Jensen-Shannon distances shows how far apart the topics sit. All data is
// also embedded as JSON so the page can be post-processed.

use chrono::Utc;
use serde::Serialize;

use super::Visualizer;
use crate::corpus::dictionary::Dictionary;
use crate::corpus::Corpus;
use crate::error::{PipelineError, Result};
use crate::model::math::jensen_shannon_distance;
use crate::model::traits::TopicModel;

/// Renders the topic explorer page.
#[derive(Debug, Clone)]
pub struct HtmlReport {
    /// Weight of log p(w|t) against lift in the relevance ranking (0..=1)
    pub relevance_lambda: f64,
    /// Terms listed per topic and in the salient-terms table
    pub top_terms: usize,
}

impl Default for HtmlReport {
    fn default() -> Self {
        Self {
            relevance_lambda: 0.6,
            top_terms: 30,
        }
    }
}

/// Everything the page shows, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct VisData {
    pub generated_at: String,
    pub num_documents: usize,
    pub num_terms: usize,
    pub num_tokens: u64,
    pub relevance_lambda: f64,
    pub topics: Vec<TopicView>,
    pub salient_terms: Vec<SalientTerm>,
    /// Jensen-Shannon distance between topics, indexed by display rank
    pub distances: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicView {
    /// 1-based rank by prevalence
    pub rank: usize,
    /// The model's own topic id
    pub topic_id: usize,
    /// Share of corpus tokens attributed to this topic
    pub prevalence: f64,
    pub terms: Vec<TermView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermView {
    pub term: String,
    /// p(w | t)
    pub weight: f64,
    pub relevance: f64,
    /// Occurrences of the term across the whole corpus
    pub corpus_freq: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalientTerm {
    pub term: String,
    pub saliency: f64,
    pub corpus_freq: u64,
}

impl HtmlReport {
    /// Compute the page data without rendering it.
    pub fn prepare(
        &self,
        model: &dyn TopicModel,
        corpus: &Corpus,
        dictionary: &Dictionary,
    ) -> Result<VisData> {
        let k = model.num_topics();
        let v = dictionary.len();
        if model.num_terms() != v {
            return Err(PipelineError::Modeling(format!(
                "model has {} terms but the dictionary has {v}",
                model.num_terms()
            )));
        }

        // Corpus term frequencies
        let mut term_freq = vec![0u64; v];
        for bow in corpus {
            for &(id, count) in bow {
                if let Some(slot) = term_freq.get_mut(id as usize) {
                    *slot += u64::from(count);
                }
            }
        }
        let num_tokens: u64 = term_freq.iter().sum();
        let term_prop: Vec<f64> = term_freq
            .iter()
            .map(|&f| if num_tokens > 0 { f as f64 / num_tokens as f64 } else { 0.0 })
            .collect();

        // Token-weighted topic mass over the unfiltered mixtures
        let mut mass = vec![0.0; k];
        for bow in corpus {
            let len: u32 = bow.iter().map(|&(_, c)| c).sum();
            for (slot, prob) in mass.iter_mut().zip(model.document_mixture(bow)) {
                *slot += prob * f64::from(len);
            }
        }
        let total_mass: f64 = mass.iter().sum();
        let prevalence: Vec<f64> = mass
            .iter()
            .map(|&m| if total_mass > 0.0 { m / total_mass } else { 1.0 / k as f64 })
            .collect();

        let phi: Vec<Vec<f64>> = (0..k).map(|t| model.topic_term_distribution(t)).collect();

        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| {
            prevalence[b]
                .partial_cmp(&prevalence[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let topics: Vec<TopicView> = order
            .iter()
            .enumerate()
            .map(|(rank, &t)| TopicView {
                rank: rank + 1,
                topic_id: t,
                prevalence: prevalence[t],
                terms: self.relevant_terms(&phi[t], &term_prop, &term_freq, dictionary),
            })
            .collect();

        let distances: Vec<Vec<f64>> = order
            .iter()
            .map(|&a| {
                order
                    .iter()
                    .map(|&b| jensen_shannon_distance(&phi[a], &phi[b]))
                    .collect()
            })
            .collect();

        Ok(VisData {
            generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            num_documents: corpus.len(),
            num_terms: v,
            num_tokens,
            relevance_lambda: self.relevance_lambda,
            topics,
            salient_terms: self.salient_terms(
                &phi,
                &prevalence,
                &term_prop,
                &term_freq,
                dictionary,
            ),
            distances,
        })
    }

    /// Top terms of one topic by relevance. Terms absent from the corpus are skipped.
    fn relevant_terms(
        &self,
        phi: &[f64],
        term_prop: &[f64],
        term_freq: &[u64],
        dictionary: &Dictionary,
    ) -> Vec<TermView> {
        let lambda = self.relevance_lambda.clamp(0.0, 1.0);
        let mut scored: Vec<TermView> = dictionary
            .iter()
            .filter(|&(id, _)| term_prop[id as usize] > 0.0 && phi[id as usize] > 0.0)
            .map(|(id, term)| {
                let w = phi[id as usize];
                let lift = w / term_prop[id as usize];
                TermView {
                    term: term.to_string(),
                    weight: w,
                    relevance: lambda * w.ln() + (1.0 - lambda) * lift.ln(),
                    corpus_freq: term_freq[id as usize],
                }
            })
            .collect();
        scored.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });
        scored.truncate(self.top_terms);
        scored
    }

    /// Corpus-wide salient terms: p(w) · KL(p(t|w) || p(t)).
    fn salient_terms(
        &self,
        phi: &[Vec<f64>],
        prevalence: &[f64],
        term_prop: &[f64],
        term_freq: &[u64],
        dictionary: &Dictionary,
    ) -> Vec<SalientTerm> {
        let mut salient: Vec<SalientTerm> = dictionary
            .iter()
            .filter(|&(id, _)| term_prop[id as usize] > 0.0)
            .map(|(id, term)| {
                let joint: Vec<f64> = phi
                    .iter()
                    .zip(prevalence)
                    .map(|(row, &p)| row[id as usize] * p)
                    .collect();
                let norm: f64 = joint.iter().sum();
                let distinctiveness: f64 = if norm > 0.0 {
                    joint
                        .iter()
                        .zip(prevalence)
                        .filter(|(j, p)| **j > 0.0 && **p > 0.0)
                        .map(|(&j, &p)| {
                            let posterior = j / norm;
                            posterior * (posterior / p).ln()
                        })
                        .sum()
                } else {
                    0.0
                };
                SalientTerm {
                    term: term.to_string(),
                    saliency: term_prop[id as usize] * distinctiveness,
                    corpus_freq: term_freq[id as usize],
                }
            })
            .collect();
        salient.sort_by(|a, b| {
            b.saliency
                .partial_cmp(&a.saliency)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });
        salient.truncate(self.top_terms);
        salient
    }
}

impl Visualizer for HtmlReport {
    fn render(
        &self,
        model: &dyn TopicModel,
        corpus: &Corpus,
        dictionary: &Dictionary,
    ) -> Result<String> {
        let data = self.prepare(model, corpus, dictionary)?;
        let json = serde_json::to_string(&data).map_err(std::io::Error::from)?;
        Ok(render_page(&data, &json))
    }
}

fn render_page(data: &VisData, json: &str) -> String {
    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Topic model visualization</title>\n<style>\n\
         body{font-family:sans-serif;margin:2em;color:#222}\n\
         table{border-collapse:collapse;margin-bottom:1.5em}\n\
         td,th{padding:2px 8px;text-align:left;font-size:13px}\n\
         .bar{background:#1f77b4;height:10px;display:inline-block}\n\
         .bg{background:#ccc;height:10px;display:inline-block}\n\
         .topic{display:inline-block;vertical-align:top;margin-right:2em}\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str(&format!(
        "<h1>Topic model visualization</h1>\n<p>{} documents, {} distinct terms, \
         {} tokens. Relevance &lambda; = {:.2}. Generated {}.</p>\n",
        data.num_documents,
        data.num_terms,
        data.num_tokens,
        data.relevance_lambda,
        escape(&data.generated_at)
    ));

    // Prevalence overview
    html.push_str("<h2>Topics by prevalence</h2>\n<table>\n");
    html.push_str("<tr><th>#</th><th>Model id</th><th>Prevalence</th><th></th></tr>\n");
    for topic in &data.topics {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
            topic.rank,
            topic.topic_id,
            topic.prevalence * 100.0,
            bar(topic.prevalence, 1.0)
        ));
    }
    html.push_str("</table>\n");

    // Salient terms
    html.push_str("<h2>Most salient terms</h2>\n<table>\n");
    html.push_str("<tr><th>Term</th><th>Saliency</th><th>Frequency</th></tr>\n");
    for term in &data.salient_terms {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.4}</td><td>{}</td></tr>\n",
            escape(&term.term),
            term.saliency,
            term.corpus_freq
        ));
    }
    html.push_str("</table>\n");

    // Per-topic relevant terms
    html.push_str("<h2>Top terms per topic</h2>\n");
    for topic in &data.topics {
        html.push_str(&format!(
            "<div class=\"topic\" id=\"topic-{}\">\n<h3>Topic {} ({:.1}%)</h3>\n<table>\n",
            topic.rank,
            topic.rank,
            topic.prevalence * 100.0
        ));
        html.push_str("<tr><th>Term</th><th>p(w|t)</th><th>Corpus</th><th></th></tr>\n");
        let max_freq = topic.terms.iter().map(|t| t.corpus_freq).max().unwrap_or(1).max(1);
        for term in &topic.terms {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{:.3}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&term.term),
                term.weight,
                term.corpus_freq,
                bar(term.corpus_freq as f64, max_freq as f64)
            ));
        }
        html.push_str("</table>\n</div>\n");
    }

    // Inter-topic distances
    html.push_str("<h2>Inter-topic distance (Jensen-Shannon)</h2>\n<table>\n<tr><th></th>");
    for topic in &data.topics {
        html.push_str(&format!("<th>{}</th>", topic.rank));
    }
    html.push_str("</tr>\n");
    for (topic, row) in data.topics.iter().zip(&data.distances) {
        html.push_str(&format!("<tr><th>{}</th>", topic.rank));
        for d in row {
            html.push_str(&format!("<td>{d:.3}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");

    // "</" inside a script element would end it early
    html.push_str("<script type=\"application/json\" id=\"ldavis-data\">\n");
    html.push_str(&json.replace("</", "<\\/"));
    html.push_str("\n</script>\n</body>\n</html>\n");
    html
}

/// A horizontal bar scaled to `value / max`, 200px at full width.
fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max).clamp(0.0, 1.0) * 200.0).round() as u32
    } else {
        0
    };
    format!(
        "<span class=\"bar\" style=\"width:{}px\"></span><span class=\"bg\" style=\"width:{}px\"></span>",
        filled,
        200 - filled
    )
}

/// Minimal HTML text escaping.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
