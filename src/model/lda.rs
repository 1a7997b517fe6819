// Latent Dirichlet Allocation fitted with online variational Bayes.
//
// Follows Hoffman, Blei & Bach (2010). Each pass walks the corpus in chunks;
// for each chunk the E-step fits a per-document variational Dirichlet (gamma)
// and collects expected topic-term counts, and the M-step blends those counts
// into the global topic-term parameters (lambda) with learning rate
//
//   rho = (offset + pass + updates / chunk_size) ^ -decay
//
// With the default chunk size a headline corpus is a single chunk, so each
// pass is one full batch update. Priors are symmetric: alpha = eta = 1/K.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Gamma};
use tracing::{debug, info};

use super::math::dirichlet_expectation;
use super::traits::{ModelParams, TopicModel, TopicModeler};
use crate::corpus::dictionary::Dictionary;
use crate::corpus::{BagOfWords, Corpus};
use crate::error::{PipelineError, Result};

const OFFSET: f64 = 1.0;
const DECAY: f64 = 0.5;
/// Keeps phi normalisers away from zero.
const EPS: f64 = 1e-100;

/// Fits `LdaModel`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariationalLda;

impl TopicModeler for VariationalLda {
    fn fit(
        &self,
        corpus: &Corpus,
        dictionary: &Dictionary,
        params: &ModelParams,
    ) -> Result<Box<dyn TopicModel>> {
        Ok(Box::new(LdaModel::train(corpus, dictionary, params)?))
    }
}

/// A fitted LDA model.
#[derive(Debug, Clone)]
pub struct LdaModel {
    num_topics: usize,
    alpha: Vec<f64>,
    eta: f64,
    /// Variational topic-term parameters, K rows of V
    lambda: Vec<Vec<f64>>,
    /// exp(E[log beta]) cached from lambda
    exp_elog_beta: Vec<Vec<f64>>,
    /// Term strings by id
    terms: Vec<String>,
    iterations: usize,
    gamma_threshold: f64,
    minimum_probability: f64,
    seed: u64,
    /// Gamma(100, 1/100), used to initialise sstats and every document's gamma
    init: Gamma<f64>,
}

/// Output of one E-step over a chunk.
struct EStep {
    /// Per-document gamma, one row per document
    gamma: Vec<Vec<f64>>,
    /// Expected topic-term counts, K rows of V
    sstats: Vec<Vec<f64>>,
}

impl LdaModel {
    /// Fit a model to `corpus`.
    ///
    /// Fails with a modeling error if there is nothing to fit (no documents,
    /// empty vocabulary, or every document empty), if the topic or pass count
    /// is zero, or if the corpus references ids outside the dictionary.
    pub fn train(corpus: &Corpus, dictionary: &Dictionary, params: &ModelParams) -> Result<Self> {
        validate(corpus, dictionary, params)?;

        let k = params.num_topics;
        let v = dictionary.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let init = gamma_init()?;

        // Sufficient statistics start random; lambda = eta + sstats
        let mut sstats: Vec<Vec<f64>> = (0..k)
            .map(|_| (0..v).map(|_| init.sample(&mut rng)).collect())
            .collect();

        let mut model = Self {
            num_topics: k,
            alpha: vec![1.0 / k as f64; k],
            eta: 1.0 / k as f64,
            lambda: Vec::new(),
            exp_elog_beta: Vec::new(),
            terms: dictionary.iter().map(|(_, t)| t.to_string()).collect(),
            iterations: params.iterations,
            gamma_threshold: params.gamma_threshold,
            minimum_probability: params.minimum_probability.max(1e-8),
            seed: params.seed,
            init,
        };
        model.set_lambda(&sstats);

        let chunk_size = params.chunk_size.max(1);
        let total_docs = corpus.len() as f64;
        let mut num_updates = 0usize;

        info!(
            topics = k,
            terms = v,
            documents = corpus.len(),
            passes = params.passes,
            "Fitting LDA model"
        );

        for pass in 0..params.passes {
            for chunk in corpus.chunks(chunk_size) {
                let rho = (OFFSET + pass as f64 + num_updates as f64 / chunk_size as f64)
                    .powf(-DECAY);

                let estep = model.e_step(chunk, &mut rng);
                let scale = total_docs / chunk.len() as f64;

                let mut diff = 0.0;
                for (row, new_row) in sstats.iter_mut().zip(&estep.sstats) {
                    for (old, &fresh) in row.iter_mut().zip(new_row) {
                        let blended = (1.0 - rho) * *old + rho * fresh * scale;
                        diff += (blended - *old).abs();
                        *old = blended;
                    }
                }
                model.set_lambda(&sstats);
                num_updates += chunk.len();

                debug!(
                    pass = pass,
                    rho = rho,
                    topic_diff = diff / (k * v) as f64,
                    "LDA update"
                );
            }
        }

        Ok(model)
    }

    /// Recompute lambda and exp(E[log beta]) from sufficient statistics.
    fn set_lambda(&mut self, sstats: &[Vec<f64>]) {
        self.lambda = sstats
            .iter()
            .map(|row| row.iter().map(|&s| s + self.eta).collect())
            .collect();
        self.exp_elog_beta = self
            .lambda
            .iter()
            .map(|row| dirichlet_expectation(row).into_iter().map(f64::exp).collect())
            .collect();
    }

    /// Variational E-step over a set of documents.
    fn e_step(&self, docs: &[BagOfWords], rng: &mut StdRng) -> EStep {
        let k = self.num_topics;
        let v = self.terms.len();
        let mut sstats = vec![vec![0.0; v]; k];
        let mut gammas = Vec::with_capacity(docs.len());

        for doc in docs {
            let mut gamma: Vec<f64> = (0..k).map(|_| self.init.sample(&mut *rng)).collect();
            let (exp_elog_theta, phinorm) = self.infer_document(doc, &mut gamma);

            for (t, row) in sstats.iter_mut().enumerate() {
                for (&(id, count), &norm) in doc.iter().zip(&phinorm) {
                    row[id as usize] += exp_elog_theta[t] * count as f64 / norm;
                }
            }
            gammas.push(gamma);
        }

        // Multiply by exp(E[log beta]) to finish the expected counts
        for (row, beta_row) in sstats.iter_mut().zip(&self.exp_elog_beta) {
            for (s, &b) in row.iter_mut().zip(beta_row) {
                *s *= b;
            }
        }

        EStep {
            gamma: gammas,
            sstats,
        }
    }

    /// Iterate one document's gamma to convergence in place.
    ///
    /// Returns exp(E[log theta]) and the per-word phi normalisers from the
    /// final iteration.
    fn infer_document(&self, doc: &BagOfWords, gamma: &mut [f64]) -> (Vec<f64>, Vec<f64>) {
        let k = self.num_topics;
        let mut exp_elog_theta: Vec<f64> = dirichlet_expectation(gamma)
            .into_iter()
            .map(f64::exp)
            .collect();
        let mut phinorm = self.phinorm(doc, &exp_elog_theta);

        for _ in 0..self.iterations {
            let last: Vec<f64> = gamma.to_vec();

            for t in 0..k {
                let weighted: f64 = doc
                    .iter()
                    .zip(&phinorm)
                    .map(|(&(id, count), &norm)| {
                        count as f64 / norm * self.exp_elog_beta[t][id as usize]
                    })
                    .sum();
                gamma[t] = self.alpha[t] + exp_elog_theta[t] * weighted;
            }

            exp_elog_theta = dirichlet_expectation(gamma)
                .into_iter()
                .map(f64::exp)
                .collect();
            phinorm = self.phinorm(doc, &exp_elog_theta);

            let mean_change =
                gamma.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum::<f64>() / k as f64;
            if mean_change < self.gamma_threshold {
                break;
            }
        }

        (exp_elog_theta, phinorm)
    }

    /// Σ_k exp(E[log theta_k]) · exp(E[log beta_kw]) for each word in the doc.
    fn phinorm(&self, doc: &BagOfWords, exp_elog_theta: &[f64]) -> Vec<f64> {
        doc.iter()
            .map(|&(id, _)| {
                exp_elog_theta
                    .iter()
                    .zip(&self.exp_elog_beta)
                    .map(|(&theta, beta_row)| theta * beta_row[id as usize])
                    .sum::<f64>()
                    + EPS
            })
            .collect()
    }

    /// The symmetric document-topic prior.
    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    /// The symmetric topic-term prior.
    pub fn eta(&self) -> f64 {
        self.eta
    }
}

impl TopicModel for LdaModel {
    fn num_topics(&self) -> usize {
        self.num_topics
    }

    fn num_terms(&self) -> usize {
        self.terms.len()
    }

    fn topic_term_distribution(&self, topic: usize) -> Vec<f64> {
        let row = &self.lambda[topic];
        let total: f64 = row.iter().sum();
        row.iter().map(|&l| l / total).collect()
    }

    fn topic_terms(&self, topic: usize, n: usize) -> Vec<(String, f64)> {
        let dist = self.topic_term_distribution(topic);
        let mut ranked: Vec<(usize, f64)> = dist.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|(id, weight)| (self.terms[id].clone(), weight))
            .collect()
    }

    fn document_mixture(&self, bow: &BagOfWords) -> Vec<f64> {
        // Ids outside the vocabulary would index past the beta rows
        let known: BagOfWords = bow
            .iter()
            .copied()
            .filter(|&(id, _)| (id as usize) < self.terms.len())
            .collect();

        // Seeded per call so repeated queries give identical answers
        let mut rng = StdRng::seed_from_u64(self.seed);
        let estep = self.e_step(std::slice::from_ref(&known), &mut rng);
        let gamma = &estep.gamma[0];
        let total: f64 = gamma.iter().sum();
        gamma.iter().map(|g| g / total).collect()
    }

    fn document_topics(&self, bow: &BagOfWords) -> Vec<(usize, f64)> {
        self.document_mixture(bow)
            .into_iter()
            .enumerate()
            .filter(|&(_, p)| p >= self.minimum_probability)
            .collect()
    }
}

/// The Gamma(100, 1/100) distribution used to initialise lambda and gamma.
fn gamma_init() -> Result<Gamma<f64>> {
    Gamma::new(100.0, 1.0 / 100.0)
        .map_err(|e| PipelineError::Modeling(format!("invalid gamma initialiser: {e}")))
}

fn validate(corpus: &Corpus, dictionary: &Dictionary, params: &ModelParams) -> Result<()> {
    if params.num_topics == 0 {
        return Err(PipelineError::Modeling("topic count must be at least 1".into()));
    }
    if params.passes == 0 {
        return Err(PipelineError::Modeling("pass count must be at least 1".into()));
    }
    if corpus.is_empty() || dictionary.is_empty() {
        return Err(PipelineError::Modeling(
            "cannot fit a topic model to an empty corpus".into(),
        ));
    }
    if corpus.iter().all(|bow| bow.is_empty()) {
        return Err(PipelineError::Modeling(
            "every document in the corpus is empty".into(),
        ));
    }
    let vocab = dictionary.len();
    if let Some(&(id, _)) = corpus
        .iter()
        .flatten()
        .find(|&&(id, _)| id as usize >= vocab)
    {
        return Err(PipelineError::Modeling(format!(
            "corpus references term id {id} but the dictionary has {vocab} terms"
        )));
    }
    Ok(())
}
