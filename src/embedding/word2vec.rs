// SPDX-License-Identifier: MIT OR Apache-2.0

//! Word2Vec training with negative sampling.
//!
//! Supports skip-gram and CBOW (mean of context vectors). Training is
//! single-threaded and fully determined by the seed, so the same sentences
//! always produce the same vectors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::EmbeddingError;

/// Starting learning rate.
pub const DEFAULT_ALPHA: f32 = 0.025;

/// Learning rate at the end of training.
pub const DEFAULT_MIN_ALPHA: f32 = 0.0001;

/// Exponent applied to word counts for the negative sampling distribution.
const NEGATIVE_POWER: f64 = 0.75;

/// Training objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Architecture {
    /// Predict context words from the center word
    SkipGram,
    /// Predict the center word from the averaged context
    Cbow,
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Architecture::SkipGram => write!(f, "skip-gram"),
            Architecture::Cbow => write!(f, "cbow"),
        }
    }
}

/// Training hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainParams {
    pub architecture: Architecture,
    pub vector_size: usize,
    pub window: usize,
    pub min_count: usize,
    pub epochs: usize,
    pub negative: usize,
    pub alpha: f32,
    pub min_alpha: f32,
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            architecture: Architecture::Cbow,
            vector_size: 100,
            window: 5,
            min_count: 1,
            epochs: 5,
            negative: 5,
            alpha: DEFAULT_ALPHA,
            min_alpha: DEFAULT_MIN_ALPHA,
            seed: 1,
        }
    }
}

impl TrainParams {
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    fn validate(&self) -> Result<(), EmbeddingError> {
        if self.vector_size == 0 {
            return Err(EmbeddingError::InvalidParams("vector_size must be greater than 0".into()));
        }
        if self.window == 0 {
            return Err(EmbeddingError::InvalidParams("window must be greater than 0".into()));
        }
        if self.epochs == 0 {
            return Err(EmbeddingError::InvalidParams("epochs must be greater than 0".into()));
        }
        Ok(())
    }
}

/// Trained word vectors with similarity lookups.
#[derive(Debug, Clone)]
pub struct WordVectors {
    words: Vec<String>,
    index: HashMap<String, usize>,
    dim: usize,
    data: Vec<f32>,
}

impl WordVectors {
    /// Build from words and their vectors. All vectors must share one length.
    pub fn from_rows(words: Vec<String>, rows: Vec<Vec<f32>>) -> Result<Self, EmbeddingError> {
        if words.len() != rows.len() {
            return Err(EmbeddingError::InvalidParams(format!(
                "{} words but {} vectors",
                words.len(),
                rows.len()
            )));
        }
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != dim) {
            return Err(EmbeddingError::InvalidParams("vectors differ in length".into()));
        }
        let index = words.iter().enumerate().map(|(i, w)| (w.clone(), i)).collect();
        Ok(Self {
            words,
            index,
            dim,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Vocabulary in index order (most frequent first for trained models).
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.index_of(word).map(|i| self.row(i))
    }

    /// All vectors in vocabulary order.
    pub fn rows(&self) -> Vec<Vec<f32>> {
        (0..self.len()).map(|i| self.row(i).to_vec()).collect()
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Cosine similarity between two vocabulary words.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32, EmbeddingError> {
        let va = self
            .vector(a)
            .ok_or_else(|| EmbeddingError::UnknownWord(a.to_string()))?;
        let vb = self
            .vector(b)
            .ok_or_else(|| EmbeddingError::UnknownWord(b.to_string()))?;
        Ok(cosine_similarity(va, vb))
    }

    /// The `top_n` words closest to `word` by cosine similarity, best first.
    pub fn most_similar(&self, word: &str, top_n: usize) -> Result<Vec<(String, f32)>, EmbeddingError> {
        let target = self
            .index_of(word)
            .ok_or_else(|| EmbeddingError::UnknownWord(word.to_string()))?;
        let query = self.row(target);

        let mut scored: Vec<(usize, f32)> = (0..self.len())
            .filter(|&i| i != target)
            .map(|i| (i, cosine_similarity(query, self.row(i))))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);

        Ok(scored
            .into_iter()
            .map(|(i, score)| (self.words[i].clone(), score))
            .collect())
    }
}

/// Trait for anything that turns tokenized sentences into word vectors.
pub trait EmbeddingTrainer {
    /// Short identifier used in reports and logs.
    fn name(&self) -> &str;

    fn train(&self, corpus: &[Vec<String>], params: &TrainParams) -> Result<WordVectors, EmbeddingError>;
}

/// Negative-sampling Word2Vec trainer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Word2VecTrainer;

impl EmbeddingTrainer for Word2VecTrainer {
    fn name(&self) -> &str {
        "word2vec"
    }

    fn train(&self, corpus: &[Vec<String>], params: &TrainParams) -> Result<WordVectors, EmbeddingError> {
        params.validate()?;

        let vocab = Vocabulary::build(corpus, params.min_count);
        if vocab.words.is_empty() {
            return Err(EmbeddingError::NoTokens);
        }

        let sentences: Vec<Vec<usize>> = corpus
            .iter()
            .map(|s| s.iter().filter_map(|w| vocab.index.get(w).copied()).collect())
            .collect();
        let words_per_epoch: usize = sentences.iter().map(Vec::len).sum();

        let mut model = Model::new(vocab.words.len(), params.vector_size, params.seed);
        let sampler = NegativeSampler::new(&vocab.counts);
        let total = (words_per_epoch * params.epochs).max(1) as f32;
        let mut processed = 0usize;

        for epoch in 0..params.epochs {
            for sentence in &sentences {
                for pos in 0..sentence.len() {
                    let progress = processed as f32 / total;
                    let alpha = (params.alpha - (params.alpha - params.min_alpha) * progress)
                        .max(params.min_alpha);

                    let reduced = model.rng.gen_range(0..params.window);
                    let span = params.window - reduced;
                    let start = pos.saturating_sub(span);
                    let end = (pos + span + 1).min(sentence.len());
                    let context: Vec<usize> = (start..end)
                        .filter(|&j| j != pos)
                        .map(|j| sentence[j])
                        .collect();

                    if !context.is_empty() {
                        match params.architecture {
                            Architecture::SkipGram => {
                                for &ctx in &context {
                                    model.train_skip_gram(ctx, sentence[pos], alpha, params.negative, &sampler);
                                }
                            }
                            Architecture::Cbow => {
                                model.train_cbow(&context, sentence[pos], alpha, params.negative, &sampler);
                            }
                        }
                    }
                    processed += 1;
                }
            }
            tracing::debug!(
                "{} epoch {}/{} done ({} words)",
                params.architecture,
                epoch + 1,
                params.epochs,
                words_per_epoch
            );
        }

        tracing::info!(
            "trained {} model: {} words x {} dims",
            params.architecture,
            vocab.words.len(),
            params.vector_size
        );

        let rows = model
            .input
            .chunks(params.vector_size)
            .map(<[f32]>::to_vec)
            .collect();
        WordVectors::from_rows(vocab.words, rows)
    }
}

/// Words kept for training, most frequent first.
struct Vocabulary {
    words: Vec<String>,
    counts: Vec<u64>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn build(corpus: &[Vec<String>], min_count: usize) -> Self {
        // (count, first occurrence)
        let mut seen: HashMap<&str, (u64, usize)> = HashMap::new();
        let mut order = 0usize;
        for word in corpus.iter().flatten() {
            let entry = seen.entry(word.as_str()).or_insert((0, order));
            entry.0 += 1;
            order += 1;
        }

        let mut kept: Vec<(&str, u64, usize)> = seen
            .into_iter()
            .filter(|(_, (count, _))| *count >= min_count as u64)
            .map(|(word, (count, first))| (word, count, first))
            .collect();
        kept.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let words: Vec<String> = kept.iter().map(|(w, _, _)| w.to_string()).collect();
        let counts = kept.iter().map(|(_, c, _)| *c).collect();
        let index = words.iter().enumerate().map(|(i, w)| (w.clone(), i)).collect();

        Self {
            words,
            counts,
            index,
        }
    }
}

/// Draws negative examples proportionally to count^0.75.
struct NegativeSampler {
    cumulative: Vec<f64>,
}

impl NegativeSampler {
    fn new(counts: &[u64]) -> Self {
        let mut running = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                running += (c as f64).powf(NEGATIVE_POWER);
                running
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let target = rng.gen::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= target)
            .min(self.cumulative.len().saturating_sub(1))
    }
}

/// Input (word) and output (context) weight matrices, row-major.
struct Model {
    dim: usize,
    input: Vec<f32>,
    output: Vec<f32>,
    rng: StdRng,
}

impl Model {
    fn new(vocab_size: usize, dim: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let input = (0..vocab_size * dim)
            .map(|_| (rng.gen::<f32>() - 0.5) / dim as f32)
            .collect();
        Self {
            dim,
            input,
            output: vec![0.0; vocab_size * dim],
            rng,
        }
    }

    fn train_skip_gram(
        &mut self,
        input_word: usize,
        target: usize,
        alpha: f32,
        negative: usize,
        sampler: &NegativeSampler,
    ) {
        let range = input_word * self.dim..(input_word + 1) * self.dim;
        let hidden = self.input[range.clone()].to_vec();
        let grad = self.negative_sampling(&hidden, target, alpha, negative, sampler);
        for (w, g) in self.input[range].iter_mut().zip(&grad) {
            *w += g;
        }
    }

    fn train_cbow(
        &mut self,
        context: &[usize],
        target: usize,
        alpha: f32,
        negative: usize,
        sampler: &NegativeSampler,
    ) {
        let mut hidden = vec![0.0f32; self.dim];
        for &c in context {
            for (h, w) in hidden.iter_mut().zip(&self.input[c * self.dim..(c + 1) * self.dim]) {
                *h += w;
            }
        }
        let scale = 1.0 / context.len() as f32;
        hidden.iter_mut().for_each(|h| *h *= scale);

        let grad = self.negative_sampling(&hidden, target, alpha, negative, sampler);
        for &c in context {
            for (w, g) in self.input[c * self.dim..(c + 1) * self.dim].iter_mut().zip(&grad) {
                *w += g;
            }
        }
    }

    /// Update output vectors for the positive target and `negative` samples;
    /// returns the gradient for the hidden layer.
    fn negative_sampling(
        &mut self,
        hidden: &[f32],
        target: usize,
        alpha: f32,
        negative: usize,
        sampler: &NegativeSampler,
    ) -> Vec<f32> {
        let mut grad = vec![0.0f32; self.dim];
        for d in 0..=negative {
            let (word, label) = if d == 0 {
                (target, 1.0)
            } else {
                let sample = sampler.sample(&mut self.rng);
                if sample == target {
                    continue;
                }
                (sample, 0.0)
            };

            let out = &mut self.output[word * self.dim..(word + 1) * self.dim];
            let dot: f32 = hidden.iter().zip(out.iter()).map(|(h, o)| h * o).sum();
            let g = (label - sigmoid(dot)) * alpha;
            for ((gr, o), h) in grad.iter_mut().zip(out.iter_mut()).zip(hidden) {
                *gr += g * *o;
                *o += g * h;
            }
        }
        grad
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-6.0, 6.0)).exp())
}

/// Cosine similarity; 0.0 when either vector has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(sentences: &[&str]) -> Vec<Vec<String>> {
        sentences
            .iter()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    fn small_params(architecture: Architecture) -> TrainParams {
        TrainParams {
            architecture,
            vector_size: 16,
            window: 2,
            epochs: 20,
            ..TrainParams::default()
        }
    }

    #[test]
    fn vocabulary_is_frequency_ordered() {
        let data = corpus(&["solar wind solar", "wind hydro solar"]);
        let vectors = Word2VecTrainer.train(&data, &small_params(Architecture::Cbow)).unwrap();
        assert_eq!(vectors.words(), &["solar", "wind", "hydro"]);
        assert_eq!(vectors.dim(), 16);
        assert_eq!(vectors.rows().len(), 3);
    }

    #[test]
    fn min_count_filters_rare_words() {
        let data = corpus(&["solar wind solar", "wind hydro solar"]);
        let params = TrainParams {
            min_count: 2,
            ..small_params(Architecture::SkipGram)
        };
        let vectors = Word2VecTrainer.train(&data, &params).unwrap();
        assert!(vectors.contains("solar"));
        assert!(!vectors.contains("hydro"));
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = Word2VecTrainer
            .train(&[Vec::new()], &TrainParams::default())
            .unwrap_err();
        assert_eq!(err, EmbeddingError::NoTokens);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let data = corpus(&["a b"]);
        let params = TrainParams {
            window: 0,
            ..TrainParams::default()
        };
        assert!(matches!(
            Word2VecTrainer.train(&data, &params),
            Err(EmbeddingError::InvalidParams(_))
        ));
    }

    #[test]
    fn training_is_deterministic_for_a_seed() {
        let data = corpus(&["green energy transition", "renewable energy growth"]);
        for arch in [Architecture::SkipGram, Architecture::Cbow] {
            let a = Word2VecTrainer.train(&data, &small_params(arch)).unwrap();
            let b = Word2VecTrainer.train(&data, &small_params(arch)).unwrap();
            assert_eq!(a.vector("energy"), b.vector("energy"));
            assert!(a.vector("energy").unwrap().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn most_similar_excludes_query_and_is_sorted() {
        let data = corpus(&[
            "carbon emissions fell",
            "carbon emissions rose",
            "water usage fell",
            "water usage rose",
        ]);
        let vectors = Word2VecTrainer
            .train(&data, &small_params(Architecture::SkipGram))
            .unwrap();
        let similar = vectors.most_similar("carbon", 3).unwrap();
        assert_eq!(similar.len(), 3);
        assert!(similar.iter().all(|(w, _)| w != "carbon"));
        assert!(similar.windows(2).all(|pair| pair[0].1 >= pair[1].1));

        assert_eq!(
            vectors.most_similar("nuclear", 3).unwrap_err(),
            EmbeddingError::UnknownWord("nuclear".to_string())
        );
    }

    #[test]
    fn similarity_lookups() {
        let vectors = WordVectors::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap();
        assert!((vectors.similarity("a", "a").unwrap() - 1.0).abs() < 1e-6);
        assert!(vectors.similarity("a", "b").unwrap().abs() < 1e-6);
        assert!(vectors.similarity("a", "z").is_err());

        let top = vectors.most_similar("a", 5).unwrap();
        assert_eq!(top[0].0, "c");
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn from_rows_checks_shapes() {
        assert!(WordVectors::from_rows(vec!["a".into()], vec![]).is_err());
        assert!(WordVectors::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![1.0], vec![1.0, 2.0]]
        )
        .is_err());
    }

    #[test]
    fn sampler_covers_vocabulary() {
        let sampler = NegativeSampler::new(&[10, 1, 1]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut hits = [0usize; 3];
        for _ in 0..1000 {
            hits[sampler.sample(&mut rng)] += 1;
        }
        assert!(hits[0] > hits[1]);
        assert!(hits.iter().all(|&h| h > 0));
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
