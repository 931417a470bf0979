// SPDX-License-Identifier: MIT OR Apache-2.0

//! Word2Vec demo pipelines: skip-gram, CBOW, side-by-side comparison and
//! 2D/3D projections.
//!
//! Every run is stateless: sentences in, [`DemoReport`] out. Training and
//! projection go through the [`EmbeddingTrainer`] and [`Projector`] traits so
//! the orchestration can be exercised without real training.

use serde::Serialize;
use std::str::FromStr;

use super::projection::Projector;
use super::tokenize::{has_tokens, Tokenizer};
use super::word2vec::{Architecture, EmbeddingTrainer, TrainParams, WordVectors};
use crate::errors::EmbeddingError;

/// Projections need at least this many words and vector dimensions.
pub const MIN_PROJECTION_INPUT: usize = 3;

/// Neighbors returned per query unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// matplotlib's tab20 palette, indexed by sentence.
pub const TAB20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Color for the sentence at `index`.
pub fn sentence_color(index: usize) -> &'static str {
    TAB20[index % TAB20.len()]
}

/// Available demo pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    SkipGram,
    Cbow,
    Compare,
    View2d,
    View3d,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 5] = [
        PipelineKind::SkipGram,
        PipelineKind::Cbow,
        PipelineKind::Compare,
        PipelineKind::View2d,
        PipelineKind::View3d,
    ];

    /// Hyperparameters the pipeline trains with when nothing is configured.
    pub fn default_params(self) -> TrainParams {
        let base = TrainParams::default();
        match self {
            PipelineKind::SkipGram => TrainParams {
                architecture: Architecture::SkipGram,
                vector_size: 100,
                window: 5,
                min_count: 1,
                ..base
            },
            PipelineKind::Cbow => TrainParams {
                architecture: Architecture::Cbow,
                vector_size: 150,
                window: 3,
                min_count: 1,
                ..base
            },
            PipelineKind::Compare => TrainParams {
                vector_size: 150,
                window: 5,
                min_count: 1,
                ..base
            },
            PipelineKind::View2d | PipelineKind::View3d => TrainParams {
                architecture: Architecture::Cbow,
                vector_size: 100,
                window: 5,
                min_count: 1,
                ..base
            },
        }
    }

    /// Output dimensions for projection pipelines.
    pub fn projection_dims(self) -> Option<usize> {
        match self {
            PipelineKind::View2d => Some(2),
            PipelineKind::View3d => Some(3),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PipelineKind::SkipGram => "Skip-gram Word2Vec",
            PipelineKind::Cbow => "CBOW Word2Vec",
            PipelineKind::Compare => "Skip-gram vs CBOW Word Embedding Comparison",
            PipelineKind::View2d => "2D Visualization of Word Embeddings",
            PipelineKind::View3d => "3D Visualization of Word Embeddings",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineKind::SkipGram => "skip-gram",
            PipelineKind::Cbow => "cbow",
            PipelineKind::Compare => "compare",
            PipelineKind::View2d => "view2d",
            PipelineKind::View3d => "view3d",
        }
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip-gram" | "skipgram" | "sg" => Ok(PipelineKind::SkipGram),
            "cbow" => Ok(PipelineKind::Cbow),
            "compare" => Ok(PipelineKind::Compare),
            "view2d" | "2d" => Ok(PipelineKind::View2d),
            "view3d" | "3d" => Ok(PipelineKind::View3d),
            other => Err(format!(
                "unknown pipeline '{}' (expected skip-gram, cbow, compare, view2d or view3d)",
                other
            )),
        }
    }
}

/// Input for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct DemoRequest {
    pub sentences: Vec<String>,
    /// Word to look up nearest neighbors for
    pub query: Option<String>,
    /// Second word for pairwise similarity
    pub compare: Option<String>,
}

impl DemoRequest {
    pub fn new(sentences: Vec<String>) -> Self {
        Self {
            sentences,
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_compare(mut self, compare: Option<String>) -> Self {
        self.compare = compare;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub architecture: Architecture,
    pub vocabulary: usize,
    pub vector_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub word: String,
    pub score: f32,
}

/// Nearest neighbors of the query word in one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub model: Architecture,
    pub word: String,
    pub in_vocabulary: bool,
    pub neighbors: Vec<Neighbor>,
}

/// Cosine similarity between the query and compare words in one model.
/// `score` is `None` when either word is missing from the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSimilarity {
    pub model: Architecture,
    pub first: String,
    pub second: String,
    pub score: Option<f32>,
}

/// First two raw vector components of a word in one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub model: Architecture,
    pub word: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigurePoint {
    pub word: String,
    pub coords: Vec<f32>,
    pub color: String,
}

/// Line through the projected words of one sentence, in sentence order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceTrace {
    pub name: String,
    pub color: String,
    pub coords: Vec<Vec<f32>>,
}

/// Chart-ready projection of a model's vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub dims: usize,
    pub points: Vec<FigurePoint>,
    pub traces: Vec<SentenceTrace>,
}

/// Everything a pipeline run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub pipeline: PipelineKind,
    pub title: String,
    pub sentences: Vec<String>,
    pub models: Vec<ModelSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<QueryResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub similarities: Vec<PairSimilarity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comparison: Vec<ComparisonPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<Figure>,
}

/// Runs demo pipelines against an injected trainer and projector.
pub struct EmbeddingDemo<'a> {
    trainer: &'a dyn EmbeddingTrainer,
    projector: &'a dyn Projector,
    tokenizer: Tokenizer,
    top_n: usize,
}

impl<'a> EmbeddingDemo<'a> {
    pub fn new(trainer: &'a dyn EmbeddingTrainer, projector: &'a dyn Projector) -> Self {
        Self {
            trainer,
            projector,
            tokenizer: Tokenizer::default(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn run(
        &self,
        kind: PipelineKind,
        params: &TrainParams,
        request: &DemoRequest,
    ) -> Result<DemoReport, EmbeddingError> {
        let corpus = self.tokenizer.tokenize_all(&request.sentences);
        if !has_tokens(&corpus) {
            return Err(EmbeddingError::NoTokens);
        }

        let architectures: Vec<Architecture> = match kind {
            PipelineKind::Compare => vec![Architecture::SkipGram, Architecture::Cbow],
            _ => vec![params.architecture],
        };

        let mut models = Vec::with_capacity(architectures.len());
        for architecture in architectures {
            let params = params.with_architecture(architecture);
            tracing::debug!(
                "training {} with {} ({} sentences, vector_size {}, window {})",
                architecture,
                self.trainer.name(),
                corpus.len(),
                params.vector_size,
                params.window
            );
            models.push((architecture, self.trainer.train(&corpus, &params)?));
        }

        let query = normalize_word(request.query.as_deref());
        let compare = normalize_word(request.compare.as_deref());

        let mut report = DemoReport {
            pipeline: kind,
            title: kind.title().to_string(),
            sentences: request.sentences.clone(),
            models: models
                .iter()
                .map(|(architecture, vectors)| ModelSummary {
                    architecture: *architecture,
                    vocabulary: vectors.len(),
                    vector_size: vectors.dim(),
                })
                .collect(),
            queries: Vec::new(),
            similarities: Vec::new(),
            comparison: Vec::new(),
            figure: None,
        };

        if let Some(word) = &query {
            report.queries = models
                .iter()
                .map(|(architecture, vectors)| self.query(*architecture, vectors, word))
                .collect();

            if let Some(other) = &compare {
                report.similarities = models
                    .iter()
                    .map(|(architecture, vectors)| PairSimilarity {
                        model: *architecture,
                        first: word.clone(),
                        second: other.clone(),
                        score: vectors.similarity(word, other).ok(),
                    })
                    .collect();

                if kind == PipelineKind::Compare {
                    report.comparison = comparison_points(&models, &[word, other]);
                }
            }
        }

        if let Some(dims) = kind.projection_dims() {
            let (_, vectors) = &models[0];
            report.figure = Some(self.figure(kind, vectors, &corpus, dims)?);
        }

        Ok(report)
    }

    fn query(&self, model: Architecture, vectors: &WordVectors, word: &str) -> QueryResult {
        let neighbors = vectors
            .most_similar(word, self.top_n)
            .map(|hits| {
                hits.into_iter()
                    .map(|(word, score)| Neighbor { word, score })
                    .collect()
            })
            .unwrap_or_default();
        QueryResult {
            model,
            word: word.to_string(),
            in_vocabulary: vectors.contains(word),
            neighbors,
        }
    }

    fn figure(
        &self,
        kind: PipelineKind,
        vectors: &WordVectors,
        corpus: &[Vec<String>],
        dims: usize,
    ) -> Result<Figure, EmbeddingError> {
        if vectors.len() < MIN_PROJECTION_INPUT || vectors.dim() < MIN_PROJECTION_INPUT {
            return Err(EmbeddingError::NotEnoughData {
                words: vectors.len(),
                dims: vectors.dim(),
            });
        }

        let projected = self.projector.project(&vectors.rows(), dims)?;
        tracing::debug!(
            "projected {} words to {}D with {}",
            projected.len(),
            dims,
            self.projector.name()
        );

        let points = vectors
            .words()
            .iter()
            .zip(&projected)
            .map(|(word, coords)| {
                let owner = corpus
                    .iter()
                    .position(|sentence| sentence.iter().any(|t| t == word))
                    .unwrap_or(0);
                FigurePoint {
                    word: word.clone(),
                    coords: coords.clone(),
                    color: sentence_color(owner).to_string(),
                }
            })
            .collect();

        let traces = corpus
            .iter()
            .enumerate()
            .map(|(i, sentence)| SentenceTrace {
                name: format!("Sentence {}", i + 1),
                color: sentence_color(i).to_string(),
                // words dropped by min_count have no point to pass through
                coords: sentence
                    .iter()
                    .filter_map(|t| vectors.index_of(t))
                    .map(|idx| projected[idx].clone())
                    .collect(),
            })
            .collect();

        Ok(Figure {
            title: kind.title().to_string(),
            dims,
            points,
            traces,
        })
    }
}

fn normalize_word(word: Option<&str>) -> Option<String> {
    word.map(|w| w.trim().to_lowercase()).filter(|w| !w.is_empty())
}

/// Raw first two components per model, only when every word is known to every model.
fn comparison_points(models: &[(Architecture, WordVectors)], words: &[&String]) -> Vec<ComparisonPoint> {
    let all_known = models
        .iter()
        .all(|(_, vectors)| words.iter().all(|w| vectors.contains(w)));
    if !all_known {
        return Vec::new();
    }

    let mut points = Vec::new();
    for word in words {
        for (architecture, vectors) in models {
            if let Some(v) = vectors.vector(word) {
                points.push(ComparisonPoint {
                    model: *architecture,
                    word: word.to_string(),
                    x: v.first().copied().unwrap_or(0.0),
                    y: v.get(1).copied().unwrap_or(0.0),
                });
            }
        }
    }
    points
}
