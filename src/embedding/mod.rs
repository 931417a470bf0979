// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding module - word vector demos over user-supplied sentences
//!
//! Sentences are tokenized, fed to an [`EmbeddingTrainer`], and optionally
//! reduced to 2 or 3 dimensions by a [`Projector`] for plotting.

pub mod pipeline;
pub mod projection;
pub mod tokenize;
pub mod word2vec;

pub use pipeline::{
    sentence_color, ComparisonPoint, DemoReport, DemoRequest, EmbeddingDemo, Figure, FigurePoint,
    ModelSummary, Neighbor, PairSimilarity, PipelineKind, QueryResult, SentenceTrace,
    DEFAULT_TOP_N, MIN_PROJECTION_INPUT, TAB20,
};
pub use projection::{PcaProjector, Projector};
pub use tokenize::{has_tokens, is_stopword, Tokenizer};
pub use word2vec::{
    cosine_similarity, Architecture, EmbeddingTrainer, TrainParams, Word2VecTrainer, WordVectors,
};
