//! Ranking core of the style-guide search: BM25, semantic ranking and their fusion.
//!
//! A search call takes a corpus of rows, turns each row into searchable text, ranks it
//! in one of three modes and returns the top rows projected onto the caller's output
//! fields:
//!
//! - [`SearchMode::Lexical`]: [`LexicalIndex`] (BM25, `k1 = 1.5`, `b = 0.75`)
//! - [`SearchMode::Semantic`]: cosine similarity through a
//!   [`SemanticProvider`](uxguide_vector_store::SemanticProvider)
//! - [`SearchMode::Fused`]: [`ScoreFusion`] of both, each side max-normalized
//!
//! Semantic modes silently fall back to lexical when the provider is unavailable; the
//! response reports the mode that actually ran.

mod bm25;
mod cache;
mod config;
mod error;
mod fusion;
mod mode;
mod orchestrator;
mod ranking;
mod record;
mod tokenizer;

pub use bm25::{Bm25Params, LexicalIndex};
pub use cache::{CacheStats, IndexCache};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use fusion::{FusionConfig, ScoreFusion};
pub use mode::SearchMode;
pub use orchestrator::{SearchHit, SearchOrchestrator, SearchRequest, SearchResponse};
pub use ranking::ScoredResult;
pub use record::{FieldSet, ProjectedRecord, Record};
pub use tokenizer::{tokenize, MIN_TERM_CHARS};
