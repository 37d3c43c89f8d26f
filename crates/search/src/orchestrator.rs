use crate::bm25::LexicalIndex;
use crate::cache::IndexCache;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::fusion::ScoreFusion;
use crate::mode::SearchMode;
use crate::ranking::{take_top, ScoredResult};
use crate::record::{FieldSet, ProjectedRecord, Record};
use serde::Serialize;
use std::sync::Arc;
use uxguide_vector_store::{SemanticIndex, SemanticProvider, UnavailableProvider};

/// One search call over one corpus.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub mode: SearchMode,
    pub result_count: usize,
    pub records: &'a [Record],
    pub fields: &'a FieldSet,
}

/// A ranked row resolved back to its source record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub index: usize,
    pub score: f64,
    pub record: ProjectedRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Mode actually used, after any fallback.
    pub mode_used: SearchMode,
    pub result_count: usize,
    pub results: Vec<SearchHit>,
}

/// Picks the scoring mode, runs the scorers and shapes the bounded result list.
///
/// Holds no per-corpus state; every call builds its own indexes unless an
/// [`IndexCache`] is attached.
pub struct SearchOrchestrator {
    provider: Arc<dyn SemanticProvider>,
    config: SearchConfig,
    cache: Option<Arc<IndexCache>>,
}

impl SearchOrchestrator {
    pub fn new(provider: Arc<dyn SemanticProvider>, config: SearchConfig) -> Self {
        Self {
            provider,
            config,
            cache: None,
        }
    }

    /// Orchestrator with no embedding backend at all.
    pub fn lexical_only(config: SearchConfig) -> Self {
        Self::new(
            Arc::new(UnavailableProvider::new("no semantic provider configured")),
            config,
        )
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<IndexCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn semantic_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Mode that will actually run for `requested`.
    pub fn effective_mode(&self, requested: SearchMode) -> SearchMode {
        if requested.needs_embeddings() && !self.provider.is_available() {
            log::info!(
                "Semantic provider unavailable, downgrading '{requested}' search to lexical"
            );
            return SearchMode::Lexical;
        }
        requested
    }

    /// Rank, truncate and project `request.records`.
    pub fn search(&self, request: &SearchRequest<'_>) -> Result<SearchResponse> {
        let documents: Vec<String> = request
            .records
            .iter()
            .map(|record| record.document_text(&request.fields.search_fields))
            .collect();

        let (mode_used, ranked) =
            self.rank(request.query, &documents, request.mode, request.result_count)?;

        let results: Vec<SearchHit> = ranked
            .into_iter()
            .filter_map(|(index, score)| {
                request.records.get(index).map(|record| SearchHit {
                    index,
                    score,
                    record: record.project(&request.fields.output_fields),
                })
            })
            .collect();

        log::debug!(
            "Search '{}' ({mode_used}): {} of {} rows",
            request.query,
            results.len(),
            request.records.len()
        );

        Ok(SearchResponse {
            mode_used,
            result_count: results.len(),
            results,
        })
    }

    /// Ranked `(document index, score)` pairs for `query`, at most `limit` long, plus the
    /// mode that produced them.
    pub fn rank(
        &self,
        query: &str,
        documents: &[String],
        requested: SearchMode,
        limit: usize,
    ) -> Result<(SearchMode, Vec<ScoredResult>)> {
        let mode = self.effective_mode(requested);
        if documents.is_empty() {
            return Ok((mode, Vec::new()));
        }

        let positive_only = self.config.positive_only;
        let ranked = match mode {
            SearchMode::Lexical => {
                take_top(self.lexical_ranking(query, documents), limit, positive_only)
            }
            SearchMode::Semantic => {
                let index = SemanticIndex::fit(self.provider.as_ref(), documents)?;
                index.search(query, limit)?
            }
            SearchMode::Fused => {
                let fusion = ScoreFusion::new(self.config.fusion, positive_only);
                let pool = fusion.candidate_pool(limit);

                let mut lexical = self.lexical_ranking(query, documents);
                lexical.truncate(pool);
                log::debug!("Lexical: {} candidates", lexical.len());

                let semantic =
                    SemanticIndex::fit(self.provider.as_ref(), documents)?.search(query, pool)?;
                log::debug!("Semantic: {} candidates", semantic.len());

                fusion.fuse(&lexical, &semantic, limit)
            }
        };

        Ok((mode, ranked))
    }

    fn lexical_ranking(&self, query: &str, documents: &[String]) -> Vec<ScoredResult> {
        match &self.cache {
            Some(cache) => cache.get_or_build(self.config.bm25, documents).score(query),
            None => LexicalIndex::build(self.config.bm25, documents).score(query),
        }
    }
}
