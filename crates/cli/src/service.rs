use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use uxguide_catalog::{load_topic, Catalog, TopicConfig};
use uxguide_search::{ProjectedRecord, SearchMode, SearchOrchestrator, SearchRequest};

/// Domain reported for stack searches.
pub const STACK_DOMAIN: &str = "stack";

/// One answered query, with the topic and file it was answered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub query: String,
    pub file: String,
    pub mode: SearchMode,
    pub count: usize,
    pub results: Vec<ProjectedRecord>,
}

/// Ties the catalog and data directory to a search orchestrator.
pub struct GuideSearch {
    catalog: Catalog,
    data_dir: PathBuf,
    orchestrator: SearchOrchestrator,
}

impl GuideSearch {
    pub fn new(catalog: Catalog, data_dir: PathBuf, orchestrator: SearchOrchestrator) -> Self {
        Self {
            catalog,
            data_dir,
            orchestrator,
        }
    }

    /// Search one topic; without `domain` the topic is resolved from the query.
    pub fn search_topic(
        &self,
        query: &str,
        domain: Option<&str>,
        mode: SearchMode,
        result_count: usize,
    ) -> Result<SearchReport> {
        let domain = match domain {
            Some(domain) => domain.to_string(),
            None => {
                let resolved = self.catalog.resolver().resolve(query).to_string();
                log::debug!("Resolved query '{query}' to topic '{resolved}'");
                resolved
            }
        };
        let config = self.catalog.topic(&domain)?.clone();
        self.run(query, domain, None, &config, mode, result_count)
    }

    /// Search the guidelines of one framework stack.
    pub fn search_stack(
        &self,
        query: &str,
        stack: &str,
        mode: SearchMode,
        result_count: usize,
    ) -> Result<SearchReport> {
        let config = self.catalog.stack(stack)?;
        self.run(
            query,
            STACK_DOMAIN.to_string(),
            Some(stack.to_string()),
            &config,
            mode,
            result_count,
        )
    }

    fn run(
        &self,
        query: &str,
        domain: String,
        stack: Option<String>,
        config: &TopicConfig,
        mode: SearchMode,
        result_count: usize,
    ) -> Result<SearchReport> {
        let name = stack.as_deref().unwrap_or(&domain);
        let table = load_topic(&self.data_dir, name, config)?;

        let response = self.orchestrator.search(&SearchRequest {
            query,
            mode,
            result_count,
            records: &table.records,
            fields: &config.fields,
        })?;

        if response.mode_used != mode {
            log::warn!(
                "'{mode}' search needs an embedding model; falling back to {}",
                response.mode_used
            );
        }

        Ok(SearchReport {
            domain,
            stack,
            query: query.to_string(),
            file: config.file.to_string_lossy().into_owned(),
            mode: response.mode_used,
            count: response.result_count,
            results: response
                .results
                .into_iter()
                .map(|hit| hit.record)
                .collect(),
        })
    }
}
