use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scoring strategy for one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// BM25 only.
    #[default]
    Lexical,
    /// Embedding cosine similarity only.
    Semantic,
    /// Max-normalized blend of both.
    Fused,
}

impl SearchMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Semantic => "semantic",
            Self::Fused => "fused",
        }
    }

    /// Lenient parse: anything unrecognized becomes [`SearchMode::Lexical`].
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            log::debug!("Unrecognized search mode '{raw}', using lexical");
            Self::Lexical
        })
    }

    /// Whether this mode needs an embedding backend.
    #[must_use]
    pub const fn needs_embeddings(self) -> bool {
        matches!(self, Self::Semantic | Self::Fused)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = SearchError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lexical" | "bm25" | "keyword" => Ok(Self::Lexical),
            "semantic" | "vector" => Ok(Self::Semantic),
            "fused" | "hybrid" => Ok(Self::Fused),
            _ => Err(SearchError::UnknownMode(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!("lexical".parse::<SearchMode>().unwrap(), SearchMode::Lexical);
        assert_eq!("BM25".parse::<SearchMode>().unwrap(), SearchMode::Lexical);
        assert_eq!("vector".parse::<SearchMode>().unwrap(), SearchMode::Semantic);
        assert_eq!(" Hybrid ".parse::<SearchMode>().unwrap(), SearchMode::Fused);
        assert!("fuzzy".parse::<SearchMode>().is_err());
    }

    #[test]
    fn unknown_modes_resolve_to_lexical() {
        assert_eq!(SearchMode::resolve("rrf"), SearchMode::Lexical);
        assert_eq!(SearchMode::resolve(""), SearchMode::Lexical);
        assert_eq!(SearchMode::resolve("semantic"), SearchMode::Semantic);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SearchMode::Fused).unwrap(), "\"fused\"");
        assert_eq!(SearchMode::Semantic.to_string(), "semantic");
    }

    #[test]
    fn only_semantic_modes_need_embeddings() {
        assert!(!SearchMode::Lexical.needs_embeddings());
        assert!(SearchMode::Semantic.needs_embeddings());
        assert!(SearchMode::Fused.needs_embeddings());
    }
}
