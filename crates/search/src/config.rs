use crate::bm25::Bm25Params;
use crate::error::{Result, SearchError};
use crate::fusion::FusionConfig;
use serde::{Deserialize, Serialize};

/// Tunables for the ranking pipeline. Every field has a default, so a partial TOML
/// table only overrides what it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub bm25: Bm25Params,
    pub fusion: FusionConfig,
    /// Drop results whose final score is not strictly positive.
    pub positive_only: bool,
    /// Result count used when a request does not name one.
    pub default_result_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bm25: Bm25Params::default(),
            fusion: FusionConfig::default(),
            positive_only: true,
            default_result_count: 3,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.bm25.k1.is_finite() && self.bm25.k1 >= 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "bm25.k1 must be a non-negative number, got {}",
                self.bm25.k1
            )));
        }
        if !(0.0..=1.0).contains(&self.bm25.b) {
            return Err(SearchError::InvalidConfig(format!(
                "bm25.b must be within [0, 1], got {}",
                self.bm25.b
            )));
        }
        if !(0.0..=1.0).contains(&self.fusion.alpha) {
            return Err(SearchError::InvalidConfig(format!(
                "fusion.alpha must be within [0, 1], got {}",
                self.fusion.alpha
            )));
        }
        if self.fusion.candidate_multiplier == 0 {
            return Err(SearchError::InvalidConfig(
                "fusion.candidate_multiplier must be at least 1".to_string(),
            ));
        }
        if self.default_result_count == 0 {
            return Err(SearchError::InvalidConfig(
                "default_result_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let config = SearchConfig::default();
        assert_eq!(config.bm25.k1, 1.5);
        assert_eq!(config.bm25.b, 0.75);
        assert_eq!(config.fusion.alpha, 0.5);
        assert_eq!(config.fusion.candidate_multiplier, 2);
        assert!(config.positive_only);
        assert_eq!(config.default_result_count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"fusion": {"alpha": 0.7}, "bm25": {"b": 0.5}}"#).unwrap();
        assert_eq!(config.fusion.alpha, 0.7);
        assert_eq!(config.fusion.candidate_multiplier, 2);
        assert_eq!(config.bm25.k1, 1.5);
        assert_eq!(config.bm25.b, 0.5);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = SearchConfig::default();
        config.fusion.alpha = 1.5;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.bm25.b = -0.1;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.bm25.k1 = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.fusion.candidate_multiplier = 0;
        assert!(config.validate().is_err());

        let config = SearchConfig {
            default_result_count: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
