use crate::ranking::{sort_descending, ScoredResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weighting policy for blending lexical and semantic rankings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Weight of the lexical side; the semantic side gets `1 - alpha`.
    pub alpha: f64,
    /// Each source contributes up to `limit * candidate_multiplier` candidates.
    pub candidate_multiplier: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            candidate_multiplier: 2,
        }
    }
}

/// Max-normalized linear fusion of a lexical and a semantic ranking.
///
/// BM25 scores are unbounded while cosine similarity lives in [-1, 1], so each source
/// is first divided by its own maximum and only then blended:
///
/// fused(d) = alpha * lexical(d) / max_lexical + (1 - alpha) * semantic(d) / max_semantic
///
/// A document missing from one source contributes 0 for that side.
#[derive(Debug, Clone, Copy)]
pub struct ScoreFusion {
    config: FusionConfig,
    positive_only: bool,
}

impl Default for ScoreFusion {
    fn default() -> Self {
        Self::new(FusionConfig::default(), true)
    }
}

impl ScoreFusion {
    pub const fn new(config: FusionConfig, positive_only: bool) -> Self {
        Self {
            config,
            positive_only,
        }
    }

    /// Working-set size taken from each source for a final result count of `limit`.
    pub const fn candidate_pool(&self, limit: usize) -> usize {
        limit.saturating_mul(self.config.candidate_multiplier)
    }

    /// Blend both rankings, returning at most `limit` entries by fused score descending,
    /// ties in ascending document order.
    pub fn fuse(
        &self,
        lexical: &[ScoredResult],
        semantic: &[ScoredResult],
        limit: usize,
    ) -> Vec<ScoredResult> {
        let lexical = self.score_map(lexical);
        let semantic = self.score_map(semantic);
        let max_lexical = max_score(&lexical);
        let max_semantic = max_score(&semantic);
        let alpha = self.config.alpha;

        // BTreeMap union iterates in ascending document order, which the stable sort keeps
        // for equal fused scores.
        let mut union: BTreeMap<usize, f64> = BTreeMap::new();
        for &idx in lexical.keys().chain(semantic.keys()) {
            union.entry(idx).or_insert(0.0);
        }

        let mut fused: Vec<ScoredResult> = union
            .into_keys()
            .map(|idx| {
                let lexical_norm = normalized(lexical.get(&idx).copied(), max_lexical);
                let semantic_norm = normalized(semantic.get(&idx).copied(), max_semantic);
                (idx, alpha * lexical_norm + (1.0 - alpha) * semantic_norm)
            })
            .collect();

        sort_descending(&mut fused);
        fused.truncate(limit);
        if self.positive_only {
            fused.retain(|(_, score)| *score > 0.0);
        }

        log::debug!(
            "Fusion: {} lexical + {} semantic candidates -> {} results",
            lexical.len(),
            semantic.len(),
            fused.len()
        );
        fused
    }

    fn score_map(&self, results: &[ScoredResult]) -> BTreeMap<usize, f64> {
        results
            .iter()
            .filter(|(_, score)| !self.positive_only || *score > 0.0)
            .copied()
            .collect()
    }
}

fn max_score(scores: &BTreeMap<usize, f64>) -> f64 {
    scores.values().copied().fold(0.0, f64::max)
}

fn normalized(score: Option<f64>, max: f64) -> f64 {
    match score {
        Some(score) if max > 0.0 => score / max,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn blends_normalized_scores() {
        let fusion = ScoreFusion::default();
        let lexical = vec![(0, 4.0), (1, 2.0)];
        let semantic = vec![(1, 0.8), (2, 0.4)];

        let fused = fusion.fuse(&lexical, &semantic, 10);
        let ids: Vec<usize> = fused.iter().map(|(idx, _)| *idx).collect();

        // doc 1: 0.5 * 0.5 + 0.5 * 1.0 = 0.75; doc 0: 0.5; doc 2: 0.25
        assert_eq!(ids, vec![1, 0, 2]);
        assert!(close(fused[0].1, 0.75));
        assert!(close(fused[1].1, 0.5));
        assert!(close(fused[2].1, 0.25));
    }

    #[test]
    fn drops_non_positive_inputs_before_normalizing() {
        let fusion = ScoreFusion::default();
        let lexical = vec![(0, 3.0), (1, 0.0), (2, 0.0)];
        let semantic = vec![];

        let fused = fusion.fuse(&lexical, &semantic, 10);
        assert_eq!(fused, vec![(0, 0.5)]);
    }

    #[test]
    fn empty_sources_fuse_to_nothing() {
        let fusion = ScoreFusion::default();
        assert!(fusion.fuse(&[], &[], 5).is_empty());
    }

    #[test]
    fn ties_break_by_document_index() {
        let fusion = ScoreFusion::default();
        let lexical = vec![(5, 1.0)];
        let semantic = vec![(2, 0.3)];
        let fused = fusion.fuse(&lexical, &semantic, 10);
        assert_eq!(fused, vec![(2, 0.5), (5, 0.5)]);
    }

    #[test]
    fn truncates_to_limit() {
        let fusion = ScoreFusion::default();
        let lexical = vec![(0, 3.0), (1, 2.0), (2, 1.0)];
        let fused = fusion.fuse(&lexical, &[], 2);
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].0, 0);
    }

    #[test]
    fn alpha_shifts_weight_between_sources() {
        let lexical_heavy = ScoreFusion::new(
            FusionConfig {
                alpha: 0.9,
                ..FusionConfig::default()
            },
            true,
        );
        let fused = lexical_heavy.fuse(&[(0, 1.0)], &[(1, 1.0)], 10);
        assert_eq!(fused[0].0, 0);
        assert!(close(fused[0].1, 0.9));
        assert!(close(fused[1].1, 0.1));
    }

    #[test]
    fn candidate_pool_scales_limit() {
        let fusion = ScoreFusion::default();
        assert_eq!(fusion.candidate_pool(3), 6);
        assert_eq!(fusion.candidate_pool(usize::MAX), usize::MAX);
    }

    #[test]
    fn keeps_zero_scores_when_positive_filter_disabled() {
        let fusion = ScoreFusion::new(FusionConfig::default(), false);
        let fused = fusion.fuse(&[(0, 2.0), (1, 0.0)], &[], 10);
        assert_eq!(fused, vec![(0, 0.5), (1, 0.0)]);
    }

    fn source() -> impl Strategy<Value = Vec<(usize, f64)>> {
        prop::collection::btree_map(0usize..20, 0.01f64..50.0, 1..10)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn fused_score_is_half_of_each_share(lexical in source(), semantic in source()) {
            let fusion = ScoreFusion::default();
            let fused = fusion.fuse(&lexical, &semantic, usize::MAX);

            let max_l = lexical.iter().map(|(_, s)| *s).fold(0.0, f64::max);
            let max_s = semantic.iter().map(|(_, s)| *s).fold(0.0, f64::max);
            for (idx, score) in &fused {
                let a = lexical.iter().find(|(i, _)| i == idx).map_or(0.0, |(_, s)| s / max_l);
                let b = semantic.iter().find(|(i, _)| i == idx).map_or(0.0, |(_, s)| s / max_s);
                prop_assert!(close(*score, 0.5 * a + 0.5 * b));
                prop_assert!(*score > 0.0 && *score <= 1.0 + 1e-12);
            }

            let mut expected: Vec<usize> = lexical.iter().chain(&semantic).map(|(i, _)| *i).collect();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(fused.len(), expected.len());

            for pair in fused.windows(2) {
                prop_assert!(pair[0].1 > pair[1].1 || (pair[0].1 == pair[1].1 && pair[0].0 < pair[1].0));
            }
        }
    }
}
