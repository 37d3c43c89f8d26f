use crate::bm25::{Bm25Params, LexicalIndex};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

type Fingerprint = [u8; 32];

/// Built lexical indexes shared across calls on an unchanged corpus.
///
/// Keyed by a SHA-256 fingerprint of the documents and BM25 parameters; entries are
/// immutable snapshots, so readers only take the read lock. Oldest entries are
/// evicted first once `capacity` is reached.
pub struct IndexCache {
    capacity: usize,
    state: RwLock<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<Fingerprint, Arc<LexicalIndex>>,
    order: VecDeque<Fingerprint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl IndexCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: RwLock::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get_or_build<S: AsRef<str>>(
        &self,
        params: Bm25Params,
        documents: &[S],
    ) -> Arc<LexicalIndex> {
        let key = fingerprint(params, documents);

        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(index) = state.entries.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(index);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let built = Arc::new(LexicalIndex::build(params, documents));

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = state.entries.get(&key) {
            return Arc::clone(existing);
        }
        while state.entries.len() >= self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }
        state.entries.insert(key, Arc::clone(&built));
        state.order.push_back(key);
        built
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len();
        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        state.order.clear();
    }
}

fn fingerprint<S: AsRef<str>>(params: Bm25Params, documents: &[S]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(params.k1.to_le_bytes());
    hasher.update(params.b.to_le_bytes());
    hasher.update((documents.len() as u64).to_le_bytes());
    for doc in documents {
        let bytes = doc.as_ref().as_bytes();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_index_for_identical_corpus() {
        let cache = IndexCache::new(4);
        let docs = vec!["dark mode".to_string(), "light theme".to_string()];

        let first = cache.get_or_build(Bm25Params::default(), &docs);
        let second = cache.get_or_build(Bm25Params::default(), &docs);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn different_corpus_or_params_miss() {
        let cache = IndexCache::new(4);
        cache.get_or_build(Bm25Params::default(), &["a b c"]);
        cache.get_or_build(Bm25Params::default(), &["a b", "c"]);
        cache.get_or_build(Bm25Params { k1: 1.2, b: 0.75 }, &["a b c"]);
        assert_eq!(cache.stats().misses, 3);
        assert_eq!(cache.stats().entries, 3);
    }

    #[test]
    fn evicts_oldest_entry() {
        let cache = IndexCache::new(2);
        let first = cache.get_or_build(Bm25Params::default(), &["one"]);
        cache.get_or_build(Bm25Params::default(), &["two"]);
        cache.get_or_build(Bm25Params::default(), &["three"]);
        assert_eq!(cache.stats().entries, 2);

        let rebuilt = cache.get_or_build(Bm25Params::default(), &["one"]);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(cache.stats().misses, 4);
    }

    #[test]
    fn cached_index_scores_like_fresh_one() {
        let cache = IndexCache::new(1);
        let docs = ["bold vibrant color", "muted pastel color"];
        let cached = cache.get_or_build(Bm25Params::default(), &docs);
        let fresh = LexicalIndex::build(Bm25Params::default(), &docs);
        assert_eq!(cached.score("vibrant color"), fresh.score("vibrant color"));

        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }
}
