//! Per-resource-type rule registry.

use super::types::{Recommendation, RecommendationInfo};
use std::collections::HashMap;
use std::collections::hash_map::Values;

/// Recommendation ID -> recommendation, for one resource type.
///
/// Iteration order is unspecified. Callers that need a stable order use
/// [`RuleCatalog::sorted`].
pub struct RuleCatalog<T> {
    rules: HashMap<&'static str, Recommendation<T>>,
}

impl<T> RuleCatalog<T> {
    /// Build a catalog keyed by each recommendation's own ID.
    ///
    /// The first recommendation registered under an ID wins; later duplicates
    /// are dropped and logged.
    pub fn new(recommendations: impl IntoIterator<Item = Recommendation<T>>) -> Self {
        let mut rules = HashMap::new();
        for rec in recommendations {
            let id = rec.recommendation_id;
            if rules.contains_key(id) {
                log::error!("Duplicate recommendation id {} ignored", id);
                continue;
            }
            rules.insert(id, rec);
        }
        Self { rules }
    }

    pub fn get(&self, id: &str) -> Option<&Recommendation<T>> {
        self.rules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Key/value pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Recommendation<T>)> {
        self.rules.iter().map(|(id, rec)| (*id, rec))
    }

    pub fn recommendations(&self) -> Values<'_, &'static str, Recommendation<T>> {
        self.rules.values()
    }

    /// Recommendations ordered by ID.
    pub fn sorted(&self) -> Vec<&Recommendation<T>> {
        let mut recs: Vec<_> = self.rules.values().collect();
        recs.sort_by_key(|r| r.recommendation_id);
        recs
    }

    /// Type-erased metadata ordered by ID.
    pub fn describe(&self) -> Vec<RecommendationInfo> {
        self.sorted().into_iter().map(RecommendationInfo::from).collect()
    }
}

impl<T> Clone for RuleCatalog<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<T> std::fmt::Debug for RuleCatalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.rules.keys().collect();
        ids.sort();
        f.debug_struct("RuleCatalog").field("rules", &ids).finish()
    }
}
