//! Multi-strategy catalog search
//!
//! Three strategies run in precedence order; a later strategy only adds
//! identifiers the earlier ones did not produce:
//!
//! | Strategy | Match | Score |
//! |---|---|---|
//! | exact | identifier equals the query | 100 |
//! | prefix | identifier starts with the query | `prefix_floor..=99`, by coverage |
//! | fuzzy | weighted similarity of id, name, description | `fuzzy_cutoff..=fuzzy_ceiling` |
//!
//! The score bands are configuration ([`SearchConfig`]); the only hard rules
//! are that an exact match scores 100 and that every prefix score is above
//! every fuzzy score. Exact and prefix matching are case-sensitive, fuzzy
//! matching is not.

pub mod fuzzy;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::{MemoryCache, Weigh};
use crate::catalog::Catalog;
use crate::domain::Resource;
use crate::error::{Result, config};

/// Score of an exact identifier match
pub const EXACT_SCORE: u32 = 100;

/// Highest score a prefix match can reach
pub const PREFIX_MAX: u32 = 99;

/// Tunable score bands and field weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Score of the shortest possible prefix match
    pub prefix_floor: u32,
    /// Score of a perfect fuzzy match
    pub fuzzy_ceiling: u32,
    /// Fuzzy matches scoring below this are dropped
    pub fuzzy_cutoff: u32,
    pub id_weight: f64,
    pub name_weight: f64,
    pub description_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            prefix_floor: 60,
            fuzzy_ceiling: 59,
            fuzzy_cutoff: 30,
            id_weight: 1.0,
            name_weight: 1.0,
            description_weight: 0.6,
        }
    }
}

impl SearchConfig {
    /// Reject bands that would let a fuzzy match outrank a prefix match
    pub fn validate(&self) -> Result<()> {
        if self.prefix_floor > PREFIX_MAX {
            return Err(config::invalid(format!(
                "search.prefix_floor must be at most {PREFIX_MAX}, got {}",
                self.prefix_floor
            )));
        }
        if self.fuzzy_ceiling >= self.prefix_floor {
            return Err(config::invalid(format!(
                "search.fuzzy_ceiling ({}) must be below search.prefix_floor ({})",
                self.fuzzy_ceiling, self.prefix_floor
            )));
        }
        if self.fuzzy_cutoff > self.fuzzy_ceiling {
            return Err(config::invalid(format!(
                "search.fuzzy_cutoff ({}) must not exceed search.fuzzy_ceiling ({})",
                self.fuzzy_cutoff, self.fuzzy_ceiling
            )));
        }
        for (name, weight) in [
            ("id_weight", self.id_weight),
            ("name_weight", self.name_weight),
            ("description_weight", self.description_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(config::invalid(format!(
                    "search.{name} must be between 0 and 1, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

/// Which strategy produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Prefix,
    Fuzzy,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchKind::Exact => "exact",
            MatchKind::Prefix => "prefix",
            MatchKind::Fuzzy => "fuzzy",
        })
    }
}

/// One ranked result, borrowing its record from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'c> {
    pub resource: &'c Resource,
    pub score: u32,
    pub kind: MatchKind,
}

/// Catalog-independent form of a hit, for memoization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedPosition {
    pub position: usize,
    pub score: u32,
    pub kind: MatchKind,
}

impl Weigh for RankedPosition {
    fn weight(&self) -> u64 {
        std::mem::size_of::<Self>() as u64
    }
}

/// Shared memo of ranked results
pub type SearchCache = MemoryCache<Vec<RankedPosition>>;

pub struct SearchEngine {
    config: SearchConfig,
    cache: Option<Arc<SearchCache>>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Memoize results keyed by catalog fingerprint, query and limit
    pub fn with_cache(mut self, cache: Arc<SearchCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Rank catalog records against `query`, best first, at most `limit` hits
    ///
    /// A blank query yields no hits. Equal scores keep catalog order.
    pub fn search<'c>(&self, catalog: &'c Catalog, query: &str, limit: usize) -> Vec<SearchHit<'c>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let key = format!("{}\0{}\0{}", catalog.fingerprint(), query, limit);
        let ranked = match self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            Some(ranked) => ranked,
            None => {
                let ranked = self.rank(catalog, query, limit);
                if let Some(cache) = &self.cache {
                    cache.set(key, ranked.clone(), ranked.weight());
                }
                ranked
            }
        };

        ranked
            .into_iter()
            .filter_map(|hit| {
                catalog.get(hit.position).map(|resource| SearchHit {
                    resource,
                    score: hit.score,
                    kind: hit.kind,
                })
            })
            .collect()
    }

    fn rank(&self, catalog: &Catalog, query: &str, limit: usize) -> Vec<RankedPosition> {
        let mut seen = vec![false; catalog.len()];
        let mut ranked = Vec::new();

        if let Some(position) = catalog.position(query) {
            seen[position] = true;
            ranked.push(RankedPosition {
                position,
                score: EXACT_SCORE,
                kind: MatchKind::Exact,
            });
        }

        for position in catalog.prefix_positions(query) {
            if seen[position] {
                continue;
            }
            seen[position] = true;
            let id = &catalog.all()[position].id;
            ranked.push(RankedPosition {
                position,
                score: self.prefix_score(query, id),
                kind: MatchKind::Prefix,
            });
        }

        let lowered = query.to_lowercase();
        let query_tokens = fuzzy::tokens(&lowered);
        for (position, resource) in catalog.all().iter().enumerate() {
            if seen[position] {
                continue;
            }
            let score = self.fuzzy_score(&lowered, &query_tokens, resource);
            if score >= self.config.fuzzy_cutoff {
                ranked.push(RankedPosition {
                    position,
                    score,
                    kind: MatchKind::Fuzzy,
                });
            }
        }

        // Stable: equal scores stay in catalog order
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.position.cmp(&b.position)));
        ranked.truncate(limit);

        tracing::debug!(query, hits = ranked.len(), "ranked search results");
        ranked
    }

    /// Scale from `prefix_floor` towards 99 by how much of `id` the query covers
    fn prefix_score(&self, query: &str, id: &str) -> u32 {
        let floor = self.config.prefix_floor.min(PREFIX_MAX);
        let covered = query.chars().count();
        let total = id.chars().count().max(1);
        #[allow(clippy::cast_precision_loss)]
        let coverage = covered as f64 / total as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bonus = (f64::from(PREFIX_MAX - floor) * coverage).round() as u32;
        (floor + bonus).min(PREFIX_MAX)
    }

    fn fuzzy_score(&self, query: &str, query_tokens: &[String], resource: &Resource) -> u32 {
        let config = &self.config;
        let leaf = resource.category().leaf;

        let id = fuzzy::text_similarity(query, query_tokens, &resource.id)
            .max(fuzzy::text_similarity(query, query_tokens, &leaf));
        let name = fuzzy::text_similarity(query, query_tokens, &resource.name);
        let description = fuzzy::text_similarity(query, query_tokens, &resource.description);

        let best = (id * config.id_weight)
            .max(name * config.name_weight)
            .max(description * config.description_weight)
            .clamp(0.0, 1.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = (best * f64::from(config.fuzzy_ceiling)).round() as u32;
        score
    }
}
