//! Product popularity scoring from 30-day interaction counts.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Interaction counts for one product over the popularity window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PopularityStats {
    pub views_30d: u64,
    pub clicks_30d: u64,
    pub favorites_30d: u64,
}

/// Weight applied to each interaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularityWeights {
    pub views: u64,
    pub clicks: u64,
    pub favorites: u64,
}

impl Default for PopularityWeights {
    fn default() -> Self {
        Self {
            views: 1,
            clicks: 2,
            favorites: 3,
        }
    }
}

impl PopularityWeights {
    pub fn new(views: u64, clicks: u64, favorites: u64) -> Self {
        Self {
            views,
            clicks,
            favorites,
        }
    }
}

/// Weighted sum of interactions. Saturates instead of overflowing.
pub fn calculate_popularity_score(stats: &PopularityStats, weights: &PopularityWeights) -> u64 {
    stats
        .views_30d
        .saturating_mul(weights.views)
        .saturating_add(stats.clicks_30d.saturating_mul(weights.clicks))
        .saturating_add(stats.favorites_30d.saturating_mul(weights.favorites))
}

/// Product id with its statistics and computed score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductPopularity {
    pub product_id: Uuid,
    #[serde(flatten)]
    pub stats: PopularityStats,
    pub score: u64,
}

/// Score every entry and order by score descending (ties keep input order).
pub fn rank_by_popularity(
    entries: Vec<(Uuid, PopularityStats)>,
    weights: &PopularityWeights,
) -> Vec<ProductPopularity> {
    let mut ranked: Vec<ProductPopularity> = entries
        .into_iter()
        .map(|(product_id, stats)| ProductPopularity {
            product_id,
            score: calculate_popularity_score(&stats, weights),
            stats,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(views: u64, clicks: u64, favorites: u64) -> PopularityStats {
        PopularityStats {
            views_30d: views,
            clicks_30d: clicks,
            favorites_30d: favorites,
        }
    }

    #[test]
    fn test_default_weights() {
        let score = calculate_popularity_score(&stats(10, 5, 2), &PopularityWeights::default());
        assert_eq!(score, 26);
    }

    #[test]
    fn test_custom_weights() {
        let score = calculate_popularity_score(&stats(10, 5, 2), &PopularityWeights::new(1, 4, 5));
        assert_eq!(score, 40);
    }

    #[test]
    fn test_saturates() {
        let score = calculate_popularity_score(&stats(u64::MAX, 1, 1), &PopularityWeights::default());
        assert_eq!(score, u64::MAX);
    }

    #[test]
    fn test_rank_by_popularity_orders_descending() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let ranked = rank_by_popularity(
            vec![(a, stats(1, 0, 0)), (b, stats(0, 0, 4)), (c, stats(3, 1, 0))],
            &PopularityWeights::default(),
        );
        let order: Vec<Uuid> = ranked.iter().map(|p| p.product_id).collect();
        assert_eq!(order, vec![b, c, a]);
        assert_eq!(ranked[0].score, 12);
    }
}
