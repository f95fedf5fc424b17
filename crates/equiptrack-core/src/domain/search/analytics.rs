//! Analytics aggregator
//!
//! Read-only rollups over the whole equipment table. Each figure is computed
//! from its own scan; nothing is cached between calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::repository::SearchRepository;
use crate::error::Result;
use sqlx::SqlitePool;

/// Fixed inclusive condition ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionBucket {
    /// 0-2
    Poor,
    /// 3-5
    Fair,
    /// 6-8
    Good,
    /// 9-10
    Excellent,
}

impl ConditionBucket {
    pub const ALL: [ConditionBucket; 4] = [Self::Poor, Self::Fair, Self::Good, Self::Excellent];

    /// Inclusive `(min, max)` bounds
    pub fn range(&self) -> (i64, i64) {
        match self {
            Self::Poor => (0, 2),
            Self::Fair => (3, 5),
            Self::Good => (6, 8),
            Self::Excellent => (9, 10),
        }
    }

    /// Bucket a condition score; `None` outside the scale
    pub fn for_condition(condition: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| {
            let (min, max) = bucket.range();
            (min..=max).contains(&condition)
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for ConditionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Record counts per condition bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDistribution {
    #[serde(rename = "Poor")]
    pub poor: i64,
    #[serde(rename = "Fair")]
    pub fair: i64,
    #[serde(rename = "Good")]
    pub good: i64,
    #[serde(rename = "Excellent")]
    pub excellent: i64,
}

impl ConditionDistribution {
    /// Fold `(condition, count)` rows into buckets
    pub fn from_counts(counts: &[(i64, i64)]) -> Self {
        let mut distribution = Self::default();
        for &(condition, count) in counts {
            match ConditionBucket::for_condition(condition) {
                Some(ConditionBucket::Poor) => distribution.poor += count,
                Some(ConditionBucket::Fair) => distribution.fair += count,
                Some(ConditionBucket::Good) => distribution.good += count,
                Some(ConditionBucket::Excellent) => distribution.excellent += count,
                None => {}
            }
        }
        distribution
    }

    pub fn get(&self, bucket: ConditionBucket) -> i64 {
        match bucket {
            ConditionBucket::Poor => self.poor,
            ConditionBucket::Fair => self.fair,
            ConditionBucket::Good => self.good,
            ConditionBucket::Excellent => self.excellent,
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub total_equipment: i64,
    pub status_distribution: BTreeMap<String, i64>,
    pub average_condition: f64,
}

/// Detailed analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchAnalytics {
    pub status_distribution: BTreeMap<String, i64>,
    pub condition_distribution: ConditionDistribution,
    pub type_distribution: BTreeMap<String, i64>,
    pub total_equipment: i64,
    pub equipment_with_search_vector: i64,
    /// Percentage of records with a non-empty search vector
    pub search_vector_coverage: f64,
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total` as a percentage rounded to two places; 0 when total is 0
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Computes analytics rollups
#[derive(Debug, Clone)]
pub struct AnalyticsAggregator {
    repository: SearchRepository,
}

impl AnalyticsAggregator {
    /// Create a new aggregator
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: SearchRepository::new(pool),
        }
    }

    /// Status histogram
    pub async fn status_distribution(&self) -> Result<BTreeMap<String, i64>> {
        Ok(self.repository.status_counts().await?.into_iter().collect())
    }

    /// Condition bucket histogram
    pub async fn condition_distribution(&self) -> Result<ConditionDistribution> {
        let counts = self.repository.condition_counts().await?;
        Ok(ConditionDistribution::from_counts(&counts))
    }

    /// Records per type name
    pub async fn type_distribution(&self) -> Result<BTreeMap<String, i64>> {
        Ok(self.repository.type_counts().await?.into_iter().collect())
    }

    /// Mean condition rounded to two places; 0 when there are no records
    pub async fn average_condition(&self) -> Result<f64> {
        Ok(self
            .repository
            .average_condition()
            .await?
            .map(round2)
            .unwrap_or(0.0))
    }

    /// Summary statistics
    pub async fn stats(&self) -> Result<SearchStats> {
        Ok(SearchStats {
            total_equipment: self.repository.count_all().await?,
            status_distribution: self.status_distribution().await?,
            average_condition: self.average_condition().await?,
        })
    }

    /// Detailed analytics
    pub async fn analytics(&self) -> Result<SearchAnalytics> {
        let total_equipment = self.repository.count_all().await?;
        let equipment_with_search_vector = self.repository.count_with_search_vector().await?;

        Ok(SearchAnalytics {
            status_distribution: self.status_distribution().await?,
            condition_distribution: self.condition_distribution().await?,
            type_distribution: self.type_distribution().await?,
            total_equipment,
            equipment_with_search_vector,
            search_vector_coverage: percentage(equipment_with_search_vector, total_equipment),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(ConditionBucket::for_condition(0), Some(ConditionBucket::Poor));
        assert_eq!(ConditionBucket::for_condition(2), Some(ConditionBucket::Poor));
        assert_eq!(ConditionBucket::for_condition(3), Some(ConditionBucket::Fair));
        assert_eq!(ConditionBucket::for_condition(5), Some(ConditionBucket::Fair));
        assert_eq!(ConditionBucket::for_condition(6), Some(ConditionBucket::Good));
        assert_eq!(ConditionBucket::for_condition(8), Some(ConditionBucket::Good));
        assert_eq!(ConditionBucket::for_condition(9), Some(ConditionBucket::Excellent));
        assert_eq!(ConditionBucket::for_condition(10), Some(ConditionBucket::Excellent));
        assert_eq!(ConditionBucket::for_condition(11), None);
        assert_eq!(ConditionBucket::for_condition(-1), None);
    }

    #[test]
    fn test_distribution_from_counts() {
        let distribution = ConditionDistribution::from_counts(&[(1, 2), (2, 1), (7, 4), (10, 1)]);
        assert_eq!(distribution.get(ConditionBucket::Poor), 3);
        assert_eq!(distribution.get(ConditionBucket::Fair), 0);
        assert_eq!(distribution.get(ConditionBucket::Good), 4);
        assert_eq!(distribution.get(ConditionBucket::Excellent), 1);
    }

    #[test]
    fn test_distribution_serializes_labels() {
        let json = serde_json::to_value(ConditionDistribution::default()).unwrap();
        for bucket in ConditionBucket::ALL {
            assert_eq!(json[bucket.label()], 0);
        }
    }

    #[test]
    fn test_rounding_and_percentage() {
        assert_eq!(round2(7.25), 7.25);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(4, 4), 100.0);
    }
}
