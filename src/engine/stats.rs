//! Post-processing and run statistics: score normalization, deviations,
//! country strength and the final ordering.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::extended::{probability_order, ExtendedLocation};
use crate::id::{LocationId, LocationType};

use super::Pipeline;

impl Pipeline<'_> {
    /// Turn the selected working map into the caller-facing list:
    /// scores renormalized to sum to 1, deviations from the run means
    /// attached, country strength computed per effective country, and
    /// the whole list sorted by descending probability.
    pub(crate) fn finish(&mut self) -> Vec<ExtendedLocation> {
        let mut results: Vec<ExtendedLocation> =
            std::mem::take(&mut self.working).into_values().collect();
        if results.is_empty() {
            return results;
        }

        let total: f64 = results.iter().map(|location| location.score).sum();
        if total > 0.0 {
            for location in &mut results {
                location.score /= total;
            }
        }

        let count = results.len() as f64;
        let score_mean = results.iter().map(|l| l.score).sum::<f64>() / count;
        let confidence_mean = results.iter().map(|l| l.confidence).sum::<f64>() / count;
        for location in &mut results {
            location.score_deviation = location.score - score_mean;
            location.confidence_deviation = location.confidence - confidence_mean;
        }

        // Country strength: members of the same effective country all
        // receive their group's mean score. Locations outside any
        // country (continents, regions) stay unset.
        let mut groups: BTreeMap<LocationId, Vec<usize>> = BTreeMap::new();
        for (index, location) in results.iter().enumerate() {
            let effective = if location.location.id().is_inside_country() {
                location.location.id().country_id()
            } else if location.location.location_type() == LocationType::Country {
                Some(location.location.id())
            } else {
                None
            };
            if let Some(country_id) = effective {
                groups.entry(country_id).or_default().push(index);
            }
        }
        for members in groups.values() {
            let mean =
                members.iter().map(|&i| results[i].score).sum::<f64>() / members.len() as f64;
            for &index in members {
                results[index].country_strength = Some(mean);
            }
        }

        results.sort_by(|a, b| {
            probability_order(b, a).then_with(|| a.location.id().cmp(&b.location.id()))
        });
        results
    }
}

/// Mean and spread of one metric over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    /// Arithmetic mean.
    pub avg: f64,
    /// Population variance.
    pub variance: f64,
    /// Standard deviation.
    pub std_dev: f64,
    /// Standard deviation as a percentage of the mean; zero when the
    /// mean is zero.
    pub std_dev_perc: f64,
}

impl MetricSummary {
    fn from_values(values: impl Iterator<Item = f64> + Clone) -> Self {
        let count = values.clone().count();
        if count == 0 {
            return Self {
                avg: 0.0,
                variance: 0.0,
                std_dev: 0.0,
                std_dev_perc: 0.0,
            };
        }
        let avg = values.clone().sum::<f64>() / count as f64;
        let variance =
            values.map(|v| (v - avg) * (v - avg)).sum::<f64>() / count as f64;
        let std_dev = variance.sqrt();
        let std_dev_perc = if avg == 0.0 { 0.0 } else { std_dev / avg * 100.0 };
        Self {
            avg,
            variance,
            std_dev,
            std_dev_perc,
        }
    }
}

/// Score and confidence summaries over one run's returned locations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Summary of the normalized scores.
    pub score: MetricSummary,
    /// Summary of the calibrated confidences.
    pub confidence: MetricSummary,
}

impl Statistics {
    /// Summarize a result set; `None` when it is empty, matching the
    /// zero-candidate path which produces no statistics.
    #[must_use]
    pub fn compute(locations: &[ExtendedLocation]) -> Option<Self> {
        if locations.is_empty() {
            return None;
        }
        Some(Self {
            score: MetricSummary::from_values(locations.iter().map(ExtendedLocation::score)),
            confidence: MetricSummary::from_values(
                locations.iter().map(ExtendedLocation::confidence),
            ),
        })
    }
}
