//! Confidence calibration over the selected set.
//!
//! Runs strictly after selection: every contribution is a fraction of
//! the *best* locations only, so the numbers answer "how well does this
//! pick agree with the other picks", not "how strong was the evidence
//! during scoring".

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::id::{LocationId, LocationType};
use crate::location::Location;

use super::Pipeline;

/// Number of additive contributions in the raw confidence sum.
const CONTRIBUTION_COUNT: f64 = 5.0;

/// Whether two selected locations count as relatives: distinct, both
/// inside a country, sharing that country.
fn is_relative(a: &Location, b: &Location) -> bool {
    a.id() != b.id()
        && a.id().is_inside_country()
        && b.id().is_inside_country()
        && a.id().country_id() == b.id().country_id()
}

impl Pipeline<'_> {
    /// Compute each selected location's confidence from five additive
    /// contributions (parents, sub-levels, brothers, other relatives
    /// and, for countries, shared borders), averaged and cube-rooted.
    pub(crate) fn calibrate_confidence(&mut self) {
        let best_ids: HashSet<LocationId> = self.working.keys().copied().collect();

        let mut count_by_type: HashMap<LocationType, usize> = HashMap::new();
        for location in self.working.values() {
            *count_by_type
                .entry(location.location().location_type())
                .or_default() += 1;
        }

        let mut sub_level_count: HashMap<LocationId, usize> = HashMap::new();
        let mut sub_level_types: HashMap<LocationId, HashSet<LocationType>> = HashMap::new();
        for location in self.working.values() {
            for parent_id in location.location().parent_ids() {
                if best_ids.contains(parent_id) {
                    *sub_level_count.entry(*parent_id).or_default() += 1;
                    sub_level_types
                        .entry(*parent_id)
                        .or_default()
                        .insert(location.location().location_type());
                }
            }
        }

        let inside_country_count = self
            .working
            .values()
            .filter(|location| location.location().id().is_inside_country())
            .count();

        let mut raw: BTreeMap<LocationId, f64> = BTreeMap::new();
        for (id, location) in &self.working {
            let mut sum = 0.0_f64;

            // Parents among the best set.
            let best_parents: Vec<&Location> = location
                .parents()
                .iter()
                .map(|parent| parent.as_ref())
                .filter(|parent| best_ids.contains(&parent.id()))
                .collect();
            if !best_parents.is_empty() {
                let parent_types: HashSet<LocationType> = best_parents
                    .iter()
                    .map(|parent| parent.location_type())
                    .collect();
                let denominator: usize = parent_types
                    .iter()
                    .filter_map(|t| count_by_type.get(t))
                    .sum();
                if denominator > 0 {
                    sum += best_parents.len() as f64 / denominator as f64;
                }
            }

            // Sub-levels: best locations contained in this one.
            if let Some(&count) = sub_level_count.get(id) {
                let denominator: usize = sub_level_types[id]
                    .iter()
                    .filter_map(|t| count_by_type.get(t))
                    .sum();
                if denominator > 0 {
                    sum += count as f64 / denominator as f64;
                }
            }

            // Brothers among same-typed picks.
            let same_type = count_by_type[&location.location().location_type()];
            if same_type > 1 {
                let brothers = self
                    .working
                    .values()
                    .filter(|other| location.location().is_brother_of(other.location()))
                    .count();
                sum += brothers as f64 / (same_type - 1) as f64;
            }

            // Other relatives: same-country picks.
            if inside_country_count > 0 {
                let relatives = self
                    .working
                    .values()
                    .filter(|other| is_relative(location.location(), other.location()))
                    .count();
                sum += relatives as f64 / inside_country_count as f64;
            }

            // Borders, for countries with company.
            if location.location().location_type() == LocationType::Country {
                let country_count = count_by_type
                    .get(&LocationType::Country)
                    .copied()
                    .unwrap_or_default();
                if country_count > 1 {
                    let shared = location
                        .location()
                        .borders()
                        .iter()
                        .filter(|border| best_ids.contains(*border))
                        .count();
                    sum += shared as f64 / (country_count - 1) as f64;
                }
            }

            raw.insert(*id, sum);
        }

        for (id, sum) in raw {
            if let Some(location) = self.working.get_mut(&id) {
                location.confidence = (sum / CONTRIBUTION_COUNT).cbrt();
            }
        }
    }
}
