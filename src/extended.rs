//! The mutable working record the engine scores and the boost algebra
//! that moves evidence between related locations.
//!
//! An [`ExtendedLocation`] wraps a gazetteer [`Location`] with the
//! provenance that produced it (candidate entities, resolved parents)
//! and the evolving scoring state. The three-slot [`Boost`] record is
//! what keeps the parent/child/sibling channels honest: every boost an
//! entity produces on a location is remembered per relation, and any
//! later boost from the same entity through another relation is averaged
//! against those earlier contributions instead of stacking on top of
//! them.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::entity::CandidateEntity;
use crate::error::{Error, Result};
use crate::location::Location;

/// Rate applied when a parent boosts its child.
pub(crate) const PARENT_RATE: f64 = 1.0;
/// Rate applied when a child boosts its parent back.
pub(crate) const CHILD_RATE: f64 = 0.5;
/// Rate for sibling boosts without textual coordination.
pub(crate) const BROTHER_RATE: f64 = 0.5;
/// Rate for sibling boosts amplified by textual coordination.
pub(crate) const COORDINATED_BROTHER_RATE: f64 = 1.0;
/// Fraction of the initial score granted per orphan-parent label found
/// in the text.
pub(crate) const PARENT_LABEL_RATE: f64 = 0.333;
/// Damping applied to a location each time one of its candidate
/// entities loses an ambiguity group.
pub(crate) const AMBIGUITY_DAMPING: f64 = 0.9;

/// The relation a boost contribution was produced through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostSlot {
    /// Contributions received from parents.
    Parents,
    /// Contributions this location produced on its parents.
    Children,
    /// Contributions received from brothers.
    Brothers,
}

/// Per-entity boost contributions, one map per relation.
///
/// Writing a boost records it under the producing relation; computing a
/// boost averages the entity's score with every contribution the same
/// entity already produced through the *other* relations on the same
/// location. The arithmetic is `(score + Σ prior) / (|prior| + 1)` per
/// entity, and the boost finally applied is the maximum over the
/// entities involved; one strong entity carries the relation, and
/// entities cannot compound.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Boost {
    parents: HashMap<String, f64>,
    children: HashMap<String, f64>,
    brothers: HashMap<String, f64>,
}

impl Boost {
    fn slot(&self, slot: BoostSlot) -> &HashMap<String, f64> {
        match slot {
            BoostSlot::Parents => &self.parents,
            BoostSlot::Children => &self.children,
            BoostSlot::Brothers => &self.brothers,
        }
    }

    fn slot_mut(&mut self, slot: BoostSlot) -> &mut HashMap<String, f64> {
        match slot {
            BoostSlot::Parents => &mut self.parents,
            BoostSlot::Children => &mut self.children,
            BoostSlot::Brothers => &mut self.brothers,
        }
    }

    /// Contribution recorded for an entity under a relation, if any.
    #[must_use]
    pub fn contribution(&self, slot: BoostSlot, name: &str) -> Option<f64> {
        self.slot(slot).get(name).copied()
    }

    /// Fold a list of entity entries into the `self_slot` relation,
    /// reconciling each entry against the contributions the same entity
    /// already produced through the `against` relations.
    ///
    /// Returns the rate-scaled boost to add to the target score: the
    /// largest reconciled entry, or zero when `entries` is empty.
    pub(crate) fn reconcile(
        &mut self,
        entries: &[(String, f64)],
        self_slot: BoostSlot,
        against: &[BoostSlot],
        rate: f64,
    ) -> f64 {
        let mut final_boost = 0.0_f64;
        for (name, score) in entries {
            let mut sum = *score;
            let mut count = 1_usize;
            for &other in against {
                if let Some(prior) = self.slot(other).get(name) {
                    sum += prior;
                    count += 1;
                }
            }
            let boost = sum / count as f64;
            self.slot_mut(self_slot).insert(name.clone(), boost);
            if boost > final_boost {
                final_boost = boost;
            }
        }
        rate * final_boost
    }
}

/// A gazetteer location under active consideration, with scoring state.
///
/// Created during candidate expansion, mutated through ambiguity
/// resolution and score propagation, filtered by selection, calibrated
/// and normalized afterwards. Two extended locations are the same
/// location when their ids are equal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedLocation {
    pub(crate) location: Arc<Location>,
    pub(crate) parents: Vec<Arc<Location>>,
    pub(crate) candidate_entities: Vec<CandidateEntity>,
    pub(crate) init_score: f64,
    pub(crate) score: f64,
    pub(crate) confidence: f64,
    pub(crate) score_deviation: f64,
    pub(crate) confidence_deviation: f64,
    pub(crate) country_strength: Option<f64>,
    pub(crate) mentions: Vec<String>,
    #[serde(skip)]
    pub(crate) boost: Boost,
}

impl ExtendedLocation {
    /// Create the working record for a matched location.
    ///
    /// The initial score is the mean score of the originating
    /// candidates; `parents` must be the resolved `parent_ids` chain.
    pub(crate) fn new(
        location: Arc<Location>,
        parents: Vec<Arc<Location>>,
        candidate_entities: Vec<CandidateEntity>,
    ) -> Self {
        let init_score = if candidate_entities.is_empty() {
            0.0
        } else {
            candidate_entities.iter().map(CandidateEntity::score).sum::<f64>()
                / candidate_entities.len() as f64
        };
        Self {
            location,
            parents,
            candidate_entities,
            init_score,
            score: init_score,
            confidence: 0.0,
            score_deviation: 0.0,
            confidence_deviation: 0.0,
            country_strength: None,
            mentions: Vec::new(),
            boost: Boost::default(),
        }
    }

    /// The wrapped gazetteer location.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Resolved containing locations, nearest first, region excluded.
    #[must_use]
    pub fn parents(&self) -> &[Arc<Location>] {
        &self.parents
    }

    /// The candidate entities that produced this location.
    #[must_use]
    pub fn candidate_entities(&self) -> &[CandidateEntity] {
        &self.candidate_entities
    }

    /// Normalized names of the candidate entities.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.candidate_entities.iter().map(CandidateEntity::norm_name)
    }

    /// The mean candidate score, damped by ambiguity resolution.
    #[must_use]
    pub fn init_score(&self) -> f64 {
        self.init_score
    }

    /// The propagated score; after post-processing, the probability
    /// share of this location within the returned set.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Calibrated confidence in `[0, 1]`, computed after selection.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Deviation of the score from the run-wide mean.
    #[must_use]
    pub fn score_deviation(&self) -> f64 {
        self.score_deviation
    }

    /// Deviation of the confidence from the run-wide mean.
    #[must_use]
    pub fn confidence_deviation(&self) -> f64 {
        self.confidence_deviation
    }

    /// Mean score of the selected locations sharing this location's
    /// country; absent for locations outside any country.
    #[must_use]
    pub fn country_strength(&self) -> Option<f64> {
        self.country_strength
    }

    /// Normalized mention strings assigned to this location by
    /// selection.
    #[must_use]
    pub fn mentions(&self) -> &[String] {
        self.mentions.as_slice()
    }

    /// The boost ledger accumulated during score propagation.
    #[must_use]
    pub fn boost(&self) -> &Boost {
        &self.boost
    }

    pub(crate) fn entity_name_set(&self) -> HashSet<String> {
        self.entity_names().map(str::to_string).collect()
    }

    /// Entity entries `(norm_name, score)` excluding the given names,
    /// in ascending name order.
    pub(crate) fn entries_except(&self, excluded: &HashSet<String>) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .candidate_entities
            .iter()
            .filter(|e| !excluded.contains(e.norm_name()))
            .map(|e| (e.norm_name().to_string(), e.score()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Mutual boost between this location and one of its parents.
    ///
    /// Entities shared with the parent are excluded on both sides. This
    /// location is boosted at full rate through its `parents` slot;
    /// the parent's half-rate increment is computed through this
    /// location's `children` slot (both writes land on the child's
    /// ledger, so a single mention cannot amplify the parent twice)
    /// and returned for the caller to apply.
    ///
    /// Fails with [`Error::InvalidParent`] when `parent` is not among
    /// this location's containing ids.
    pub(crate) fn boost_with_parent(&mut self, parent: &ExtendedLocation) -> Result<f64> {
        if !self.location.parent_ids().contains(&parent.location.id()) {
            return Err(Error::InvalidParent {
                child: self.location.id().as_str().to_string(),
                parent: parent.location.id().as_str().to_string(),
            });
        }
        let own = self.entity_name_set();
        let shared: HashSet<String> = parent
            .entity_names()
            .filter(|name| own.contains(*name))
            .map(str::to_string)
            .collect();

        let entries = parent.entries_except(&shared);
        let increment = self.boost.reconcile(
            &entries,
            BoostSlot::Parents,
            &[BoostSlot::Children],
            PARENT_RATE,
        );
        self.score += increment;

        let entries = self.entries_except(&shared);
        Ok(self.boost.reconcile(
            &entries,
            BoostSlot::Children,
            &[BoostSlot::Parents],
            CHILD_RATE,
        ))
    }

    /// Boost from a brother, split into coordinated and uncoordinated
    /// entity channels.
    ///
    /// `coordinated` holds the brother's entity names that appear in a
    /// coordination group together with one of this location's entities;
    /// those are applied at full rate, the rest at half rate. Shared
    /// entities are excluded from both channels.
    pub(crate) fn boost_with_brother(
        &mut self,
        brother: &ExtendedLocation,
        coordinated: &HashSet<String>,
    ) {
        let own = self.entity_name_set();
        let shared: HashSet<String> = brother
            .entity_names()
            .filter(|name| own.contains(*name))
            .map(str::to_string)
            .collect();

        let mut excluded: HashSet<String> = shared.clone();
        excluded.extend(coordinated.iter().cloned());
        let entries = brother.entries_except(&excluded);
        let increment = self.boost.reconcile(
            &entries,
            BoostSlot::Brothers,
            &[BoostSlot::Children, BoostSlot::Parents],
            BROTHER_RATE,
        );
        self.score += increment;

        let mut excluded = shared;
        excluded.extend(
            brother
                .entity_names()
                .filter(|name| !coordinated.contains(*name))
                .map(str::to_string),
        );
        let entries = brother.entries_except(&excluded);
        let increment = self.boost.reconcile(
            &entries,
            BoostSlot::Brothers,
            &[BoostSlot::Children, BoostSlot::Parents],
            COORDINATED_BROTHER_RATE,
        );
        self.score += increment;
    }
}

impl PartialEq for ExtendedLocation {
    fn eq(&self, other: &Self) -> bool {
        self.location.id() == other.location.id()
    }
}

impl Eq for ExtendedLocation {}

/// Order two extended locations by probability.
///
/// `Greater` means `a` is the more probable interpretation: strictly
/// higher score first, then the typed dominance ladder, then population
/// (absent population ranks below any known population). `Equal` means
/// nothing distinguishes them; selection keeps the incumbent in that
/// case.
#[must_use]
pub fn probability_order(a: &ExtendedLocation, b: &ExtendedLocation) -> Ordering {
    match a.score.partial_cmp(&b.score) {
        Some(Ordering::Equal) | None => {}
        Some(order) => return order,
    }
    let (class_a, class_b) = (a.location.dominance_class(), b.location.dominance_class());
    if class_a.beats(class_b) {
        return Ordering::Greater;
    }
    if class_b.beats(class_a) {
        return Ordering::Less;
    }
    a.location.population().cmp(&b.location.population())
}
