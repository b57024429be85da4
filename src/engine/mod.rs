//! The disambiguation pipeline.
//!
//! [`find_locations`] runs a fixed sequence of stages over a shared
//! working map of extended locations:
//!
//! 1. expansion: candidate names become extended locations;
//! 2. ambiguity resolution: overlapping mentions are reduced to one
//!    survivor per group;
//! 3. adding-entity detection: orphan-parent labels literally present
//!    in the text are collected;
//! 4. score propagation: parent, sibling and adding-entity boosts;
//! 5. selection: one best location per mention;
//! 6. confidence calibration: graph-shaped evidence over the selected
//!    set;
//! 7. post-processing: normalization, deviations, country strength,
//!    final ordering.
//!
//! The pipeline is synchronous and single-threaded; the dictionary is
//! only read. Every iteration order is pinned to ascending location id
//! (the working map is a `BTreeMap`) so results do not depend on hash
//! ordering or on the order of the candidate list.

mod adding;
mod ambiguity;
mod confidence;
mod expansion;
mod propagation;
mod selection;
mod stats;

pub use stats::{MetricSummary, Statistics};

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dictionary::Dictionary;
use crate::entity::{normalize, CandidateEntity};
use crate::error::Result;
use crate::extended::ExtendedLocation;
use crate::id::LocationId;

/// Disambiguate candidate mentions against the dictionary.
///
/// `text_tokens` is the tokenized input text; `candidates` the scored
/// mentions extracted from it; `coordinate_groups` sets of mentions that
/// are textually coordinated ("A, B and C"); `ambiguity_groups` ordered
/// lists of overlapping mentions of which at most one may survive.
///
/// Returns the selected locations in descending probability order, with
/// scores renormalized to sum to 1. Zero candidates, or candidates that
/// match nothing, produce an empty list.
pub fn find_locations(
    dictionary: &Dictionary,
    text_tokens: &[String],
    candidates: &[CandidateEntity],
    coordinate_groups: &[Vec<String>],
    ambiguity_groups: &[Vec<String>],
) -> Result<Vec<ExtendedLocation>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut pipeline = Pipeline::new(dictionary, coordinate_groups);
    pipeline.expand(candidates)?;
    if pipeline.working.is_empty() {
        log::debug!("no candidate matched the dictionary");
        return Ok(Vec::new());
    }
    pipeline.resolve_ambiguities(ambiguity_groups);
    pipeline.detect_adding_entities(text_tokens)?;
    pipeline.propagate()?;
    pipeline.select();
    pipeline.calibrate_confidence();
    Ok(pipeline.finish())
}

/// One run's working state, owned for the duration of the call.
pub(crate) struct Pipeline<'d> {
    pub(crate) dictionary: &'d Dictionary,
    /// Extended locations under consideration, keyed by id. A `BTreeMap`
    /// so every sweep sees ascending-id order.
    pub(crate) working: BTreeMap<LocationId, ExtendedLocation>,
    /// Normalized coordination groups.
    pub(crate) coordinate_groups: Vec<HashSet<String>>,
    /// Group indexes per member name.
    pub(crate) coordinate_index: HashMap<String, Vec<usize>>,
    /// Orphan-parent labels found verbatim in the text.
    pub(crate) adding_entities: HashSet<String>,
}

impl<'d> Pipeline<'d> {
    pub(crate) fn new(dictionary: &'d Dictionary, coordinate_groups: &[Vec<String>]) -> Self {
        let coordinate_groups: Vec<HashSet<String>> = coordinate_groups
            .iter()
            .map(|group| group.iter().map(|name| normalize(name)).collect())
            .collect();
        let mut coordinate_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, group) in coordinate_groups.iter().enumerate() {
            for member in group {
                coordinate_index.entry(member.clone()).or_default().push(index);
            }
        }
        Self {
            dictionary,
            working: BTreeMap::new(),
            coordinate_groups,
            coordinate_index,
            adding_entities: HashSet::new(),
        }
    }
}
