//! Selection: one best location per mention.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::extended::probability_order;
use crate::id::LocationId;

use super::Pipeline;

impl Pipeline<'_> {
    /// Pick, for every mention, the most probable of the locations it
    /// produced, then shrink the working map to the winners.
    ///
    /// "More probable" is strict: on a full tie the incumbent stays, and
    /// since the sweep runs in ascending id order the outcome is
    /// deterministic. A single location can win several mentions; the
    /// winners' `mentions` lists record which.
    pub(crate) fn select(&mut self) {
        let mut best: HashMap<String, LocationId> = HashMap::new();
        for (id, location) in &self.working {
            for entity in location.candidate_entities() {
                let replace = match best.get(entity.norm_name()) {
                    None => true,
                    Some(incumbent_id) => self
                        .working
                        .get(incumbent_id)
                        .is_some_and(|incumbent| {
                            probability_order(location, incumbent) == Ordering::Greater
                        }),
                };
                if replace {
                    best.insert(entity.norm_name().to_string(), *id);
                }
            }
        }

        let mut mentions_by_id: BTreeMap<LocationId, Vec<String>> = BTreeMap::new();
        for (mention, id) in best {
            mentions_by_id.entry(id).or_default().push(mention);
        }

        self.working.retain(|id, _| mentions_by_id.contains_key(id));
        for (id, mut mentions) in mentions_by_id {
            mentions.sort();
            if let Some(location) = self.working.get_mut(&id) {
                location.mentions = mentions;
            }
        }

        log::debug!("selected {} best locations", self.working.len());
    }
}
