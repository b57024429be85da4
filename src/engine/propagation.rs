//! Score propagation: parent boosts, then sibling boosts, for every
//! location in the working map.

use std::collections::HashSet;

use crate::error::Result;
use crate::extended::{ExtendedLocation, PARENT_LABEL_RATE};
use crate::id::{LocationId, LocationType};
use crate::location::Location;

use super::Pipeline;

/// Whether a parent takes part in mutual boosting with `child`.
///
/// Admin areas always do; a country only influences children that sit
/// directly below it, outside any second-level admin area.
fn parent_influences(parent: &Location, child: &Location) -> bool {
    match parent.location_type() {
        LocationType::AdminArea1 | LocationType::AdminArea2 => true,
        LocationType::Country => !child.id().is_inside_admin_area2(),
        _ => false,
    }
}

impl Pipeline<'_> {
    /// Run both boost passes over every location, ascending by id.
    pub(crate) fn propagate(&mut self) -> Result<()> {
        let ids: Vec<LocationId> = self.working.keys().copied().collect();
        for id in &ids {
            self.boost_by_parents(*id)?;
            self.boost_by_brothers(*id);
        }
        log::debug!("propagated scores across {} locations", ids.len());
        Ok(())
    }

    /// Mutual boosts with matched parents; adding-entity reinforcement
    /// for parents nobody matched.
    fn boost_by_parents(&mut self, id: LocationId) -> Result<()> {
        let Some(mut current) = self.working.remove(&id) else {
            return Ok(());
        };
        let mut parent_ids: Vec<LocationId> = current.location().parent_ids().to_vec();
        parent_ids.sort_unstable();

        let mut outcome = Ok(());
        'parents: for parent_id in parent_ids {
            let increment = match self.working.get(&parent_id) {
                Some(parent) => {
                    if !parent_influences(parent.location(), current.location()) {
                        continue;
                    }
                    match current.boost_with_parent(parent) {
                        Ok(increment) => Some(increment),
                        Err(error) => {
                            outcome = Err(error);
                            break 'parents;
                        }
                    }
                }
                None => {
                    match self.dictionary.require(&parent_id) {
                        Ok(parent) => {
                            let hits = parent
                                .labels()
                                .iter()
                                .filter(|label| self.adding_entities.contains(*label))
                                .count();
                            current.score +=
                                hits as f64 * PARENT_LABEL_RATE * current.init_score;
                            None
                        }
                        Err(error) => {
                            outcome = Err(error);
                            break 'parents;
                        }
                    }
                }
            };
            if let Some(increment) = increment {
                if let Some(parent) = self.working.get_mut(&parent_id) {
                    parent.score += increment;
                }
            }
        }

        self.working.insert(id, current);
        outcome
    }

    /// Sibling boosts, with the coordinated-entity channel amplified.
    fn boost_by_brothers(&mut self, id: LocationId) {
        let Some(mut current) = self.working.remove(&id) else {
            return;
        };
        let brother_ids: Vec<LocationId> = self
            .working
            .iter()
            .filter(|(_, other)| current.location().is_brother_of(other.location()))
            .map(|(brother_id, _)| *brother_id)
            .collect();

        for brother_id in brother_ids {
            let Some(brother) = self.working.get(&brother_id) else {
                continue;
            };
            let coordinated = self.coordinated_names(&current, brother);
            current.boost_with_brother(brother, &coordinated);
        }

        self.working.insert(id, current);
    }

    /// Names among `brother`'s entities that share a coordination group
    /// with a *different* entity of `current`.
    fn coordinated_names(
        &self,
        current: &ExtendedLocation,
        brother: &ExtendedLocation,
    ) -> HashSet<String> {
        let current_names: HashSet<&str> = current.entity_names().collect();
        let mut coordinated = HashSet::new();
        for name in brother.entity_names() {
            let Some(group_indices) = self.coordinate_index.get(name) else {
                continue;
            };
            let grouped = group_indices.iter().any(|&index| {
                self.coordinate_groups[index]
                    .iter()
                    .any(|member| member != name && current_names.contains(member.as_str()))
            });
            if grouped {
                coordinated.insert(name.to_string());
            }
        }
        coordinated
    }
}
