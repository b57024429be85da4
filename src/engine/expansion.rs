//! Candidate expansion: every dictionary match of a candidate name
//! becomes an extended location.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::entity::CandidateEntity;
use crate::error::Result;
use crate::extended::ExtendedLocation;
use crate::id::LocationId;
use crate::location::Location;

use super::Pipeline;

impl Pipeline<'_> {
    /// Look every candidate up by label and build the working map.
    ///
    /// A location matched by several candidates accumulates all of them;
    /// its initial score is the mean of their scores. Candidates that
    /// normalize to an empty string or match nothing are dropped.
    /// Parents are resolved eagerly; a dangling parent id fails the
    /// run, since it means the dictionary is corrupt.
    pub(crate) fn expand(&mut self, candidates: &[CandidateEntity]) -> Result<()> {
        let mut matched: BTreeMap<LocationId, (Arc<Location>, Vec<CandidateEntity>)> =
            BTreeMap::new();

        for candidate in candidates {
            if candidate.norm_name().is_empty() {
                log::debug!("dropping blank candidate mention {:?}", candidate.name());
                continue;
            }
            let Some(locations) = self.dictionary.get_by_label(candidate.norm_name()) else {
                continue;
            };
            for location in locations {
                let (_, originators) = matched
                    .entry(location.id())
                    .or_insert_with(|| (Arc::clone(location), Vec::new()));
                if !originators.contains(candidate) {
                    originators.push(candidate.clone());
                }
            }
        }

        for (id, (location, originators)) in matched {
            let parents = location
                .parent_ids()
                .iter()
                .map(|parent_id| self.dictionary.require(parent_id))
                .collect::<Result<Vec<_>>>()?;
            self.working
                .insert(id, ExtendedLocation::new(location, parents, originators));
        }

        log::debug!(
            "expanded {} candidates into {} locations",
            candidates.len(),
            self.working.len()
        );
        Ok(())
    }
}
