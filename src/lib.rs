//! # toponym
//!
//! Disambiguation of geographical-entity mentions against a preloaded
//! gazetteer.
//!
//! Given a dictionary of world locations organized in a six-level
//! hierarchy and a set of candidate mentions already scored by an
//! upstream extractor, the engine assigns to each mention the single
//! location it most likely refers to, returning a ranked list with
//! calibrated scores and confidences.
//!
//! - **Hierarchy by construction**: every location carries a packed
//!   13-hex-digit id encoding continent, region, country and admin
//!   levels; containment, parents and siblings are read off the digits
//!   ([`LocationId`]).
//! - **Deterministic scoring**: no learned models; scores move through
//!   explicit parent/child/sibling boosts with cross-relation
//!   reconciliation, and all iteration orders are pinned.
//! - **Post-hoc confidence**: a second pass rates each pick by how well
//!   it agrees with the other picks (shared parents, siblings,
//!   relatives, country borders).
//!
//! ## Quick start
//!
//! ```
//! use toponym::{find_locations, CandidateEntity, Dictionary, LocationRecord};
//!
//! # fn main() -> toponym::Result<()> {
//! let dictionary = Dictionary::from_records([
//!     LocationRecord {
//!         id: "1000000000000".into(),
//!         name: Some("Europe".into()),
//!         ..LocationRecord::default()
//!     },
//!     LocationRecord {
//!         id: "1308000000000".into(),
//!         name: Some("United Kingdom".into()),
//!         ..LocationRecord::default()
//!     },
//!     LocationRecord {
//!         id: "1308020000000".into(),
//!         name: Some("Greater London".into()),
//!         ..LocationRecord::default()
//!     },
//!     LocationRecord {
//!         id: "1308020000001".into(),
//!         name: Some("Shoreditch".into()),
//!         ..LocationRecord::default()
//!     },
//! ])?;
//!
//! let tokens: Vec<String> = "startups cluster in Shoreditch"
//!     .split_whitespace()
//!     .map(str::to_string)
//!     .collect();
//! let candidates = [CandidateEntity::new("Shoreditch", 0.8)];
//!
//! let best = find_locations(&dictionary, &tokens, &candidates, &[], &[])?;
//! assert_eq!(best.len(), 1);
//! assert_eq!(best[0].location().name(), "Shoreditch");
//! assert_eq!(best[0].mentions(), ["shoreditch".to_string()]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Inputs
//!
//! Tokenization, named-entity recognition and gazetteer file parsing are
//! the caller's collaborators; the engine consumes their outputs:
//!
//! - the token list of the text (for adding-entity detection),
//! - scored [`CandidateEntity`] mentions,
//! - *coordination groups*: mentions joined in the text ("A, B and C")
//!   whose sibling boosts are amplified,
//! - *ambiguity groups*: ordered lists of overlapping mentions
//!   ("United States of America" / "United States" / "America") of which
//!   at most one survives.
//!
//! The engine is synchronous and allocation-light; a [`Dictionary`] is
//! immutable and can be shared by any number of concurrent runs.

#![warn(missing_docs)]

mod dictionary;
mod entity;
pub mod engine;
mod error;
mod extended;
mod id;
mod location;

pub use dictionary::Dictionary;
pub use engine::{find_locations, MetricSummary, Statistics};
pub use entity::{normalize, CandidateEntity};
pub use error::{Error, Result};
pub use extended::{probability_order, Boost, BoostSlot, ExtendedLocation};
pub use id::{DominanceClass, LocationId, LocationType, ID_LEN};
pub use location::{
    AltDivision, Coordinates, Location, LocationRecord, BIG_CITY_POPULATION,
};
