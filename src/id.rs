//! Location identifiers and the containment algebra derived from them.
//!
//! Every gazetteer entry is addressed by a packed identifier of 13
//! uppercase hexadecimal digits. Digit positions encode five levels of
//! containment plus a region axis:
//!
//! ```text
//! ┌─────────┬───────────┬──────────────────────────────────────────┐
//! │ Digits  │ Level     │ Notes                                    │
//! ├─────────┼───────────┼──────────────────────────────────────────┤
//! │ [0]     │ continent │ 1..F                                     │
//! │ [1]     │ region    │ sibling axis, not an ancestor            │
//! │ [2..4)  │ country   │                                          │
//! │ [4..6)  │ admin 2   │ may be absent (zeros) below a country    │
//! │ [6..9)  │ admin 1   │ may be absent (zeros) below an admin 2   │
//! │ [9..13) │ city      │                                          │
//! └─────────┴───────────┴──────────────────────────────────────────┘
//! ```
//!
//! A suffix of all-zero digits marks the absence of that level and every
//! level below it, so the type of a location and all of its containment
//! relations can be read straight off the digits. Parent identifiers are
//! obtained by zeroing the digits below a level; the region identifier is
//! the exception: it keeps digit 1 and zeros everything else, because a
//! region is a sibling of its continent, not a descendant.
//!
//! `LocationId` is a witness type: once constructed, the 13-hex invariant
//! holds and every derived property below is total and allocation-free.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of hex digits in a location identifier.
pub const ID_LEN: usize = 13;

/// A validated 13-digit uppercase hexadecimal location identifier.
///
/// Ordering is plain lexicographic ordering of the digit string; the
/// engine leans on it for every deterministic iteration order.
///
/// # Example
///
/// ```
/// use toponym::{LocationId, LocationType};
///
/// let id = LocationId::parse("51180C026000A").unwrap();
/// assert_eq!(id.location_type(), LocationType::City);
/// assert_eq!(id.country_id().unwrap().as_str(), "5118000000000");
/// assert_eq!(id.region_id().unwrap().as_str(), "0100000000000");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId([u8; ID_LEN]);

impl LocationId {
    /// Parse an identifier, case-folding lowercase hex digits.
    ///
    /// Fails with [`Error::MalformedId`] unless the trimmed input is
    /// exactly 13 hexadecimal digits.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.len() != ID_LEN {
            return Err(Error::malformed_id(input));
        }
        let mut digits = [0u8; ID_LEN];
        for (slot, c) in digits.iter_mut().zip(trimmed.chars()) {
            if !c.is_ascii_hexdigit() {
                return Err(Error::malformed_id(input));
            }
            *slot = c.to_ascii_uppercase() as u8;
        }
        Ok(Self(digits))
    }

    /// The identifier as a 13-character uppercase hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: construction only admits ASCII hex digits, which are
        // valid single-byte UTF-8.
        unsafe { std::str::from_utf8_unchecked(&self.0) }
    }

    fn all_zero(&self, from: usize, to: usize) -> bool {
        self.0[from..to].iter().all(|&d| d == b'0')
    }

    /// Identifier with every digit from `keep` onwards zeroed.
    fn truncated(&self, keep: usize) -> Self {
        let mut digits = [b'0'; ID_LEN];
        digits[..keep].copy_from_slice(&self.0[..keep]);
        Self(digits)
    }

    /// The hierarchy level encoded by this identifier.
    ///
    /// The type is the topmost level whose digits are set while every
    /// level below it is zero.
    #[must_use]
    pub fn location_type(&self) -> LocationType {
        if self.all_zero(1, 13) {
            LocationType::Continent
        } else if self.all_zero(2, 13) {
            LocationType::Region
        } else if self.all_zero(4, 13) {
            LocationType::Country
        } else if self.all_zero(6, 13) {
            LocationType::AdminArea2
        } else if self.all_zero(9, 13) {
            LocationType::AdminArea1
        } else {
            LocationType::City
        }
    }

    /// Whether this location sits inside a continent.
    ///
    /// Continents and regions are top-level siblings; everything else is
    /// contained in exactly one continent.
    #[must_use]
    pub fn is_inside_continent(&self) -> bool {
        !matches!(
            self.location_type(),
            LocationType::Continent | LocationType::Region
        )
    }

    /// Whether this location sits inside a region.
    ///
    /// The region axis is distinct from the continent axis, but the two
    /// memberships coincide: every non-top-level location is in exactly
    /// one region.
    #[must_use]
    pub fn is_inside_region(&self) -> bool {
        self.is_inside_continent()
    }

    /// Whether this location sits inside a country.
    #[must_use]
    pub fn is_inside_country(&self) -> bool {
        self.is_inside_continent() && self.location_type() != LocationType::Country
    }

    /// Whether this location sits inside a second-level admin area.
    #[must_use]
    pub fn is_inside_admin_area2(&self) -> bool {
        matches!(
            self.location_type(),
            LocationType::City | LocationType::AdminArea1
        ) && !self.all_zero(4, 6)
    }

    /// Whether this location sits inside a first-level admin area.
    #[must_use]
    pub fn is_inside_admin_area1(&self) -> bool {
        self.location_type() == LocationType::City && !self.all_zero(6, 9)
    }

    /// Identifier of the containing continent, if any.
    #[must_use]
    pub fn continent_id(&self) -> Option<Self> {
        self.is_inside_continent().then(|| self.truncated(1))
    }

    /// Identifier of the containing region, if any.
    ///
    /// The region digit lives at position 1 with position 0 zeroed; a
    /// region id is not a prefix of its members.
    #[must_use]
    pub fn region_id(&self) -> Option<Self> {
        self.is_inside_region().then(|| {
            let mut digits = [b'0'; ID_LEN];
            digits[1] = self.0[1];
            Self(digits)
        })
    }

    /// Identifier of the containing country, if any.
    #[must_use]
    pub fn country_id(&self) -> Option<Self> {
        self.is_inside_country().then(|| self.truncated(4))
    }

    /// Identifier of the containing second-level admin area, if any.
    #[must_use]
    pub fn admin_area2_id(&self) -> Option<Self> {
        self.is_inside_admin_area2().then(|| self.truncated(6))
    }

    /// Identifier of the containing first-level admin area, if any.
    #[must_use]
    pub fn admin_area1_id(&self) -> Option<Self> {
        self.is_inside_admin_area1().then(|| self.truncated(9))
    }

    /// Identifiers of every containing location, nearest first, up to and
    /// including the continent. The region is excluded: it is a sibling
    /// of the continent, not an ancestor.
    #[must_use]
    pub fn parent_ids(&self) -> Vec<Self> {
        let mut parents = Vec::with_capacity(4);
        if let Some(id) = self.admin_area1_id() {
            parents.push(id);
        }
        if let Some(id) = self.admin_area2_id() {
            parents.push(id);
        }
        if let Some(id) = self.country_id() {
            parents.push(id);
        }
        if let Some(id) = self.continent_id() {
            parents.push(id);
        }
        parents
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationId({})", self.as_str())
    }
}

impl FromStr for LocationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocationId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LocationId> for String {
    fn from(id: LocationId) -> Self {
        id.as_str().to_string()
    }
}

/// The six hierarchy levels a location can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    /// A continent (top level, sibling of regions).
    Continent,
    /// A region (top level, sibling of continents).
    Region,
    /// A country.
    Country,
    /// A second-level administrative area, directly below a country.
    AdminArea2,
    /// A first-level administrative area.
    AdminArea1,
    /// A city.
    City,
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LocationType::Continent => "continent",
            LocationType::Region => "region",
            LocationType::Country => "country",
            LocationType::AdminArea2 => "admin-area-2",
            LocationType::AdminArea1 => "admin-area-1",
            LocationType::City => "city",
        };
        f.write_str(label)
    }
}

/// Rank of a location in typed tie-breaking.
///
/// Cities split into big and little for this purpose; see
/// [`Location::dominance_class`](crate::Location::dominance_class) for
/// the classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DominanceClass {
    /// A country.
    Country,
    /// A city with a capital flag or a large population.
    BigCity,
    /// Any other city.
    LittleCity,
    /// A first-level administrative area.
    AdminArea1,
    /// A second-level administrative area.
    AdminArea2,
    /// A region.
    Region,
    /// A continent.
    Continent,
}

impl DominanceClass {
    /// Whether this class outranks `other` outright.
    ///
    /// Pairs not covered here fall through to population comparison.
    #[must_use]
    pub fn beats(self, other: Self) -> bool {
        matches!(
            (self, other),
            (DominanceClass::BigCity, DominanceClass::AdminArea1)
                | (DominanceClass::Country, DominanceClass::LittleCity)
                | (DominanceClass::AdminArea1, DominanceClass::LittleCity)
                | (DominanceClass::BigCity, DominanceClass::LittleCity)
                | (DominanceClass::Country, DominanceClass::AdminArea1)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> LocationId {
        LocationId::parse(s).unwrap()
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(LocationId::parse("").is_err());
        assert!(LocationId::parse("123").is_err());
        assert!(LocationId::parse("51180C026000AZ").is_err());
        assert!(LocationId::parse("51180G026000A").is_err());
        assert!(matches!(
            LocationId::parse("not-an-id"),
            Err(Error::MalformedId(_))
        ));
    }

    #[test]
    fn parse_case_folds_and_trims() {
        assert_eq!(id(" 51180c026000a "), id("51180C026000A"));
        assert_eq!(id("51180c026000a").as_str(), "51180C026000A");
    }

    #[test]
    fn city_with_full_hierarchy() {
        // Washington
        let washington = id("51180C026000A");
        assert_eq!(washington.location_type(), LocationType::City);
        assert_eq!(
            washington.admin_area1_id().unwrap().as_str(),
            "51180C0260000"
        );
        assert_eq!(
            washington.admin_area2_id().unwrap().as_str(),
            "51180C0000000"
        );
        assert_eq!(washington.country_id().unwrap().as_str(), "5118000000000");
        assert_eq!(washington.region_id().unwrap().as_str(), "0100000000000");
        assert_eq!(washington.continent_id().unwrap().as_str(), "5000000000000");
        assert!(washington.is_inside_admin_area1());
        assert!(washington.is_inside_admin_area2());
        assert!(washington.is_inside_country());
        assert!(washington.is_inside_region());
        assert!(washington.is_inside_continent());
    }

    #[test]
    fn city_without_admin_area1() {
        // Shoreditch
        let shoreditch = id("1308020000001");
        assert_eq!(shoreditch.location_type(), LocationType::City);
        assert_eq!(shoreditch.admin_area1_id(), None);
        assert_eq!(
            shoreditch.admin_area2_id().unwrap().as_str(),
            "1308020000000"
        );
        assert_eq!(shoreditch.country_id().unwrap().as_str(), "1308000000000");
        assert!(!shoreditch.is_inside_admin_area1());
        assert!(shoreditch.is_inside_admin_area2());
        assert!(shoreditch.is_inside_country());
    }

    #[test]
    fn admin_area1_without_admin_area2() {
        // São Tomé
        let sao_tome = id("2222000010000");
        assert_eq!(sao_tome.location_type(), LocationType::AdminArea1);
        assert_eq!(sao_tome.admin_area1_id(), None);
        assert_eq!(sao_tome.admin_area2_id(), None);
        assert_eq!(sao_tome.country_id().unwrap().as_str(), "2222000000000");
        assert!(!sao_tome.is_inside_admin_area2());
        assert!(sao_tome.is_inside_country());
    }

    #[test]
    fn continent_has_no_parents() {
        // Europe
        let europe = id("1000000000000");
        assert_eq!(europe.location_type(), LocationType::Continent);
        assert_eq!(europe.continent_id(), None);
        assert_eq!(europe.region_id(), None);
        assert_eq!(europe.country_id(), None);
        assert_eq!(europe.admin_area2_id(), None);
        assert_eq!(europe.admin_area1_id(), None);
        assert!(!europe.is_inside_continent());
        assert!(!europe.is_inside_region());
        assert!(!europe.is_inside_country());
        assert!(europe.parent_ids().is_empty());
    }

    #[test]
    fn region_is_top_level() {
        let region = id("0100000000000");
        assert_eq!(region.location_type(), LocationType::Region);
        assert!(!region.is_inside_continent());
        assert!(region.parent_ids().is_empty());
    }

    #[test]
    fn parent_ids_nearest_first() {
        let washington = id("51180C026000A");
        let washington_parents = washington.parent_ids();
        let parents: Vec<&str> = washington_parents.iter().map(|p| p.as_str()).collect();
        assert_eq!(
            parents,
            vec![
                "51180C0260000",
                "51180C0000000",
                "5118000000000",
                "5000000000000"
            ]
        );
    }

    #[test]
    fn parent_ids_skip_absent_levels() {
        let shoreditch = id("1308020000001");
        let shoreditch_parents = shoreditch.parent_ids();
        let parents: Vec<&str> = shoreditch_parents.iter().map(|p| p.as_str()).collect();
        assert_eq!(parents, vec!["1308020000000", "1308000000000", "1000000000000"]);
    }

    #[test]
    fn flags_match_id_presence() {
        for s in [
            "51180C026000A",
            "1308020000001",
            "2222000010000",
            "1000000000000",
            "0100000000000",
            "5118000000000",
            "51180C0000000",
        ] {
            let loc = id(s);
            assert_eq!(loc.is_inside_continent(), loc.continent_id().is_some());
            assert_eq!(loc.is_inside_region(), loc.region_id().is_some());
            assert_eq!(loc.is_inside_country(), loc.country_id().is_some());
            assert_eq!(loc.is_inside_admin_area2(), loc.admin_area2_id().is_some());
            assert_eq!(loc.is_inside_admin_area1(), loc.admin_area1_id().is_some());
        }
    }

    #[test]
    fn dominance_ladder() {
        assert!(DominanceClass::BigCity.beats(DominanceClass::AdminArea1));
        assert!(DominanceClass::Country.beats(DominanceClass::LittleCity));
        assert!(DominanceClass::AdminArea1.beats(DominanceClass::LittleCity));
        assert!(DominanceClass::BigCity.beats(DominanceClass::LittleCity));
        assert!(DominanceClass::Country.beats(DominanceClass::AdminArea1));
        assert!(!DominanceClass::AdminArea1.beats(DominanceClass::BigCity));
        assert!(!DominanceClass::LittleCity.beats(DominanceClass::Country));
        assert!(!DominanceClass::Country.beats(DominanceClass::Country));
        assert!(!DominanceClass::Country.beats(DominanceClass::BigCity));
    }

    #[test]
    fn serde_round_trip() {
        let original = id("51180C026000A");
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, "\"51180C026000A\"");
        let back: LocationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn serde_rejects_malformed() {
        assert!(serde_json::from_str::<LocationId>("\"xyz\"").is_err());
    }
}
