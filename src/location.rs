//! Gazetteer records and the immutable location entity built from them.
//!
//! Raw gazetteer lines deserialize into [`LocationRecord`]; the
//! dictionary turns accepted records into [`Location`] values. Everything
//! the engine keeps asking about a location (its hierarchy level, the
//! labels it can be matched under, the chain of containing ids) is
//! computed once at construction so the scoring passes never allocate
//! for derived data.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::id::{DominanceClass, LocationId, LocationType};

/// Population at or above which a city ranks as "big" in typed
/// tie-breaking, unless its capital flag already promotes it.
pub const BIG_CITY_POPULATION: u64 = 100_000;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// One alternative administrative division a location belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltDivision {
    /// Division kind, e.g. `"district"`.
    #[serde(rename = "type")]
    pub division_type: String,
    /// Division name.
    pub name: String,
    /// Division depth.
    pub level: u32,
}

/// The raw shape of one line-delimited JSON gazetteer record.
///
/// All fields except `id` are optional; [`Dictionary::from_records`]
/// decides which records become locations.
///
/// [`Dictionary::from_records`]: crate::Dictionary::from_records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationRecord {
    /// Packed 13-hex-digit identifier.
    pub id: String,
    /// Primary name; records without one are rejected.
    pub name: Option<String>,
    /// UN/LOCODE, when assigned.
    pub unlocode: Option<String>,
    /// ISO-3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    /// Free-form subtype, e.g. `"city"`, `"capital"`, `"province"`.
    pub sub_type: Option<String>,
    /// Translated names keyed by language ISO code.
    pub translations: BTreeMap<String, String>,
    /// Additional names the location is known under.
    pub other_names: Vec<String>,
    /// Demonym for inhabitants.
    pub demonym: Option<String>,
    /// Representative coordinates.
    pub coordinates: Option<Coordinates>,
    /// Ids of bordering countries (countries only).
    pub borders: Vec<String>,
    /// Capital flag (cities only).
    pub capital: Option<bool>,
    /// Area in square kilometres.
    pub area: Option<u64>,
    /// Population count.
    pub population: Option<u64>,
    /// ISO codes of languages spoken.
    pub languages: Vec<String>,
    /// Alternative administrative divisions.
    pub alt_divisions: Vec<AltDivision>,
}

/// An immutable gazetteer entry.
///
/// Constructed from a [`LocationRecord`]; the identifier is validated and
/// the derived properties (type, labels, parent chain) are cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    id: LocationId,
    #[serde(rename = "type")]
    location_type: LocationType,
    name: String,
    unlocode: Option<String>,
    country_code: Option<String>,
    sub_type: Option<String>,
    translations: BTreeMap<String, String>,
    other_names: Vec<String>,
    demonym: Option<String>,
    coordinates: Option<Coordinates>,
    borders: Vec<LocationId>,
    capital: Option<bool>,
    area: Option<u64>,
    population: Option<u64>,
    languages: Vec<String>,
    alt_divisions: Vec<AltDivision>,
    #[serde(skip)]
    labels: BTreeSet<String>,
    #[serde(skip)]
    parent_ids: Vec<LocationId>,
}

impl Location {
    /// Build a location from a raw record.
    ///
    /// Fails with [`Error::MalformedId`] on a bad identifier and
    /// [`Error::InvalidRecord`] when the record carries no usable name.
    pub fn new(record: LocationRecord) -> Result<Self> {
        let id = LocationId::parse(&record.id)?;
        let name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::invalid_record(format!("record {} has no name", record.id))
            })?;

        let borders = record
            .borders
            .iter()
            .map(|b| LocationId::parse(b))
            .collect::<Result<Vec<_>>>()?;

        let mut labels = BTreeSet::new();
        labels.insert(name.to_lowercase());
        for translated in record.translations.values() {
            let label = translated.trim().to_lowercase();
            if !label.is_empty() {
                labels.insert(label);
            }
        }
        for other in &record.other_names {
            let label = other.trim().to_lowercase();
            if !label.is_empty() {
                labels.insert(label);
            }
        }

        Ok(Self {
            location_type: id.location_type(),
            parent_ids: id.parent_ids(),
            labels,
            id,
            name,
            unlocode: record.unlocode,
            country_code: record.country_code,
            sub_type: record.sub_type,
            translations: record.translations,
            other_names: record.other_names,
            demonym: record.demonym,
            coordinates: record.coordinates,
            borders,
            capital: record.capital,
            area: record.area,
            population: record.population,
            languages: record.languages,
            alt_divisions: record.alt_divisions,
        })
    }

    /// The validated identifier.
    #[must_use]
    pub fn id(&self) -> LocationId {
        self.id
    }

    /// The hierarchy level, derived from the identifier.
    #[must_use]
    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    /// Primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// UN/LOCODE, when assigned.
    #[must_use]
    pub fn unlocode(&self) -> Option<&str> {
        self.unlocode.as_deref()
    }

    /// ISO-3166-1 alpha-2 country code.
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    /// Free-form subtype.
    #[must_use]
    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }

    /// Translated names keyed by language ISO code.
    #[must_use]
    pub fn translations(&self) -> &BTreeMap<String, String> {
        &self.translations
    }

    /// Additional names.
    #[must_use]
    pub fn other_names(&self) -> &[String] {
        &self.other_names
    }

    /// Demonym for inhabitants.
    #[must_use]
    pub fn demonym(&self) -> Option<&str> {
        self.demonym.as_deref()
    }

    /// Representative coordinates.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// Ids of bordering countries.
    #[must_use]
    pub fn borders(&self) -> &[LocationId] {
        &self.borders
    }

    /// Capital flag (cities only).
    #[must_use]
    pub fn capital(&self) -> Option<bool> {
        self.capital
    }

    /// Area in square kilometres.
    #[must_use]
    pub fn area(&self) -> Option<u64> {
        self.area
    }

    /// Population count.
    #[must_use]
    pub fn population(&self) -> Option<u64> {
        self.population
    }

    /// ISO codes of languages spoken.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Alternative administrative divisions.
    #[must_use]
    pub fn alt_divisions(&self) -> &[AltDivision] {
        &self.alt_divisions
    }

    /// Lower-cased labels this location can be matched under: the
    /// primary name, every translation and every other name. Never
    /// empty, never contains the empty string.
    #[must_use]
    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Ids of every containing location, nearest first, region excluded.
    #[must_use]
    pub fn parent_ids(&self) -> &[LocationId] {
        &self.parent_ids
    }

    /// Id of the closest non-region ancestor, if any.
    #[must_use]
    pub fn immediate_parent_id(&self) -> Option<LocationId> {
        self.parent_ids.first().copied()
    }

    /// Whether this is a city that ranks as "big": capital flag set or
    /// population at least [`BIG_CITY_POPULATION`].
    #[must_use]
    pub fn is_big_city(&self) -> bool {
        self.location_type == LocationType::City
            && (self.capital == Some(true)
                || self.population.is_some_and(|p| p >= BIG_CITY_POPULATION))
    }

    /// Rank of this location in typed tie-breaking.
    #[must_use]
    pub fn dominance_class(&self) -> DominanceClass {
        match self.location_type {
            LocationType::Continent => DominanceClass::Continent,
            LocationType::Region => DominanceClass::Region,
            LocationType::Country => DominanceClass::Country,
            LocationType::AdminArea2 => DominanceClass::AdminArea2,
            LocationType::AdminArea1 => DominanceClass::AdminArea1,
            LocationType::City => {
                if self.is_big_city() {
                    DominanceClass::BigCity
                } else {
                    DominanceClass::LittleCity
                }
            }
        }
    }

    /// Whether `other` is a brother (sibling) of this location.
    ///
    /// Brothers share a type and either the closest non-region ancestor
    /// (two top-level locations of the same type count: their absent
    /// ancestor is shared) or, for cities, a country and a subtype:
    /// "analogous cities".
    #[must_use]
    pub fn is_brother_of(&self, other: &Location) -> bool {
        if self.id == other.id || self.location_type != other.location_type {
            return false;
        }
        if self.immediate_parent_id() == other.immediate_parent_id() {
            return true;
        }
        self.location_type == LocationType::City
            && self.id.country_id().is_some()
            && self.id.country_id() == other.id.country_id()
            && self.sub_type == other.sub_type
    }
}
