//! Shared fixture: a small hand-built gazetteer with enough structure
//! to exercise every pipeline stage.

use toponym::{Dictionary, LocationRecord};

fn record(id: &str, name: &str) -> LocationRecord {
    LocationRecord {
        id: id.to_string(),
        name: Some(name.to_string()),
        ..LocationRecord::default()
    }
}

fn city(id: &str, name: &str, population: u64) -> LocationRecord {
    let mut rec = record(id, name);
    rec.sub_type = Some("city".to_string());
    rec.population = Some(population);
    rec
}

/// Continents, two countries with their admin areas, four cities.
pub fn fixture_dictionary() -> Dictionary {
    let mut north_america = record("5000000000000", "North America");
    north_america.other_names = vec!["America".to_string()];

    let mut usa = record("5118000000000", "United States");
    usa.other_names = vec![
        "United States of America".to_string(),
        "America".to_string(),
        "USA".to_string(),
    ];
    usa.country_code = Some("US".to_string());
    usa.population = Some(331_000_000);
    usa.borders = vec!["5124000000000".to_string()];

    let mut canada = record("5124000000000", "Canada");
    canada.country_code = Some("CA".to_string());
    canada.borders = vec!["5118000000000".to_string()];

    let uk = record("1308000000000", "United Kingdom");

    let mut nyc = city("5118000020002", "New York", 8_400_000);
    nyc.other_names = vec!["New York City".to_string(), "NYC".to_string()];

    Dictionary::from_records([
        record("1000000000000", "Europe"),
        north_america,
        record("0100000000000", "Northern America"),
        usa,
        canada,
        uk,
        record("5118000010000", "California"),
        record("5118000020000", "New York"),
        record("5118000030000", "Pennsylvania"),
        city("5118000010001", "Los Angeles", 3_900_000),
        nyc,
        city("5118000030003", "Philadelphia", 1_600_000),
        city("1308000000004", "York", 200_000),
    ])
    .unwrap()
}

/// Tokenize the way the upstream tokenizer would: whitespace split with
/// punctuation broken off.
pub fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .flat_map(|word| {
            let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
            let mut parts = Vec::new();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
            for c in word.chars().filter(|c| !c.is_alphanumeric()) {
                parts.push(c.to_string());
            }
            parts
        })
        .collect()
}
