//! Static region map: region name -> member countries.
//!
//! A country not found in any set belongs to `"Other"`. First match wins.
//! The table is folded into a hash map once so the per-record tagging pass
//! during load is an O(1) lookup.

use std::collections::HashMap;
use std::sync::OnceLock;

pub const OTHER_REGION: &str = "Other";

/// Region membership, in presentation order.
pub const REGIONS: &[(&str, &[&str])] = &[
    (
        "Asia",
        &[
            "China",
            "India",
            "Japan",
            "South Korea",
            "Indonesia",
            "Saudi Arabia",
            "Iran",
            "Thailand",
            "Malaysia",
        ],
    ),
    (
        "Europe",
        &[
            "Germany",
            "UK",
            "France",
            "Italy",
            "Spain",
            "Poland",
            "Netherlands",
            "Belgium",
            "Sweden",
        ],
    ),
    ("North America", &["United States", "Canada", "Mexico"]),
    (
        "South America",
        &["Brazil", "Argentina", "Colombia", "Chile", "Peru", "Venezuela"],
    ),
    (
        "Africa",
        &["South Africa", "Egypt", "Nigeria", "Algeria", "Morocco"],
    ),
    ("Oceania", &["Australia", "New Zealand"]),
];

fn lookup() -> &'static HashMap<&'static str, &'static str> {
    static LOOKUP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        let mut map = HashMap::new();
        for (region, countries) in REGIONS {
            for country in *countries {
                // First match wins: do not overwrite an earlier region.
                map.entry(*country).or_insert(*region);
            }
        }
        map
    })
}

/// Region of a country, defaulting to [`OTHER_REGION`].
pub fn region_of(country: &str) -> &'static str {
    lookup().get(country).copied().unwrap_or(OTHER_REGION)
}

/// Region names in presentation order, without the `"Other"` fallback.
pub fn region_names() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(region, _)| *region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_countries() {
        assert_eq!(region_of("Germany"), "Europe");
        assert_eq!(region_of("China"), "Asia");
        assert_eq!(region_of("Brazil"), "South America");
        assert_eq!(region_of("Australia"), "Oceania");
    }

    #[test]
    fn test_unknown_country_is_other() {
        assert_eq!(region_of("Atlantis"), OTHER_REGION);
        assert_eq!(region_of(""), OTHER_REGION);
    }

    #[test]
    fn test_region_names_order() {
        let names: Vec<_> = region_names().collect();
        assert_eq!(
            names,
            vec![
                "Asia",
                "Europe",
                "North America",
                "South America",
                "Africa",
                "Oceania"
            ]
        );
    }
}
