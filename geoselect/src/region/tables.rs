//! Static reference tables for states and the county demo set.
//!
//! The county table is deliberately small: county-level map clicks are
//! resolved by reverse geocoding and then looked up here, so any county not
//! listed is reported as outside data coverage.

use super::types::{Code, Level, RegionRecord};

/// A US state (or DC) with its postal abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEntry {
    pub name: &'static str,
    pub abbreviation: &'static str,
}

/// A county in the demo table.
///
/// `name` carries its own suffix ("County", "Parish", "Borough").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountyEntry {
    pub name: &'static str,
    pub state: &'static str,
    pub fips: &'static str,
}

impl CountyEntry {
    /// Lookup key in the form `"<County Name>, <ST>"`.
    pub fn lookup_key(&self) -> String {
        format!("{}, {}", self.name, self.state)
    }
}

const fn state(name: &'static str, abbreviation: &'static str) -> StateEntry {
    StateEntry { name, abbreviation }
}

const fn county(name: &'static str, state: &'static str, fips: &'static str) -> CountyEntry {
    CountyEntry { name, state, fips }
}

/// All 50 states plus the District of Columbia.
pub const STATES: &[StateEntry] = &[
    state("Alabama", "AL"),
    state("Alaska", "AK"),
    state("Arizona", "AZ"),
    state("Arkansas", "AR"),
    state("California", "CA"),
    state("Colorado", "CO"),
    state("Connecticut", "CT"),
    state("Delaware", "DE"),
    state("District of Columbia", "DC"),
    state("Florida", "FL"),
    state("Georgia", "GA"),
    state("Hawaii", "HI"),
    state("Idaho", "ID"),
    state("Illinois", "IL"),
    state("Indiana", "IN"),
    state("Iowa", "IA"),
    state("Kansas", "KS"),
    state("Kentucky", "KY"),
    state("Louisiana", "LA"),
    state("Maine", "ME"),
    state("Maryland", "MD"),
    state("Massachusetts", "MA"),
    state("Michigan", "MI"),
    state("Minnesota", "MN"),
    state("Mississippi", "MS"),
    state("Missouri", "MO"),
    state("Montana", "MT"),
    state("Nebraska", "NE"),
    state("Nevada", "NV"),
    state("New Hampshire", "NH"),
    state("New Jersey", "NJ"),
    state("New Mexico", "NM"),
    state("New York", "NY"),
    state("North Carolina", "NC"),
    state("North Dakota", "ND"),
    state("Ohio", "OH"),
    state("Oklahoma", "OK"),
    state("Oregon", "OR"),
    state("Pennsylvania", "PA"),
    state("Rhode Island", "RI"),
    state("South Carolina", "SC"),
    state("South Dakota", "SD"),
    state("Tennessee", "TN"),
    state("Texas", "TX"),
    state("Utah", "UT"),
    state("Vermont", "VT"),
    state("Virginia", "VA"),
    state("Washington", "WA"),
    state("West Virginia", "WV"),
    state("Wisconsin", "WI"),
    state("Wyoming", "WY"),
];

/// Demo county table.
pub const COUNTIES: &[CountyEntry] = &[
    county("Alameda County", "CA", "06001"),
    county("Los Angeles County", "CA", "06037"),
    county("San Diego County", "CA", "06073"),
    county("San Francisco County", "CA", "06075"),
    county("Maricopa County", "AZ", "04013"),
    county("Denver County", "CO", "08031"),
    county("Miami-Dade County", "FL", "12086"),
    county("Cook County", "IL", "17031"),
    county("Jefferson Parish", "LA", "22051"),
    county("Orleans Parish", "LA", "22071"),
    county("Suffolk County", "MA", "25025"),
    county("Kings County", "NY", "36047"),
    county("New York County", "NY", "36061"),
    county("Dallas County", "TX", "48113"),
    county("Harris County", "TX", "48201"),
    county("Travis County", "TX", "48453"),
    county("King County", "WA", "53033"),
    county("Fairbanks North Star Borough", "AK", "02090"),
    county("Matanuska-Susitna Borough", "AK", "02170"),
];

/// Map a state display name (as found in boundary data) to its code.
///
/// Matching ignores ASCII case and surrounding whitespace.
pub fn state_code_for_name(name: &str) -> Option<Code> {
    let name = name.trim();
    STATES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .map(|s| Code::from(s.abbreviation))
}

/// Returns true if `code` is a known state abbreviation.
pub fn is_state_code(code: &str) -> bool {
    STATES.iter().any(|s| s.abbreviation == code)
}

/// Look up a county label of the form `"<County Name>, <ST>"`.
pub fn county_code_for_label(label: &str) -> Option<Code> {
    let label = label.trim();
    COUNTIES
        .iter()
        .find(|c| c.lookup_key().eq_ignore_ascii_case(label))
        .map(|c| Code::from(c.fips))
}

/// Find the county entry for a FIPS code.
pub fn county_by_code(code: &str) -> Option<&'static CountyEntry> {
    COUNTIES.iter().find(|c| c.fips == code)
}

/// Checklist options for a level, in display order.
pub fn checklist(level: Level) -> Vec<RegionRecord> {
    match level {
        Level::State => STATES
            .iter()
            .map(|s| RegionRecord {
                display_name: s.name.to_string(),
                code: Code::from(s.abbreviation),
            })
            .collect(),
        Level::County => COUNTIES
            .iter()
            .map(|c| RegionRecord {
                display_name: c.lookup_key(),
                code: Code::from(c.fips),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_table_has_fifty_one_unique_codes() {
        let codes: HashSet<_> = STATES.iter().map(|s| s.abbreviation).collect();
        assert_eq!(STATES.len(), 51);
        assert_eq!(codes.len(), 51);
    }

    #[test]
    fn test_county_codes_are_unique_five_digit() {
        let codes: HashSet<_> = COUNTIES.iter().map(|c| c.fips).collect();
        assert_eq!(codes.len(), COUNTIES.len());
        for c in COUNTIES {
            assert_eq!(c.fips.len(), 5, "{} has malformed FIPS", c.name);
            assert!(c.fips.chars().all(|ch| ch.is_ascii_digit()));
            assert!(is_state_code(c.state), "{} has unknown state", c.name);
        }
    }

    #[test]
    fn test_state_code_for_name() {
        assert_eq!(state_code_for_name("California"), Some(Code::from("CA")));
        assert_eq!(state_code_for_name("  new york "), Some(Code::from("NY")));
        assert_eq!(state_code_for_name("Puerto Rico"), None);
    }

    #[test]
    fn test_county_code_for_label() {
        assert_eq!(
            county_code_for_label("San Francisco County, CA"),
            Some(Code::from("06075"))
        );
        assert_eq!(
            county_code_for_label("Orleans Parish, LA"),
            Some(Code::from("22071"))
        );
        assert_eq!(county_code_for_label("Marin County, CA"), None);
    }

    #[test]
    fn test_checklist_matches_level() {
        assert_eq!(checklist(Level::State).len(), STATES.len());
        let counties = checklist(Level::County);
        assert_eq!(counties.len(), COUNTIES.len());
        assert!(counties
            .iter()
            .any(|r| r.display_name == "Cook County, IL" && r.code.as_str() == "17031"));
    }
}
