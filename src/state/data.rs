/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the API layer and the UI layer.
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

/// A single sighting of a species at a location and time,
/// as reported by the eBird API.
///
/// Immutable once received; a new search replaces the whole result
/// list. The identity of a sighting is the (obsDt, locId, speciesCode)
/// triple returned by [`Observation::dedupe_key`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// eBird species code (e.g. "amecro")
    pub species_code: String,
    /// Common name (e.g. "American Crow")
    pub com_name: String,
    /// Scientific name (e.g. "Corvus brachyrhynchos")
    pub sci_name: String,
    /// Observation timestamp, as delivered ("2024-05-01 09:12",
    /// or just the date when the checklist carries no time)
    pub obs_dt: String,
    /// eBird location ID (e.g. "L123456")
    pub loc_id: String,
    /// Human-readable location name
    pub loc_name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Observation {
    /// Identity key for deduplication: one record per
    /// (timestamp, location, species) triple.
    pub fn dedupe_key(&self) -> (String, String, String) {
        (
            self.obs_dt.clone(),
            self.loc_id.clone(),
            self.species_code.clone(),
        )
    }

    /// Parse the observation timestamp.
    ///
    /// Returns `None` for date-only or otherwise nonstandard strings;
    /// callers fall back to displaying the raw text.
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.obs_dt, "%Y-%m-%d %H:%M").ok()
    }
}

/// A species the user has starred, independent of any particular
/// observation. Unique by species code within the favorites list.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteSpecies {
    pub species_code: String,
    pub com_name: String,
    pub sci_name: String,
}

/// Everything the reducer owns.
///
/// Created empty at startup, replaced wholesale by each reducer
/// invocation, dropped when the process exits. Nothing outside the
/// reducer mutates this value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Starred species, in the order they were added
    pub fave_species: Vec<FavoriteSpecies>,
    /// Results of the most recent search, deduplicated
    pub search_results: Vec<Observation>,
    /// Species code -> thumbnail URL, accumulated across searches
    pub images: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(obs_dt: &str) -> Observation {
        Observation {
            species_code: "amecro".to_owned(),
            com_name: "American Crow".to_owned(),
            sci_name: "Corvus brachyrhynchos".to_owned(),
            obs_dt: obs_dt.to_owned(),
            loc_id: "L123456".to_owned(),
            loc_name: "Pennypack Park".to_owned(),
            lat: 40.06,
            lng: -75.05,
        }
    }

    #[test]
    fn test_deserialize_ebird_record() {
        // A record as the eBird v2 geo endpoint actually returns it;
        // fields we do not model are ignored.
        let json = r#"{
            "speciesCode": "amecro",
            "comName": "American Crow",
            "sciName": "Corvus brachyrhynchos",
            "locId": "L123456",
            "locName": "Pennypack Park",
            "obsDt": "2024-05-01 09:12",
            "howMany": 3,
            "lat": 40.06,
            "lng": -75.05,
            "obsValid": true,
            "obsReviewed": false,
            "locationPrivate": false,
            "subId": "S168999999"
        }"#;

        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.species_code, "amecro");
        assert_eq!(obs.com_name, "American Crow");
        assert_eq!(obs.loc_id, "L123456");
        assert_eq!(obs.obs_dt, "2024-05-01 09:12");
        assert_eq!(obs.lat, 40.06);
    }

    #[test]
    fn test_dedupe_key_covers_time_location_and_species() {
        let a = sample("2024-05-01 09:12");
        let mut b = a.clone();
        assert_eq!(a.dedupe_key(), b.dedupe_key());

        b.loc_id = "L999".to_owned();
        assert_ne!(a.dedupe_key(), b.dedupe_key());
    }

    #[test]
    fn test_observed_at_parses_datetime() {
        let dt = sample("2024-05-01 09:12").observed_at().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 09:12");
    }

    #[test]
    fn test_observed_at_rejects_date_only() {
        assert!(sample("2024-05-01").observed_at().is_none());
        assert!(sample("whenever").observed_at().is_none());
    }
}
