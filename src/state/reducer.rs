/// The application state reducer
///
/// Every mutation of [`AppState`] goes through [`reduce`]: a pure,
/// synchronous, total function from the current state and an action
/// to the next state. The update loop owns the single state value and
/// threads it through here, so network completions arriving in any
/// order can never corrupt it -- the last action applied wins.
use std::collections::HashSet;

use super::data::{AppState, FavoriteSpecies, Observation};

/// A state transition label: the only four ways the data model changes.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the search results with the deduplicated form of `results`
    SaveResults { results: Vec<Observation> },
    /// Record the thumbnail URL for a species (last write wins)
    SaveImage { species_code: String, url: String },
    /// Star a species. Adding a code that is already starred is a no-op.
    AddFaveSpecies {
        species_code: String,
        com_name: String,
        sci_name: String,
    },
    /// Unstar a species, removing every matching entry
    RemoveFaveSpecies { species_code: String },
}

/// Apply `action` to `state` and return the next state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::SaveResults { results } => AppState {
            search_results: dedupe_results(results),
            ..state
        },
        Action::SaveImage { species_code, url } => {
            let mut next = state;
            next.images.insert(species_code, url);
            next
        }
        Action::AddFaveSpecies {
            species_code,
            com_name,
            sci_name,
        } => {
            let mut next = state;
            let already_starred = next
                .fave_species
                .iter()
                .any(|species| species.species_code == species_code);
            if !already_starred {
                next.fave_species.push(FavoriteSpecies {
                    species_code,
                    com_name,
                    sci_name,
                });
            }
            next
        }
        Action::RemoveFaveSpecies { species_code } => {
            let mut next = state;
            next.fave_species
                .retain(|species| species.species_code != species_code);
            next
        }
    }
}

/// Keep exactly one observation per (obsDt, locId, speciesCode) key:
/// the last occurrence in input order, output ordered by the
/// positions of the kept occurrences.
///
/// Single reverse pass over at most 30 records, the query client's
/// result cap.
fn dedupe_results(results: Vec<Observation>) -> Vec<Observation> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Observation> = results
        .into_iter()
        .rev()
        .filter(|obs| seen.insert(obs.dedupe_key()))
        .collect();
    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an observation; `marker` lands in `com_name` so tests can
    /// tell records with the same dedupe key apart.
    fn obs(species: &str, loc: &str, dt: &str, marker: &str) -> Observation {
        Observation {
            species_code: species.to_owned(),
            com_name: marker.to_owned(),
            sci_name: format!("{species} scientific"),
            obs_dt: dt.to_owned(),
            loc_id: loc.to_owned(),
            loc_name: "Somewhere Park".to_owned(),
            lat: 40.0,
            lng: -75.0,
        }
    }

    fn add(species: &str) -> Action {
        Action::AddFaveSpecies {
            species_code: species.to_owned(),
            com_name: format!("{species} common"),
            sci_name: format!("{species} scientific"),
        }
    }

    #[test]
    fn test_dedupe_keeps_last_occurrence_in_order() {
        let input = vec![
            obs("amecro", "L1", "2024-05-01 09:12", "first"),
            obs("blujay", "L1", "2024-05-01 09:12", "only"),
            obs("amecro", "L1", "2024-05-01 09:12", "second"),
        ];

        let state = reduce(AppState::default(), Action::SaveResults { results: input });

        assert_eq!(state.search_results.len(), 2);
        assert_eq!(state.search_results[0].species_code, "blujay");
        assert_eq!(state.search_results[1].species_code, "amecro");
        // The later duplicate survives, not the earlier one
        assert_eq!(state.search_results[1].com_name, "second");
    }

    #[test]
    fn test_dedupe_distinguishes_full_key() {
        // Same species at another place or time is a distinct sighting
        let input = vec![
            obs("amecro", "L1", "2024-05-01 09:12", "a"),
            obs("amecro", "L2", "2024-05-01 09:12", "b"),
            obs("amecro", "L1", "2024-05-02 10:00", "c"),
        ];

        let state = reduce(AppState::default(), Action::SaveResults { results: input });

        assert_eq!(state.search_results.len(), 3);
    }

    #[test]
    fn test_save_results_is_idempotent_on_deduped_input() {
        let input = vec![
            obs("amecro", "L1", "2024-05-01 09:12", "a"),
            obs("amecro", "L1", "2024-05-01 09:12", "b"),
            obs("blujay", "L2", "2024-05-01 08:00", "c"),
        ];

        let once = reduce(AppState::default(), Action::SaveResults { results: input });
        let twice = reduce(
            once.clone(),
            Action::SaveResults {
                results: once.search_results.clone(),
            },
        );

        assert_eq!(once, twice);
    }

    #[test]
    fn test_save_results_replaces_previous_list() {
        let first = reduce(
            AppState::default(),
            Action::SaveResults {
                results: vec![
                    obs("amecro", "L1", "2024-05-01 09:12", "a"),
                    obs("blujay", "L1", "2024-05-01 09:12", "b"),
                ],
            },
        );
        let second = reduce(
            first,
            Action::SaveResults {
                results: vec![obs("norcar", "L2", "2024-05-02 07:30", "c")],
            },
        );

        assert_eq!(second.search_results.len(), 1);
        assert_eq!(second.search_results[0].species_code, "norcar");
    }

    #[test]
    fn test_save_image_overwrites_by_key() {
        let state = AppState::default();
        let state = reduce(
            state,
            Action::SaveImage {
                species_code: "amecro".to_owned(),
                url: "u1".to_owned(),
            },
        );
        let state = reduce(
            state,
            Action::SaveImage {
                species_code: "blujay".to_owned(),
                url: "u2".to_owned(),
            },
        );
        let state = reduce(
            state,
            Action::SaveImage {
                species_code: "amecro".to_owned(),
                url: "u3".to_owned(),
            },
        );

        assert_eq!(state.images.len(), 2);
        assert_eq!(state.images.get("amecro").map(String::as_str), Some("u3"));
        assert_eq!(state.images.get("blujay").map(String::as_str), Some("u2"));
    }

    #[test]
    fn test_add_then_remove_restores_favorites() {
        let empty = AppState::default();

        let added = reduce(empty.clone(), add("amecro"));
        assert_eq!(added.fave_species.len(), 1);
        assert_eq!(added.fave_species[0].species_code, "amecro");

        let removed = reduce(
            added,
            Action::RemoveFaveSpecies {
                species_code: "amecro".to_owned(),
            },
        );
        assert_eq!(removed, empty);
    }

    #[test]
    fn test_duplicate_add_is_identity() {
        let once = reduce(AppState::default(), add("amecro"));
        let twice = reduce(once.clone(), add("amecro"));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_absent_species_is_identity() {
        let state = reduce(AppState::default(), add("amecro"));
        let after = reduce(
            state.clone(),
            Action::RemoveFaveSpecies {
                species_code: "blujay".to_owned(),
            },
        );

        assert_eq!(state, after);
    }

    #[test]
    fn test_actions_touch_only_their_own_collection() {
        let state = reduce(AppState::default(), add("amecro"));
        let state = reduce(
            state,
            Action::SaveImage {
                species_code: "amecro".to_owned(),
                url: "u1".to_owned(),
            },
        );

        // A new search leaves favorites and images alone
        let state = reduce(
            state,
            Action::SaveResults {
                results: vec![obs("blujay", "L1", "2024-05-01 09:12", "a")],
            },
        );
        assert_eq!(state.fave_species.len(), 1);
        assert_eq!(state.images.len(), 1);

        // Unstarring leaves results and images alone
        let state = reduce(
            state,
            Action::RemoveFaveSpecies {
                species_code: "amecro".to_owned(),
            },
        );
        assert_eq!(state.search_results.len(), 1);
        assert_eq!(state.images.len(), 1);
    }
}
