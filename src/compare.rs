use crate::error::WhgError;
use crate::models::{AggregatedCountryTable, CountryRow};
use crate::select::SelectedCountry;
use serde::{Deserialize, Serialize};

/// Result of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Outcome plus both rows, the player's choice first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub outcome: Outcome,
    pub chosen: CountryRow,
    pub selected: CountryRow,
}

/// Resolve free text to a country row (case-insensitive, exact name).
///
/// ### Errors
/// [`WhgError::UnknownCountry`] if no country matches; callers re-prompt.
pub fn resolve_country<'a>(
    table: &'a AggregatedCountryTable,
    input: &str,
) -> Result<&'a CountryRow, WhgError> {
    table
        .find(input)
        .ok_or_else(|| WhgError::UnknownCountry(input.trim().to_string()))
}

/// Win only when the chosen country ranks strictly better (lower number)
/// than the selected one. Picking the selected country itself loses.
pub fn outcome_for(chosen_rank: usize, selected_rank: usize) -> Outcome {
    if chosen_rank < selected_rank {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// Compare the player's country against the selected one.
pub fn evaluate(
    table: &AggregatedCountryTable,
    choice: &str,
    selected: &SelectedCountry,
) -> Result<Comparison, WhgError> {
    let chosen = resolve_country(table, choice)?;
    Ok(Comparison {
        outcome: outcome_for(chosen.rank, selected.rank()),
        chosen: chosen.clone(),
        selected: selected.row().clone(),
    })
}
