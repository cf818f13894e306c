use crate::error::WhgError;
use crate::models::{AggregatedCountryTable, CountryRow};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The country the player has to beat. An owned snapshot of its average-table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedCountry {
    row: CountryRow,
}

impl SelectedCountry {
    pub fn row(&self) -> &CountryRow {
        &self.row
    }

    pub fn rank(&self) -> usize {
        self.row.rank
    }

    pub fn country(&self) -> &str {
        &self.row.country
    }
}

impl From<&CountryRow> for SelectedCountry {
    fn from(row: &CountryRow) -> Self {
        Self { row: row.clone() }
    }
}

/// Draw a rank uniformly from `[2, M]` and return that country.
///
/// Rank 1 is never drawn so a better country always exists. Can be called
/// repeatedly with the same table; the caller owns the RNG.
///
/// ### Errors
/// [`WhgError::EmptyTable`] if the table holds fewer than 2 countries.
pub fn pick_random<R: Rng + ?Sized>(
    table: &AggregatedCountryTable,
    rng: &mut R,
) -> Result<SelectedCountry, WhgError> {
    let m = table.len();
    if m < 2 {
        return Err(WhgError::EmptyTable { countries: m });
    }
    let rank = rng.gen_range(2..=m);
    let row = table
        .by_rank(rank)
        .ok_or(WhgError::EmptyTable { countries: m })?;
    debug!("selected rank {rank} of {m}: {}", row.country);
    Ok(SelectedCountry::from(row))
}
