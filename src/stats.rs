use crate::error::WhgError;
use crate::models::{AggregatedCountryTable, Field};
use serde::{Deserialize, Serialize};

/// How many countries the top and bottom lists hold.
pub const LIST_LEN: usize = 5;

/// One country's value for the queried field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standing {
    pub country: String,
    /// Overall rank in the average table.
    pub rank: usize,
    pub value: f64,
}

/// Extremes and summary statistics of one field over the average table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSummary {
    pub field: String,
    /// Countries with a value for the field.
    pub count: usize,
    /// Countries without one; left out of the lists and the statistics.
    pub missing: usize,
    /// Highest values first.
    pub top: Vec<Standing>,
    /// Lowest values first.
    pub bottom: Vec<Standing>,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Resolve a category name against the table's vocabulary (indicators and `TOTAL`).
///
/// ### Errors
/// [`WhgError::UnknownIndicator`] if nothing matches; callers re-prompt.
pub fn resolve_field(table: &AggregatedCountryTable, input: &str) -> Result<Field, WhgError> {
    table
        .field(input)
        .ok_or_else(|| WhgError::UnknownIndicator(input.trim().to_string()))
}

/// Top 5, bottom 5, mean, min and max of `indicator`.
///
/// Ties keep table (rank) order in both lists. Countries missing the field
/// are skipped.
///
/// ### Errors
/// [`WhgError::EmptyTable`] if no country has a value for the field.
pub fn report(indicator: &str, table: &AggregatedCountryTable) -> Result<StatsSummary, WhgError> {
    let field = resolve_field(table, indicator)?;

    let standings: Vec<Standing> = table
        .rows
        .iter()
        .filter_map(|r| {
            Some(Standing {
                country: r.country.clone(),
                rank: r.rank,
                value: r.get(field)?,
            })
        })
        .collect();
    if standings.is_empty() {
        return Err(WhgError::EmptyTable { countries: 0 });
    }

    let mut desc: Vec<&Standing> = standings.iter().collect();
    desc.sort_by(|a, b| b.value.total_cmp(&a.value));
    let mut asc: Vec<&Standing> = standings.iter().collect();
    asc.sort_by(|a, b| a.value.total_cmp(&b.value));

    let count = standings.len();
    let min = asc[0].value;
    let max = desc[0].value;
    let mean = standings.iter().map(|s| s.value).sum::<f64>() / count as f64;

    Ok(StatsSummary {
        field: table.field_name(field).to_string(),
        count,
        missing: table.len() - count,
        top: desc.into_iter().take(LIST_LEN).cloned().collect(),
        bottom: asc.into_iter().take(LIST_LEN).cloned().collect(),
        mean,
        min,
        max,
    })
}
