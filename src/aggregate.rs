//! Merge the year tables into one ranked table and derive the per-country
//! average table.
//!
//! Ranks are positional: rows are stable-sorted by TOTAL descending and numbered
//! from 1, so equal totals keep their merged order and still get distinct ranks.
//! The merged order is ascending by (normalized country, year).

use crate::error::WhgError;
use crate::models::{
    AggregatedCountryTable, AggregatedYearTable, CountryRow, YearRow, YearTable, normalize_name,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Both derived views. Built once at startup and only read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aggregated {
    pub by_year: AggregatedYearTable,
    pub by_country: AggregatedCountryTable,
}

/// Build the ranked year table and the ranked country-average table.
///
/// ### Errors
/// - [`WhgError::Schema`] if the year tables disagree on their set of indicator columns
/// - [`WhgError::RecordWidth`] if a record does not carry one value per indicator
/// - [`WhgError::EmptyInput`] if there is nothing to aggregate
pub fn build(tables: &[YearTable]) -> Result<Aggregated, WhgError> {
    let (indicators, layouts) = check_schema(tables)?;
    let merged = merge(tables, &layouts);
    if merged.is_empty() {
        return Err(WhgError::EmptyInput);
    }
    debug!("merged {} (country, year) rows", merged.len());

    let by_year = rank_years(indicators.clone(), merged);
    let by_country = average_by_country(&by_year);
    info!(
        "aggregated {} rows from {} year tables into {} countries",
        by_year.len(),
        tables.len(),
        by_country.len()
    );
    Ok(Aggregated { by_year, by_country })
}

/// Column layout of one year table: `layout[i]` is where the table keeps the
/// `i`-th canonical indicator.
type Layout = Vec<usize>;

/// Canonical indicator names (first table's order) and each table's layout.
///
/// Tables may list the same indicators in a different column order; any other
/// difference is a schema error.
fn check_schema(tables: &[YearTable]) -> Result<(Vec<String>, Vec<Layout>), WhgError> {
    let first = tables.first().ok_or(WhgError::EmptyInput)?;
    let expected: Vec<String> = first.indicators.iter().map(|n| normalize_name(n)).collect();
    let mut expected_sorted = expected.clone();
    expected_sorted.sort();

    let mut layouts = Vec::with_capacity(tables.len());
    for t in tables {
        let found: Vec<String> = t.indicators.iter().map(|n| normalize_name(n)).collect();
        let mut found_sorted = found.clone();
        found_sorted.sort();
        let has_dupes = found_sorted.windows(2).any(|w| w[0] == w[1]);
        if found_sorted != expected_sorted || has_dupes {
            return Err(WhgError::Schema {
                year: t.year,
                expected,
                found,
            });
        }
        if let Some(bad) = t.records.iter().find(|r| r.values.len() != expected.len()) {
            return Err(WhgError::RecordWidth {
                country: bad.country.clone(),
                year: bad.year,
                expected: expected.len(),
                found: bad.values.len(),
            });
        }
        let layout: Layout = expected
            .iter()
            .filter_map(|name| found.iter().position(|f| f == name))
            .collect();
        layouts.push(layout);
    }
    Ok((first.indicators.clone(), layouts))
}

struct MergeSlot {
    country: String,
    sums: Vec<f64>,
    present: Vec<usize>,
    count: usize,
}

/// Union all records keyed by (country, year). A key seen more than once gets
/// the per-cell mean of its contributing rows, skipping missing cells.
fn merge(tables: &[YearTable], layouts: &[Layout]) -> Vec<(String, i32, Vec<Option<f64>>)> {
    let mut slots: BTreeMap<(String, i32), MergeSlot> = BTreeMap::new();
    for (t, layout) in tables.iter().zip(layouts) {
        for r in &t.records {
            let slot = slots
                .entry((normalize_name(&r.country), r.year))
                .or_insert_with(|| MergeSlot {
                    country: r.country.trim().to_string(),
                    sums: vec![0.0; layout.len()],
                    present: vec![0; layout.len()],
                    count: 0,
                });
            for (i, &col) in layout.iter().enumerate() {
                if let Some(v) = r.values[col] {
                    slot.sums[i] += v;
                    slot.present[i] += 1;
                }
            }
            slot.count += 1;
        }
    }

    slots
        .into_iter()
        .map(|((_, year), slot)| {
            if slot.count > 1 {
                debug!("{} ({}) appears {} times, averaging", slot.country, year, slot.count);
            }
            (slot.country, year, cell_means(&slot.sums, &slot.present))
        })
        .collect()
}

/// `sum / n` per cell, `None` where nothing was present.
fn cell_means(sums: &[f64], present: &[usize]) -> Vec<Option<f64>> {
    sums.iter()
        .zip(present)
        .map(|(&s, &n)| match n {
            0 => None,
            1 => Some(s),
            n => Some(s / n as f64),
        })
        .collect()
}

trait Ranked {
    fn total(&self) -> f64;
    fn set_rank(&mut self, rank: usize);
}

impl Ranked for YearRow {
    fn total(&self) -> f64 {
        self.total
    }
    fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

impl Ranked for CountryRow {
    fn total(&self) -> f64 {
        self.total
    }
    fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }
}

/// Stable sort by TOTAL descending, then rank = 1 + position.
fn assign_ranks<T: Ranked>(rows: &mut [T]) {
    rows.sort_by(|a, b| b.total().total_cmp(&a.total()));
    for (i, row) in rows.iter_mut().enumerate() {
        row.set_rank(i + 1);
    }
}

fn rank_years(
    indicators: Vec<String>,
    merged: Vec<(String, i32, Vec<Option<f64>>)>,
) -> AggregatedYearTable {
    let mut rows: Vec<YearRow> = merged
        .into_iter()
        .map(|(country, year, values)| YearRow {
            total: values.iter().flatten().sum(),
            country,
            year,
            values,
            rank: 0,
        })
        .collect();
    assign_ranks(&mut rows);
    AggregatedYearTable { indicators, rows }
}

/// Group the year rows by country and average indicators and TOTAL.
/// An indicator is averaged over the years where it is present; TOTAL over
/// every year row. The per-year rank is not carried over; countries are
/// ranked afresh.
fn average_by_country(by_year: &AggregatedYearTable) -> AggregatedCountryTable {
    let mut groups: BTreeMap<String, Vec<&YearRow>> = BTreeMap::new();
    for row in &by_year.rows {
        groups.entry(normalize_name(&row.country)).or_default().push(row);
    }

    let width = by_year.indicators.len();
    let mut rows: Vec<CountryRow> = groups
        .into_values()
        .map(|mut year_rows| {
            year_rows.sort_by_key(|r| r.year);
            let n = year_rows.len() as f64;
            let mut sums = vec![0.0; width];
            let mut present = vec![0usize; width];
            let mut total = 0.0;
            for r in &year_rows {
                for (i, v) in r.values.iter().enumerate() {
                    if let Some(v) = v {
                        sums[i] += v;
                        present[i] += 1;
                    }
                }
                total += r.total;
            }
            CountryRow {
                country: year_rows[0].country.clone(),
                years: year_rows.iter().map(|r| r.year).collect(),
                values: cell_means(&sums, &present),
                total: total / n,
                rank: 0,
            }
        })
        .collect();
    assign_ranks(&mut rows);

    AggregatedCountryTable {
        indicators: by_year.indicators.clone(),
        rows,
    }
}
