//! Read one CSV file per survey year into [`YearTable`]s.
//!
//! Expected header: `COUNTRY NAME`, an optional `YEAR`, then one column per
//! indicator. Header names are matched case-insensitively and stored
//! upper-cased. Empty or non-numeric indicator cells are read as missing.
//! Rows with an empty country, or with every indicator missing, are skipped
//! with a warning.

use crate::models::{COUNTRY_COLUMN, IndicatorRecord, YEAR_COLUMN, YearTable, normalize_name};
use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Survey years shipped with the game.
pub const DEFAULT_YEARS: [i32; 4] = [2019, 2020, 2021, 2022];

/// File name for a survey year inside the data directory.
pub fn year_file_name(year: i32) -> String {
    format!("year_{year}.csv")
}

/// Load `year_<YYYY>.csv` for each year from `dir`.
pub fn load_years<P: AsRef<Path>>(dir: P, years: &[i32]) -> Result<Vec<YearTable>> {
    let dir = dir.as_ref();
    years
        .iter()
        .map(|&y| {
            let path: PathBuf = dir.join(year_file_name(y));
            load_year_file(&path, y)
        })
        .collect()
}

/// Load one year file. `year` is used for rows when the file has no `YEAR` column.
pub fn load_year_file<P: AsRef<Path>>(path: P, year: i32) -> Result<YearTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open year file {}", path.display()))?;
    let table = read_year_table(file, year)
        .with_context(|| format!("failed to read year file {}", path.display()))?;
    info!(
        "loaded {} rows x {} indicators from {}",
        table.records.len(),
        table.indicators.len(),
        path.display()
    );
    Ok(table)
}

/// Parse a year table from any CSV source.
pub fn read_year_table<R: Read>(source: R, year: i32) -> Result<YearTable> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_name).collect();

    let country_col = headers
        .iter()
        .position(|h| h == COUNTRY_COLUMN)
        .with_context(|| format!("missing '{COUNTRY_COLUMN}' column"))?;
    let year_col = headers.iter().position(|h| h == YEAR_COLUMN);

    let indicator_cols: Vec<usize> = (0..headers.len())
        .filter(|&i| i != country_col && Some(i) != year_col)
        .collect();
    if indicator_cols.is_empty() {
        bail!("no indicator columns");
    }
    let indicators: Vec<String> = indicator_cols.iter().map(|&i| headers[i].clone()).collect();
    for (i, name) in indicators.iter().enumerate() {
        if name.is_empty() {
            bail!("indicator column {} has an empty header", indicator_cols[i] + 1);
        }
        if indicators[..i].contains(name) {
            bail!("duplicate column '{name}'");
        }
    }

    let mut table = YearTable::new(year, indicators);
    for (line, rec) in rdr.records().enumerate() {
        // header is line 1
        let line = line + 2;
        let rec = rec?;
        let country = rec.get(country_col).unwrap_or("").trim();
        if country.is_empty() {
            warn!("line {line}: empty country name, skipped");
            continue;
        }
        let row_year = match year_col {
            Some(c) => parse_year(rec.get(c).unwrap_or(""))
                .with_context(|| format!("line {line}: invalid {YEAR_COLUMN}"))?,
            None => year,
        };
        if row_year != year {
            debug!("line {line}: {country} is dated {row_year} in the {year} file");
        }
        let values = parse_values(&rec, &indicator_cols, line);
        if values.iter().all(Option::is_none) {
            warn!("line {line}: {country} has no indicator values, skipped");
            continue;
        }
        table.records.push(IndicatorRecord {
            country: country.to_string(),
            year: row_year,
            values,
        });
    }
    Ok(table)
}

fn parse_year(s: &str) -> Result<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Ok(y);
    }
    // spreadsheet exports often write years as floats
    let f: f64 = s.parse().with_context(|| format!("'{s}' is not a year"))?;
    if f.fract() != 0.0 || !f.is_finite() {
        bail!("'{s}' is not a year");
    }
    Ok(f as i32)
}

fn parse_values(rec: &StringRecord, cols: &[usize], line: usize) -> Vec<Option<f64>> {
    cols.iter()
        .map(|&c| {
            let cell = rec.get(c).unwrap_or("");
            if cell.is_empty() {
                return None;
            }
            match cell.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    debug!("line {line}: '{cell}' in column {} is not a number", c + 1);
                    None
                }
            }
        })
        .collect()
}
