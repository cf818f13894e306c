use crate::models::{AggregatedCountryTable, COUNTRY_COLUMN, RANK, TOTAL};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::info;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header of the export's years column.
pub const YEARS_COLUMN: &str = "YEARS";

/// Prefix text cells that a spreadsheet would treat as a formula with `'`.
fn guard_formula(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Dump the average table as CSV:
/// `COUNTRY NAME, RANK, TOTAL, <indicators...>, YEARS` (years joined by `;`).
/// Missing indicator values are written as empty cells.
pub fn save_csv<P: AsRef<Path>>(table: &AggregatedCountryTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header: Vec<String> = vec![COUNTRY_COLUMN.into(), RANK.into(), TOTAL.into()];
    header.extend(table.indicators.iter().map(|n| guard_formula(n).into_owned()));
    header.push(YEARS_COLUMN.into());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut rec: Vec<String> = Vec::with_capacity(table.indicators.len() + 4);
        rec.push(guard_formula(&row.country).into_owned());
        rec.push(row.rank.to_string());
        rec.push(row.total.to_string());
        // missing cells stay empty
        rec.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
        rec.push(
            row.years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(";"),
        );
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    info!("exported {} countries to {}", table.len(), path.display());
    Ok(())
}

/// Dump the average table as a pretty JSON document.
pub fn save_json<P: AsRef<Path>>(table: &AggregatedCountryTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let s = serde_json::to_string_pretty(table)?;
    f.write_all(s.as_bytes())?;
    info!("exported {} countries to {}", table.len(), path.display());
    Ok(())
}

/// Export in the format implied by the extension (`.json`, anything else is CSV).
pub fn save<P: AsRef<Path>>(table: &AggregatedCountryTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        save_json(table, path)
    } else {
        save_csv(table, path)
    }
}
