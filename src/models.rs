use serde::{Deserialize, Serialize};

/// Header of the country column in the year files and the export.
pub const COUNTRY_COLUMN: &str = "COUNTRY NAME";
/// Header of the optional year column in the year files.
pub const YEAR_COLUMN: &str = "YEAR";
/// Name of the composite score field.
pub const TOTAL: &str = "TOTAL";
/// Name of the rank field.
pub const RANK: &str = "RANK";

/// Normalize a country or indicator name for lookups: trim, collapse inner
/// whitespace and upper-case. `" united  kingdom"` -> `"UNITED KINGDOM"`.
pub fn normalize_name(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// One observation row: a country's indicator values for one survey year.
///
/// `values` is aligned with the `indicators` of the owning [`YearTable`];
/// `None` marks a missing cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorRecord {
    pub country: String,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

/// All records of one survey year, sharing one indicator schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearTable {
    pub year: i32,
    pub indicators: Vec<String>,
    pub records: Vec<IndicatorRecord>,
}

impl YearTable {
    pub fn new(year: i32, indicators: Vec<String>) -> Self {
        Self {
            year,
            indicators,
            records: Vec::new(),
        }
    }

    /// Append a record for `country` in this table's year. Accepts plain
    /// `f64`s or `Option<f64>`s for rows with missing cells.
    pub fn push<V: Into<Option<f64>>>(
        &mut self,
        country: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) {
        self.records.push(IndicatorRecord {
            country: country.into(),
            year: self.year,
            values: values.into_iter().map(Into::into).collect(),
        });
    }
}

/// A (country, year) row of the ranked per-year table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearRow {
    pub country: String,
    pub year: i32,
    pub values: Vec<Option<f64>>,
    /// Sum of the present values.
    pub total: f64,
    pub rank: usize,
}

/// A country row of the multi-year average table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryRow {
    pub country: String,
    /// Survey years that contributed to the averages, ascending.
    pub years: Vec<i32>,
    /// Mean over the years where the indicator is present; `None` if it never is.
    pub values: Vec<Option<f64>>,
    pub total: f64,
    pub rank: usize,
}

impl CountryRow {
    /// Value of a resolved field. `TOTAL` is always present.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Indicator(i) => self.values[i],
            Field::Total => Some(self.total),
        }
    }
}

/// A queryable numeric column of the average table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Index into the table's indicator list.
    Indicator(usize),
    Total,
}

/// Every (country, year) row ranked by TOTAL. Rows are stored in rank order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedYearTable {
    pub indicators: Vec<String>,
    pub rows: Vec<YearRow>,
}

impl AggregatedYearTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one country, in rank order.
    pub fn rows_for<'a>(&'a self, country: &str) -> impl Iterator<Item = &'a YearRow> + 'a {
        let key = normalize_name(country);
        self.rows
            .iter()
            .filter(move |r| normalize_name(&r.country) == key)
    }
}

/// One row per country with indicators and TOTAL averaged over the years.
/// Rows are stored in rank order, so `rows[i].rank == i + 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedCountryTable {
    pub indicators: Vec<String>,
    pub rows: Vec<CountryRow>,
}

impl AggregatedCountryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row holding `rank` (1-based).
    pub fn by_rank(&self, rank: usize) -> Option<&CountryRow> {
        let row = self.rows.get(rank.checked_sub(1)?)?;
        debug_assert_eq!(row.rank, rank);
        Some(row)
    }

    /// Case-insensitive exact-name lookup.
    pub fn find(&self, country: &str) -> Option<&CountryRow> {
        let key = normalize_name(country);
        self.rows.iter().find(|r| normalize_name(&r.country) == key)
    }

    /// Resolve a column name (indicator or `TOTAL`) case-insensitively.
    /// `RANK` is not a queryable field.
    pub fn field(&self, name: &str) -> Option<Field> {
        let key = normalize_name(name);
        if key == TOTAL {
            return Some(Field::Total);
        }
        self.indicators
            .iter()
            .position(|n| normalize_name(n) == key)
            .map(Field::Indicator)
    }

    /// Display name of a resolved field.
    pub fn field_name(&self, field: Field) -> &str {
        match field {
            Field::Indicator(i) => &self.indicators[i],
            Field::Total => TOTAL,
        }
    }

    /// Country names in rank order.
    pub fn country_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.country.as_str()).collect()
    }

    /// Names accepted by [`field`](Self::field): the indicators followed by `TOTAL`.
    pub fn field_names(&self) -> Vec<&str> {
        self.indicators
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(TOTAL))
            .collect()
    }
}
