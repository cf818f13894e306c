use thiserror::Error;

/// Errors raised by the aggregation core and the interactive lookups.
///
/// `Schema`, `EmptyInput` and `EmptyTable` happen while building the tables and
/// end the session. `UnknownCountry` and `UnknownIndicator` come from free-text
/// input and are meant to be handled by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WhgError {
    #[error("indicator columns of year {year} do not match: expected {expected:?}, found {found:?}")]
    Schema {
        year: i32,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("{country} ({year}) has {found} indicator values, expected {expected}")]
    RecordWidth {
        country: String,
        year: i32,
        expected: usize,
        found: usize,
    },

    #[error("no rows left after merging the year tables")]
    EmptyInput,

    #[error("need at least 2 countries to pick from, found {countries}")]
    EmptyTable { countries: usize },

    #[error("unknown country: {0}")]
    UnknownCountry(String),

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),
}
