//! whg_rs
//!
//! Aggregate World Happiness Report survey years into one ranked table and play
//! a guessing game on top of it. Pairs with the `whg` CLI.
//!
//! ### Features
//! - Load one CSV file per survey year (`COUNTRY NAME`, `YEAR`, indicators...)
//! - Rank every (country, year) row by the sum of its indicators
//! - Average each country over the years and rank the averages again
//! - Pick a country to beat, judge a guess, report top/bottom 5 and mean/min/max
//! - Export the average table to CSV or JSON, draw a two-country SVG comparison
//!
//! ### Example
//! ```no_run
//! use rand::SeedableRng;
//! use whg_rs::{aggregate, compare, loader, select, stats, storage};
//!
//! let years = loader::load_years("data", &loader::DEFAULT_YEARS)?;
//! let data = aggregate::build(&years)?;
//! storage::save_csv(&data.by_country, "all_data.csv")?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let target = select::pick_random(&data.by_country, &mut rng)?;
//! let result = compare::evaluate(&data.by_country, "finland", &target)?;
//! println!("{:?}", result.outcome);
//! println!("{:#?}", stats::report("TOTAL", &data.by_country)?);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod game;
pub mod loader;
pub mod models;
pub mod select;
pub mod stats;
pub mod storage;
pub mod viz;

pub use aggregate::{Aggregated, build};
pub use compare::{Comparison, Outcome};
pub use error::WhgError;
pub use models::{AggregatedCountryTable, AggregatedYearTable, CountryRow, YearTable};
pub use select::SelectedCountry;
