//! Console game session: pick a country, let the player guess a better one,
//! show the comparison, then answer one statistics query.
//!
//! Input and output are generic so the whole session can run against
//! in-memory buffers.

use crate::aggregate::Aggregated;
use crate::compare::{self, Comparison, Outcome};
use crate::error::WhgError;
use crate::models::{AggregatedCountryTable, COUNTRY_COLUMN, CountryRow, RANK, TOTAL};
use crate::select::{self, SelectedCountry};
use crate::stats::{self, StatsSummary};
use crate::viz;
use anyhow::Result;
use log::{debug, warn};
use rand::Rng;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const INTRO: &str = "\
********** WORLD HAPPINESS GAME **********

The World Happiness Game combines data from the World Happiness Report and
creates a guessing game to test your knowledge of the world. Good luck!

Instructions:
1. One country will be chosen at random.
2. The goal of the game is to pick a country with a higher World Happiness
   Score than the chosen country.
3. If you pick a country that is ranked higher than the chosen country, you win!

Example:
1. The program picks 'ALBANIA', which has a mean rank over the survey years.
2. Your goal is to pick a country that you think ranks higher than ALBANIA.
3. If you choose FINLAND, you win.
";

/// Presentation settings for one session.
#[derive(Debug, Clone)]
pub struct GameOptions {
    /// Where to write the comparison chart; `None` skips it.
    pub plot: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            plot: Some(PathBuf::from("comparison.svg")),
            width: viz::DEFAULT_WIDTH,
            height: viz::DEFAULT_HEIGHT,
        }
    }
}

/// What happened in a session. Fields are `None` when input ended early.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub selected: SelectedCountry,
    pub comparison: Option<Comparison>,
    pub stats: Option<StatsSummary>,
}

/// Ask until `validate` accepts the trimmed answer.
///
/// Rejected answers print `retry_msg` and ask again. Returns `Ok(None)` at end
/// of input.
pub fn prompt_until<R, W, T, F>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    retry_msg: &str,
    mut validate: F,
) -> std::io::Result<Option<T>>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<T, WhgError>,
{
    let mut line = String::new();
    loop {
        write!(out, "{prompt}")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }
        match validate(line.trim()) {
            Ok(v) => return Ok(Some(v)),
            Err(e) => {
                debug!("rejected input: {e}");
                writeln!(out, "\n{retry_msg}")?;
            }
        }
    }
}

/// Run one full game over already aggregated data.
pub fn run_session<R, W, G>(
    data: &Aggregated,
    rng: &mut G,
    input: &mut R,
    out: &mut W,
    opts: &GameOptions,
) -> Result<SessionReport>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let table = &data.by_country;
    let selected = select::pick_random(table, rng)?;

    writeln!(out, "\n{INTRO}")?;

    let prompt = format!(
        "\nPlease guess a country that has a higher overall World Happiness Ranking than {}: ",
        selected.country()
    );
    let comparison = prompt_until(input, out, &prompt, "Please enter a valid country name.", |s| {
        compare::evaluate(table, s, &selected)
    })?;
    let Some(comparison) = comparison else {
        writeln!(out, "\nThanks for playing!")?;
        return Ok(SessionReport {
            selected,
            comparison: None,
            stats: None,
        });
    };

    match comparison.outcome {
        Outcome::Win => writeln!(out, "\nCongratulations! You win!\n")?,
        Outcome::Lose => writeln!(out, "\nNice try, but you lose :(\n")?,
    }
    writeln!(
        out,
        "Please see the table below for a comparison of all categories for these 2 countries.\n"
    )?;
    write!(out, "{}", format_rows(table, &[&comparison.chosen, &comparison.selected]))?;

    if let Some(path) = opts.plot.as_ref() {
        match viz::plot_comparison(table, &comparison, path, opts.width, opts.height) {
            Ok(()) => writeln!(out, "\nThe comparison chart was saved to {}", path.display())?,
            Err(e) => warn!("could not draw comparison chart: {e:#}"),
        }
    }

    writeln!(
        out,
        "\nPlease select a category from the below to see who ranks the highest and lowest in the category:\n"
    )?;
    for name in table.field_names() {
        writeln!(out, "{name}")?;
    }
    let summary = prompt_until(
        input,
        out,
        "\nEnter category: ",
        "Please enter a valid category name.",
        |s| stats::report(s, table),
    )?;
    if let Some(summary) = summary.as_ref() {
        write!(out, "{}", format_stats(summary))?;
    }

    writeln!(out, "\nThanks for playing!")?;
    Ok(SessionReport {
        selected,
        comparison: Some(comparison),
        stats: summary,
    })
}

/// Fixed-width table of whole rows: country, rank, total, then every indicator.
/// Missing values print as `NA`.
pub fn format_rows(table: &AggregatedCountryTable, rows: &[&CountryRow]) -> String {
    let name_w = rows
        .iter()
        .map(|r| r.country.chars().count())
        .chain(std::iter::once(COUNTRY_COLUMN.chars().count()))
        .max()
        .unwrap_or(0);
    // widths count chars, as the format width does
    let col_w: Vec<usize> = table
        .indicators
        .iter()
        .map(|n| n.chars().count().max(8))
        .collect();

    let mut s = format!("{COUNTRY_COLUMN:<name_w$}  {RANK:>5}  {TOTAL:>8}");
    for (name, &w) in table.indicators.iter().zip(&col_w) {
        s.push_str(&format!("  {name:>w$}"));
    }
    s.push('\n');
    for r in rows {
        s.push_str(&format!(
            "{:<name_w$}  {:>5}  {:>8.3}",
            r.country, r.rank, r.total
        ));
        for (v, &w) in r.values.iter().zip(&col_w) {
            match v {
                Some(v) => s.push_str(&format!("  {v:>w$.3}")),
                None => s.push_str(&format!("  {:>w$}", "NA")),
            }
        }
        s.push('\n');
    }
    s
}

/// Top/bottom lists and the mean/min/max block for one category.
pub fn format_stats(summary: &StatsSummary) -> String {
    let field = &summary.field;
    let mut s = format!("\nThe highest ranked countries for {field} are:\n\n");
    for st in &summary.top {
        s.push_str(&format!("{:<32} {:>10.3}\n", st.country, st.value));
    }
    s.push_str(&format!("\nThe lowest ranked countries for {field} are:\n\n"));
    for st in &summary.bottom {
        s.push_str(&format!("{:<32} {:>10.3}\n", st.country, st.value));
    }
    s.push_str(&format!("\nThe mean, min, and max for the category {field} are:\n\n"));
    s.push_str(&format!("mean {:>10.3}\n", summary.mean));
    s.push_str(&format!("min  {:>10.3}\n", summary.min));
    s.push_str(&format!("max  {:>10.3}\n", summary.max));
    s
}
