use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::path::PathBuf;
use whg_rs::game::{self, GameOptions};
use whg_rs::{aggregate, loader, storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "whg",
    version,
    about = "World Happiness Game: guess a country that outranks a random pick"
)]
struct Cli {
    /// Directory holding year_<YYYY>.csv files.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    /// Survey years to load, separated by comma or semicolon.
    #[arg(long, default_value = "2019,2020,2021,2022")]
    years: String,
    /// Where to export the averaged table (.csv or .json).
    #[arg(long, default_value = "all_data.csv")]
    export: PathBuf,
    /// Where to write the comparison chart (.svg).
    #[arg(long, default_value = "comparison.svg")]
    plot: PathBuf,
    /// Do not draw the comparison chart.
    #[arg(long, default_value_t = false)]
    no_plot: bool,
    /// Width of the chart.
    #[arg(long, default_value_t = viz::DEFAULT_WIDTH)]
    width: u32,
    /// Height of the chart.
    #[arg(long, default_value_t = viz::DEFAULT_HEIGHT)]
    height: u32,
    /// Seed for the country pick (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_years(s: &str) -> Result<Vec<i32>> {
    s.split([',', ';'])
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<i32>()
                .with_context(|| format!("invalid year '{x}' in --years"))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let years = parse_years(&cli.years)?;
    let tables = loader::load_years(&cli.data_dir, &years)?;
    let data = aggregate::build(&tables)?;
    storage::save(&data.by_country, &cli.export)?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let opts = GameOptions {
        plot: (!cli.no_plot).then_some(cli.plot),
        width: cli.width,
        height: cli.height,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let report = game::run_session(&data, &mut rng, &mut stdin.lock(), &mut stdout.lock(), &opts)?;
    info!(
        "session finished: selected {} (rank {}), outcome {:?}",
        report.selected.country(),
        report.selected.rank(),
        report.comparison.as_ref().map(|c| c.outcome)
    );
    Ok(())
}
