use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wattscope::data::{filter_year, Metric, RecordStore};
use wattscope::error::Result;
use wattscope::stats;
use wattscope::utils::{fmt_opt, fmt_thousands};

#[derive(Parser)]
#[command(name = "wattscope", about = "Energy consumption dashboard and analysis tool")]
pub struct Cli {
    /// Dataset to open on startup (GUI mode)
    #[arg(long)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a summary of the dataset for one year
    Summary {
        /// Path to the energy CSV file
        file: PathBuf,

        /// Year to summarize. Defaults to the latest year in the dataset.
        #[arg(short, long)]
        year: Option<i32>,

        /// Restrict to a region (e.g. "Europe")
        #[arg(short, long)]
        region: Option<String>,
    },
    /// Print the metric correlation matrix for one year
    Correlate {
        /// Path to the energy CSV file
        file: PathBuf,

        /// Year to correlate over. Defaults to the latest year.
        #[arg(short, long)]
        year: Option<i32>,

        /// Restrict to a region (e.g. "Asia")
        #[arg(short, long)]
        region: Option<String>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Summary { file, year, region } => handle_summary(&file, year, region.as_deref()),
        Commands::Correlate { file, year, region } => {
            handle_correlate(&file, year, region.as_deref())
        }
    }
}

fn handle_summary(file: &PathBuf, year: Option<i32>, region: Option<&str>) -> Result<()> {
    let store = RecordStore::load(file)?;
    let year = year.unwrap_or_else(|| store.max_year());
    let working = store.working_set(region);
    let slice = filter_year(&working, year);

    let scope = region.unwrap_or("All Regions");
    println!("Summary for {year} ({scope})");
    println!("  records: {}", slice.len());

    println!(
        "  {:<14} {:>10} {:>10} {:>10} {:>10}",
        "metric", "mean", "q1", "median", "q3"
    );
    for metric in Metric::ALL {
        let values: Vec<f64> = slice.iter().filter_map(|r| metric.value(r)).collect();
        let qs = stats::quantiles(&values, &[0.25, 0.5, 0.75]).ok();
        let q = |i: usize| fmt_opt(qs.as_ref().map(|qs| qs[i]), 1);
        println!(
            "  {:<14} {:>10} {:>10} {:>10} {:>10}",
            metric.short_label(),
            fmt_opt(stats::mean(&values), 1),
            q(0),
            q(1),
            q(2)
        );
    }

    let unique = stats::latest_per_entity(
        slice.iter().copied(),
        |r| r.country.clone(),
        |r| r.total_twh,
    );
    let valid: Vec<_> = unique
        .into_iter()
        .filter(|r| r.total_twh.is_some())
        .collect();
    println!("  top consumers:");
    for r in stats::top_n(&valid, |r| r.total_twh.unwrap_or(f64::MIN), 5) {
        println!(
            "    {:<24} {} TWh",
            r.country,
            fmt_thousands(r.total_twh.unwrap_or(0.0))
        );
    }
    Ok(())
}

fn handle_correlate(file: &PathBuf, year: Option<i32>, region: Option<&str>) -> Result<()> {
    let store = RecordStore::load(file)?;
    let year = year.unwrap_or_else(|| store.max_year());
    let working = store.working_set(region);
    let slice = filter_year(&working, year);

    let cells = stats::correlation_matrix(&slice, &Metric::ALL);
    let n = Metric::ALL.len();

    println!(
        "Correlation matrix for {year} ({})",
        region.unwrap_or("All Regions")
    );
    print!("{:<14}", "");
    for metric in Metric::ALL {
        print!("{:>14}", metric.short_label());
    }
    println!();
    for (row, y) in Metric::ALL.iter().enumerate() {
        print!("{:<14}", y.short_label());
        for col in 0..n {
            print!("{:>14.2}", cells[row * n + col].value);
        }
        println!();
    }
    Ok(())
}
