// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use shelter_lib::io::{load_input, write_result};
use shelter_lib::optimize_all_radii;
use shelter_lib::utils::env::load_env;
use shelter_lib::utils::get_memory_usage;
use shelter_lib::utils::optimizer_config::OptimizerConfig;
use shelter_lib::utils::progress_config::ProgressConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON document with `demand_points` and optional `facilities`
    #[arg(long)]
    input: PathBuf,

    /// Directory receiving one result file per radius
    #[arg(long, default_value = "data/optimal_locations")]
    output_dir: PathBuf,

    /// Comma-separated radii in meters, overriding SHELTER_RADII_METERS
    #[arg(long, value_delimiter = ',')]
    radii: Option<Vec<f64>>,

    /// Treat planned facilities as active
    #[arg(long)]
    include_planned: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    load_env();
    let args = Args::parse();
    let start_time = Instant::now();

    let mut config = OptimizerConfig::from_env();
    if let Some(radii) = args.radii {
        config.radii_m = radii;
    }
    if args.include_planned {
        config.include_planned = true;
    }
    config.validate().context("Invalid optimizer configuration")?;
    config.log_config();

    let progress_config = ProgressConfig::from_env();
    // Generator bars are the only bars, so they need the detailed setting too.
    let multi_progress = if progress_config.should_show_detailed() {
        progress_config.create_multi_progress()
    } else {
        None
    };

    let input = load_input(&args.input)?;
    let demand = input.demand();
    let results = optimize_all_radii(demand, input.facilities, config, multi_progress).await;

    let mut written = 0;
    let mut failed = 0;
    for (radius_m, result) in results {
        match result {
            Ok(result) => match write_result(&args.output_dir, &result) {
                Ok(path) => {
                    info!(
                        "💾 {}m: {} sites, {:.2}% coverage -> {}",
                        radius_m,
                        result.statistics.sites_selected,
                        result.statistics.coverage_percentage,
                        path.display()
                    );
                    written += 1;
                }
                Err(e) => {
                    error!("Failed to write result for {}m: {:#}", radius_m, e);
                    failed += 1;
                }
            },
            Err(e) => {
                error!("Optimization for {}m failed: {:#}", radius_m, e);
                failed += 1;
            }
        }
    }

    if progress_config.should_show_memory() {
        info!("Memory usage: {} MB", get_memory_usage().await);
    }
    if failed > 0 {
        warn!("{} radii failed; see errors above", failed);
    }
    info!(
        "🏁 Shelter optimization finished in {:.2?}: {} result files written to {}",
        start_time.elapsed(),
        written,
        args.output_dir.display()
    );
    Ok(())
}
