//! `radprof`: radial profiles of simulation snapshots against analytical
//! and reference solutions.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use radprof_rs::analysis::{run_plummer, run_stromgren, run_stromgren_hhe};
use radprof_rs::cli::{Cli, Command, PlummerSettings, HHE_BASENAME, MF_BASENAME};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Plummer(args) => {
            let settings = PlummerSettings::from(args);
            let run = run_plummer(&settings).context("Plummer density check failed")?;
            info!("{} density profiles plotted", run.profiles.len());
        }
        Command::Stromgren(args) => {
            let settings = args.settings(MF_BASENAME);
            let outputs = run_stromgren(&settings).with_context(|| {
                format!("Strömgren check failed in {}", settings.dir.display())
            })?;
            info!("{} snapshots plotted", outputs.len());
        }
        Command::StromgrenHhe(args) => {
            let settings = args.settings(HHE_BASENAME);
            let outputs = run_stromgren_hhe(&settings).with_context(|| {
                format!("Strömgren H+He check failed in {}", settings.dir.display())
            })?;
            info!("{} snapshots plotted", outputs.len());
        }
    }

    Ok(())
}
