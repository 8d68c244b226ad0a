//! Formation CLI
//!
//! Preset catalog listing, roster import (CSV), lineup inspection and
//! scripted edits against a directory-backed formation store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formation")]
#[command(version, about = "Team formation board tools", long_about = None)]
struct Cli {
    /// Board configuration file (JSON or YAML); falls back to FORMATION_BOARD_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in presets
    Presets {
        /// Show the slots of one preset
        #[arg(long)]
        slots: Option<String>,
    },

    /// Import a team roster from CSV (id,name,jersey,position)
    ImportRoster {
        /// Store directory
        #[arg(long)]
        store: PathBuf,

        #[arg(long)]
        team: String,

        /// Input CSV file path
        #[arg(long)]
        csv: PathBuf,
    },

    /// Print a team's lineup and bench
    Show {
        #[arg(long)]
        store: PathBuf,

        #[arg(long)]
        team: String,

        /// Print the render model as JSON instead of text
        #[arg(long, default_value = "false")]
        json: bool,

        /// Container width used for pixel positions in JSON output
        #[arg(long, default_value = "1280")]
        width: f32,
    },

    /// Apply a JSON list of edit steps and save the result
    Apply {
        #[arg(long)]
        store: PathBuf,

        #[arg(long)]
        team: String,

        /// Script file path
        #[arg(long)]
        script: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Presets { slots } => match slots {
            Some(name) => print!("{}", formation_cli::describe_preset(&name)?),
            None => print!("{}", formation_cli::list_presets()),
        },

        Commands::ImportRoster { store, team, csv } => {
            println!("Importing roster for {}", team);
            println!("   CSV Input: {}", csv.display());
            println!("   Store:     {}", store.display());

            let stats = formation_cli::import_roster(&store, &team, &csv)?;
            println!(
                "Imported {} of {} rows ({} failed, {} duplicates)",
                stats.imported, stats.total_rows, stats.failed, stats.duplicates
            );
        }

        Commands::Show { store, team, json, width } => {
            let config = formation_cli::load_config(cli.config.as_deref())?;
            let view = formation_cli::board_view(&store, &team, config, width)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", formation_cli::render_text(&view));
            }
        }

        Commands::Apply { store, team, script } => {
            let config = formation_cli::load_config(cli.config.as_deref())?;
            let steps = formation_cli::parse_script(&script)?;
            let report = formation_cli::apply_script(&store, &team, config, &steps)?;

            println!(
                "{} applied, {} unchanged, {} rejected",
                report.applied,
                report.unchanged,
                report.rejected.len()
            );
            for (step, reason) in &report.rejected {
                println!("   step {}: {}", step, reason);
            }
            println!("Status: {:?}", report.status);
        }
    }

    Ok(())
}
