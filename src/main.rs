use anyhow::Result;
use clap::{Parser, Subcommand};
use millpath::{generate_file, init_config, init_logging, load_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "millpath", version)]
#[command(about = "Turns 2D shape descriptions into multi-pass G-code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a program from a JSON shape document
    Generate {
        /// Input shape document (.json)
        input: PathBuf,
        /// Configuration file (.toml or .json); defaults to the platform config path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output program file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a default configuration file
    InitConfig {
        /// Destination path (.toml or .json)
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let report = generate_file(&input, &config, output.as_deref())?;
            for skipped in &report.skipped {
                eprintln!("skipped {}: {}", skipped.name, skipped.reason);
            }
        }
        Commands::InitConfig { path } => {
            let path = init_config(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
