pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "header-gate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reverse-proxy middleware that rejects requests missing a required header", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Validate a plugin configuration file")]
    Check {
        #[arg(help = "Path to a YAML or JSON config file")]
        config: PathBuf,
    },
    #[command(about = "List the pods backing the configured service")]
    Pods {
        #[arg(help = "Path to a YAML or JSON config file")]
        config: PathBuf,

        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Repeat every N seconds until Ctrl+C"
        )]
        interval: Option<u64>,
    },
}
