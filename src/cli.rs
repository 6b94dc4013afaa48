use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dripgrid - inspect drip irrigation layouts
#[derive(Parser)]
#[command(name = "dripgrid")]
#[command(about = "Check which irrigation components on a grid layout are connected")]
#[command(version)]
pub struct Cli {
    /// Editor configuration file (JSON). Defaults are used when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every component in the catalog with its ports
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every connection in a saved layout
    Connections {
        /// Layout document to read
        file: PathBuf,
        /// Print connections as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the neighbor ports a placed component connects to
    Targets {
        /// Layout document to read
        file: PathBuf,
        /// Column of the component
        x: i32,
        /// Row of the component
        y: i32,
        /// Only examine this port (e.g. p1)
        #[arg(short, long)]
        port: Option<String>,
    },
    /// Import a layout and report skipped entries and unknown components
    Validate {
        /// Layout document to check
        file: PathBuf,
    },
    /// Write the bundled starter layout
    Seed {
        /// Destination file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
