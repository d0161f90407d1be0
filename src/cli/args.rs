//! CLI argument definitions using clap
//!
//! Commands:
//! - pizza-apiserver serve --config <path>
//! - pizza-apiserver convert --to <version>
//! - pizza-apiserver plugins

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Admission-controlled restaurant API server
#[derive(Parser, Debug)]
#[command(name = "pizza-apiserver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Boot the admission chain and serve JSON requests from stdin
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./pizza-apiserver.json")]
        config: PathBuf,
    },

    /// Convert one object read from stdin into another version
    Convert {
        /// Target version, e.g. v1beta1 or restaurant.programming-kubernetes.info/v2alpha1
        #[arg(long)]
        to: String,
    },

    /// List registered admission plugins
    Plugins,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
