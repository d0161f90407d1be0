//! CLI module for pizza-apiserver
//!
//! Provides command-line interface for:
//! - serve: Boot the admission chain and serve JSON requests
//! - convert: Re-encode one object in another version
//! - plugins: List registered admission plugins

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod server;

pub use args::{Cli, Command};
pub use commands::{convert, plugins, run, run_command, serve};
pub use config::{Config, Fixtures};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, read_request, write_json};
pub use server::{ApiServer, RequestError};
