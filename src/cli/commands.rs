//! CLI command implementations
//!
//! `serve` follows a fixed boot sequence: load config, decode fixtures,
//! populate the mirror, build and initialize the admission chain, then
//! serve. Any boot failure ends the process before the first request.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::json;

use crate::admission::Plugins;
use crate::apis::SchemaVersion;
use crate::conversion::Scheme;
use crate::observability::{log_event_with_fields, Event};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{ok_response, read_request, write_json};
use super::server::ApiServer;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a specific command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::Convert { to } => {
            let stdin = io::stdin();
            convert(&to, &mut stdin.lock(), &mut io::stdout())
        }
        Command::Plugins => plugins(&mut io::stdout()),
    }
}

/// Boot and serve requests from stdin until EOF
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("path", &config_path.display().to_string()),
            ("plugins", &config.admission_plugins.join(",")),
            ("storage_version", &config.storage_version),
        ],
    );

    let server = ApiServer::boot(&config)?;

    let stdin = io::stdin();
    server.serve(stdin.lock(), &mut io::stdout())
}

/// Convert one wire object read from `reader` into `to`
pub fn convert<R: BufRead, W: Write>(to: &str, reader: &mut R, writer: &mut W) -> CliResult<()> {
    let target = SchemaVersion::parse(to)
        .ok_or_else(|| CliError::invalid_argument(format!("unknown version '{}'", to)))?;
    let scheme = Scheme::restaurant().map_err(|e| CliError::conversion_failed(e.to_string()))?;

    let object = read_request(reader)?;
    let converted = scheme
        .convert(object, target)
        .map_err(|e| CliError::conversion_failed(format!("{}: {}", e.code(), e)))?;

    write_json(writer, &ok_response(converted))
}

/// List registered plugins and the default chain order
pub fn plugins<W: Write>(writer: &mut W) -> CliResult<()> {
    let registry = Plugins::restaurant().map_err(|e| CliError::boot_failed(e.to_string()))?;
    let default_order = Config::default().admission_plugins;

    write_json(
        writer,
        &ok_response(json!({
            "registered": registry.registered(),
            "default_order": default_order,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Cursor;

    fn output(buf: Vec<u8>) -> Value {
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_convert_v2alpha1_to_v1beta1() {
        let mut input = Cursor::new(
            r#"{"apiVersion":"restaurant.programming-kubernetes.info/v2alpha1","kind":"Pizza","metadata":{"name":"a"},"spec":{"size":"Large","toppings":[{"name":"ham","quantity":1}]}}"#,
        );
        let mut out = Vec::new();
        convert("v1beta1", &mut input, &mut out).unwrap();

        let response = output(out);
        assert_eq!(
            response["data"]["apiVersion"],
            "restaurant.programming-kubernetes.info/v1beta1"
        );
        assert!(response["data"]["spec"].get("size").is_none());
        assert_eq!(response["data"]["spec"]["toppings"][0]["name"], "ham");
    }

    #[test]
    fn test_convert_unknown_target() {
        let mut input = Cursor::new("{}");
        let err = convert("v7", &mut input, &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "PIZZA_CLI_INVALID_ARGUMENT");
    }

    #[test]
    fn test_convert_malformed_object() {
        let mut input = Cursor::new(r#"{"kind":"Pizza"}"#);
        let err = convert("v2alpha1", &mut input, &mut Vec::new()).unwrap_err();
        assert_eq!(err.code_str(), "PIZZA_CLI_CONVERSION_FAILED");
        assert!(err.message().starts_with("CONVERSION_MISSING_TYPE_META"));
    }

    #[test]
    fn test_plugins_lists_registry() {
        let mut out = Vec::new();
        plugins(&mut out).unwrap();

        let response = output(out);
        assert_eq!(response["data"]["registered"], json!(["PizzaSize", "PizzaToppings"]));
        assert_eq!(response["data"]["default_order"], json!(["PizzaSize", "PizzaToppings"]));
    }
}
