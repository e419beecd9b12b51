// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use clap::Parser;

use pruntime_console::commands::{self, Command, Console};
use pruntime_console::config::{
    ConfigError, EndpointConfig, OutputFormat, DEFAULT_PRUNTIME_ENDPOINT,
    DEFAULT_SUBSTRATE_WS_ENDPOINT, JSON_OUTPUT_ENV, PRUNTIME_ENDPOINT_ENV,
    SUBSTRATE_WS_ENDPOINT_ENV,
};
use pruntime_console::error::ConsoleError;
use pruntime_console::logging;

/// Operator console for pRuntime confidential contracts
#[derive(Debug, Parser)]
#[command(name = "pruntime-console", version, about)]
struct Cli {
    /// pRuntime HTTP API endpoint
    #[arg(
        long,
        global = true,
        env = PRUNTIME_ENDPOINT_ENV,
        default_value = DEFAULT_PRUNTIME_ENDPOINT
    )]
    pruntime_endpoint: String,

    /// Substrate node websocket endpoint
    #[arg(
        long,
        global = true,
        env = SUBSTRATE_WS_ENDPOINT_ENV,
        default_value = DEFAULT_SUBSTRATE_WS_ENDPOINT
    )]
    substrate_ws_endpoint: String,

    /// Print results as JSON
    #[arg(long, global = true, env = JSON_OUTPUT_ENV)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Output format of the resolved config, or of the `--json` flag when the
/// config itself is invalid.
fn output_format(config: &Result<EndpointConfig, ConfigError>, json: bool) -> OutputFormat {
    config
        .as_ref()
        .map(EndpointConfig::output)
        .unwrap_or_else(|_| OutputFormat::from_json_flag(json))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    let config = EndpointConfig::new(&cli.pruntime_endpoint, &cli.substrate_ws_endpoint, cli.json);
    let format = output_format(&config, cli.json);

    let result = match config.map_err(ConsoleError::from).and_then(Console::new) {
        Ok(console) => console.execute(cli.command).await,
        Err(e) => Err(e),
    };

    let code = commands::finish(
        &result,
        format,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );
    std::process::exit(code);
}
