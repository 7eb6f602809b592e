//! Mensura command line
//!
//! Two modes:
//! - One-shot: `mensura 10 kg to lb` prints "22.0462 lb"
//! - Line protocol: with no arguments, reads one JSON request per line from
//!   stdin and writes one JSON response per line to stdout
//!
//! Ops: parse, convert, add, subtract, compare, scale, divide, format,
//! humanize, simplify, evaluate, units, ping
//!
//! Logs go to stderr, filtered by RUST_LOG (default "info").

mod config;
mod handlers;

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use mensura_core::MensuraError;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use crate::config::Config;
use crate::handlers::{Handler, Request, Response};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    init_logging();

    let config = Config::from_env();
    let handler = Handler::new(config);

    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        return one_shot(&handler, &args.join(" "));
    }

    info!(version = VERSION, ?config, "mensura started, waiting for requests");
    match serve(&handler, io::stdin().lock(), io::stdout()) {
        Ok(()) => {
            info!("input closed, shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("i/o failure: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn one_shot(handler: &Handler, expression: &str) -> ExitCode {
    match handler.evaluate(expression) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Answer each non-blank input line with one response line
fn serve(handler: &Handler, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(bytes = line.len(), "received request");
        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let response = handler.handle(&request);
                if let Some(ref e) = response.error {
                    warn!(op = %request.op, code = %e.code, "request rejected: {}", e.message);
                }
                response
            }
            Err(e) => {
                warn!("malformed request: {}", e);
                Response::err(None, MensuraError::validation_error(format!("malformed request: {}", e)))
            }
        };

        let encoded = serde_json::to_string(&response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(output, "{}", encoded)?;
        output.flush()?;
    }
    Ok(())
}
