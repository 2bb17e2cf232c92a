//! Line-oriented session over stdin/stdout.

use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::catalog::SharedEngine;
use crate::cli::script::{self, Response};
use crate::config::Config;

/// Read one JSON operation per line and answer each with one JSON line
pub fn cmd_session(config: &Config) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(config, stdin.lock(), stdout.lock())
}

fn run_session(config: &Config, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    let engine = SharedEngine::with_config(config);
    info!("Session started");

    let mut handled = 0usize;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match script::parse(&line) {
            Ok(request) => {
                debug!("Request: {:?}", request);
                engine.write(|e| script::apply(e, request))
            }
            Err(e) => Response::from(e),
        };
        writeln!(output, "{}", serde_json::to_string(&response)?)?;
        output.flush()?;
        handled += 1;
    }

    info!("Session closed after {} requests", handled);
    Ok(())
}
