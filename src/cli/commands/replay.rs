//! Script replay command.

use std::path::Path;
use tracing::{info, warn};

use crate::catalog::Engine;
use crate::cli::script;
use crate::config::Config;
use crate::error::ResultExt;

/// Apply every operation in `path` to a fresh engine and print the responses
pub fn cmd_replay(
    config: &Config,
    path: &Path,
    pretty: bool,
    with_snapshot: bool,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(format!("reading script {}", path.display()))?;
    let requests = script::parse_script(&text)
        .with_context(format!("parsing script {}", path.display()))?;
    info!("Replaying {} operations from {:?}", requests.len(), path);

    let mut engine = Engine::with_config(config);
    let mut failures = 0;
    for (step, request) in requests.into_iter().enumerate() {
        let response = script::apply(&mut engine, request);
        if !response.is_ok() {
            failures += 1;
            warn!("Step {} did not succeed: {:?}", step, response);
        }
        print_json(&response, pretty)?;
    }

    if with_snapshot {
        print_json(&engine.snapshot(), pretty)?;
    }
    info!("Replay finished, {} operations not applied", failures);
    Ok(())
}

fn print_json(value: &impl serde::Serialize, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_missing_file() {
        let err = cmd_replay(&Config::default(), Path::new("/nonexistent/script.json"), false, true)
            .unwrap_err();
        assert!(err.to_string().contains("reading script"));
    }

    #[test]
    fn test_replay_runs_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(
            &path,
            r#"[{"op": "add", "title": "a", "artist": "x", "duration": 5}, {"op": "undo"}]"#,
        )
        .unwrap();
        cmd_replay(&Config::default(), &path, true, false).unwrap();
    }

    #[test]
    fn test_replay_malformed_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, r#"{"op": "add"}"#).unwrap();
        let err = cmd_replay(&Config::default(), &path, false, false).unwrap_err();
        assert!(err.to_string().contains("parsing script"));
    }
}
