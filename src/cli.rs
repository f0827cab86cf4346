use crate::api::{ContainerApi, ContainerClient};
use crate::editor::EditSession;
use crate::model::{ApiConfig, OutcomeRecord, UpdateEvent};
use crate::storage::{self, FileConfig};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const TOKEN_ENV: &str = "CONTAINER_EDIT_TOKEN";

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "container-edit",
    version,
    about = "Edit a remote container's name and labels"
)]
pub struct Cli {
    /// Container id to edit
    pub container_id: String,

    /// New container name
    #[arg(long)]
    pub name: Option<String>,

    /// Add a label (repeatable)
    #[arg(long = "label", value_name = "KEY=VALUE")]
    pub labels: Vec<String>,

    /// Remove a label by key (repeatable)
    #[arg(long = "remove-label", value_name = "KEY")]
    pub remove_labels: Vec<String>,

    /// Base URL for the container management API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token for the management API (defaults to $CONTAINER_EDIT_TOKEN,
    /// then the saved config)
    #[arg(long)]
    pub token: Option<String>,

    /// Request timeout
    #[arg(long, default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Print the outcome as JSON and exit
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and exit (default)
    #[arg(long)]
    pub text: bool,

    /// Persist the resolved base URL and token for later runs
    #[arg(long)]
    pub save_config: bool,
}

/// Resolve the token from flag, environment, then saved config.
fn resolve_token(flag: Option<&str>, env: Option<String>, file: &FileConfig) -> String {
    flag.map(str::to_string)
        .or(env)
        .or_else(|| file.token.clone())
        .unwrap_or_default()
}

/// Build an `ApiConfig` from CLI arguments and saved defaults.
pub fn build_config(args: &Cli, file: &FileConfig) -> ApiConfig {
    let base_url = args
        .base_url
        .clone()
        .or_else(|| file.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let token = resolve_token(
        args.token.as_deref(),
        std::env::var(TOKEN_ENV).ok(),
        file,
    );
    ApiConfig {
        base_url,
        token,
        timeout: Duration::from(args.timeout),
        user_agent: format!("container-edit/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Split a `KEY=VALUE` label flag on the first `=`.
fn parse_label(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("invalid label '{raw}': expected KEY=VALUE");
    };
    if key.trim().is_empty() {
        bail!("invalid label '{raw}': label key is required");
    }
    Ok((key.to_string(), value.to_string()))
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        bail!("--json and --text are mutually exclusive");
    }

    let file_cfg = storage::load_config().unwrap_or_default();
    let cfg = build_config(&args, &file_cfg);

    let (out_tx, out_handle) = spawn_output_writer();

    if args.save_config {
        let saved = storage::save_config(&FileConfig {
            base_url: Some(cfg.base_url.clone()),
            token: Some(cfg.token.clone()),
        })?;
        let _ = out_tx.send(OutputLine::Stderr(format!("Saved: {}", saved.display())));
    }

    let client = ContainerClient::new(&cfg)?;
    let container = client
        .fetch_container(&args.container_id)
        .await
        .context("failed to fetch container")?;
    let container_id = container.id.clone();

    // Stage edits: removals first so a re-added key counts as a value change,
    // not a duplicate.
    let mut session = EditSession::new(container);
    for key in &args.remove_labels {
        session.remove_label(key.trim());
    }
    for raw in &args.labels {
        let (key, value) = parse_label(raw)?;
        session
            .add_label(&key, &value)
            .with_context(|| format!("cannot add label '{raw}'"))?;
    }
    if let Some(name) = &args.name {
        session.set_name(name.clone());
    }
    let change_set = session.change_set();

    // Step progress goes to stderr while the submit runs.
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<UpdateEvent>();
    let progress_tx = out_tx.clone();
    let progress = tokio::spawn(async move {
        while let Some(ev) = evt_rx.recv().await {
            let _ = progress_tx.send(OutputLine::Stderr(ev.to_message()));
        }
    });

    let submit_res =
        crate::orchestrator::submit(&client, &container_id, &change_set, &evt_tx).await;
    drop(evt_tx);
    let _ = progress.await;

    let res = match submit_res {
        Ok(outcome) => {
            let record = OutcomeRecord::new(&cfg.base_url, &container_id, &outcome);
            if args.json {
                let out = serde_json::to_string_pretty(&record)?;
                let _ = out_tx.send(OutputLine::Stdout(out));
            } else {
                let summary = crate::text_summary::build_text_summary(&record);
                for line in summary.lines {
                    let _ = out_tx.send(OutputLine::Stdout(line));
                }
            }
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("container update failed")),
    };

    drop(out_tx);
    let _ = out_handle.await;
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_label_splits_on_first_equals() {
        let (k, v) = parse_label("env=a=b").unwrap();
        assert_eq!(k, "env");
        assert_eq!(v, "a=b");
    }

    #[test]
    fn parse_label_rejects_missing_equals() {
        assert!(parse_label("env").is_err());
    }

    #[test]
    fn parse_label_rejects_empty_key() {
        assert!(parse_label("=value").is_err());
        assert!(parse_label("  =value").is_err());
    }

    #[test]
    fn parse_label_allows_empty_value_until_validation() {
        // Emptiness of the value is the edit session's call, not the parser's.
        let (k, v) = parse_label("env=").unwrap();
        assert_eq!(k, "env");
        assert_eq!(v, "");
    }

    #[test]
    fn token_prefers_flag_then_env_then_file() {
        let file = FileConfig {
            base_url: None,
            token: Some("from-file".into()),
        };
        assert_eq!(
            resolve_token(Some("from-flag"), Some("from-env".into()), &file),
            "from-flag"
        );
        assert_eq!(
            resolve_token(None, Some("from-env".into()), &file),
            "from-env"
        );
        assert_eq!(resolve_token(None, None, &file), "from-file");
        assert_eq!(resolve_token(None, None, &FileConfig::default()), "");
    }

    #[test]
    fn base_url_falls_back_to_file_then_default() {
        let args = Cli::parse_from(["container-edit", "c1"]);
        let file = FileConfig {
            base_url: Some("http://wharf.local:8080".into()),
            token: None,
        };
        assert_eq!(
            build_config(&args, &file).base_url,
            "http://wharf.local:8080"
        );
        assert_eq!(
            build_config(&args, &FileConfig::default()).base_url,
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn flags_accumulate_labels() {
        let args = Cli::parse_from([
            "container-edit",
            "c1",
            "--label",
            "env=prod",
            "--label",
            "tier=backend",
            "--remove-label",
            "stale",
        ]);
        assert_eq!(args.labels.len(), 2);
        assert_eq!(args.remove_labels, vec!["stale"]);
    }
}
