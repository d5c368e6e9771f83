//! `log-operation`: post-execution hook that records each tool call.
//!
//! Reads one JSON event from stdin and appends it to the audit database.
//! Status goes to stderr; the process always exits 0 so a logging problem
//! never blocks the harness.

use anyhow::Context;
use clap::Parser;
use flow_audit::{AuditConfig, AuditLogger};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "log-operation",
    version,
    about = "Record a tool execution in the audit database"
)]
struct Cli {
    /// SQLite database path (overrides CLAUDE_FLOW_DB)
    #[arg(long = "db")]
    db_path: Option<PathBuf>,

    /// User id stamped on the record (overrides CLAUDE_FLOW_USER_ID)
    #[arg(long)]
    user_id: Option<String>,

    /// Project id stamped on the record (overrides CLAUDE_FLOW_PROJECT_ID)
    #[arg(long)]
    project_id: Option<String>,
}

impl Cli {
    fn into_config(self) -> AuditConfig {
        let mut config = AuditConfig::from_env();
        if let Some(db_path) = self.db_path {
            config.db_path = db_path;
        }
        if self.user_id.is_some() {
            config.user_id = self.user_id;
        }
        if self.project_id.is_some() {
            config.project_id = self.project_id;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version land here too.
            let _ = err.print();
            return;
        }
    };

    let logger = AuditLogger::new(cli.into_config());
    tracing::debug!(db = %logger.config().db_path.display(), "Audit hook started");

    let payload = match read_payload().await {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("[AUDIT] Error: {:#}", err);
            return;
        }
    };

    if let Some(line) = logger.handle(&payload).await.status_line() {
        eprintln!("{}", line);
    }
}

async fn read_payload() -> anyhow::Result<String> {
    let mut payload = String::new();
    tokio::io::stdin()
        .read_to_string(&mut payload)
        .await
        .context("failed to read hook input")?;
    Ok(payload)
}
