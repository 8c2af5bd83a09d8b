use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use git_mcp_lib::repo_tools::safety::resolve_git;
use git_mcp_lib::repo_tools::{Dispatcher, GitCli, GitHelper, ToolJournal};
use git_mcp_lib::{McpServer, ServerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = ServerConfig::parse();
    init_tracing(&config.log_level);

    if let Err(err) = run(config).await {
        error!("git-mcp-server failed: {err:#}");
        std::process::exit(1);
    }
}

// stdout carries protocol frames, so diagnostics go to stderr.
fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config: ServerConfig) -> Result<()> {
    let git = resolve_git(&config.git_bin)
        .with_context(|| format!("git executable `{}` not found", config.git_bin))?;
    if !config.repo.is_dir() {
        bail!("repository directory {} does not exist", config.repo.display());
    }

    let mut dispatcher = Dispatcher::new(GitHelper::new(GitCli::new(git, config.repo.clone())));
    if let Some(path) = &config.journal {
        let journal = ToolJournal::open(path)
            .with_context(|| format!("cannot open tool journal {}", path.display()))?;
        dispatcher = dispatcher.with_journal(journal);
    }

    info!(repo = %config.repo.display(), version = git_mcp_lib::server::SERVER_VERSION, "git MCP server started");

    let server = McpServer::new(dispatcher);
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("stdio transport failed")?;
    Ok(())
}
