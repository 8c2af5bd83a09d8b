use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "git-mcp-server", version)]
#[command(about = "MCP tool server: git status, diff, commit and auto-commit over stdio")]
pub struct ServerConfig {
    /// Repository working directory every git command runs in
    #[arg(long, env = "GIT_MCP_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// git executable name or path
    #[arg(long = "git", env = "GIT_MCP_GIT", default_value = "git")]
    pub git_bin: String,

    /// SQLite file recording every tool call (disabled when unset)
    #[arg(long, env = "GIT_MCP_JOURNAL")]
    pub journal: Option<PathBuf>,

    /// Tracing filter directive, e.g. `info` or `git_mcp_lib=debug`
    #[arg(long, env = "GIT_MCP_LOG", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::try_parse_from(["git-mcp-server"]).unwrap();
        assert_eq!(config.git_bin, "git");
        assert!(config.journal.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "git-mcp-server",
            "--repo",
            "/srv/blog",
            "--journal",
            "calls.sqlite",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(config.repo, PathBuf::from("/srv/blog"));
        assert_eq!(config.journal, Some(PathBuf::from("calls.sqlite")));
        assert_eq!(config.log_level, "debug");
    }
}
