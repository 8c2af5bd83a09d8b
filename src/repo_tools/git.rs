use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::models::{RawStatus, RenamedPath};
use crate::repo_tools::backend::GitBackend;
use crate::repo_tools::safety::{safe_spawn, BackendError};

// -uall lists files inside new directories instead of collapsing them to `dir/`.
const STATUS_ARGS: [&str; 5] = ["status", "--porcelain=v1", "-b", "-z", "-uall"];

/// `GitBackend` over the git executable, bound to one working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    git: PathBuf,
    repo_path: PathBuf,
}

impl GitCli {
    pub fn new(git: impl Into<PathBuf>, repo_path: impl Into<PathBuf>) -> Self {
        Self { git: git.into(), repo_path: repo_path.into() }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    async fn run(&self, args: &[&str]) -> Result<String, BackendError> {
        safe_spawn(&self.git, args, &self.repo_path).await
    }
}

#[async_trait]
impl GitBackend for GitCli {
    async fn status(&self) -> Result<RawStatus, BackendError> {
        let stdout = self.run(&STATUS_ARGS).await?;
        Ok(parse_porcelain(&stdout))
    }

    async fn diff(&self, file: Option<&str>) -> Result<String, BackendError> {
        match file {
            Some(file) => self.run(&["diff", "--", file]).await,
            None => self.run(&["diff"]).await,
        }
    }

    async fn diff_stat(&self) -> Result<String, BackendError> {
        self.run(&["diff", "--stat"]).await
    }

    async fn stage_all(&self) -> Result<(), BackendError> {
        self.run(&["add", "-A"]).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> Result<Option<String>, BackendError> {
        let stdout = self.run(&["commit", "-m", message]).await?;
        Ok(parse_commit_hash(&stdout))
    }

    async fn push(&self) -> Result<(), BackendError> {
        self.run(&["push"]).await.map(|_| ())
    }
}

/// Parse `git status --porcelain=v1 -b -z` output.
pub fn parse_porcelain(output: &str) -> RawStatus {
    let mut status = RawStatus::default();
    let mut fields = output.split('\0').filter(|f| !f.is_empty());

    while let Some(entry) = fields.next() {
        if let Some(header) = entry.strip_prefix("## ") {
            status.current = parse_branch_header(header);
            continue;
        }

        let (Some(xy), Some(path)) = (entry.get(..2), entry.get(3..)) else {
            continue;
        };
        let mut codes = xy.chars();
        let x = codes.next().unwrap_or(' ');
        let y = codes.next().unwrap_or(' ');
        let path = path.to_string();

        match (x, y) {
            ('?', '?') => status.added.push(path),
            ('!', '!') => {}
            _ if x == 'R' || y == 'R' => {
                // -z puts the source path in the following field
                let from = fields.next().unwrap_or_default().to_string();
                status.renamed.push(RenamedPath { from, to: path });
            }
            ('C', _) => {
                fields.next();
                status.added.push(path);
            }
            _ if x == 'D' || y == 'D' => status.deleted.push(path),
            ('A', _) => status.added.push(path),
            _ => status.modified.push(path),
        }
    }

    status
}

fn parse_branch_header(header: &str) -> Option<String> {
    let header = header.trim();
    if let Some(name) = header
        .strip_prefix("No commits yet on ")
        .or_else(|| header.strip_prefix("Initial commit on "))
    {
        return Some(name.trim().to_string());
    }
    if header.starts_with("HEAD (no branch)") {
        return None;
    }

    let name = header.split("...").next().unwrap_or(header);
    let name = name.split(" [").next().unwrap_or(name).trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Pull the abbreviated hash out of `[main (root-commit) 1a2b3c4] subject`.
pub fn parse_commit_hash(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let inner = line.trim().strip_prefix('[')?;
        let end = inner.find(']')?;
        let hash = inner[..end].split_whitespace().last()?;
        hash.chars()
            .all(|c| c.is_ascii_hexdigit())
            .then(|| hash.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_branch_and_entries_in_backend_groups() {
        let out = "## main...origin/main [ahead 1]\0 M notes/a.md\0A  src/b.ts\0?? new.txt\0 D gone.css\0R  to.md\0from.md\0";
        let status = parse_porcelain(out);

        assert_eq!(status.current.as_deref(), Some("main"));
        assert_eq!(status.modified, vec!["notes/a.md"]);
        assert_eq!(status.added, vec!["src/b.ts", "new.txt"]);
        assert_eq!(status.deleted, vec!["gone.css"]);
        assert_eq!(
            status.renamed,
            vec![RenamedPath { from: "from.md".into(), to: "to.md".into() }]
        );
    }

    #[test]
    fn status_lists_untracked_files_individually() {
        assert!(STATUS_ARGS.contains(&"-uall"));
    }

    #[test]
    fn new_file_in_new_directory_keeps_its_path() {
        let status = parse_porcelain("## master\0 M notes/a.md\0?? src/b.ts\0");
        assert_eq!(status.modified, vec!["notes/a.md"]);
        assert_eq!(status.added, vec!["src/b.ts"]);
    }

    #[test]
    fn paths_with_spaces_survive() {
        let status = parse_porcelain("## dev\0 M docs/my notes.md\0");
        assert_eq!(status.current.as_deref(), Some("dev"));
        assert_eq!(status.modified, vec!["docs/my notes.md"]);
    }

    #[test]
    fn mixed_index_and_worktree_codes() {
        let status = parse_porcelain("## main\0AM both.rs\0MM twice.rs\0UU conflict.rs\0!! ignored.log\0");
        assert_eq!(status.added, vec!["both.rs"]);
        assert_eq!(status.modified, vec!["twice.rs", "conflict.rs"]);
        assert!(status.deleted.is_empty());
    }

    #[test]
    fn branch_headers() {
        assert_eq!(parse_branch_header("No commits yet on trunk").as_deref(), Some("trunk"));
        assert_eq!(parse_branch_header("feature/x"), Some("feature/x".to_string()));
        assert_eq!(parse_branch_header("main...origin/main [behind 2]").as_deref(), Some("main"));
        assert_eq!(parse_branch_header("HEAD (no branch)"), None);
    }

    #[test]
    fn commit_hash_from_summary_line() {
        let out = "[main 1a2b3c4] fix typo\n 1 file changed, 1 insertion(+)\n";
        assert_eq!(parse_commit_hash(out).as_deref(), Some("1a2b3c4"));

        let root = "[master (root-commit) deadbee] first\n";
        assert_eq!(parse_commit_hash(root).as_deref(), Some("deadbee"));

        assert_eq!(parse_commit_hash("nothing here"), None);
    }
}
