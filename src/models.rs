use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ID = String;

/// Sentinel branch name when git cannot report one (detached HEAD).
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
  Modified,
  Added,
  Deleted,
  Renamed,
}

impl ChangeKind {
  /// Single-letter porcelain symbol.
  pub fn status_code(self) -> char {
    match self {
      ChangeKind::Modified => 'M',
      ChangeKind::Added => 'A',
      ChangeKind::Deleted => 'D',
      ChangeKind::Renamed => 'R',
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      ChangeKind::Modified => "modified",
      ChangeKind::Added => "added",
      ChangeKind::Deleted => "deleted",
      ChangeKind::Renamed => "renamed",
    }
  }

  pub fn symbol(self) -> &'static str {
    match self {
      ChangeKind::Modified => "✏️",
      ChangeKind::Added => "➕",
      ChangeKind::Deleted => "❌",
      ChangeKind::Renamed => "🔀",
    }
  }
}

/// One changed path in the working tree. The status code is derived from the
/// kind, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
  kind: ChangeKind,
  path: String,
  status_code: char,
}

impl Change {
  pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
    Self { kind, path: path.into(), status_code: kind.status_code() }
  }

  pub fn renamed(from: &str, to: &str) -> Self {
    Self::new(ChangeKind::Renamed, format!("{} → {}", from, to))
  }

  pub fn kind(&self) -> ChangeKind {
    self.kind
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn status_code(&self) -> char {
    self.status_code
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryStatus {
  pub changes: Vec<Change>,
  pub branch: String,
}

impl RepositoryStatus {
  pub fn has_changes(&self) -> bool {
    !self.changes.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedPath {
  pub from: String,
  pub to: String,
}

/// Status as reported by the backend, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatus {
  pub modified: Vec<String>,
  pub added: Vec<String>,
  pub deleted: Vec<String>,
  pub renamed: Vec<RenamedPath>,
  pub current: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum PublishState {
  Skipped,
  Published,
  Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
  pub success: bool,
  pub message: String,
  pub commit_hash: Option<String>,
  pub publish: PublishState,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolCallRow {
  pub id: ID,
  pub name: String,
  pub args_json: String,
  pub result_json: String,
  pub is_error: bool,
  pub created_at: String,
}

pub fn new_id() -> ID {
  Uuid::new_v4().to_string()
}
