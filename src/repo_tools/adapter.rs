use tracing::{debug, info, warn};

use crate::models::{Change, ChangeKind, CommitOutcome, PublishState, RepositoryStatus, UNKNOWN};
use crate::repo_tools::backend::GitBackend;
use crate::repo_tools::classifier::generate_commit_message;
use crate::repo_tools::error::ToolError;

pub const NOTHING_TO_COMMIT: &str = "No changes detected, nothing to commit";

/// Typed view over a [`GitBackend`].
///
/// Owns the backend, and with it the working-directory binding. Every
/// status-dependent call re-queries the backend; nothing is cached.
pub struct GitHelper<B> {
    backend: B,
}

impl<B: GitBackend> GitHelper<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn get_status(&self) -> Result<RepositoryStatus, ToolError> {
        let raw = self.backend.status().await.map_err(ToolError::query("git status"))?;

        let mut changes = Vec::with_capacity(
            raw.modified.len() + raw.added.len() + raw.deleted.len() + raw.renamed.len(),
        );
        changes.extend(raw.modified.iter().map(|p| Change::new(ChangeKind::Modified, p.as_str())));
        changes.extend(raw.added.iter().map(|p| Change::new(ChangeKind::Added, p.as_str())));
        changes.extend(raw.deleted.iter().map(|p| Change::new(ChangeKind::Deleted, p.as_str())));
        changes.extend(raw.renamed.iter().map(|r| Change::renamed(&r.from, &r.to)));

        Ok(RepositoryStatus {
            changes,
            branch: raw.current.unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }

    pub async fn get_diff(&self, file: Option<&str>) -> Result<String, ToolError> {
        self.backend.diff(file).await.map_err(ToolError::query("git diff"))
    }

    pub async fn get_diff_stat(&self) -> Result<String, ToolError> {
        self.backend.diff_stat().await.map_err(ToolError::query("git diff stat"))
    }

    pub fn generate_commit_message(&self, changes: &[Change]) -> String {
        generate_commit_message(changes)
    }

    pub async fn add_all(&self) -> Result<(), ToolError> {
        self.backend.stage_all().await.map_err(ToolError::Stage)
    }

    pub async fn commit(&self, message: &str) -> Result<String, ToolError> {
        let hash = self.backend.commit(message).await.map_err(ToolError::Commit)?;
        Ok(hash.unwrap_or_else(|| UNKNOWN.to_string()))
    }

    pub async fn push(&self) -> Result<(), ToolError> {
        self.backend.push().await.map_err(ToolError::Publish)
    }

    /// Commit everything pending under a generated (or custom) message and
    /// publish it. A clean tree short-circuits before any side effect.
    pub async fn auto_commit(&self, custom_message: Option<&str>) -> Result<CommitOutcome, ToolError> {
        let status = self.get_status().await?;
        if !status.has_changes() {
            debug!("auto-commit skipped: working tree clean");
            return Ok(CommitOutcome {
                success: false,
                message: NOTHING_TO_COMMIT.to_string(),
                commit_hash: None,
                publish: PublishState::Skipped,
            });
        }

        let message = match custom_message.filter(|m| !m.trim().is_empty()) {
            Some(custom) => custom.to_string(),
            None => self.generate_commit_message(&status.changes),
        };

        self.stage_commit_publish(&message, true).await
    }

    /// Stage everything and commit with `message`, pushing when `publish` is set.
    pub async fn commit_all(&self, message: &str, publish: bool) -> Result<CommitOutcome, ToolError> {
        if message.trim().is_empty() {
            return Err(ToolError::Validation("Commit message must not be empty".to_string()));
        }
        self.stage_commit_publish(message, publish).await
    }

    // Stage or commit failures abort; a push failure after the commit only
    // downgrades the outcome to a warning.
    async fn stage_commit_publish(&self, message: &str, publish: bool) -> Result<CommitOutcome, ToolError> {
        self.add_all().await?;
        let commit_hash = self.commit(message).await?;
        info!(hash = %commit_hash, "created commit");

        let publish = if publish {
            match self.push().await {
                Ok(()) => PublishState::Published,
                Err(err) => {
                    warn!(hash = %commit_hash, error = %err, "push failed, keeping local commit");
                    PublishState::Failed(err.to_string())
                }
            }
        } else {
            PublishState::Skipped
        };

        Ok(CommitOutcome {
            success: true,
            message: narrate(message, &publish),
            commit_hash: Some(commit_hash),
            publish,
        })
    }
}

fn narrate(message: &str, publish: &PublishState) -> String {
    match publish {
        PublishState::Published => format!("Committed and pushed: \"{}\"", message),
        PublishState::Failed(_) => {
            format!("Committed locally: \"{}\" (push failed, the local commit is kept)", message)
        }
        PublishState::Skipped => format!("Committed: \"{}\"", message),
    }
}
