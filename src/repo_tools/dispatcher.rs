use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{CommitOutcome, PublishState, RepositoryStatus, UNKNOWN};
use crate::protocol::{ToolDescriptor, ToolRequest, ToolResponse};
use crate::repo_tools::adapter::GitHelper;
use crate::repo_tools::backend::GitBackend;
use crate::repo_tools::error::ToolError;
use crate::repo_tools::logging::ToolJournal;
use crate::repo_tools::safety::check_relative_path;
use crate::repo_tools::schemas::{auto_commit_schema, commit_schema, diff_schema, status_schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolHandler {
    Status,
    AutoCommit,
    Commit,
    Diff,
}

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: fn() -> Value,
    pub handler: ToolHandler,
}

/// Single source for both `tools/list` and routing.
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn builtin() -> Self {
        let tools = vec![
            ToolSpec {
                name: "status",
                description: "Check git status and list every pending change in the working tree",
                input_schema: status_schema,
                handler: ToolHandler::Status,
            },
            ToolSpec {
                name: "auto_commit",
                description: "Detect changes, generate a commit message, commit and push to the remote",
                input_schema: auto_commit_schema,
                handler: ToolHandler::AutoCommit,
            },
            ToolSpec {
                name: "commit",
                description: "Commit all current changes with the given message",
                input_schema: commit_schema,
                handler: ToolHandler::Commit,
            },
            ToolSpec {
                name: "diff",
                description: "Show the working-tree diff, for one file or the whole tree",
                input_schema: diff_schema,
                handler: ToolHandler::Diff,
            },
        ];
        Self { tools }
    }

    /// Exact name match only.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|t| ToolDescriptor {
                name: t.name,
                description: t.description,
                input_schema: (t.input_schema)(),
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct StatusArgs {}

#[derive(Debug, Default, Deserialize)]
struct AutoCommitArgs {
    custom_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitArgs {
    #[serde(default)]
    message: Option<String>,
    #[serde(default = "default_push")]
    push: bool,
}

impl Default for CommitArgs {
    fn default() -> Self {
        Self { message: None, push: default_push() }
    }
}

fn default_push() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct DiffArgs {
    file: Option<String>,
}

pub struct Dispatcher<B> {
    helper: GitHelper<B>,
    registry: ToolRegistry,
    journal: Option<ToolJournal>,
}

impl<B: GitBackend> Dispatcher<B> {
    pub fn new(helper: GitHelper<B>) -> Self {
        Self { helper, registry: ToolRegistry::builtin(), journal: None }
    }

    pub fn with_journal(mut self, journal: ToolJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn helper(&self) -> &GitHelper<B> {
        &self.helper
    }

    pub fn journal(&self) -> Option<&ToolJournal> {
        self.journal.as_ref()
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Run one tool call. Never fails: errors become `isError` responses.
    pub async fn dispatch(&self, request: &ToolRequest) -> ToolResponse {
        debug!(tool = %request.name, "tool call received");

        let response = match self.invoke(&request.name, request.arguments.as_ref()).await {
            Ok(text) => ToolResponse::text(text),
            Err(err) => {
                warn!(tool = %request.name, kind = ?err.kind(), error = %err, "tool call failed");
                ToolResponse::error(format!("❌ Operation failed: {}", err))
            }
        };

        if let Some(journal) = &self.journal {
            let args = request.arguments.clone().unwrap_or(Value::Null);
            if let Err(err) = journal.log_tool_call(&request.name, &args, &response) {
                warn!(tool = %request.name, error = %err, "failed to journal tool call");
            }
        }

        response
    }

    /// Route to a handler and return its text, or the typed failure.
    pub async fn invoke(&self, name: &str, args: Option<&Value>) -> Result<String, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        match tool.handler {
            ToolHandler::Status => {
                parse_args::<StatusArgs>(args)?;
                self.handle_status().await
            }
            ToolHandler::AutoCommit => self.handle_auto_commit(parse_args(args)?).await,
            ToolHandler::Commit => self.handle_commit(parse_args(args)?).await,
            ToolHandler::Diff => self.handle_diff(parse_args(args)?).await,
        }
    }

    async fn handle_status(&self) -> Result<String, ToolError> {
        let status = self.helper.get_status().await?;
        if !status.has_changes() {
            return Ok("📝 Working tree clean, no changes detected".to_string());
        }
        let diff_stat = self.helper.get_diff_stat().await?;
        Ok(format_status(&status, &diff_stat))
    }

    async fn handle_auto_commit(&self, args: AutoCommitArgs) -> Result<String, ToolError> {
        let outcome = self.helper.auto_commit(args.custom_message.as_deref()).await?;
        if !outcome.success {
            return Ok(format!("📝 {}", outcome.message));
        }
        Ok(format_commit("🎉 Auto-commit succeeded!", &outcome))
    }

    async fn handle_commit(&self, args: CommitArgs) -> Result<String, ToolError> {
        let message = args.message.unwrap_or_default();
        let outcome = self.helper.commit_all(&message, args.push).await?;
        Ok(format_commit("✅ Commit succeeded!", &outcome))
    }

    async fn handle_diff(&self, args: DiffArgs) -> Result<String, ToolError> {
        let file = match args.file.as_deref().filter(|f| !f.trim().is_empty()) {
            Some(file) => {
                let clean = check_relative_path(file).map_err(|e| ToolError::Validation(e.to_string()))?;
                (!clean.is_empty()).then_some(clean)
            }
            None => None,
        };

        let diff = self.helper.get_diff(file.as_deref()).await?;
        Ok(format_diff(file.as_deref(), &diff))
    }
}

fn parse_args<T: DeserializeOwned + Default>(args: Option<&Value>) -> Result<T, ToolError> {
    match args {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| ToolError::Validation(format!("Invalid arguments: {}", e))),
        Some(_) => Err(ToolError::Validation("Tool arguments must be a JSON object".to_string())),
    }
}

fn format_status(status: &RepositoryStatus, diff_stat: &str) -> String {
    let change_summary = status
        .changes
        .iter()
        .map(|c| format!("{} {} ({})", c.kind().symbol(), c.path(), c.kind().label()))
        .collect::<Vec<_>>()
        .join("\n");

    let diff_stat = if diff_stat.trim().is_empty() {
        "(no unstaged line changes)"
    } else {
        diff_stat.trim_end()
    };

    format!(
        "📋 Git status\n\nBranch: {}\n\n📁 Changed files:\n{}\n\n📊 Diff stat:\n{}",
        status.branch, change_summary, diff_stat
    )
}

fn format_commit(title: &str, outcome: &CommitOutcome) -> String {
    let hash = outcome.commit_hash.as_deref().unwrap_or(UNKNOWN);
    let publish_line = match &outcome.publish {
        PublishState::Published => "\n✅ Pushed to remote".to_string(),
        PublishState::Failed(reason) => format!("\n⚠️ Push to remote failed, local commit kept: {}", reason),
        PublishState::Skipped => String::new(),
    };
    format!("{}\n\n📝 {}\n🔖 Commit: {}{}", title, outcome.message, hash, publish_line)
}

fn format_diff(file: Option<&str>, diff: &str) -> String {
    match (file, diff.trim().is_empty()) {
        (Some(file), true) => format!("📄 No changes in {}", file),
        (None, true) => "📄 No changes detected".to_string(),
        (Some(file), false) => format!("📊 Diff ({}):\n\n{}", file, diff),
        (None, false) => format!("📊 Diff:\n\n{}", diff),
    }
}
