use crate::repo_tools::safety::BackendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    BackendQuery,
    Stage,
    Commit,
    Publish,
    UnknownTool,
}

/// Every failure a tool invocation can raise. The dispatcher is the only
/// place these are turned into error responses.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to query {what}: {source}")]
    BackendQuery {
        what: &'static str,
        #[source]
        source: BackendError,
    },
    #[error("Failed to stage changes: {0}")]
    Stage(#[source] BackendError),
    #[error("Commit failed: {0}")]
    Commit(#[source] BackendError),
    #[error("Push failed: {0}")]
    Publish(#[source] BackendError),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::Validation(_) => ErrorKind::Validation,
            ToolError::BackendQuery { .. } => ErrorKind::BackendQuery,
            ToolError::Stage(_) => ErrorKind::Stage,
            ToolError::Commit(_) => ErrorKind::Commit,
            ToolError::Publish(_) => ErrorKind::Publish,
            ToolError::UnknownTool(_) => ErrorKind::UnknownTool,
        }
    }

    pub(crate) fn query(what: &'static str) -> impl FnOnce(BackendError) -> ToolError {
        move |source| ToolError::BackendQuery { what, source }
    }
}
