use async_trait::async_trait;

use crate::models::RawStatus;
use crate::repo_tools::safety::BackendError;

/// The version-control primitives the adapter is built on. Each call may
/// fail independently; none of them retries.
#[async_trait]
pub trait GitBackend: Send + Sync {
    async fn status(&self) -> Result<RawStatus, BackendError>;

    /// Working-tree diff, optionally limited to one repository-relative path.
    async fn diff(&self, file: Option<&str>) -> Result<String, BackendError>;

    async fn diff_stat(&self) -> Result<String, BackendError>;

    async fn stage_all(&self) -> Result<(), BackendError>;

    /// Returns the new commit's hash when the backend reports one.
    async fn commit(&self, message: &str) -> Result<Option<String>, BackendError>;

    async fn push(&self) -> Result<(), BackendError>;
}
