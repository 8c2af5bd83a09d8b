//! In-memory `GitBackend` that records every call.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::RawStatus;
use crate::repo_tools::backend::GitBackend;
use crate::repo_tools::safety::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Status,
    Diff(Option<String>),
    DiffStat,
    StageAll,
    Commit(String),
    Push,
}

#[derive(Default)]
pub struct FakeBackend {
    status: RawStatus,
    diff: String,
    diff_stat: String,
    fail_status: bool,
    fail_stage: bool,
    fail_commit: bool,
    fail_push: bool,
    no_hash: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn with_status(status: RawStatus) -> Self {
        Self { status, ..Self::default() }
    }

    pub fn diff_text(mut self, diff: &str) -> Self {
        self.diff = diff.to_string();
        self
    }

    pub fn diff_stat_text(mut self, stat: &str) -> Self {
        self.diff_stat = stat.to_string();
        self
    }

    pub fn fail_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn fail_stage(mut self) -> Self {
        self.fail_stage = true;
        self
    }

    pub fn fail_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn fail_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn without_hash(mut self) -> Self {
        self.no_hash = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome(&self, fail: bool, command: &str) -> Result<(), BackendError> {
        if fail {
            Err(BackendError::Failed {
                command: command.to_string(),
                code: 128,
                detail: format!("{} rejected", command),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GitBackend for FakeBackend {
    async fn status(&self) -> Result<RawStatus, BackendError> {
        self.record(Call::Status);
        self.outcome(self.fail_status, "git status")?;
        Ok(self.status.clone())
    }

    async fn diff(&self, file: Option<&str>) -> Result<String, BackendError> {
        self.record(Call::Diff(file.map(str::to_string)));
        Ok(self.diff.clone())
    }

    async fn diff_stat(&self) -> Result<String, BackendError> {
        self.record(Call::DiffStat);
        Ok(self.diff_stat.clone())
    }

    async fn stage_all(&self) -> Result<(), BackendError> {
        self.record(Call::StageAll);
        self.outcome(self.fail_stage, "git add")
    }

    async fn commit(&self, message: &str) -> Result<Option<String>, BackendError> {
        self.record(Call::Commit(message.to_string()));
        self.outcome(self.fail_commit, "git commit")?;
        Ok((!self.no_hash).then(|| "abc1234".to_string()))
    }

    async fn push(&self) -> Result<(), BackendError> {
        self.record(Call::Push);
        self.outcome(self.fail_push, "git push")
    }
}
