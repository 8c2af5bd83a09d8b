pub mod adapter;
pub mod backend;
pub mod classifier;
pub mod dispatcher;
pub mod error;
pub mod git;
pub mod logging;
pub mod safety;
pub mod schemas;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::GitHelper;
pub use backend::GitBackend;
pub use dispatcher::{Dispatcher, ToolRegistry};
pub use error::{ErrorKind, ToolError};
pub use git::GitCli;
pub use logging::ToolJournal;
