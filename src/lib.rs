pub mod config;
pub mod db;
pub mod models;
pub mod protocol;
pub mod repo_tools;
pub mod server;

pub use config::ServerConfig;
pub use server::McpServer;
