use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub fn connect(db_path: &Path) -> Result<Connection, DbError> {
  if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)?;
  }
  let conn = Connection::open(db_path)?;
  init_db(&conn)?;
  Ok(conn)
}

pub fn connect_in_memory() -> Result<Connection, DbError> {
  let conn = Connection::open_in_memory()?;
  init_db(&conn)?;
  Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<(), DbError> {
  // Migrations use IF NOT EXISTS, so reopening an existing journal is fine.
  let init_sql = include_str!("../migrations/001_init.sql");
  conn.execute_batch(init_sql)?;
  Ok(())
}
