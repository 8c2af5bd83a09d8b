use rusqlite::Connection;
use serde_json::{json, Value};
use std::path::Path;

use crate::db::{self, DbError};
use crate::models::*;
use crate::protocol::ToolResponse;
use crate::repo_tools::safety::truncate_string;

const MAX_RESULT_CHARS: usize = 200_000;

/// Append-only SQLite record of tool invocations.
pub struct ToolJournal {
    conn: Connection,
}

impl ToolJournal {
    pub fn open(db_path: &Path) -> Result<Self, DbError> {
        Ok(Self { conn: db::connect(db_path)? })
    }

    pub fn in_memory() -> Result<Self, DbError> {
        Ok(Self { conn: db::connect_in_memory()? })
    }

    pub fn log_tool_call(
        &self,
        name: &str,
        args: &Value,
        response: &ToolResponse,
    ) -> Result<(), DbError> {
        let id = new_id();
        let created_at = now_iso();

        // Truncate result if too large
        let text = response.body();
        let (stored, truncated) = truncate_string(text, MAX_RESULT_CHARS);
        let mut result = json!({ "text": stored });
        if truncated {
            result["_truncated"] = Value::Bool(true);
            result["_original_size"] = json!(text.chars().count());
        }

        self.conn.execute(
            "INSERT INTO tool_calls (id, name, args_json, result_json, is_error, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &id,
                name,
                &args.to_string(),
                &result.to_string(),
                response.is_error,
                &created_at,
            ),
        )?;

        Ok(())
    }

    pub fn list_tool_calls(&self) -> Result<Vec<ToolCallRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, args_json, result_json, is_error, created_at
             FROM tool_calls ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map([], |r| {
            Ok(ToolCallRow {
                id: r.get(0)?,
                name: r.get(1)?,
                args_json: r.get(2)?,
                result_json: r.get(3)?,
                is_error: r.get(4)?,
                created_at: r.get(5)?,
            })
        })?;

        let mut out = vec![];
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn now_iso() -> String {
    let t = time::OffsetDateTime::now_utc();
    t.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let journal = ToolJournal::in_memory().unwrap();
        journal
            .log_tool_call("status", &Value::Null, &ToolResponse::text("clean"))
            .unwrap();
        journal
            .log_tool_call("commit", &json!({ "message": "" }), &ToolResponse::error("empty"))
            .unwrap();

        let rows = journal.list_tool_calls().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "status");
        assert!(!rows[0].is_error);
        assert_eq!(rows[1].name, "commit");
        assert!(rows[1].is_error);
        assert_eq!(rows[1].args_json, r#"{"message":""}"#);
    }

    #[test]
    fn oversized_results_are_truncated() {
        let journal = ToolJournal::in_memory().unwrap();
        let big = "x".repeat(MAX_RESULT_CHARS + 10);
        journal
            .log_tool_call("diff", &Value::Null, &ToolResponse::text(big))
            .unwrap();

        let rows = journal.list_tool_calls().unwrap();
        let stored: Value = serde_json::from_str(&rows[0].result_json).unwrap();
        assert_eq!(stored["_truncated"], json!(true));
        assert_eq!(stored["_original_size"], json!(MAX_RESULT_CHARS + 10));
        assert_eq!(stored["text"].as_str().unwrap().len(), MAX_RESULT_CHARS);
    }

    #[test]
    fn reopening_a_journal_file_keeps_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("journal.sqlite");

        ToolJournal::open(&path)
            .unwrap()
            .log_tool_call("status", &Value::Null, &ToolResponse::text("ok"))
            .unwrap();

        let rows = ToolJournal::open(&path).unwrap().list_tool_calls().unwrap();
        assert_eq!(rows.len(), 1);
    }
}
