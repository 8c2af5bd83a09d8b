use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with code {code}: {detail}")]
    Failed {
        command: String,
        code: i32,
        detail: String,
    },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Path traversal attempt blocked: {0}")]
    PathTraversal(String),
    #[error("Absolute paths are not allowed: {0}")]
    Absolute(String),
}

/// Check that a caller-supplied path stays inside the repository root.
///
/// Purely lexical: the path may name a deleted file, so nothing is
/// canonicalized. Returns the path with `.` segments dropped and `..`
/// segments resolved.
pub fn check_relative_path(rel_path: &str) -> Result<String, PathError> {
    let normalized = rel_path.replace('\\', "/");
    if Path::new(&normalized).is_absolute() || normalized.starts_with('/') {
        return Err(PathError::Absolute(rel_path.to_string()));
    }

    let mut clean_path = PathBuf::new();
    for comp in Path::new(&normalized).components() {
        match comp {
            Component::CurDir => continue,
            Component::ParentDir => {
                if !clean_path.pop() {
                    return Err(PathError::PathTraversal(rel_path.to_string()));
                }
            }
            Component::Normal(part) => clean_path.push(part),
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathError::Absolute(rel_path.to_string()));
            }
        }
    }

    Ok(clean_path.to_string_lossy().replace('\\', "/"))
}

/// Truncate string with metadata
pub fn truncate_string(s: &str, max_chars: usize) -> (String, bool) {
    if s.chars().count() <= max_chars {
        (s.to_string(), false)
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        (truncated, true)
    }
}

/// Run a command to completion and return its stdout.
///
/// A non-zero exit is an error carrying stderr, or stdout when stderr is
/// empty (git prints "nothing to commit" on stdout).
pub async fn safe_spawn(cmd: &Path, args: &[&str], cwd: &Path) -> Result<String, BackendError> {
    let command = format!("{} {}", display_name(cmd), args.join(" "));

    let output = Command::new(cmd)
        .args(args)
        .current_dir(cwd)
        // stdin carries the protocol stream; git must never prompt on it.
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| BackendError::Spawn { command: command.clone(), source })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        let detail = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
        return Err(BackendError::Failed {
            command,
            code: output.status.code().unwrap_or(-1),
            detail: detail.to_string(),
        });
    }

    Ok(stdout)
}

fn display_name(cmd: &Path) -> String {
    cmd.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| cmd.to_string_lossy().to_string())
}

/// Locate a git executable on PATH (or accept an explicit path).
pub fn resolve_git(bin: &str) -> Result<PathBuf, which::Error> {
    which::which(bin)
}
