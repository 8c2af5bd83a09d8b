use std::collections::BTreeSet;
use std::path::Path;

use crate::models::Change;

pub const FALLBACK_MESSAGE: &str = "Code cleanup and style tweaks";
pub const PHRASE_SEPARATOR: &str = ", ";

const CONFIG_FRAGMENTS: [&str; 5] = [".toml", ".yaml", ".yml", ".ini", ".config"];

/// Declaration order is phrase order in generated messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeBucket {
    Documentation,
    Code,
    Configuration,
    Styling,
    Other,
}

impl ChangeBucket {
    pub fn phrase(self) -> &'static str {
        match self {
            ChangeBucket::Documentation => "Update documentation",
            ChangeBucket::Code => "Refine code",
            ChangeBucket::Configuration => "Update configuration",
            ChangeBucket::Styling => "Adjust styles",
            ChangeBucket::Other => "Other changes",
        }
    }
}

/// Bucket a path by extension, falling back to config-like name fragments.
pub fn classify(path: &str) -> ChangeBucket {
    let lower = path.to_lowercase();
    let ext = Path::new(&lower)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match ext {
        "md" | "markdown" => ChangeBucket::Documentation,
        "ts" | "js" | "jsx" => ChangeBucket::Code,
        "json" => ChangeBucket::Configuration,
        "css" | "scss" | "less" => ChangeBucket::Styling,
        _ if CONFIG_FRAGMENTS.iter().any(|f| lower.contains(f)) => ChangeBucket::Configuration,
        _ => ChangeBucket::Other,
    }
}

/// One phrase per triggered bucket, in fixed bucket order. Never fails.
pub fn generate_commit_message(changes: &[Change]) -> String {
    let triggered: BTreeSet<ChangeBucket> = changes.iter().map(|c| classify(c.path())).collect();
    if triggered.is_empty() {
        return FALLBACK_MESSAGE.to_string();
    }

    triggered
        .into_iter()
        .map(ChangeBucket::phrase)
        .collect::<Vec<_>>()
        .join(PHRASE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChangeKind;

    fn changes(paths: &[&str]) -> Vec<Change> {
        paths.iter().map(|p| Change::new(ChangeKind::Modified, *p)).collect()
    }

    #[test]
    fn documentation_only_yields_single_phrase() {
        let msg = generate_commit_message(&changes(&["README.md", "docs/guide.markdown", "NOTES.MD"]));
        assert_eq!(msg, "Update documentation");
    }

    #[test]
    fn empty_input_yields_fallback() {
        assert_eq!(generate_commit_message(&[]), FALLBACK_MESSAGE);
        assert_eq!(generate_commit_message(&[]), FALLBACK_MESSAGE);
    }

    #[test]
    fn phrase_order_ignores_input_order() {
        let paths = ["theme/site.scss", "a.bin", "src/b.ts", "package.json", "notes/a.md"];
        let expected = "Update documentation, Refine code, Update configuration, Adjust styles, Other changes";

        let forward = generate_commit_message(&changes(&paths));
        let mut reversed_paths = paths;
        reversed_paths.reverse();
        let reversed = generate_commit_message(&changes(&reversed_paths));

        assert_eq!(forward, expected);
        assert_eq!(reversed, expected);
    }

    #[test]
    fn docs_and_code_pair() {
        let input = vec![
            Change::new(ChangeKind::Modified, "notes/a.md"),
            Change::new(ChangeKind::Added, "src/b.ts"),
        ];
        assert_eq!(generate_commit_message(&input), "Update documentation, Refine code");
    }

    #[test]
    fn js_and_ts_share_one_phrase() {
        let msg = generate_commit_message(&changes(&["a.ts", "b.js", "c.jsx"]));
        assert_eq!(msg, "Refine code");
    }

    #[test]
    fn config_fragments_match_anywhere_in_name() {
        assert_eq!(classify("Cargo.toml"), ChangeBucket::Configuration);
        assert_eq!(classify(".github/workflows/ci.yml"), ChangeBucket::Configuration);
        assert_eq!(classify("settings.ini.bak"), ChangeBucket::Configuration);
        assert_eq!(classify("webpack.config"), ChangeBucket::Configuration);
        assert_eq!(classify("docker-compose.YAML"), ChangeBucket::Configuration);
    }

    #[test]
    fn extension_wins_over_fragment() {
        assert_eq!(classify("vite.config.ts"), ChangeBucket::Code);
        assert_eq!(classify("theme.toml.css"), ChangeBucket::Styling);
    }

    #[test]
    fn unmatched_paths_are_other() {
        assert_eq!(classify("Makefile"), ChangeBucket::Other);
        assert_eq!(classify("src/main.rs"), ChangeBucket::Other);
        assert_eq!(classify(".gitignore"), ChangeBucket::Other);
    }

    #[test]
    fn renamed_display_path_uses_destination_extension() {
        let input = vec![Change::renamed("old.txt", "new.md")];
        assert_eq!(generate_commit_message(&input), "Update documentation");
    }
}
