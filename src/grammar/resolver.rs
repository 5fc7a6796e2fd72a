//! Grammar Resolver
//!
//! Picks the grammar resource for a fence language tag.

use std::sync::LazyLock;

use super::rules::{GrammarRule, BUILTIN_RULES};

static BUILTIN_TABLE: LazyLock<GrammarTable> = LazyLock::new(GrammarTable::builtin);

/// Ordered rule list used for resolution
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarTable {
    rules: Vec<GrammarRule>,
}

impl Default for GrammarTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl GrammarTable {
    /// Table holding only the built-in rules
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.iter().map(GrammarRule::from).collect(),
        }
    }

    /// Built-in rules preceded by `user_rules`
    pub fn with_user_rules(user_rules: Vec<GrammarRule>) -> Self {
        let mut rules = user_rules;
        rules.extend(BUILTIN_RULES.iter().map(GrammarRule::from));
        Self { rules }
    }

    pub fn rules(&self) -> &[GrammarRule] {
        &self.rules
    }

    /// Resolve `identifier` against the `available` grammar resources
    ///
    /// The first rule listing the identifier decides alone: its first
    /// available candidate wins, and if none is available the result is
    /// `None`. Only identifiers no rule knows fall back to a scan of
    /// `available` for a file name containing the identifier.
    pub fn resolve(&self, identifier: &str, available: &[String]) -> Option<String> {
        let identifier = identifier.to_lowercase();

        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(&identifier)) {
            return rule
                .grammars
                .iter()
                .find(|candidate| available.contains(*candidate))
                .cloned();
        }

        available
            .iter()
            .find(|resource| file_name(resource).to_lowercase().contains(&identifier))
            .cloned()
    }
}

/// Resolve with the built-in rules only
pub fn resolve(identifier: &str, available: &[String]) -> Option<String> {
    BUILTIN_TABLE.resolve(identifier, available)
}

fn file_name(resource: &str) -> &str {
    resource.rsplit('/').next().unwrap_or(resource)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rule_match() {
        let available = resources(&["Packages/Python/Python.sublime-syntax"]);
        assert_eq!(
            resolve("py", &available).as_deref(),
            Some("Packages/Python/Python.sublime-syntax")
        );
    }

    #[test]
    fn test_rule_prefers_earlier_candidate() {
        let available = resources(&[
            "Packages/Markdown/Markdown.sublime-syntax",
            "Packages/MarkdownEditing/MultiMarkdown.tmLanguage",
        ]);
        assert_eq!(
            resolve("markdown", &available).as_deref(),
            Some("Packages/MarkdownEditing/MultiMarkdown.tmLanguage")
        );
    }

    #[test]
    fn test_matched_rule_is_exclusive() {
        let available = resources(&["Packages/Rails/SQL (Rails).sublime-syntax"]);
        assert_eq!(resolve("sql", &available), None);
    }

    #[test]
    fn test_generic_fallback() {
        let available = resources(&[
            "Packages/Go/Go.sublime-syntax",
            "Packages/Rust/Rust.sublime-syntax",
        ]);
        assert_eq!(
            resolve("rust", &available).as_deref(),
            Some("Packages/Rust/Rust.sublime-syntax")
        );
    }

    #[test]
    fn test_generic_fallback_uses_file_name_only() {
        // "rust" appears in the package directory but not in the file name
        let available = resources(&["Packages/rust-extras/Cargo.sublime-syntax"]);
        assert_eq!(resolve("rust", &available), None);
    }

    #[test]
    fn test_generic_fallback_keeps_resource_order() {
        let available = resources(&[
            "Packages/C++/C.tmLanguage",
            "Packages/C++/C.sublime-syntax",
        ]);
        assert_eq!(
            resolve("c", &available).as_deref(),
            Some("Packages/C++/C.tmLanguage")
        );
    }

    #[test]
    fn test_no_match() {
        let available = resources(&["Packages/Python/Python.sublime-syntax"]);
        assert_eq!(resolve("haskell", &available), None);
        assert_eq!(resolve("py", &[]), None);
    }

    #[test]
    fn test_user_rules_take_precedence() {
        let table = GrammarTable::with_user_rules(vec![GrammarRule {
            aliases: vec!["sql".to_string()],
            grammars: vec!["Packages/PostgreSQL/PostgreSQL.sublime-syntax".to_string()],
        }]);
        let available = resources(&[
            "Packages/SQL/SQL.sublime-syntax",
            "Packages/PostgreSQL/PostgreSQL.sublime-syntax",
        ]);
        assert_eq!(
            table.resolve("sql", &available).as_deref(),
            Some("Packages/PostgreSQL/PostgreSQL.sublime-syntax")
        );
        assert_eq!(table.rules().len(), BUILTIN_RULES.len() + 1);
    }
}
