//! Grammar Rules
//!
//! Curated mappings from fence language tags to grammar resources, plus the
//! TOML schema for user supplied rules.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Compiled-in rule
#[derive(Debug)]
pub struct BuiltinRule {
    pub aliases: &'static [&'static str],
    /// Candidates, most preferred first
    pub grammars: &'static [&'static str],
}

/// Built-in rules, checked in order
///
/// A tag listed here never reaches the file name scan, so `sql` cannot end
/// up with `Packages/Rails/SQL (Rails).sublime-syntax`.
pub static BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        aliases: &["md", "markdown", "mdown"],
        grammars: &[
            "Packages/MarkdownEditing/Markdown.sublime-syntax",
            "Packages/MarkdownEditing/MultiMarkdown.tmLanguage",
            "Packages/MarkdownEditing/Markdown (Standard).tmLanguage",
            "Packages/Markdown/Markdown.sublime-syntax",
            "Packages/Markdown/MultiMarkdown.sublime-syntax",
        ],
    },
    BuiltinRule {
        aliases: &["js", "javascript"],
        grammars: &["Packages/JavaScript/JavaScript.sublime-syntax"],
    },
    BuiltinRule {
        aliases: &["html"],
        grammars: &["Packages/HTML/HTML.sublime-syntax"],
    },
    BuiltinRule {
        aliases: &["java"],
        grammars: &["Packages/Java/Java.sublime-syntax"],
    },
    BuiltinRule {
        aliases: &["php"],
        grammars: &["Packages/PHP/PHP.sublime-syntax"],
    },
    BuiltinRule {
        aliases: &["py", "python"],
        grammars: &["Packages/Python/Python.sublime-syntax"],
    },
    BuiltinRule {
        aliases: &["rb", "ruby"],
        grammars: &["Packages/Ruby/Ruby.sublime-syntax"],
    },
    BuiltinRule {
        aliases: &["sh", "shell"],
        grammars: &["Packages/ShellScript/Shell-Unix-Generic.sublime-syntax"],
    },
    BuiltinRule {
        aliases: &["sql"],
        grammars: &["Packages/SQL/SQL.sublime-syntax"],
    },
];

/// Runtime rule (built-in or loaded from a rule file)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GrammarRule {
    pub aliases: Vec<String>,
    pub grammars: Vec<String>,
}

impl GrammarRule {
    pub fn matches(&self, identifier: &str) -> bool {
        self.aliases.iter().any(|alias| alias == identifier)
    }
}

impl From<&BuiltinRule> for GrammarRule {
    fn from(rule: &BuiltinRule) -> Self {
        Self {
            aliases: rule.aliases.iter().map(|s| s.to_string()).collect(),
            grammars: rule.grammars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Root of a rule file (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<GrammarRule>,
}

/// Parse rule file content, lowercasing aliases
pub fn parse_rule_file(content: &str, source_path: Option<&Path>) -> Result<Vec<GrammarRule>> {
    let file: RuleFile = toml::from_str(content).with_context(|| match source_path {
        Some(path) => format!("Failed to parse grammar rules: {}", path.display()),
        None => "Failed to parse grammar rules".to_string(),
    })?;

    Ok(file
        .rules
        .into_iter()
        .map(|rule| GrammarRule {
            aliases: rule.aliases.iter().map(|a| a.to_lowercase()).collect(),
            grammars: rule.grammars,
        })
        .collect())
}

/// Read and parse a rule file
pub async fn load_rule_file(path: &Path) -> Result<Vec<GrammarRule>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read grammar rules: {}", path.display()))?;

    parse_rule_file(&content, Some(path))
}
