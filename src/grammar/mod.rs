//! Grammar selection for opened code blocks.
//!
//! This module handles:
//! - The curated tag-to-grammar rules (built-in and user rule files)
//! - Resolving a fence language tag to an available grammar resource
//! - Discovering grammar resources on disk, with live reload

pub mod catalog;
pub mod resolver;
pub mod rules;

pub use catalog::GrammarCatalog;
pub use resolver::{resolve, GrammarTable};
pub use rules::{GrammarRule, BUILTIN_RULES};

use std::path::PathBuf;

/// Build the rule table from the built-in rules and `rule_files`
///
/// Earlier files take precedence over later ones, and all of them over the
/// built-in rules. Missing files are skipped; unreadable or invalid ones are
/// logged and skipped.
pub async fn load_grammar_table(rule_files: &[PathBuf]) -> GrammarTable {
    let mut user_rules = Vec::new();

    for path in rule_files {
        if !path.exists() {
            continue;
        }

        match rules::load_rule_file(path).await {
            Ok(rules) => {
                log::info!("Loaded {} grammar rules from {}", rules.len(), path.display());
                user_rules.extend(rules);
            }
            Err(e) => log::warn!("{:#}", e),
        }
    }

    GrammarTable::with_user_rules(user_rules)
}
