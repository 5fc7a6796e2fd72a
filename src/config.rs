//! Configuration management for the code fence language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Grammar root and rule file locations

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Directory name used under the user config directory
const APP_DIR: &str = "codefence-ls";

/// Command-line arguments for the code fence language server
#[derive(Debug, Parser)]
#[command(name = "codefence-ls")]
#[command(about = "Language server adding copy / open-in-tab actions to fenced code blocks")]
#[command(version)]
pub struct Args {
    /// Additional grammar roots, laid out like a Sublime Text Packages directory
    #[arg(
        long = "grammar-dir",
        help = "Directory containing grammar packages (repeatable)"
    )]
    pub grammar_dirs: Vec<PathBuf>,

    /// Extra grammar rule file
    #[arg(long, help = "TOML file with additional language-tag rules")]
    pub rules: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Directories scanned for grammar resources, in priority order
    pub grammar_roots: Vec<PathBuf>,
    /// Rule files, highest precedence first
    pub rule_files: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let mut grammar_roots = args.grammar_dirs;
        let mut rule_files = Vec::new();

        if let Some(rules) = args.rules {
            rule_files.push(rules);
        }

        // Default user config locations
        if let Some(config_dir) = dirs::config_dir() {
            grammar_roots.push(config_dir.join("sublime-text").join("Packages"));
            grammar_roots.push(config_dir.join(APP_DIR).join("Packages"));
            rule_files.push(config_dir.join(APP_DIR).join("rules.toml"));
        }

        Ok(Config {
            grammar_roots,
            rule_files,
            log_level: args.log_level,
        })
    }
}
