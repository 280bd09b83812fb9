//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// excise - Remove named blocks of text from schema and migration files
#[derive(Parser, Debug)]
#[command(name = "excise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Apply removal rules to a file and write it back
    ///
    /// Rules come from a built-in rule set, a rule-set file (TOML, JSON or
    /// YAML), or --literal / --range arguments. Inline values understand
    /// the escapes \n \r \t \\ and \".
    ///
    /// Examples:
    ///   excise apply supabase/schema_snapshot.sql -r customer-measurements-snapshot
    ///   excise apply init_v2.sql --rules-file cleanup.toml --strict
    ///   excise apply schema.sql --literal 'DROP TABLE "Old";\n' --dry-run
    Apply {
        /// File to rewrite in place
        file: PathBuf,

        #[command(flatten)]
        source: RuleSource,

        /// Fail with exit code 2, without writing, if any rule does not match
        #[arg(long)]
        strict: bool,

        /// Show the diff without writing the file
        #[arg(long)]
        dry_run: bool,

        /// Output a JSON report for scripting
        #[arg(long)]
        json: bool,
    },

    /// List built-in rule sets
    ListRules {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print a built-in rule set as TOML
    ///
    /// The output is a valid --rules-file and a starting point for custom
    /// rule sets.
    ShowRules {
        /// Rule set id (see 'excise list-rules')
        id: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where the rules for `apply` come from.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = true)]
pub struct RuleSource {
    /// Built-in rule set id
    #[arg(short, long, value_name = "ID", conflicts_with_all = ["rules_file", "literal", "range"])]
    pub rules: Option<String>,

    /// Rule-set file (.toml, .json, .yaml)
    #[arg(long, value_name = "PATH", conflicts_with_all = ["literal", "range"])]
    pub rules_file: Option<PathBuf>,

    /// Remove the first occurrence of TEXT (repeatable)
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true, value_parser = parse_escaped)]
    pub literal: Vec<String>,

    /// Remove from START up to, not including, END (repeatable)
    #[arg(
        long,
        num_args = 2,
        value_names = ["START", "END"],
        allow_hyphen_values = true,
        value_parser = parse_escaped
    )]
    pub range: Vec<String>,
}

/// Expand `\n`, `\r`, `\t`, `\\` and `\"` in a command-line value.
pub fn parse_escaped(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => return Err(format!("unsupported escape '\\{}'", other)),
            None => return Err("trailing backslash".to_string()),
        }
    }

    Ok(out)
}
