//! Named, ordered collections of removal rules.

use std::collections::HashSet;

use excise_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::remover::{self, TransformResult};
use crate::rule::{RemovalRule, RuleEntry};

/// Id given to rule sets assembled from command-line arguments.
pub const INLINE_ID: &str = "inline";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<RuleEntry>,
}

impl RuleSet {
    pub fn new(id: impl Into<String>, description: impl Into<String>, rules: Vec<RuleEntry>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            rules,
        }
    }

    /// Build a rule set from bare literals and ranges, literals first.
    ///
    /// Rules are named `literal-1`, `range-1`, ... in the order given.
    pub fn inline(literals: Vec<String>, ranges: Vec<(String, String)>) -> Self {
        let literal_entries = literals
            .into_iter()
            .enumerate()
            .map(|(i, text)| RuleEntry::new(format!("literal-{}", i + 1), RemovalRule::literal(text)));
        let range_entries = ranges.into_iter().enumerate().map(|(i, (start, end))| {
            RuleEntry::new(format!("range-{}", i + 1), RemovalRule::range(start, end))
        });

        Self::new(
            INLINE_ID,
            "Rules given on the command line",
            literal_entries.chain(range_entries).collect(),
        )
    }

    /// Load and validate a rule set from a TOML, JSON, or YAML file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let rule_set: Self = ConfigStore::new().load(path)?;
        rule_set.validate()?;
        tracing::debug!(id = %rule_set.id, rules = rule_set.rules.len(), path = %path, "loaded rule set");
        Ok(rule_set)
    }

    /// Reject rule sets that could never do anything useful.
    ///
    /// # Errors
    /// Returns `Error::InvalidRuleSet` for an empty id, no rules, an empty
    /// literal or marker, or a rule name used twice.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid(&self.id, "id must not be empty"));
        }
        if self.rules.is_empty() {
            return Err(Error::invalid(&self.id, "no rules defined"));
        }

        let mut seen = HashSet::new();
        for entry in &self.rules {
            if entry.name.trim().is_empty() {
                return Err(Error::invalid(&self.id, "rule name must not be empty"));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::invalid(
                    &self.id,
                    format!("duplicate rule name '{}'", entry.name),
                ));
            }
            let has_empty_pattern = match &entry.rule {
                RemovalRule::Literal { text } => text.is_empty(),
                RemovalRule::Range { start, end } => start.is_empty() || end.is_empty(),
            };
            if has_empty_pattern {
                return Err(Error::invalid(
                    &self.id,
                    format!("rule '{}' has an empty pattern", entry.name),
                ));
            }
        }

        Ok(())
    }

    pub fn apply(&self, document: &str) -> TransformResult {
        remover::apply(document, &self.rules)
    }
}
