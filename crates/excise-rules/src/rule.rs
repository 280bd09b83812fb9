//! Removal rule definitions.

use serde::{Deserialize, Serialize};

/// What to cut out of a document.
///
/// Rule-set files spell the variant with a `kind` key:
///
/// ```toml
/// [[rules]]
/// name = "drop-table"
/// kind = "literal"
/// text = "DROP TABLE IF EXISTS \"CustomerMeasurements\" CASCADE;\n"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemovalRule {
    /// Delete the first exact occurrence of `text`.
    Literal { text: String },
    /// Delete `[start of start, start of end)`. The end marker stays.
    Range { start: String, end: String },
}

impl RemovalRule {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal { text: text.into() }
    }

    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Range {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Literal { .. } => RuleKind::Literal,
            Self::Range { .. } => RuleKind::Range,
        }
    }

    /// Short single-line rendering for logs and reports.
    pub fn summary(&self) -> String {
        match self {
            Self::Literal { text } => format!("literal {}", preview(text)),
            Self::Range { start, end } => {
                format!("range {} .. {}", preview(start), preview(end))
            }
        }
    }
}

/// First line of a marker, trimmed to a readable length.
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 48;

    let first_line = text.lines().next().unwrap_or("");
    let mut shown: String = first_line.chars().take(MAX_CHARS).collect();
    if first_line.chars().count() > MAX_CHARS || text.trim_end_matches('\n').contains('\n') {
        shown.push_str("...");
    }
    format!("{:?}", shown)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Literal,
    Range,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Range => "range",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule with the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub name: String,
    #[serde(flatten)]
    pub rule: RemovalRule,
}

impl RuleEntry {
    pub fn new(name: impl Into<String>, rule: RemovalRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_shows_first_line_only() {
        let rule = RemovalRule::literal("-- CustomerMeasurements\nCREATE POLICY x;\n");
        assert_eq!(rule.summary(), r#"literal "-- CustomerMeasurements...""#);
    }

    #[test]
    fn summary_of_single_line_literal_has_no_ellipsis() {
        let rule = RemovalRule::literal("DROP TABLE x;\n");
        assert_eq!(rule.summary(), r#"literal "DROP TABLE x;""#);
    }

    #[test]
    fn summary_of_range() {
        let rule = RemovalRule::range("START", "END");
        assert_eq!(rule.summary(), r#"range "START" .. "END""#);
    }

    #[test]
    fn kind_names() {
        assert_eq!(RemovalRule::literal("x").kind().as_str(), "literal");
        assert_eq!(RemovalRule::range("a", "b").kind().to_string(), "range");
    }
}
