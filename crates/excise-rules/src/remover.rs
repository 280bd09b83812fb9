//! The block remover.
//!
//! Rules are applied one after another; each sees the output of the one
//! before it. Every rule removes at most one span, and a rule that finds
//! nothing leaves the document untouched and says so in its report.

use std::ops::Range;

use crate::rule::{RemovalRule, RuleEntry, RuleKind};

/// Why a rule did not remove anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// The literal text does not occur in the document.
    LiteralAbsent,
    /// The start marker is missing but the end marker is present.
    StartMarkerMissing,
    /// The start marker is present but the end marker occurs nowhere.
    EndMarkerMissing,
    /// Neither marker occurs.
    BothMarkersMissing,
    /// Both markers occur, but the end marker only before the start marker.
    EndBeforeStart,
    /// The end marker begins exactly where the start marker does, so the
    /// range is empty.
    EmptySpan,
    /// The rule's text or one of its markers is the empty string.
    EmptyPattern,
}

impl MissReason {
    /// Range rules whose markers were found in the wrong shape rather than
    /// simply absent.
    pub fn is_malformed_range(&self) -> bool {
        matches!(
            self,
            Self::StartMarkerMissing | Self::EndMarkerMissing | Self::EndBeforeStart | Self::EmptySpan
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LiteralAbsent => "literal-absent",
            Self::StartMarkerMissing => "start-marker-missing",
            Self::EndMarkerMissing => "end-marker-missing",
            Self::BothMarkersMissing => "both-markers-missing",
            Self::EndBeforeStart => "end-before-start",
            Self::EmptySpan => "empty-span",
            Self::EmptyPattern => "empty-pattern",
        }
    }
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::LiteralAbsent => "text not present",
            Self::StartMarkerMissing => "start marker not found",
            Self::EndMarkerMissing => "end marker not found",
            Self::BothMarkersMissing => "neither marker found",
            Self::EndBeforeStart => "end marker only occurs before start marker",
            Self::EmptySpan => "end marker starts at the start marker",
            Self::EmptyPattern => "empty pattern",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Byte span removed, relative to the document as the rule saw it.
    Removed { span: Range<usize> },
    NotFound(MissReason),
}

impl RuleOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }

    pub fn removed_bytes(&self) -> usize {
        match self {
            Self::Removed { span } => span.len(),
            Self::NotFound(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub name: String,
    pub kind: RuleKind,
    pub outcome: RuleOutcome,
}

/// The transformed document and one report per rule, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub document: String,
    pub reports: Vec<RuleReport>,
}

impl TransformResult {
    /// True when at least one rule removed something.
    pub fn changed(&self) -> bool {
        self.reports.iter().any(|r| r.outcome.is_removed())
    }

    pub fn all_matched(&self) -> bool {
        self.reports.iter().all(|r| r.outcome.is_removed())
    }

    pub fn missed(&self) -> impl Iterator<Item = &RuleReport> {
        self.reports.iter().filter(|r| !r.outcome.is_removed())
    }

    pub fn removed_bytes(&self) -> usize {
        self.reports.iter().map(|r| r.outcome.removed_bytes()).sum()
    }
}

/// Find the span a rule would remove from `document`.
pub fn locate(rule: &RemovalRule, document: &str) -> Result<Range<usize>, MissReason> {
    match rule {
        RemovalRule::Literal { text } => {
            if text.is_empty() {
                return Err(MissReason::EmptyPattern);
            }
            document
                .find(text.as_str())
                .map(|at| at..at + text.len())
                .ok_or(MissReason::LiteralAbsent)
        }
        RemovalRule::Range { start, end } => {
            if start.is_empty() || end.is_empty() {
                return Err(MissReason::EmptyPattern);
            }
            let Some(start_at) = document.find(start.as_str()) else {
                return Err(if document.contains(end.as_str()) {
                    MissReason::StartMarkerMissing
                } else {
                    MissReason::BothMarkersMissing
                });
            };
            match document[start_at..].find(end.as_str()) {
                Some(0) => Err(MissReason::EmptySpan),
                Some(offset) => Ok(start_at..start_at + offset),
                None if document.contains(end.as_str()) => Err(MissReason::EndBeforeStart),
                None => Err(MissReason::EndMarkerMissing),
            }
        }
    }
}

/// Apply named rules in order.
pub fn apply(document: &str, rules: &[RuleEntry]) -> TransformResult {
    let mut current = document.to_owned();
    let mut reports = Vec::with_capacity(rules.len());

    for entry in rules {
        let outcome = match locate(&entry.rule, &current) {
            Ok(span) => {
                current.replace_range(span.clone(), "");
                tracing::debug!(
                    rule = %entry.name,
                    start = span.start,
                    end = span.end,
                    "removed span"
                );
                RuleOutcome::Removed { span }
            }
            Err(reason) => {
                tracing::debug!(rule = %entry.name, reason = %reason, "rule did not match");
                RuleOutcome::NotFound(reason)
            }
        };

        reports.push(RuleReport {
            name: entry.name.clone(),
            kind: entry.rule.kind(),
            outcome,
        });
    }

    TransformResult {
        document: current,
        reports,
    }
}

/// Apply unnamed rules in order. Reports are named `rule-1`, `rule-2`, ...
pub fn apply_rules(document: &str, rules: &[RemovalRule]) -> TransformResult {
    let entries: Vec<RuleEntry> = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| RuleEntry::new(format!("rule-{}", i + 1), rule.clone()))
        .collect();
    apply(document, &entries)
}
