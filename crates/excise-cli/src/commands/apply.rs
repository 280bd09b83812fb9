//! Apply command implementation
//!
//! Reads the target file once, runs the rule set over it in memory, and
//! writes the result back at most once.

use std::path::Path;

use colored::Colorize;
use serde_json::{Value, json};

use excise_fs::{NormalizedPath, checksum, io};
use excise_rules::{RuleOutcome, RuleSet, TransformResult, builtin, diff};

use crate::cli::RuleSource;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    pub strict: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// What happened to one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: NormalizedPath,
    pub rule_set_id: String,
    pub original: String,
    pub result: TransformResult,
    pub written: bool,
}

impl FileReport {
    fn missed_names(&self) -> Vec<String> {
        self.result.missed().map(|r| r.name.clone()).collect()
    }
}

/// Run the apply command
pub fn run_apply(file: &Path, source: &RuleSource, options: ApplyOptions) -> Result<()> {
    let rule_set = resolve_rule_set(source)?;
    let path = NormalizedPath::from(file);
    let report = apply_to_file(&path, &rule_set, options)?;

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json_report(&report, options))?
        );
    } else {
        print_report(&report, options);
    }

    if options.strict && !report.result.all_matched() {
        return Err(CliError::RulesNotMatched {
            missed: report.missed_names(),
        });
    }

    Ok(())
}

/// Pick the rule set named by the command-line arguments.
pub fn resolve_rule_set(source: &RuleSource) -> Result<RuleSet> {
    if let Some(id) = &source.rules {
        return Ok(builtin::lookup(id)?.clone());
    }
    if let Some(file) = &source.rules_file {
        return Ok(RuleSet::load(&NormalizedPath::new(file))?);
    }

    if source.range.len() % 2 != 0 {
        return Err(CliError::user("--range takes a START and an END marker"));
    }
    let ranges = source
        .range
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();
    let rule_set = RuleSet::inline(source.literal.clone(), ranges);
    rule_set.validate()?;
    Ok(rule_set)
}

/// Read, transform, and (unless strict mode found a miss, or this is a dry
/// run, or nothing changed) write back.
pub fn apply_to_file(
    path: &NormalizedPath,
    rule_set: &RuleSet,
    options: ApplyOptions,
) -> Result<FileReport> {
    let original = io::read_text(path)?;
    let result = rule_set.apply(&original);

    for missed in result.missed() {
        if let RuleOutcome::NotFound(reason) = &missed.outcome {
            tracing::warn!(
                rule = %missed.name,
                kind = %missed.kind,
                reason = %reason,
                malformed_range = reason.is_malformed_range(),
                "rule did not match"
            );
        }
    }

    let blocked_by_strict = options.strict && !result.all_matched();
    let should_write = result.changed() && !options.dry_run && !blocked_by_strict;

    if should_write {
        io::write_text(path, &result.document)?;
        tracing::info!(
            path = %path,
            removed_bytes = result.removed_bytes(),
            "wrote transformed file"
        );
    } else {
        tracing::debug!(
            path = %path,
            changed = result.changed(),
            dry_run = options.dry_run,
            blocked_by_strict,
            "file left untouched"
        );
    }

    Ok(FileReport {
        path: path.clone(),
        rule_set_id: rule_set.id.clone(),
        original,
        result,
        written: should_write,
    })
}

fn json_report(report: &FileReport, options: ApplyOptions) -> Value {
    let rules: Vec<Value> = report
        .result
        .reports
        .iter()
        .map(|r| match &r.outcome {
            RuleOutcome::Removed { span } => json!({
                "name": r.name,
                "kind": r.kind.as_str(),
                "status": "removed",
                "span": { "start": span.start, "end": span.end },
                "removed_bytes": span.len(),
            }),
            RuleOutcome::NotFound(reason) => json!({
                "name": r.name,
                "kind": r.kind.as_str(),
                "status": "not_found",
                "reason": reason.as_str(),
                "malformed_range": reason.is_malformed_range(),
            }),
        })
        .collect();

    json!({
        "path": report.path.as_str(),
        "rule_set": report.rule_set_id,
        "strict": options.strict,
        "dry_run": options.dry_run,
        "changed": report.result.changed(),
        "all_matched": report.result.all_matched(),
        "written": report.written,
        "removed_bytes": report.result.removed_bytes(),
        "checksum": {
            "before": checksum::compute_content_checksum(&report.original),
            "after": checksum::compute_content_checksum(&report.result.document),
        },
        "rules": rules,
    })
}

fn print_report(report: &FileReport, options: ApplyOptions) {
    let result = &report.result;

    println!(
        "{} {} ({})",
        "excise".blue().bold(),
        report.path.as_str().yellow(),
        report.rule_set_id.cyan()
    );

    for r in &result.reports {
        match &r.outcome {
            RuleOutcome::Removed { span } => println!(
                "  {} {:<22} removed {} bytes",
                "✓".green(),
                r.name,
                span.len()
            ),
            RuleOutcome::NotFound(reason) => println!(
                "  {} {:<22} {}",
                "✗".red(),
                r.name,
                format!("not found: {}", reason).red()
            ),
        }
    }

    let matched = result.reports.iter().filter(|r| r.outcome.is_removed()).count();
    println!();
    println!(
        "Matched {} of {} rules, removed {} bytes ({} lines).",
        matched,
        result.reports.len(),
        result.removed_bytes(),
        diff::removed_lines(&report.original, &result.document)
    );

    let before = checksum::compute_content_checksum(&report.original);
    if result.changed() {
        let after = checksum::compute_content_checksum(&result.document);
        println!("Checksum: {} -> {}", before, after);
    } else {
        println!("Checksum: {}", before);
    }

    if options.dry_run {
        let label = report.path.file_name().unwrap_or(report.path.as_str());
        let rendered = diff::unified(
            label,
            &report.original,
            &result.document,
            diff::DEFAULT_CONTEXT,
        );
        if !rendered.is_empty() {
            println!();
            print!("{}", rendered);
        }
        println!("{} no changes written.", "Dry run:".yellow().bold());
    } else if report.written {
        println!(
            "{} {}",
            "Wrote".green().bold(),
            report.path.as_str()
        );
    } else if options.strict && !result.all_matched() {
        println!("{} file left untouched.", "Strict mode:".red().bold());
    } else {
        println!("{} nothing to remove.", "OK".green().bold());
    }
}
