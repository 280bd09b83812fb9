//! Rule-set inspection commands

use colored::Colorize;
use excise_rules::builtin;
use serde_json::json;

use crate::error::Result;

/// Run the list-rules command
pub fn run_list_rules(json: bool) -> Result<()> {
    let catalog = builtin::catalog();

    if json {
        let sets: Vec<_> = catalog
            .iter()
            .map(|set| {
                json!({
                    "id": set.id,
                    "description": set.description,
                    "rules": set.rules.iter().map(|r| json!({
                        "name": r.name,
                        "kind": r.rule.kind().as_str(),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sets)?);
        return Ok(());
    }

    println!("{}", "Built-in Rule Sets".bold());
    println!();
    for set in catalog {
        println!("  {}", set.id.green().bold());
        println!("    {}", set.description);
        for entry in &set.rules {
            println!(
                "      {:<22} {}",
                entry.name.cyan(),
                entry.rule.summary().dimmed()
            );
        }
        println!();
    }
    println!(
        "Use {} to print a rule set as a rules file.",
        "excise show-rules <ID>".cyan()
    );

    Ok(())
}

/// Run the show-rules command
pub fn run_show_rules(id: &str) -> Result<()> {
    print!("{}", render_rule_set(id)?);
    Ok(())
}

fn render_rule_set(id: &str) -> Result<String> {
    let set = builtin::lookup(id)?;
    Ok(toml::to_string_pretty(set)?)
}
