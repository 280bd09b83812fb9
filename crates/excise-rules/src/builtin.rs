//! Built-in rule sets for retiring the `CustomerMeasurements` table.
//!
//! One set cleans the schema snapshot, the other cuts the table's section
//! out of the consolidated init migration.

use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::rule::{RemovalRule, RuleEntry};
use crate::ruleset::RuleSet;

pub const SNAPSHOT_ID: &str = "customer-measurements-snapshot";
pub const MIGRATION_ID: &str = "customer-measurements-migration";

const DROP_TABLE: &str = "DROP TABLE IF EXISTS \"CustomerMeasurements\" CASCADE;\n";
const TABLE_BLOCK_START: &str = "-- CustomerMeasurements (NEW)\n";
// Stops after the tenantId index line; the blank line before `-- Order` stays.
const TABLE_BLOCK_END: &str = "\n-- Order\n";
const ENABLE_RLS: &str = "ALTER TABLE \"CustomerMeasurements\" ENABLE ROW LEVEL SECURITY;\n";
const TENANT_POLICY: &str = concat!(
    "-- CustomerMeasurements\n",
    "CREATE POLICY \"Tenant isolation for CustomerMeasurements\" ON \"CustomerMeasurements\"\n",
    "  USING (\"tenantId\" = get_current_tenant_id())\n",
    "  WITH CHECK (\"tenantId\" = get_current_tenant_id());\n",
);

const MIGRATION_START: &str = "-- Original Migration: 20260205000002_customer_measurements.sql";
const MIGRATION_END: &str = "-- Original Migration: 20260206000002_add_discounts.sql";

static CATALOG: LazyLock<Vec<RuleSet>> = LazyLock::new(|| {
    vec![
        RuleSet::new(
            SNAPSHOT_ID,
            "Remove the CustomerMeasurements table, its indexes, RLS and policy from schema_snapshot.sql",
            vec![
                RuleEntry::new("drop-table", RemovalRule::literal(DROP_TABLE)),
                RuleEntry::new(
                    "table-block",
                    RemovalRule::range(TABLE_BLOCK_START, TABLE_BLOCK_END),
                ),
                RuleEntry::new("enable-rls", RemovalRule::literal(ENABLE_RLS)),
                RuleEntry::new("tenant-policy", RemovalRule::literal(TENANT_POLICY)),
            ],
        ),
        RuleSet::new(
            MIGRATION_ID,
            "Remove the customer_measurements section from the consolidated init migration",
            vec![RuleEntry::new(
                "measurements-section",
                RemovalRule::range(MIGRATION_START, MIGRATION_END),
            )],
        ),
    ]
});

/// All built-in rule sets, in a stable order.
pub fn catalog() -> &'static [RuleSet] {
    &CATALOG
}

/// Look up a built-in rule set by id.
///
/// # Errors
/// Returns `Error::UnknownRuleSet` if no built-in has that id.
pub fn lookup(id: &str) -> Result<&'static RuleSet> {
    catalog()
        .iter()
        .find(|set| set.id == id)
        .ok_or_else(|| Error::UnknownRuleSet { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid() {
        for set in catalog() {
            set.validate().unwrap();
        }
    }

    #[test]
    fn lookup_unknown_fails() {
        assert!(matches!(
            lookup("customer-orders"),
            Err(Error::UnknownRuleSet { id }) if id == "customer-orders"
        ));
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(lookup(MIGRATION_ID).unwrap().rules.len(), 1);
        assert_eq!(lookup(SNAPSHOT_ID).unwrap().rules.len(), 4);
    }
}
