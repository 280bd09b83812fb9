//! Command implementations for excise-cli

pub mod apply;
pub mod rules;

pub use apply::{ApplyOptions, run_apply};
pub use rules::{run_list_rules, run_show_rules};
