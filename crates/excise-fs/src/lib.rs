//! File access for excise
//!
//! Reads target documents as UTF-8 text, writes them back atomically, and
//! loads rule-set files in whichever format their extension names.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
