//! Unified diff preview of a transformation.

use similar::{ChangeTag, TextDiff};

/// Lines of unchanged context shown around each hunk.
pub const DEFAULT_CONTEXT: usize = 3;

/// Render a unified diff between the original and transformed document.
///
/// Returns an empty string when the two are identical.
pub fn unified(label: &str, old: &str, new: &str, context: usize) -> String {
    if old == new {
        return String::new();
    }

    let text_diff = TextDiff::from_lines(old, new);
    text_diff
        .unified_diff()
        .context_radius(context)
        .header(&format!("a/{}", label), &format!("b/{}", label))
        .to_string()
}

/// Number of lines the transformation deleted.
pub fn removed_lines(old: &str, new: &str) -> usize {
    TextDiff::from_lines(old, new)
        .iter_all_changes()
        .filter(|change| change.tag() == ChangeTag::Delete)
        .count()
}
