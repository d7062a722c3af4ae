//! Simulation-config rewriting: a literal substring substitution.

use tracing::{debug, warn};

/// Number of literal occurrences of `reference` in `text`.
pub fn count_references(text: &str, reference: &str) -> usize {
    if reference.is_empty() {
        return 0;
    }
    text.matches(reference).count()
}

/// Replace every literal occurrence of `old_ref` with `new_ref`.
///
/// A missing anchor is not an error: the text comes back unchanged (and so
/// still points at the original network), with a warning logged.
pub fn point_at(config_text: &str, old_ref: &str, new_ref: &str) -> String {
    match count_references(config_text, old_ref) {
        0 => {
            warn!(old_ref, new_ref, "network reference not found in configuration; left unchanged");
            config_text.to_owned()
        }
        n => {
            if n > 1 {
                debug!(old_ref, occurrences = n, "network reference occurs more than once");
            }
            config_text.replace(old_ref, new_ref)
        }
    }
}
