//! Diacritic-aware name comparison for streets, suburbs and towns.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

/// Matches the standalone word `Saint`.
static RE_SAINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSaint\b").expect("Invalid regex"));

/// Collapse `Saint` to `St`, the one abbreviation both datasets disagree on.
pub fn normalize_saint(name: &str) -> String {
    RE_SAINT.replace_all(name.trim(), "St").to_string()
}

/// Strip diacritics (`Ōtaki` → `Otaki`).
pub fn fold_diacritics(name: &str) -> String {
    deunicode(name)
}

/// Compare a registry name with what the map shows.
///
/// The registry is authoritative on spelling, but a map value that only adds
/// diacritics the registry lacks is accepted. A map value missing diacritics
/// the registry has is not equal, so it gets reported and fixed.
pub fn names_match(registry: &str, target: &str) -> bool {
    let registry = normalize_saint(registry);
    let target = normalize_saint(target);
    if registry == target {
        return true;
    }
    fold_diacritics(&target) == registry
}

#[cfg(test)]
#[path = "tests/names_tests.rs"]
mod tests;
