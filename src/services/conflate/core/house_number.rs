//! House number parsing: `12`, `12A`, `3/12`, `3/12A`.

use regex::Regex;
use std::sync::LazyLock;

static RE_HOUSE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([0-9A-Za-z]+)/)?([0-9]+)([A-Za-z]?)$").expect("Invalid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseNumber {
    /// Unit before the slash, if any.
    pub unit: Option<String>,
    pub number: String,
    /// Letter suffix, uppercased.
    pub suffix: Option<char>,
}

impl HouseNumber {
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = RE_HOUSE_NUMBER.captures(raw.trim())?;
        Some(Self {
            unit: caps.get(1).map(|m| m.as_str().to_string()),
            number: caps.get(2)?.as_str().to_string(),
            suffix: caps
                .get(3)
                .and_then(|m| m.as_str().chars().next())
                .map(|c| c.to_ascii_uppercase()),
        })
    }

    /// `{parent}{letter}` form, e.g. `12B`.
    pub fn is_letter_form(&self, parent: &str, letter: char) -> bool {
        self.unit.is_none() && self.number == parent && self.suffix == Some(letter)
    }

    /// `{unit}/{parent}` form, e.g. `2/12`.
    pub fn is_slash_form(&self, parent: &str, unit: usize) -> bool {
        self.suffix.is_none()
            && self.number == parent
            && self.unit.as_deref() == Some(unit.to_string().as_str())
    }
}

/// Letter used for the n-th unit (1 → `A`). `None` past `Z`.
pub fn unit_letter(index: usize) -> Option<char> {
    if index == 0 || index > 26 {
        return None;
    }
    char::from_u32('A' as u32 + index as u32 - 1)
}

#[cfg(test)]
#[path = "tests/house_number_tests.rs"]
mod tests;
