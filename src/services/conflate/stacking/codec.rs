//! Stack key codec.
//!
//! A stack key lists its member registry IDs with consecutive runs
//! collapsed: `stack(1-3,5)`. Once that text would reach the length budget
//! the key becomes a hash of the member list, `stack[1x9z2k]`, and the
//! members can no longer be recovered.

use crate::types::address::RegistryId;

/// Largest range a decoded key may expand to.
const MAX_RANGE_SPAN: u64 = 100_000;

/// Result of decoding a stack key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackDecode {
    Members(Vec<RegistryId>),
    /// Well-formed hashed key; members are unrecoverable.
    Hashed,
    Invalid,
}

/// Whether a registry key claims to be a stack key. Claiming does not mean
/// it decodes.
pub fn is_stack_id(id: &str) -> bool {
    id.starts_with("stack")
}

/// Encode member IDs as a stack key. `budget` is the length at which the
/// key switches to the hashed form.
pub fn encode<S: AsRef<str>>(ids: &[S], budget: usize) -> RegistryId {
    let mut sorted: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    sorted.sort_by(|a, b| compare_ids(a, b));
    sorted.dedup();

    let ranged = format!("stack({})", collapse_runs(&sorted).join(","));
    if ranged.len() < budget {
        return ranged;
    }

    let hash = java_hash(&sorted.join(","));
    log::warn!(
        "Stack of {} members exceeds {} chars, members will be unrecoverable from its key",
        sorted.len(),
        budget
    );
    format!("stack[{}]", to_base36(hash))
}

pub fn decode(id: &str) -> StackDecode {
    if let Some(inner) = id.strip_prefix("stack[").and_then(|s| s.strip_suffix(']')) {
        if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_alphanumeric()) {
            return StackDecode::Hashed;
        }
        return StackDecode::Invalid;
    }

    let Some(inner) = id.strip_prefix("stack(").and_then(|s| s.strip_suffix(')')) else {
        return StackDecode::Invalid;
    };
    if inner.is_empty() {
        return StackDecode::Invalid;
    }

    let mut members = Vec::new();
    for part in inner.split(',') {
        match part.split_once('-') {
            Some((from, to)) => {
                let (Some(from), Some(to)) = (parse_id(from), parse_id(to)) else {
                    return StackDecode::Invalid;
                };
                if from > to || to - from > MAX_RANGE_SPAN {
                    return StackDecode::Invalid;
                }
                members.extend((from..=to).map(|n| n.to_string()));
            }
            None if !part.is_empty() && !part.contains(['(', ')', '[', ']']) => {
                members.push(part.to_string());
            }
            None => return StackDecode::Invalid,
        }
    }
    StackDecode::Members(members)
}

/// Numeric IDs first in numeric order, anything else after in text order.
fn compare_ids(a: &str, b: &str) -> std::cmp::Ordering {
    match (parse_id(a), parse_id(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Canonical decimal IDs only. `007` stays text so it survives a round trip.
fn parse_id(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if id.len() > 1 && id.starts_with('0') {
        return None;
    }
    id.parse().ok()
}

fn collapse_runs(sorted: &[&str]) -> Vec<String> {
    let mut parts = Vec::new();
    let mut run: Option<(u64, u64)> = None;

    let flush = |run: &mut Option<(u64, u64)>, parts: &mut Vec<String>| {
        if let Some((from, to)) = run.take() {
            if from == to {
                parts.push(from.to_string());
            } else {
                parts.push(format!("{from}-{to}"));
            }
        }
    };

    for id in sorted {
        match parse_id(id) {
            Some(n) => match run {
                Some((from, to)) if to + 1 == n => run = Some((from, n)),
                _ => {
                    flush(&mut run, &mut parts);
                    run = Some((n, n));
                }
            },
            None => {
                flush(&mut run, &mut parts);
                parts.push((*id).to_string());
            }
        }
    }
    flush(&mut run, &mut parts);
    parts
}

/// `h = h * 31 + code_unit` over UTF-16 code units, wrapping at 32 bits.
fn java_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
