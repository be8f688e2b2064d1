// src/core/sanitize.rs

/// Collapse whitespace runs (including newlines from markup) into single spaces.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Collection membership by display name: starts with "affe mit" in any case,
/// or with exactly "Affe #".
pub fn is_affe_name(name: &str) -> bool {
    use crate::config::consts::{NAME_PREFIX_ANY_CASE, NAME_PREFIX_EXACT};
    let n = NAME_PREFIX_ANY_CASE.len();
    let any_case = name
        .get(..n)
        .is_some_and(|head| head.eq_ignore_ascii_case(NAME_PREFIX_ANY_CASE));
    any_case || name.starts_with(NAME_PREFIX_EXACT)
}
