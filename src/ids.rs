//! Time-based identifiers.
//!
//! Ids look like `<prefix>_<unix millis>`. When that id is already taken
//! (two creations within the same millisecond) a `_<n>` suffix is added.

use chrono::Utc;

/// Generate a fresh id for `prefix`, skipping any id for which `taken`
/// returns true.
pub fn unique_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{}_{}", prefix, Utc::now().timestamp_millis());
    if !taken(&base) {
        return base;
    }
    let mut n = 1u64;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Id prefix for an element pasted as a new copy: its type, or `elem` when
/// the type is empty or not id-safe.
pub fn element_prefix(element_type: &str) -> String {
    let cleaned: String = element_type
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "elem".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_unique_id_prefix() {
        let id = unique_id("planta", |_| false);
        assert!(id.starts_with("planta_"));
    }

    #[test]
    fn test_unique_id_skips_taken() {
        let mut seen = HashSet::new();
        for _ in 0..20 {
            let id = unique_id("buffer", |c| seen.contains(c));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_element_prefix() {
        assert_eq!(element_prefix("Mesa Redonda"), "mesa_redonda");
        assert_eq!(element_prefix(""), "elem");
        assert_eq!(element_prefix("anaquel"), "anaquel");
    }
}
