//! Locale-aware ordering for namespace names.
//!
//! Approximates the root collation JavaScript's `localeCompare` applies:
//! whitespace and punctuation sort before digits, digits before letters, and
//! letters compare case-insensitively with lowercase winning ties.
//! Accented letters are weighted by their lowercased code point, so `é`
//! sorts after `z` instead of next to `e` as a full ICU collator would.

use std::cmp::Ordering;

/// Punctuation in root-collation order.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Space,
    Punctuation,
    Symbol,
    Digit,
    Letter,
}

fn primary(c: char) -> (Class, u32) {
    if c.is_whitespace() {
        (Class::Space, c as u32)
    } else if let Some(pos) = PUNCTUATION_ORDER.find(c) {
        (Class::Punctuation, pos as u32)
    } else if c.is_numeric() {
        (Class::Digit, c as u32)
    } else if c.is_alphabetic() {
        (Class::Letter, c.to_lowercase().next().unwrap_or(c) as u32)
    } else {
        (Class::Symbol, c as u32)
    }
}

fn tertiary(c: char) -> u8 {
    if c.is_uppercase() {
        1
    } else {
        0
    }
}

/// Compare two strings the way a default locale collator would.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary)
        .cmp(b.chars().map(primary))
        .then_with(|| a.chars().map(tertiary).cmp(b.chars().map(tertiary)))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| locale_cmp(a, b));
        names
    }

    #[test]
    fn test_empty_sorts_first() {
        assert_eq!(sorted(vec!["server", "", "client"]), vec!["", "client", "server"]);
    }

    #[test]
    fn test_prefix_sorts_before_extension() {
        assert_eq!(
            sorted(vec!["server.core", "server", "serverx"]),
            vec!["server", "server.core", "serverx"]
        );
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(sorted(vec!["b", "A", "a", "B"]), vec!["a", "A", "b", "B"]);
        assert_eq!(sorted(vec!["Zeta", "alpha"]), vec!["alpha", "Zeta"]);
    }

    #[test]
    fn test_digits_before_letters() {
        assert_eq!(sorted(vec!["a", "1", "_"]), vec!["_", "1", "a"]);
    }

    #[test]
    fn test_accented_letters_by_code_point() {
        assert_eq!(sorted(vec!["\u{e9}t\u{e9}", "zone", "ete"]), vec!["ete", "zone", "\u{e9}t\u{e9}"]);
    }

    #[test]
    fn test_equal_strings() {
        assert_eq!(locale_cmp("db", "db"), Ordering::Equal);
    }
}
