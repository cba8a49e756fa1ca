//! IRC case-mapping functions.
//!
//! Nicknames and channel names compare case-insensitively under the
//! `rfc1459` mapping: ASCII letters fold to lowercase and the characters
//! `[]\~` are the uppercase forms of `{}|^`.

/// Fold a single character under RFC 1459 case mapping.
#[inline]
fn fold(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        'A'..='Z' => c.to_ascii_lowercase(),
        _ => c,
    }
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
///
/// The result is the key used by the channel registry for both channel
/// names and nicknames.
pub fn irc_to_lower(s: &str) -> String {
    s.chars().map(fold).collect()
}

/// Compare two strings using IRC case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().zip(b.chars()).all(|(x, y)| fold(x) == fold(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_ascii() {
        assert_eq!(irc_to_lower("#Rust-Lang"), "#rust-lang");
    }

    #[test]
    fn test_rfc1459_specials() {
        assert_eq!(irc_to_lower("[Away]\\~"), "{away}|^");
        assert!(irc_eq("Nick[m]", "nick{M}"));
        assert!(irc_eq("a\\b~", "A|B^"));
    }

    #[test]
    fn test_non_ascii_untouched() {
        assert_eq!(irc_to_lower("ÄÖ"), "ÄÖ");
        assert!(!irc_eq("bob", "bobby"));
        assert!(!irc_eq("bob", "rob"));
    }
}
