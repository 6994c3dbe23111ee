//! Output grouping for converted messages.
//!
//! Cipher text is traditionally written in fixed-width groups so that word
//! boundaries do not leak. The machine itself returns ungrouped symbols;
//! grouping is applied only when text is presented.

/// Group width used by the command-line tool.
pub const DEFAULT_GROUP: usize = 5;

/// Splits `text` into space-separated groups of `width` symbols.
///
/// The last group may be shorter. A `width` of 0 returns `text` unchanged.
///
/// # Parameters
/// - `text`: Ungrouped symbols, as returned by
///   [`Machine::convert_message`](crate::Machine::convert_message).
/// - `width`: Number of symbols per group.
///
/// # Returns
/// The grouped text, without trailing space.
///
/// # Examples
///
/// ```
/// use enigma::utils::format::group;
///
/// assert_eq!(group("QVPQSOKOILPUBKJZPISFXDW", 5), "QVPQS OKOIL PUBKJ ZPISF XDW");
/// ```
pub fn group(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let mut output = String::with_capacity(text.len() + text.len() / width);
    for (i, symbol) in text.chars().enumerate() {
        if i > 0 && i % width == 0 {
            output.push(' ');
        }
        output.push(symbol);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_exact_multiple() {
        assert_eq!(group("ABCDEFGHIJ", 5), "ABCDE FGHIJ");
    }

    #[test]
    fn test_group_short_tail() {
        assert_eq!(group("ABCDEFG", 3), "ABC DEF G");
    }

    #[test]
    fn test_group_empty() {
        assert_eq!(group("", 5), "");
    }

    #[test]
    fn test_group_shorter_than_width() {
        assert_eq!(group("ABC", 5), "ABC");
    }

    #[test]
    fn test_group_zero_width() {
        assert_eq!(group("ABCDEFG", 0), "ABCDEFG");
    }

    #[test]
    fn test_group_multibyte_symbols() {
        assert_eq!(group("ÄÖÜßÄÖ", 2), "ÄÖ Üß ÄÖ");
    }
}
