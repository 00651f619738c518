//! # Transliteration
//!
//! Maps the handful of non-ASCII letters that show up in Uzbek receipt data
//! to the nearest ASCII spelling so the printer's character table can print
//! them. This is a fixed table, not general text shaping.
//!
//! Every replacement is plain ASCII, so applying [`sanitize`] twice gives
//! the same result as applying it once.

/// Look up the ASCII replacement for a single character.
///
/// Returns `None` for characters that pass through unchanged.
fn replacement(ch: char) -> Option<&'static str> {
    let s = match ch {
        // Apostrophe variants (o‘zbek, g‘isht, ...)
        '\u{02BB}' => "'", // ʻ modifier letter turned comma
        '\u{02BC}' => "'", // ʼ modifier letter apostrophe
        '\u{2018}' => "'", // ‘
        '\u{2019}' => "'", // ’
        '\u{0060}' => "'", // `
        '\u{00B4}' => "'", // ´

        // Uzbek Cyrillic letters without a Latin look-alike
        'ҳ' => "h",
        'Ҳ' => "H",
        'қ' => "q",
        'Қ' => "Q",
        'ғ' => "g'",
        'Ғ' => "G'",
        'ў' => "u",
        'Ў' => "U",

        // Older Turkic-style Latin spellings
        'ş' => "sh",
        'Ş' => "Sh",
        'ç' => "ch",
        'Ç' => "Ch",
        'ğ' => "g'",
        'Ğ' => "G'",
        'ö' => "o'",
        'Ö' => "O'",
        'ü' => "u",
        'Ü' => "U",
        'ı' => "i",

        _ => return None,
    };
    Some(s)
}

/// Replace known problem characters with ASCII equivalents.
///
/// Characters outside the table are left alone; whether they can be printed
/// is decided later by [`crate::protocol::encoding`].
///
/// ## Example
///
/// ```
/// use chekprint::layout::sanitize;
///
/// assert_eq!(sanitize("Oʻzbekiston"), "O'zbekiston");
/// assert_eq!(sanitize("ҳисоб"), "hисоб");
/// ```
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match replacement(ch) {
            Some(s) => out.push_str(s),
            None => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_apostrophes() {
        assert_eq!(sanitize("gʻisht oʼrik ‘a’ `b´"), "g'isht o'rik 'a' 'b'");
    }

    #[test]
    fn test_cyrillic_letters() {
        assert_eq!(sanitize("ҳ қ ғ ў"), "h q g' u");
        assert_eq!(sanitize("Ҳ Қ Ғ Ў"), "H Q G' U");
    }

    #[test]
    fn test_latin_extended() {
        assert_eq!(sanitize("şaftoli çoy ğalla"), "shaftoli choy g'alla");
    }

    #[test]
    fn test_ascii_untouched() {
        assert_eq!(sanitize("Chek raqami: 123"), "Chek raqami: 123");
    }

    #[test]
    fn test_unknown_non_ascii_untouched() {
        assert_eq!(sanitize("café"), "café");
    }

    proptest! {
        #[test]
        fn prop_idempotent(s in "\\PC{0,64}") {
            let once = sanitize(&s);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn prop_idempotent_on_table_chars(s in "[ʻʼ‘’`´ҳҲқҚғҒўЎşŞçÇğĞöÖüÜı a-z]{0,40}") {
            let once = sanitize(&s);
            prop_assert!(once.is_ascii());
            prop_assert_eq!(sanitize(&once), once);
        }
    }
}
