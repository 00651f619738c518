//! # Grid Text Operations
//!
//! Wrapping, padding, centering, and justification over a fixed column
//! width. None of these functions truncate: text that is already wider than
//! the target width passes through unchanged.

/// Number of printable columns a string occupies.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` into lines no longer than `max_len` columns.
///
/// Words are separated on whitespace and packed greedily, one space between
/// words. A word longer than `max_len` is chopped into chunks of
/// `max_len - 1` characters, each terminated with `-`, until the remainder
/// fits on a line of its own.
///
/// Empty (or whitespace-only) input yields a single empty line, never an
/// empty vector.
///
/// ## Example
///
/// ```
/// use chekprint::layout::wrap;
///
/// assert_eq!(wrap("olma nok uzum", 8), vec!["olma nok", "uzum"]);
/// assert_eq!(wrap("", 8), vec![""]);
/// ```
pub fn wrap(text: &str, max_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = char_len(word);

        if current_len > 0 && current_len + 1 + word_len <= max_len {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }

        let mut rest: Vec<char> = word.chars().collect();
        while rest.len() > max_len {
            let (chunk, hyphen) = if max_len >= 2 {
                (max_len - 1, true)
            } else {
                // No room for a hyphen: one character per line.
                (1, false)
            };
            let mut line: String = rest[..chunk].iter().collect();
            if hyphen {
                line.push('-');
            }
            lines.push(line);
            rest.drain(..chunk);
        }

        current = rest.into_iter().collect();
        current_len = char_len(&current);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Pad `text` with spaces on the right up to `width` columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let len = char_len(text);
    if len >= width {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + width - len);
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Pad `text` with spaces on the left up to `width` columns.
pub fn pad_left(text: &str, width: usize) -> String {
    let len = char_len(text);
    if len >= width {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + width - len);
    out.extend(std::iter::repeat_n(' ', width - len));
    out.push_str(text);
    out
}

/// Center `text` in `width` columns.
///
/// The left side gets `floor((width - len) / 2)` spaces and the right side
/// the remainder, so odd slack leans right.
pub fn center(text: &str, width: usize) -> String {
    let len = char_len(text);
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    let mut out = String::with_capacity(text.len() + width - len);
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', right));
    out
}

/// Place `left` and `right` at opposite ends of a `width`-column line.
///
/// The gap is `width - len(left) - len(right)` spaces but never less than
/// one: two fields are never glued together, even when they overflow.
///
/// ## Example
///
/// ```
/// use chekprint::layout::justify;
///
/// assert_eq!(justify("a", "b", 5), "a   b");
/// assert_eq!(justify("left", "right", 4), "left right");
/// ```
pub fn justify(left: &str, right: &str, width: usize) -> String {
    let gap = width
        .saturating_sub(char_len(left) + char_len(right))
        .max(1);
    let mut out = String::with_capacity(left.len() + gap + right.len());
    out.push_str(left);
    out.extend(std::iter::repeat_n(' ', gap));
    out.push_str(right);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_packs_words() {
        assert_eq!(
            wrap("Non buxanka oq 500 gramm", 12),
            vec!["Non buxanka", "oq 500 gramm"]
        );
    }

    #[test]
    fn test_wrap_exact_fit() {
        assert_eq!(wrap("abc def", 7), vec!["abc def"]);
        assert_eq!(wrap("abc def", 6), vec!["abc", "def"]);
    }

    #[test]
    fn test_wrap_empty_input() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("   \t ", 10), vec![""]);
    }

    #[test]
    fn test_wrap_hyphenates_long_word() {
        // Chopping stops once the remainder fits.
        assert_eq!(wrap("abcdefghij", 4), vec!["abc-", "def-", "ghij"]);
        assert_eq!(wrap("abcdefghijk", 4), vec!["abc-", "def-", "ghi-", "jk"]);
    }

    #[test]
    fn test_wrap_long_word_after_short_word() {
        assert_eq!(wrap("ab cdefgh", 4), vec!["ab", "cde-", "fgh"]);
    }

    #[test]
    fn test_wrap_remainder_joins_next_word() {
        assert_eq!(wrap("abcdef g", 4), vec!["abc-", "def", "g"]);
        assert_eq!(wrap("abcde f", 4), vec!["abc-", "de f"]);
    }

    #[test]
    fn test_wrap_width_one() {
        assert_eq!(wrap("abc", 1), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        assert_eq!(wrap("ҳақ ҳақ", 7), vec!["ҳақ ҳақ"]);
    }

    #[test]
    fn test_pad_right_and_left() {
        assert_eq!(pad_right("ab", 5), "ab   ");
        assert_eq!(pad_left("ab", 5), "   ab");
        assert_eq!(pad_right("abcdef", 3), "abcdef");
        assert_eq!(pad_left("abcdef", 3), "abcdef");
    }

    #[test]
    fn test_center_odd_slack_leans_right() {
        assert_eq!(center("abc", 6), " abc  ");
        assert_eq!(center("abcd", 6), " abcd ");
    }

    #[test]
    fn test_center_overflow_passthrough() {
        assert_eq!(center("abcdefg", 4), "abcdefg");
        assert_eq!(center("abcd", 4), "abcd");
    }

    #[test]
    fn test_justify_fills_width() {
        let row = justify("Jami:", "25 000 so'm", 32);
        assert_eq!(row.len(), 32);
        assert!(row.starts_with("Jami:"));
        assert!(row.ends_with("25 000 so'm"));
    }

    #[test]
    fn test_justify_minimum_gap() {
        assert_eq!(justify("abc", "def", 6), "abc def");
        assert_eq!(justify("abcdef", "ghijkl", 6), "abcdef ghijkl");
    }

    proptest! {
        #[test]
        fn prop_wrap_lines_fit(text in "[a-z ]{0,80}", max_len in 2usize..40) {
            for line in wrap(&text, max_len) {
                prop_assert!(char_len(&line) <= max_len);
            }
        }

        #[test]
        fn prop_wrap_never_empty(text in "\\PC{0,40}", max_len in 1usize..40) {
            prop_assert!(!wrap(&text, max_len).is_empty());
        }

        #[test]
        fn prop_wrap_keeps_all_letters(text in "[a-z]{1,12}( [a-z]{1,12}){0,6}", max_len in 2usize..20) {
            let original: String = text.split_whitespace().collect();
            let rebuilt: String = wrap(&text, max_len)
                .iter()
                .map(|l| l.replace(['-', ' '], ""))
                .collect();
            prop_assert_eq!(original, rebuilt);
        }

        #[test]
        fn prop_center_exact_width(text in "[a-zA-Z0-9 ]{0,32}", extra in 0usize..16) {
            let width = char_len(&text) + extra;
            prop_assert_eq!(char_len(&center(&text, width)), width);
        }

        #[test]
        fn prop_justify_gap_at_least_one(left in "[a-z]{0,40}", right in "[a-z]{0,40}", width in 0usize..48) {
            let row = justify(&left, &right, width);
            let gap = char_len(&row) - char_len(&left) - char_len(&right);
            prop_assert!(gap >= 1);
            if char_len(&left) + char_len(&right) < width {
                prop_assert_eq!(char_len(&row), width);
            }
        }
    }
}
