//! # Printer Code Page
//!
//! Receipt printers sold for the local market ship with the CP866 (DOS
//! Cyrillic) character table, which covers ASCII plus the Russian/Uzbek
//! Cyrillic alphabet. Both protocols print text through this code page.
//!
//! Text goes through [`sanitize`] first, which respells the Uzbek and
//! Turkic letters CP866 lacks. Whatever is still not representable is
//! dropped with a warning. The template runs [`printable`] before layout,
//! so column widths are measured on exactly the characters that print.
//!
//! ```
//! use chekprint::protocol::encoding;
//!
//! assert_eq!(encoding::encode("Нон"), vec![0x8D, 0xAE, 0xAD]);
//! assert_eq!(encoding::printable("caf\u{e9}"), "caf");
//! ```

use encoding_rs::{Encoding, IBM866_INIT};
use tracing::warn;

use crate::layout::sanitize;

/// Code page used for printed text.
pub static CODE_PAGE: &Encoding = &IBM866_INIT;

/// Whether `ch` prints as one column in [`CODE_PAGE`].
pub fn is_printable(ch: char) -> bool {
    if ch.is_control() {
        return false;
    }
    if ch.is_ascii() {
        return true;
    }
    let mut buf = [0u8; 4];
    let (_, _, had_errors) = CODE_PAGE.encode(ch.encode_utf8(&mut buf));
    !had_errors
}

/// Sanitize `text` and drop characters the printer cannot print.
pub fn printable(text: &str) -> String {
    let sanitized = sanitize(text);
    if sanitized.chars().all(is_printable) {
        return sanitized;
    }

    let mut out = String::with_capacity(sanitized.len());
    for ch in sanitized.chars() {
        if is_printable(ch) {
            out.push(ch);
        } else {
            warn!(
                "unprintable character '{}' (U+{:04X}) dropped",
                ch.escape_debug(),
                ch as u32
            );
        }
    }
    out
}

/// Convert already-printable text to code page bytes.
///
/// ASCII passes through unchanged, so protocol framing (quotes, CRLF) can
/// be converted together with the content it wraps.
pub fn to_code_page(text: &str) -> Vec<u8> {
    let (bytes, _, _) = CODE_PAGE.encode(text);
    bytes.into_owned()
}

/// Encode `text` as printer bytes, one byte per printed column.
pub fn encode(text: &str) -> Vec<u8> {
    to_code_page(&printable(text))
}
