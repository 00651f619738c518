//! # Text Layout
//!
//! Pure functions that lay text out on a fixed character grid.
//!
//! A 58mm thermal printer prints 32 columns of Font A, so every receipt
//! line is built by padding, centering, or justifying text to exactly that
//! many characters. Widths are counted in `char`s, not bytes.
//!
//! ## Module Structure
//!
//! - [`text`]: wrapping, padding, centering, justification
//! - [`sanitize`]: transliteration of a small alphabet subset to ASCII
//!
//! ## Example
//!
//! ```
//! use chekprint::layout;
//!
//! assert_eq!(layout::center("OK", 6), "  OK  ");
//! assert_eq!(layout::justify("Jami:", "100", 12), "Jami:    100");
//! assert_eq!(layout::wrap("abcdefgh", 4), vec!["abc-", "def-", "gh"]);
//! ```

pub mod sanitize;
pub mod text;

pub use sanitize::sanitize;
pub use text::{center, char_len, justify, pad_left, pad_right, wrap};
