//! # Printer Protocols
//!
//! Low-level command builders for the two wire protocols.
//!
//! ## Module Structure
//!
//! - [`escpos`]: character-oriented escape sequences (receipt printers)
//! - [`tspl`]: textual label directives (label printers)
//! - [`encoding`]: text to CP866 code page bytes
//!
//! ## Usage Example
//!
//! ```
//! use chekprint::ir::Alignment;
//! use chekprint::protocol::{encoding, escpos};
//!
//! let mut data = Vec::new();
//! data.extend(escpos::init());
//! data.extend(escpos::align(Alignment::Center));
//! data.extend(escpos::bold(true));
//! data.extend(encoding::encode("DO'KON"));
//! data.push(escpos::LF);
//! data.extend(escpos::bold(false));
//! data.extend(escpos::cut_partial());
//! ```
//!
//! Higher-level encoding of a whole receipt lives in [`crate::ir::encode`].

pub mod encoding;
pub mod escpos;
pub mod tspl;
