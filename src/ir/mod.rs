//! # Intermediate Representation (IR)
//!
//! The element stream that sits between the receipt template and the raw
//! protocol bytes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────────┐
//! │  Template   │ ──► │   Program   │ ──► │       Codegen        │
//! │ (business)  │     │(Vec<Element>│     │ ESC/POS  │  TSPL     │
//! └─────────────┘     └─────────────┘     └──────────────────────┘
//! ```
//!
//! ## Benefits of IR
//!
//! 1. **Inspectable**: `{:#?}` or [`Program::lines`] shows what will print
//! 2. **Testable**: layout is asserted without decoding printer bytes
//! 3. **Extensible**: a new protocol is one more codegen path, the template
//!    stays untouched
//!
//! ## Example
//!
//! ```
//! use chekprint::ir::{Alignment, Element, Program, TextLine};
//! use chekprint::printer::Profile;
//!
//! let mut program = Program::new();
//! program.push(TextLine::new("HELLO").align(Alignment::Center).bold());
//! program.push(Element::FeedCut { lines: 2, cut: true });
//!
//! let bytes = program.to_bytes(&Profile::Character);
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

mod codegen;
mod ops;

pub use codegen::encode;
pub use ops::*;
