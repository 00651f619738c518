//! # Engine
//!
//! One call from document to printer bytes: validate, lay out, encode.
//!
//! ```
//! use chekprint::document::{LineItem, ReceiptDocument};
//! use chekprint::engine;
//! use chekprint::printer::Profile;
//!
//! let doc = ReceiptDocument {
//!     products: vec![LineItem::new("Non", 1.0, 3000.0)],
//!     final_amount: 3000.0,
//!     ..Default::default()
//! };
//! let bytes = engine::render(&doc, &Profile::Character).unwrap();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```
//!
//! Rendering is pure: no I/O, no clock, no shared state. The same document
//! and profile always produce the same bytes, and independent documents can
//! be rendered from any number of threads.

use tracing::debug;

use crate::document::ReceiptDocument;
use crate::error::{ChekError, StructuralError};
use crate::printer::Profile;
use crate::template::{self, Labels};

/// Render a document to protocol bytes.
pub fn render(doc: &ReceiptDocument, profile: &Profile) -> Result<Vec<u8>, StructuralError> {
    render_with(doc, profile, &Labels::default())
}

/// Render a document to protocol bytes with caller-supplied labels.
pub fn render_with(
    doc: &ReceiptDocument,
    profile: &Profile,
    labels: &Labels,
) -> Result<Vec<u8>, StructuralError> {
    let program = template::render_with(doc, labels)?;
    let bytes = program.to_bytes(profile);
    debug!(
        transaction = doc.transaction_id(),
        profile = profile.name(),
        bytes = bytes.len(),
        "receipt ready"
    );
    Ok(bytes)
}

/// Parse a JSON document and render it.
pub fn render_json(json: &str, profile: &Profile) -> Result<Vec<u8>, ChekError> {
    let doc = ReceiptDocument::from_json(json)?;
    Ok(render(&doc, profile)?)
}
