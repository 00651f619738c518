//! # chekprint - Receipt Layout for 58mm Thermal Printers
//!
//! chekprint turns point-of-sale receipt records into printer command bytes.
//! It provides:
//!
//! - **Layout**: fixed-width wrapping, padding, centering, justification
//! - **Templates**: the standard sale/purchase receipt, or caller-defined
//!   element lists
//! - **Protocols**: ESC/POS for receipt printers, TSPL for label printers
//! - **Transport**: Bluetooth RFCOMM with an async printer session
//!
//! ## Quick Start
//!
//! ```no_run
//! use chekprint::{
//!     engine,
//!     printer::Profile,
//!     transport::{BluetoothTransport, Transport},
//! };
//!
//! let json = r#"{
//!     "companyName": "Baraka Savdo",
//!     "transactionId": "1042",
//!     "products": [{"name": "Non", "quantity": 2, "price": 3000}],
//!     "finalAmount": 6000
//! }"#;
//!
//! // Lay out and encode for a receipt printer
//! let bytes = engine::render_json(json, &Profile::Character)?;
//!
//! // Send to printer
//! let mut transport = BluetoothTransport::open("/dev/rfcomm0")?;
//! transport.write(&bytes)?;
//!
//! # Ok::<(), chekprint::error::ChekError>(())
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ReceiptDocument ──template──▶ Program (elements) ──codegen──▶ bytes
//!      (serde)                  (laid-out lines)         (ESC/POS | TSPL)
//! ```
//!
//! Everything up to the bytes is pure and deterministic. Only
//! [`transport`] does I/O.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Input records and lenient JSON parsing |
//! | [`template`] | Business template and element overrides |
//! | [`layout`] | Text wrapping, padding, transliteration |
//! | [`currency`] | Amount and quantity formatting |
//! | [`ir`] | Element model and protocol codegen |
//! | [`protocol`] | ESC/POS and TSPL command builders |
//! | [`printer`] | Printer profiles |
//! | [`engine`] | Document-to-bytes facade |
//! | [`transport`] | Communication backends and sessions |
//! | [`error`] | Error types |

pub mod currency;
pub mod document;
pub mod engine;
pub mod error;
pub mod ir;
pub mod layout;
pub mod printer;
pub mod protocol;
pub mod template;
pub mod transport;

// Re-exports for convenience
pub use document::ReceiptDocument;
pub use error::{ChekError, StructuralError};
pub use printer::Profile;
pub use transport::BluetoothTransport;
