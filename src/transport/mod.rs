//! # Printer Transport Layer
//!
//! Moves encoded receipts to a printer. Rendering never touches this layer;
//! it only ever sees finished byte buffers.
//!
//! ## Available Transports
//!
//! - [`bluetooth`]: Bluetooth RFCOMM serial devices (Linux)
//! - [`memory`]: in-process recorder for tests and dry runs
//!
//! ## Sessions
//!
//! Transports are blocking and single-owner. [`session::PrinterSession`]
//! wraps one in an async actor with an explicit [`state::ConnectionState`]
//! machine, so callers get `Busy` / `NotConnected` answers instead of racing
//! each other on a shared device.

pub mod bluetooth;
pub mod memory;
pub mod session;
pub mod state;

pub use bluetooth::BluetoothTransport;
pub use memory::MemoryTransport;
pub use session::{Notification, PrinterSession, SessionHandle};
pub use state::ConnectionState;

use std::io;
use std::time::Duration;

use thiserror::Error;

/// How long a device scan runs by default.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(5);

/// A printer found by [`Transport::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// What [`Transport::connect`] needs: a device path or an address.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Bluetooth address, when known.
    pub address: Option<String>,
}

impl DiscoveredDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: None,
        }
    }
}

/// Acknowledgement of a completed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Bytes handed to the device.
    pub bytes: usize,
}

/// Errors from transports and sessions.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not connected to a printer")]
    NotConnected,

    /// Another write is still in flight.
    #[error("a write is already in progress")]
    Busy,

    #[error("a device scan is already running")]
    AlreadyScanning,

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("write failed: {0}")]
    Write(String),

    /// The request makes no sense in the current connection state.
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: ConnectionState,
    },

    /// The session task stopped or a worker died.
    #[error("printer session closed")]
    SessionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A blocking byte channel to a printer.
///
/// Implementations are driven from one thread at a time; [`PrinterSession`]
/// runs every call on the blocking pool.
pub trait Transport: Send + 'static {
    /// List reachable printers, taking at most `timeout`.
    fn scan(&mut self, timeout: Duration) -> Result<Vec<DiscoveredDevice>, TransportError>;

    /// Open a channel to `device`, replacing any open one.
    fn connect(&mut self, device: &DiscoveredDevice) -> Result<(), TransportError>;

    /// Close the channel. Closing an idle transport is not an error.
    fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Send `data` in full.
    fn write(&mut self, data: &[u8]) -> Result<Ack, TransportError>;
}
