//! # In-Memory Transport
//!
//! Records written bytes instead of sending them. Clones share the same
//! buffer, so a test can keep one clone and hand the other to a session.
//!
//! ```
//! use chekprint::transport::{DiscoveredDevice, MemoryTransport, Transport};
//!
//! let printer = DiscoveredDevice::new("mem0", "Test printer");
//! let mut transport = MemoryTransport::with_devices(vec![printer.clone()]);
//! let probe = transport.clone();
//!
//! transport.connect(&printer).unwrap();
//! transport.write(b"hello").unwrap();
//! assert_eq!(probe.written(), b"hello");
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use super::{Ack, DiscoveredDevice, Transport, TransportError};

#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    devices: Vec<DiscoveredDevice>,
    connected: Option<String>,
    written: Arc<Mutex<Vec<u8>>>,
    write_delay: Duration,
    fail_writes: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose scans report `devices`.
    pub fn with_devices(devices: Vec<DiscoveredDevice>) -> Self {
        Self {
            devices,
            ..Default::default()
        }
    }

    /// Hold every write for `delay` before completing it.
    pub fn write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    /// Make every write fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// All bytes written so far, across clones.
    pub fn written(&self) -> Vec<u8> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Id of the connected device.
    pub fn connected_to(&self) -> Option<&str> {
        self.connected.as_deref()
    }
}

impl Transport for MemoryTransport {
    fn scan(&mut self, _timeout: Duration) -> Result<Vec<DiscoveredDevice>, TransportError> {
        Ok(self.devices.clone())
    }

    fn connect(&mut self, device: &DiscoveredDevice) -> Result<(), TransportError> {
        if !self.devices.is_empty() && !self.devices.iter().any(|d| d.id == device.id) {
            return Err(TransportError::DeviceNotFound(device.id.clone()));
        }
        self.connected = Some(device.id.clone());
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected = None;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<Ack, TransportError> {
        if self.connected.is_none() {
            return Err(TransportError::NotConnected);
        }
        if !self.write_delay.is_zero() {
            thread::sleep(self.write_delay);
        }
        if self.fail_writes {
            return Err(TransportError::Write("device went away".into()));
        }
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(Ack { bytes: data.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_device_rejected() {
        let mut transport = MemoryTransport::with_devices(vec![DiscoveredDevice::new("a", "A")]);
        assert!(matches!(
            transport.connect(&DiscoveredDevice::new("b", "B")),
            Err(TransportError::DeviceNotFound(_))
        ));
        assert_eq!(transport.connected_to(), None);
    }

    #[test]
    fn test_write_requires_connection() {
        let mut transport = MemoryTransport::new();
        assert!(matches!(transport.write(b"x"), Err(TransportError::NotConnected)));
        transport.connect(&DiscoveredDevice::new("any", "Any")).unwrap();
        assert_eq!(transport.write(b"xy").unwrap(), Ack { bytes: 2 });
        transport.disconnect().unwrap();
        assert!(matches!(transport.write(b"x"), Err(TransportError::NotConnected)));
    }
}
