//! # Bluetooth RFCOMM Transport
//!
//! Talks to a thermal printer over Bluetooth Serial Port Profile (SPP) via
//! an RFCOMM TTY such as `/dev/rfcomm0`.
//!
//! ## Bluetooth Setup (Linux)
//!
//! The printer must be paired and bound to an RFCOMM device:
//!
//! ```bash
//! # 1. Find the printer's Bluetooth address
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Note the address, e.g., 66:22:XX:XX:XX:XX
//!
//! # 2. Pair with the printer
//! [bluetooth]# pair 66:22:XX:XX:XX:XX
//!
//! # 3. Bind to RFCOMM device
//! $ sudo rfcomm bind 0 66:22:XX:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! [`BluetoothTransport::connect`] accepts either a device path or a MAC
//! address; an unbound address is bound with [`setup_rfcomm`].
//!
//! ## TTY Configuration
//!
//! The RFCOMM device is opened in raw mode so binary data is transmitted
//! without modification:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//!
//! ## Chunked Writes
//!
//! Cheap 58mm printers have small receive buffers. Data is written in
//! 512-byte chunks with a short delay between them.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Ack, DiscoveredDevice, Transport, TransportError};

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 512;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 20;

/// Kernel table of bound RFCOMM devices.
const RFCOMM_TABLE: &str = "/proc/net/rfcomm";

/// # Bluetooth Printer Transport
///
/// ## Example
///
/// ```no_run
/// use chekprint::transport::{BluetoothTransport, DiscoveredDevice, Transport};
///
/// let mut transport = BluetoothTransport::new();
/// transport.connect(&DiscoveredDevice::new("/dev/rfcomm0", "printer"))?;
/// transport.write(&[0x1B, 0x40])?;
///
/// # Ok::<(), chekprint::transport::TransportError>(())
/// ```
#[derive(Debug)]
pub struct BluetoothTransport {
    file: Option<File>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl Default for BluetoothTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl BluetoothTransport {
    /// A disconnected transport with default chunking.
    pub fn new() -> Self {
        Self {
            file: None,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    /// Open an RFCOMM device directly.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need root or dialout group)
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P) -> Result<Self, TransportError> {
        let mut transport = Self::new();
        transport.open_path(device.as_ref())?;
        Ok(transport)
    }

    /// Set the chunk size for large writes. Default is 512 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 20ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    fn open_path(&mut self, path: &Path) -> Result<(), TransportError> {
        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            TransportError::Connect(format!("Failed to open {}: {}", path.display(), e))
        })?;

        configure_tty_raw(file.as_raw_fd())?;
        info!(device = %path.display(), "printer connected");
        self.file = Some(file);
        Ok(())
    }

    /// Resolve a device id to a TTY path, binding an RFCOMM device if needed.
    fn resolve(device: &DiscoveredDevice) -> Result<String, TransportError> {
        if device.id.starts_with('/') {
            return Ok(device.id.clone());
        }
        if !is_valid_mac(&device.id) {
            return Err(TransportError::DeviceNotFound(device.id.clone()));
        }
        match find_rfcomm_for_mac(&device.id)? {
            Some(path) => Ok(path),
            None => setup_rfcomm(&device.id, 0),
        }
    }
}

impl Transport for BluetoothTransport {
    /// Lists RFCOMM devices already bound by the kernel. Discovery of
    /// unpaired printers is left to `bluetoothctl`.
    fn scan(&mut self, _timeout: Duration) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let table = match fs::read_to_string(RFCOMM_TABLE) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("{} unreadable ({}), asking rfcomm", RFCOMM_TABLE, e);
                rfcomm_listing()?
            }
        };
        let devices: Vec<DiscoveredDevice> = parse_rfcomm_table(&table)
            .into_iter()
            .filter(|d| Path::new(&d.id).exists())
            .collect();
        debug!(found = devices.len(), "rfcomm scan finished");
        Ok(devices)
    }

    fn connect(&mut self, device: &DiscoveredDevice) -> Result<(), TransportError> {
        self.disconnect()?;
        let path = Self::resolve(device)?;
        self.open_path(Path::new(&path))
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            info!("printer disconnected");
        }
        Ok(())
    }

    /// Small writes are sent directly. Large writes are chunked to avoid
    /// overflowing the printer's buffer.
    fn write(&mut self, data: &[u8]) -> Result<Ack, TransportError> {
        let file = self.file.as_mut().ok_or(TransportError::NotConnected)?;

        if data.len() <= self.chunk_size {
            file.write_all(data)
                .map_err(|e| TransportError::Write(e.to_string()))?;
        } else {
            for chunk in data.chunks(self.chunk_size) {
                file.write_all(chunk)
                    .map_err(|e| TransportError::Write(e.to_string()))?;

                if !self.chunk_delay.is_zero() {
                    thread::sleep(self.chunk_delay);
                }
            }
        }

        file.flush()
            .map_err(|e| TransportError::Write(format!("Flush failed: {}", e)))?;
        debug!(bytes = data.len(), "write complete");
        Ok(Ack { bytes: data.len() })
    }
}

/// Configure a file descriptor for raw TTY mode.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
///
/// IXON/IXOFF/IXANY must be off: 0x11 (XON) and 0x13 (XOFF) occur in QR
/// and barcode payload bytes.
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> Result<(), TransportError> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(TransportError::Connect(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(TransportError::Connect(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32) -> Result<(), TransportError> {
    Ok(())
}

// ============================================================================
// RFCOMM HELPERS
// ============================================================================

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    if parts.len() != 6 {
        return false;
    }
    parts
        .iter()
        .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Parse `/proc/net/rfcomm` or `rfcomm -a` output into devices.
///
/// Lines look like `rfcomm0: 66:22:11:00:AA:BB channel 1 clean`; the last
/// MAC on the line is the remote printer.
pub fn parse_rfcomm_table(table: &str) -> Vec<DiscoveredDevice> {
    table
        .lines()
        .filter_map(|line| {
            let (name, rest) = line.split_once(':')?;
            let name = name.trim();
            if !name.starts_with("rfcomm") {
                return None;
            }
            let address = rest
                .split_whitespace()
                .filter(|token| is_valid_mac(token))
                .last()
                .map(|mac| mac.to_uppercase());
            Some(DiscoveredDevice {
                id: format!("/dev/{}", name),
                name: name.to_string(),
                address,
            })
        })
        .collect()
}

fn rfcomm_listing() -> Result<String, TransportError> {
    let output = Command::new("rfcomm")
        .arg("-a")
        .output()
        .map_err(|e| TransportError::Connect(format!("Failed to run 'rfcomm -a': {}", e)))?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Find an existing RFCOMM device bound to the given MAC address.
pub fn find_rfcomm_for_mac(mac: &str) -> Result<Option<String>, TransportError> {
    let mac_upper = mac.to_uppercase();
    let table = match fs::read_to_string(RFCOMM_TABLE) {
        Ok(contents) => contents,
        Err(_) => rfcomm_listing()?,
    };
    Ok(parse_rfcomm_table(&table)
        .into_iter()
        .find(|d| d.address.as_deref() == Some(mac_upper.as_str()) && Path::new(&d.id).exists())
        .map(|d| d.id))
}

/// Set up an RFCOMM device for a Bluetooth MAC address.
///
/// Runs:
/// 1. `bluetoothctl connect <MAC>` - connect to device
/// 2. `l2ping -c 1 <MAC>` - verify connectivity
/// 3. `rfcomm bind <channel> <MAC> 1` - create /dev/rfcommN
///
/// Returns the device path on success (e.g., "/dev/rfcomm0").
///
/// **Requires root privileges** for `rfcomm bind`.
pub fn setup_rfcomm(mac: &str, channel: u8) -> Result<String, TransportError> {
    let mac_upper = mac.to_uppercase();
    let device_path = format!("/dev/rfcomm{}", channel);

    info!("connecting to {}", mac_upper);
    let output = Command::new("bluetoothctl")
        .arg("connect")
        .arg(&mac_upper)
        .output()
        .map_err(|e| TransportError::Connect(format!("Failed to run bluetoothctl: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !(stdout.contains("Connection successful") || stdout.contains("already connected")) {
        // l2ping below decides
        warn!("bluetoothctl returned: {}", stdout.trim());
    }

    thread::sleep(Duration::from_millis(500));

    let output = Command::new("l2ping")
        .arg("-c")
        .arg("1")
        .arg(&mac_upper)
        .output()
        .map_err(|e| TransportError::Connect(format!("Failed to run l2ping: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TransportError::DeviceNotFound(format!(
            "{} not reachable: {}",
            mac_upper,
            stderr.trim()
        )));
    }

    info!("binding rfcomm{}", channel);
    let output = Command::new("rfcomm")
        .arg("bind")
        .arg(channel.to_string())
        .arg(&mac_upper)
        .arg("1") // SPP channel
        .output()
        .map_err(|e| TransportError::Connect(format!("Failed to run rfcomm bind: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TransportError::Connect(format!(
            "rfcomm bind failed: {}",
            stderr.trim()
        )));
    }

    thread::sleep(Duration::from_millis(500));

    if !Path::new(&device_path).exists() {
        return Err(TransportError::Connect(format!(
            "Device {} was not created",
            device_path
        )));
    }

    Ok(device_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_path() {
        assert_eq!(DEFAULT_DEVICE, "/dev/rfcomm0");
    }

    #[test]
    fn test_valid_mac_addresses() {
        assert!(is_valid_mac("00:11:22:33:44:55"));
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn test_invalid_mac_addresses() {
        assert!(!is_valid_mac("00:11:22:33:44")); // too short
        assert!(!is_valid_mac("00:11:22:33:44:55:66")); // too long
        assert!(!is_valid_mac("00-11-22-33-44-55")); // wrong separator
        assert!(!is_valid_mac("GG:HH:II:JJ:KK:LL")); // invalid hex
        assert!(!is_valid_mac(""));
    }

    #[test]
    fn test_parse_rfcomm_listing() {
        let table = "rfcomm0: 66:22:11:00:aa:bb channel 1 clean \n\
                     rfcomm1: 00:1A:7D:DA:71:13 -> 66:22:11:00:AA:CC channel 1 connected\n\
                     garbage line\n";
        let devices = parse_rfcomm_table(table);
        assert_eq!(
            devices,
            vec![
                DiscoveredDevice {
                    id: "/dev/rfcomm0".into(),
                    name: "rfcomm0".into(),
                    address: Some("66:22:11:00:AA:BB".into()),
                },
                DiscoveredDevice {
                    id: "/dev/rfcomm1".into(),
                    name: "rfcomm1".into(),
                    address: Some("66:22:11:00:AA:CC".into()),
                },
            ]
        );
    }

    #[test]
    fn test_write_requires_connection() {
        let mut transport = BluetoothTransport::new();
        assert!(matches!(
            transport.write(&[0x1B, 0x40]),
            Err(TransportError::NotConnected)
        ));
        assert!(transport.disconnect().is_ok());
    }

    #[test]
    fn test_unknown_device_id() {
        let device = DiscoveredDevice::new("printer-ish", "x");
        assert!(matches!(
            BluetoothTransport::resolve(&device),
            Err(TransportError::DeviceNotFound(_))
        ));
    }
}
