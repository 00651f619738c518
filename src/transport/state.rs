//! # Connection State Machine
//!
//! ```text
//!            scan                   done
//!   Idle ───────────▶ Scanning ───────────▶ Idle
//!    │
//!    │ connect            ok
//!    └──────▶ Connecting ─────▶ Connected ◀──────────┐
//!                │                 │ write           │ ok
//!                │ err             ▼                 │
//!                └──────▶ Failed ◀── Writing ────────┘
//!                           err
//!
//!   Failed ──(next request)──▶ Idle        any ──(disconnect)──▶ Idle
//! ```

use std::fmt;

use super::TransportError;

/// Where a printer session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Scanning,
    Connecting,
    Connected,
    Writing,
    /// The last connect or write failed; the next request starts from Idle.
    Failed,
}

/// Something that moves the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ScanStarted,
    ScanFinished,
    ConnectStarted,
    ConnectSucceeded,
    ConnectFailed,
    WriteStarted,
    WriteSucceeded,
    WriteFailed,
    Disconnected,
}

impl Event {
    fn action(self) -> &'static str {
        match self {
            Event::ScanStarted | Event::ScanFinished => "scan",
            Event::ConnectStarted | Event::ConnectSucceeded | Event::ConnectFailed => "connect",
            Event::WriteStarted | Event::WriteSucceeded | Event::WriteFailed => "write",
            Event::Disconnected => "disconnect",
        }
    }
}

impl ConnectionState {
    /// The state after `event`, or the error to report to the requester.
    pub fn on(self, event: Event) -> Result<ConnectionState, TransportError> {
        use ConnectionState::*;

        let from = if self == Failed { Idle } else { self };
        match (from, event) {
            (_, Event::Disconnected) => Ok(Idle),

            (Idle, Event::ScanStarted) => Ok(Scanning),
            (Scanning, Event::ScanStarted) => Err(TransportError::AlreadyScanning),
            (Scanning, Event::ScanFinished) => Ok(Idle),

            (Idle | Connected, Event::ConnectStarted) => Ok(Connecting),
            (Connecting, Event::ConnectSucceeded) => Ok(Connected),
            (Connecting, Event::ConnectFailed) => Ok(Failed),

            (Connected, Event::WriteStarted) => Ok(Writing),
            (Writing, Event::WriteStarted) => Err(TransportError::Busy),
            (Idle | Scanning | Connecting, Event::WriteStarted) => {
                Err(TransportError::NotConnected)
            }
            (Writing, Event::WriteSucceeded) => Ok(Connected),
            (Writing, Event::WriteFailed) => Ok(Failed),

            (Writing, _) => Err(TransportError::Busy),
            (state, event) => Err(TransportError::InvalidState {
                action: event.action(),
                state,
            }),
        }
    }

    /// Whether a printer channel is open.
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Writing)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Scanning => "scanning",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Writing => "writing",
            ConnectionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionState::*;
    use super::*;

    #[test]
    fn test_scan_cycle() {
        let s = Idle.on(Event::ScanStarted).unwrap();
        assert_eq!(s, Scanning);
        assert!(matches!(
            s.on(Event::ScanStarted),
            Err(TransportError::AlreadyScanning)
        ));
        assert_eq!(s.on(Event::ScanFinished).unwrap(), Idle);
    }

    #[test]
    fn test_connect_and_write_cycle() {
        let s = Idle.on(Event::ConnectStarted).unwrap();
        let s = s.on(Event::ConnectSucceeded).unwrap();
        assert_eq!(s, Connected);
        let s = s.on(Event::WriteStarted).unwrap();
        assert_eq!(s, Writing);
        assert!(s.is_connected());
        assert!(matches!(s.on(Event::WriteStarted), Err(TransportError::Busy)));
        assert_eq!(s.on(Event::WriteSucceeded).unwrap(), Connected);
        assert_eq!(s.on(Event::WriteFailed).unwrap(), Failed);
    }

    #[test]
    fn test_write_requires_connection() {
        for state in [Idle, Scanning, Connecting, Failed] {
            assert!(matches!(
                state.on(Event::WriteStarted),
                Err(TransportError::NotConnected)
            ));
        }
    }

    #[test]
    fn test_failed_resets_on_next_request() {
        assert_eq!(Failed.on(Event::ConnectStarted).unwrap(), Connecting);
        assert_eq!(Failed.on(Event::ScanStarted).unwrap(), Scanning);
    }

    #[test]
    fn test_disconnect_from_anywhere() {
        for state in [Idle, Scanning, Connecting, Connected, Writing, Failed] {
            assert_eq!(state.on(Event::Disconnected).unwrap(), Idle);
        }
    }

    #[test]
    fn test_invalid_transition_reports_state() {
        let err = Connecting.on(Event::ScanStarted).unwrap_err();
        assert_eq!(err.to_string(), "cannot scan while connecting");
    }
}
