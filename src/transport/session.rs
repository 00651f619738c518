//! # Printer Session
//!
//! An async actor that owns one [`Transport`] and serializes access to it.
//!
//! ```text
//!  SessionHandle ──mpsc<Request>──▶ session task ──spawn_blocking──▶ Transport
//!        ▲                              │
//!        └──────oneshot reply───────────┤
//!  subscribers ◀──broadcast<Notification>┘
//! ```
//!
//! Blocking transport calls run on the blocking pool. While one is in
//! flight the transport is away from the actor, yet the actor keeps
//! answering: a second write gets [`TransportError::Busy`], a write before
//! connecting gets [`TransportError::NotConnected`].
//!
//! ```no_run
//! use chekprint::transport::{BluetoothTransport, DiscoveredDevice, PrinterSession};
//!
//! # async fn demo() -> Result<(), chekprint::transport::TransportError> {
//! let session = PrinterSession::spawn(BluetoothTransport::new());
//! session.connect(DiscoveredDevice::new("/dev/rfcomm0", "printer")).await?;
//! session.write(vec![0x1B, 0x40]).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use super::state::{ConnectionState, Event};
use super::{Ack, DiscoveredDevice, Transport, TransportError};

/// Capacity of the request queue.
const REQUEST_CAPACITY: usize = 16;

/// Capacity of the notification channel.
const NOTIFICATION_CAPACITY: usize = 64;

type Reply<T> = oneshot::Sender<Result<T, TransportError>>;

/// A request to the session task.
#[derive(Debug)]
pub enum Request {
    Scan {
        timeout: Duration,
        reply: Reply<Vec<DiscoveredDevice>>,
    },
    Connect {
        device: DiscoveredDevice,
        reply: Reply<()>,
    },
    Disconnect {
        reply: Reply<()>,
    },
    Write {
        data: Vec<u8>,
        reply: Reply<Ack>,
    },
    State {
        reply: oneshot::Sender<ConnectionState>,
    },
}

/// Published to every subscriber as the session progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    StateChanged(ConnectionState),
    DevicesFound(Vec<DiscoveredDevice>),
    WriteCompleted(Ack),
    WriteFailed(String),
}

/// Spawns session tasks.
pub struct PrinterSession;

impl PrinterSession {
    /// Start a session task owning `transport`. Must be called inside a
    /// tokio runtime. The task ends when every handle is dropped.
    pub fn spawn<T: Transport>(transport: T) -> SessionHandle {
        let (requests, receiver) = mpsc::channel(REQUEST_CAPACITY);
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        let actor = Actor {
            transport: Some(transport),
            state: ConnectionState::Idle,
            notifications: notifications.clone(),
        };
        tokio::spawn(actor.run(receiver));
        SessionHandle {
            requests,
            notifications,
        }
    }
}

/// Cheap, cloneable access to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    notifications: broadcast::Sender<Notification>,
}

impl SessionHandle {
    /// Receive every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub async fn scan(&self, timeout: Duration) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Scan { timeout, reply }).await?;
        rx.await.map_err(|_| TransportError::SessionClosed)?
    }

    pub async fn connect(&self, device: DiscoveredDevice) -> Result<(), TransportError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Connect { device, reply }).await?;
        rx.await.map_err(|_| TransportError::SessionClosed)?
    }

    pub async fn disconnect(&self) -> Result<(), TransportError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Disconnect { reply }).await?;
        rx.await.map_err(|_| TransportError::SessionClosed)?
    }

    /// Send bytes to the printer and wait for the device to take them.
    pub async fn write(&self, data: Vec<u8>) -> Result<Ack, TransportError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Write { data, reply }).await?;
        rx.await.map_err(|_| TransportError::SessionClosed)?
    }

    pub async fn state(&self) -> Result<ConnectionState, TransportError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::State { reply }).await?;
        rx.await.map_err(|_| TransportError::SessionClosed)
    }

    async fn send(&self, request: Request) -> Result<(), TransportError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| TransportError::SessionClosed)
    }
}

// ============================================================================
// SESSION TASK
// ============================================================================

/// Result of a blocking transport call.
enum Outcome {
    Scan(Result<Vec<DiscoveredDevice>, TransportError>),
    Connect(Result<(), TransportError>),
    Write(Result<Ack, TransportError>),
}

/// Reply channel waiting on the in-flight call.
enum Pending {
    Scan(Reply<Vec<DiscoveredDevice>>),
    Connect(Reply<()>),
    Write(Reply<Ack>),
}

/// A transport call running on the blocking pool. The transport travels
/// with it and comes back in the join result.
struct Job<T> {
    handle: JoinHandle<(T, Outcome)>,
    pending: Pending,
}

struct Actor<T> {
    /// `None` while a job holds it.
    transport: Option<T>,
    state: ConnectionState,
    notifications: broadcast::Sender<Notification>,
}

async fn wait_for<T>(job: &mut Option<Job<T>>) -> Result<(T, Outcome), JoinError> {
    match job {
        Some(running) => (&mut running.handle).await,
        None => std::future::pending().await,
    }
}

impl<T: Transport> Actor<T> {
    async fn run(mut self, mut requests: mpsc::Receiver<Request>) {
        let mut job: Option<Job<T>> = None;

        loop {
            tokio::select! {
                finished = wait_for(&mut job) => {
                    if let Some(running) = job.take() {
                        self.complete(running.pending, finished);
                    }
                }
                request = requests.recv() => match request {
                    Some(request) => {
                        if let Some(started) = self.handle(request, job.is_some()) {
                            job = Some(started);
                        }
                    }
                    None => break,
                },
            }
        }

        if let Some(running) = job.take()
            && let Ok((mut transport, _)) = running.handle.await
        {
            let _ = transport.disconnect();
        } else if let Some(transport) = self.transport.as_mut() {
            let _ = transport.disconnect();
        }
        debug!("printer session stopped");
    }

    fn notify(&self, notification: Notification) {
        // No subscribers is fine.
        let _ = self.notifications.send(notification);
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "connection state");
            self.state = state;
            self.notify(Notification::StateChanged(state));
        }
    }

    /// Apply `event`, or return the rejection for the requester.
    fn advance(&mut self, event: Event) -> Result<(), TransportError> {
        let next = self.state.on(event)?;
        self.set_state(next);
        Ok(())
    }

    fn handle(&mut self, request: Request, busy: bool) -> Option<Job<T>> {
        match request {
            Request::State { reply } => {
                let _ = reply.send(self.state);
                None
            }
            Request::Disconnect { reply } => {
                let result = if busy {
                    Err(TransportError::Busy)
                } else {
                    self.disconnect()
                };
                let _ = reply.send(result);
                None
            }
            Request::Scan { timeout, reply } => {
                match self.start(Event::ScanStarted, move |t| Outcome::Scan(t.scan(timeout))) {
                    Ok(handle) => Some(Job {
                        handle,
                        pending: Pending::Scan(reply),
                    }),
                    Err(e) => {
                        let _ = reply.send(Err(e));
                        None
                    }
                }
            }
            Request::Connect { device, reply } => {
                match self.start(Event::ConnectStarted, move |t| {
                    Outcome::Connect(t.connect(&device))
                }) {
                    Ok(handle) => Some(Job {
                        handle,
                        pending: Pending::Connect(reply),
                    }),
                    Err(e) => {
                        let _ = reply.send(Err(e));
                        None
                    }
                }
            }
            Request::Write { data, reply } => {
                match self.start(Event::WriteStarted, move |t| Outcome::Write(t.write(&data))) {
                    Ok(handle) => Some(Job {
                        handle,
                        pending: Pending::Write(reply),
                    }),
                    Err(e) => {
                        let _ = reply.send(Err(e));
                        None
                    }
                }
            }
        }
    }

    /// Move to the state for `event` and hand the transport to `call` on
    /// the blocking pool.
    fn start<F>(&mut self, event: Event, call: F) -> Result<JoinHandle<(T, Outcome)>, TransportError>
    where
        F: FnOnce(&mut T) -> Outcome + Send + 'static,
    {
        let next = self.state.on(event)?;
        // A running call already moved the session out of every state that
        // accepts `event`, so a missing transport was lost to a dead worker.
        let Some(mut transport) = self.transport.take() else {
            return Err(TransportError::SessionClosed);
        };
        self.set_state(next);
        Ok(tokio::task::spawn_blocking(move || {
            let outcome = call(&mut transport);
            (transport, outcome)
        }))
    }

    fn disconnect(&mut self) -> Result<(), TransportError> {
        let result = match self.transport.as_mut() {
            Some(transport) => transport.disconnect(),
            None => Ok(()),
        };
        self.set_state(ConnectionState::Idle);
        result
    }

    fn complete(&mut self, pending: Pending, finished: Result<(T, Outcome), JoinError>) {
        let outcome = match finished {
            Ok((transport, outcome)) => {
                self.transport = Some(transport);
                outcome
            }
            Err(e) => {
                warn!("transport worker died: {}", e);
                self.state = ConnectionState::Failed;
                self.notify(Notification::StateChanged(ConnectionState::Failed));
                fail(pending);
                return;
            }
        };

        match (pending, outcome) {
            (Pending::Scan(reply), Outcome::Scan(result)) => {
                self.finish(Event::ScanFinished);
                if let Ok(devices) = &result {
                    self.notify(Notification::DevicesFound(devices.clone()));
                }
                let _ = reply.send(result);
            }
            (Pending::Connect(reply), Outcome::Connect(result)) => {
                self.finish(if result.is_ok() {
                    Event::ConnectSucceeded
                } else {
                    Event::ConnectFailed
                });
                let _ = reply.send(result);
            }
            (Pending::Write(reply), Outcome::Write(result)) => {
                match &result {
                    Ok(ack) => {
                        self.finish(Event::WriteSucceeded);
                        self.notify(Notification::WriteCompleted(*ack));
                    }
                    Err(e) => {
                        self.finish(Event::WriteFailed);
                        self.notify(Notification::WriteFailed(e.to_string()));
                    }
                }
                let _ = reply.send(result);
            }
            (pending, _) => {
                warn!("transport call finished with a mismatched reply");
                self.set_state(ConnectionState::Failed);
                fail(pending);
            }
        }
    }

    fn finish(&mut self, event: Event) {
        if let Err(e) = self.advance(event) {
            warn!("unexpected completion: {}", e);
        }
    }
}

fn fail(pending: Pending) {
    match pending {
        Pending::Scan(reply) => {
            let _ = reply.send(Err(TransportError::SessionClosed));
        }
        Pending::Connect(reply) => {
            let _ = reply.send(Err(TransportError::SessionClosed));
        }
        Pending::Write(reply) => {
            let _ = reply.send(Err(TransportError::SessionClosed));
        }
    }
}
