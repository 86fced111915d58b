//! Links to the host process or the drone.
//!
//! [`HostLink`] is the seam between the application and whatever carries
//! its commands. Three implementations are provided:
//!
//! - [`UdpDroneLink`]: talks to the drone directly over its UDP text SDK
//! - [`NoOpLink`]: accepts everything and does nothing
//! - [`RecordingLink`]: keeps every message in memory

pub mod udp;

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dronepath_core::ConnectionError;
use parking_lot::Mutex;
use tracing::debug;

use crate::host::HostMessage;

pub use udp::{UdpDroneLink, UdpLinkConfig};

/// Outbound side of the host/drone connection
#[async_trait]
pub trait HostLink: Send + Sync {
    /// Short name for logs and events
    fn name(&self) -> &str;

    /// Deliver one message
    async fn send(&self, message: HostMessage) -> Result<(), ConnectionError>;

    /// Check whether commands can currently be delivered
    fn is_connected(&self) -> bool;
}

/// Link that accepts every message and discards it
#[derive(Debug, Default)]
pub struct NoOpLink {
    connected: AtomicBool,
}

impl NoOpLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A link that reports itself connected from the start
    pub fn connected() -> Self {
        Self {
            connected: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl HostLink for NoOpLink {
    fn name(&self) -> &str {
        "noop"
    }

    async fn send(&self, message: HostMessage) -> Result<(), ConnectionError> {
        if message == HostMessage::Connect {
            self.connected.store(true, Ordering::SeqCst);
        }
        debug!("NoOpLink dropped {}", message.channel());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// In-memory link that records what it was sent
///
/// `Connect` marks the link connected. A failure can be armed to make the
/// next send return an error instead of recording.
#[derive(Debug, Default)]
pub struct RecordingLink {
    connected: AtomicBool,
    messages: Mutex<Vec<HostMessage>>,
    next_failure: Mutex<Option<ConnectionError>>,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected() -> Self {
        let link = Self::default();
        link.connected.store(true, Ordering::SeqCst);
        link
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Make the next `send` fail with `error`
    pub fn fail_next(&self, error: ConnectionError) {
        *self.next_failure.lock() = Some(error);
    }

    /// Everything sent so far, oldest first
    pub fn messages(&self) -> Vec<HostMessage> {
        self.messages.lock().clone()
    }

    /// Drain the recorded messages
    pub fn take_messages(&self) -> Vec<HostMessage> {
        std::mem::take(&mut *self.messages.lock())
    }
}

#[async_trait]
impl HostLink for RecordingLink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: HostMessage) -> Result<(), ConnectionError> {
        if let Some(error) = self.next_failure.lock().take() {
            return Err(error);
        }
        if message == HostMessage::Connect {
            self.connected.store(true, Ordering::SeqCst);
        }
        self.messages.lock().push(message);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
