//! UDP link to the drone's text SDK.
//!
//! The drone listens for plain-text commands on UDP port 8889 and answers
//! each one with `ok` or `error ...` once it has been carried out. Commands
//! are sent one at a time; the next waits for the previous answer. A `go`
//! is answered only after the move, so its wait grows with the travel time.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dronepath_core::ConnectionError;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::HostLink;
use crate::host::{HostMessage, SDK_MODE_COMMAND};

/// Default SDK command address of the drone's access point
pub const DEFAULT_DRONE_ADDRESS: &str = "192.168.10.1:8889";

const MAX_RESPONSE_LEN: usize = 1518;

const LAND_COMMAND: &str = "land";

/// Time the drone needs to fly a `go x y z speed` command
fn travel_time(command: &str) -> Duration {
    let mut parts = command.split_whitespace();
    if parts.next() != Some("go") {
        return Duration::ZERO;
    }
    let values: Vec<f64> = parts.filter_map(|p| p.parse().ok()).collect();
    match values.as_slice() {
        [x, y, z, speed] if *speed > 0.0 => {
            Duration::from_secs_f64((x * x + y * y + z * z).sqrt() / speed)
        }
        _ => Duration::ZERO,
    }
}

/// Addresses and timing for [`UdpDroneLink`]
#[derive(Debug, Clone, PartialEq)]
pub struct UdpLinkConfig {
    pub drone_address: String,
    pub bind_address: String,
    pub response_timeout: Duration,
}

impl Default for UdpLinkConfig {
    fn default() -> Self {
        Self {
            drone_address: DEFAULT_DRONE_ADDRESS.to_string(),
            bind_address: "0.0.0.0:8889".to_string(),
            response_timeout: Duration::from_secs(7),
        }
    }
}

/// Link speaking the SDK text protocol over UDP
pub struct UdpDroneLink {
    config: UdpLinkConfig,
    socket: Mutex<Option<UdpSocket>>,
    connected: AtomicBool,
}

impl UdpDroneLink {
    pub fn new(config: UdpLinkConfig) -> Self {
        Self {
            config,
            socket: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &UdpLinkConfig {
        &self.config
    }

    async fn connect(&self) -> Result<(), ConnectionError> {
        let drone: SocketAddr =
            self.config
                .drone_address
                .parse()
                .map_err(|_| ConnectionError::InvalidAddress {
                    address: self.config.drone_address.clone(),
                })?;

        // Release any previous socket so the bind address is free again
        let mut guard = self.socket.lock().await;
        guard.take();

        let socket = UdpSocket::bind(&self.config.bind_address)
            .await
            .map_err(|e| ConnectionError::IoError {
                reason: format!("bind {}: {}", self.config.bind_address, e),
            })?;
        socket.connect(drone).await.map_err(io_error)?;

        let response = self.exchange(&socket, SDK_MODE_COMMAND).await?;
        debug!("SDK mode response: {}", response);
        *guard = Some(socket);
        self.connected.store(true, Ordering::SeqCst);
        info!("Connected to drone at {}", drone);
        Ok(())
    }

    /// Send one command and wait for its answer
    pub async fn command(&self, command: &str) -> Result<String, ConnectionError> {
        let guard = self.socket.lock().await;
        let socket = guard.as_ref().ok_or(ConnectionError::NotConnected)?;
        self.exchange(socket, command).await
    }

    async fn exchange(&self, socket: &UdpSocket, command: &str) -> Result<String, ConnectionError> {
        let mut buf = [0u8; MAX_RESPONSE_LEN];
        // answers to commands that already timed out
        while let Ok(len) = socket.try_recv(&mut buf) {
            warn!(
                "Discarding late response: {}",
                String::from_utf8_lossy(&buf[..len]).trim()
            );
        }

        debug!("-> {}", command);
        socket.send(command.as_bytes()).await.map_err(io_error)?;

        let wait = self.config.response_timeout + travel_time(command);
        let len = timeout(wait, socket.recv(&mut buf))
            .await
            .map_err(|_| ConnectionError::Timeout {
                command: command.to_string(),
                timeout_ms: wait.as_millis() as u64,
            })?
            .map_err(io_error)?;

        let response = String::from_utf8_lossy(&buf[..len]).trim().to_string();
        debug!("<- {}", response);

        if response.starts_with("error") {
            error!("Drone rejected '{}': {}", command, response);
            return Err(ConnectionError::Rejected {
                command: command.to_string(),
                response,
            });
        }
        Ok(response)
    }

    async fn disconnect(&self) {
        self.socket.lock().await.take();
        self.connected.store(false, Ordering::SeqCst);
    }
}

fn io_error(e: std::io::Error) -> ConnectionError {
    ConnectionError::IoError {
        reason: e.to_string(),
    }
}

#[async_trait]
impl HostLink for UdpDroneLink {
    fn name(&self) -> &str {
        &self.config.drone_address
    }

    async fn send(&self, message: HostMessage) -> Result<(), ConnectionError> {
        match message {
            HostMessage::Connect => {
                if let Err(e) = self.connect().await {
                    self.disconnect().await;
                    return Err(e);
                }
                Ok(())
            }
            HostMessage::SingleInstruction(command) => self.command(&command).await.map(|_| ()),
            HostMessage::Autopilot(commands) => {
                for command in &commands {
                    if let Err(e) = self.command(command).await {
                        if command != SDK_MODE_COMMAND && command != LAND_COMMAND {
                            warn!("'{}' failed mid-flight, landing", command);
                            if let Err(land) = self.command(LAND_COMMAND).await {
                                error!("Landing after failure also failed: {}", land);
                            }
                        }
                        return Err(e);
                    }
                }
                Ok(())
            }
            HostMessage::EnableVideoStream => self.command("streamon").await.map(|_| ()),
            HostMessage::DisableVideoStream => self.command("streamoff").await.map(|_| ()),
            other => {
                warn!("{} is not handled by the drone, ignoring", other.channel());
                Ok(())
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for UdpDroneLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpDroneLink")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}
