//! Host event handling.
//!
//! A [`FlightSession`] owns the flight being built and reacts to what the
//! host reports: link status changes, files opened on the host side and
//! requests for the current instruction list.

use std::sync::Arc;

use dronepath_core::event_bus::{ConnectionEvent, ErrorEvent};
use dronepath_core::{emit, AppEvent, ConnectionError, ConnectionStatus, Result, SharedDroneState};
use dronepath_planner::FlightBuilder;
use tracing::{error, info};

use crate::host::{HostEvent, HostMessage, SDK_MODE_COMMAND};
use crate::link::HostLink;

/// The flight being built plus the link it will be flown over
pub struct FlightSession {
    builder: FlightBuilder,
    drone: SharedDroneState,
    link: Arc<dyn HostLink>,
}

impl FlightSession {
    pub fn new(builder: FlightBuilder, drone: SharedDroneState, link: Arc<dyn HostLink>) -> Self {
        Self {
            builder,
            drone,
            link,
        }
    }

    pub fn builder(&self) -> &FlightBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut FlightBuilder {
        &mut self.builder
    }

    pub fn drone(&self) -> &SharedDroneState {
        &self.drone
    }

    pub fn link(&self) -> &Arc<dyn HostLink> {
        &self.link
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.drone.read().connection()
    }

    /// Ask the link to connect
    ///
    /// Links that connect synchronously (the UDP link) report the result
    /// straight away; others leave the status at `Connecting` until the
    /// host sends [`HostEvent::DroneConnection`].
    pub async fn connect(&mut self) -> Result<()> {
        let address = self.link.name().to_string();
        self.set_status(ConnectionStatus::Connecting);
        emit!(AppEvent::Connection(ConnectionEvent::Connecting {
            address: address.clone(),
        }));

        if let Err(e) = self.link.send(HostMessage::Connect).await {
            error!("Failed to connect to {}: {}", address, e);
            self.set_status(ConnectionStatus::Disconnected);
            emit!(AppEvent::Connection(ConnectionEvent::ConnectionFailed {
                address,
                error: e.to_string(),
            }));
            return Err(e.into());
        }

        if self.link.is_connected() {
            self.handle_event(HostEvent::DroneConnection(true)).await?;
        }
        Ok(())
    }

    /// React to one host event
    pub async fn handle_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::DroneConnection(true) => {
                let sent = self
                    .link
                    .send(HostMessage::SingleInstruction(SDK_MODE_COMMAND.to_string()))
                    .await;
                match sent {
                    Ok(()) => {
                        info!("Drone connected via {}", self.link.name());
                        self.set_status(ConnectionStatus::Connected);
                    }
                    Err(e) => {
                        self.link_failed(&e);
                        return Err(e.into());
                    }
                }
            }
            HostEvent::DroneConnection(false) => {
                info!("Drone disconnected");
                self.set_status(ConnectionStatus::Disconnected);
            }
            HostEvent::FileOpened(instructions) => {
                info!("Host opened a flight with {} entries", instructions.len());
                self.builder.replace_instructions(instructions)?;
            }
            HostEvent::RequestFlightInstructions => {
                let instructions = self.builder.instructions().to_vec();
                self.link
                    .send(HostMessage::FlightInstructions(instructions))
                    .await?;
            }
        }
        Ok(())
    }

    fn set_status(&self, status: ConnectionStatus) {
        let changed = {
            let mut drone = self.drone.write();
            let changed = drone.connection() != status;
            drone.set_connection(status);
            changed
        };
        if changed {
            emit!(AppEvent::Connection(ConnectionEvent::StatusChanged { status }));
        }
    }

    fn link_failed(&self, e: &ConnectionError) {
        error!("Link error: {}", e);
        self.set_status(ConnectionStatus::Disconnected);
        emit!(AppEvent::Error(ErrorEvent::Link {
            message: e.to_string(),
        }));
    }
}

impl std::fmt::Debug for FlightSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightSession")
            .field("link", &self.link.name())
            .field("connection", &self.connection())
            .field("instructions", &self.builder.store().len())
            .finish()
    }
}
