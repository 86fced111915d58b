//! # dronepath
//!
//! Build, preview and fly autonomous flight paths for a toy drone.
//!
//! ## Architecture
//!
//! dronepath is organized as a workspace with multiple crates:
//!
//! 1. **dronepath-core** - Shared drone state, errors, events
//! 2. **dronepath-planner** - Instruction store, merging, projection, flight files
//! 3. **dronepath-visualizer** - Scene description, follow camera, renderer sync
//! 4. **dronepath-settings** - Persisted configuration
//! 5. **dronepath-communication** - Host/drone links and the autopilot
//! 6. **dronepath** - Application state and the command line front-end

pub mod app;
pub mod ops;

pub use app::App;
pub use ops::PlanOp;

pub use dronepath_communication::{
    Autopilot, FlightSession, HostEvent, HostLink, HostMessage, NoOpLink, PlaybackOutcome,
    PlaybackState, PlaybackTiming, RecordingLink, UdpDroneLink, UdpLinkConfig,
};
pub use dronepath_core::{
    ConnectionError, ConnectionStatus, DroneState, Error, FlightError, Heading, PlaybackError,
    Point3D, Result, SharedDroneState,
};
pub use dronepath_planner::{
    BuildSettings, ControlLimits, Direction, FlightBuilder, FlightFile, FlightInstruction,
    Horizontal, Rotation, RotationAngle, Vertical,
};
pub use dronepath_settings::Config;
pub use dronepath_visualizer::{
    RetainedScene, SceneConfig, SceneDescription, SceneMode, SceneSynchronizer, SyncReport,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
