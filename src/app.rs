//! Application state.
//!
//! One [`App`] ties together the flight being built, the shared drone
//! state, the link, the autopilot and the retained scene. Nothing here is
//! global; front-ends own an `App` and pass it around.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dronepath_communication::{
    Autopilot, FlightSession, HostLink, PlaybackOutcome, PlaybackTiming, UdpDroneLink,
    UdpLinkConfig, TAKEOFF_HEIGHT,
};
use dronepath_core::{thread_safe_rw, DroneState, Point3D, SharedDroneState};
use dronepath_planner::{BuildSettings, FlightBuilder};
use dronepath_settings::Config;
use dronepath_visualizer::{
    RetainedScene, SceneConfig, SceneDescription, SceneMode, SceneSynchronizer, SyncReport,
};
use tracing::info;

/// Post-takeoff start point from the config
pub fn start_point(config: &Config) -> Point3D {
    let [x, y, z] = config.flight.start;
    Point3D::new(x, y, z)
}

/// Where the drone stands before takeoff
pub fn ground_start(config: &Config) -> Point3D {
    let start = start_point(config);
    start.with_y(start.y - TAKEOFF_HEIGHT)
}

pub fn build_settings(config: &Config) -> BuildSettings {
    BuildSettings {
        distance: config.flight.distance,
        speed: config.flight.speed,
        scale: config.flight.scale,
        start: start_point(config),
    }
}

pub fn scene_config(config: &Config) -> SceneConfig {
    SceneConfig {
        scale: config.flight.scale,
        ground_y: ground_start(config).y,
        start: start_point(config),
        follow_distance: config.camera.follow_distance,
        follow_height: config.camera.follow_height,
        ..SceneConfig::default()
    }
}

pub fn playback_timing(config: &Config) -> PlaybackTiming {
    let playback = &config.playback;
    PlaybackTiming::from_millis(
        playback.takeoff_delay_ms,
        playback.move_delay_ms,
        playback.rotate_delay_ms,
        playback.land_settle_ms,
        playback.record_warmup_ms,
    )
}

pub fn udp_config(config: &Config) -> UdpLinkConfig {
    UdpLinkConfig {
        drone_address: config.connection.drone_address.clone(),
        bind_address: config.connection.bind_address.clone(),
        response_timeout: Duration::from_millis(config.connection.response_timeout_ms),
    }
}

/// Everything one front-end session needs
pub struct App {
    config: Config,
    session: FlightSession,
    autopilot: Arc<Autopilot>,
    scene_config: SceneConfig,
    synchronizer: SceneSynchronizer,
    renderer: RetainedScene,
}

impl App {
    pub fn new(config: Config, link: Arc<dyn HostLink>) -> Self {
        let drone = thread_safe_rw(DroneState::new(ground_start(&config)));
        let autopilot = Autopilot::new(
            drone.clone(),
            link.clone(),
            ground_start(&config),
            playback_timing(&config),
        );
        let session = FlightSession::new(FlightBuilder::new(build_settings(&config)), drone, link);

        Self {
            scene_config: scene_config(&config),
            config,
            session,
            autopilot: Arc::new(autopilot),
            synchronizer: SceneSynchronizer::new(),
            renderer: RetainedScene::new(),
        }
    }

    /// App talking to the drone over UDP
    pub fn with_udp_link(config: Config) -> Self {
        let link = Arc::new(UdpDroneLink::new(udp_config(&config)));
        Self::new(config, link)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &FlightSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FlightSession {
        &mut self.session
    }

    pub fn builder(&self) -> &FlightBuilder {
        self.session.builder()
    }

    pub fn builder_mut(&mut self) -> &mut FlightBuilder {
        self.session.builder_mut()
    }

    pub fn drone(&self) -> &SharedDroneState {
        self.session.drone()
    }

    pub fn autopilot(&self) -> Arc<Autopilot> {
        self.autopilot.clone()
    }

    pub fn scene_config(&self) -> &SceneConfig {
        &self.scene_config
    }

    pub fn renderer(&self) -> &RetainedScene {
        &self.renderer
    }

    /// Current scene for the plan and drone state
    pub fn describe_scene(&self, mode: SceneMode) -> SceneDescription {
        let drone = self.drone().read().clone();
        SceneDescription::build(self.builder().store(), &drone, &self.scene_config, mode)
    }

    /// Bring the retained scene up to date
    pub fn refresh_scene(&mut self, mode: SceneMode) -> SyncReport {
        let description = self.describe_scene(mode);
        self.synchronizer.sync(&description, &mut self.renderer)
    }

    pub fn open_flight(&mut self, path: &Path) -> anyhow::Result<()> {
        self.builder_mut().load_from_file(path)?;
        self.config.add_recent_file(path.to_path_buf());
        Ok(())
    }

    pub fn save_flight(&mut self, path: &Path) -> anyhow::Result<()> {
        self.builder_mut().save_to_file(path)?;
        self.config.add_recent_file(path.to_path_buf());
        Ok(())
    }

    /// Connect and replay the current plan
    pub async fn fly(&mut self, record: bool) -> anyhow::Result<PlaybackOutcome> {
        if !self.session.connection().is_connected() {
            self.session
                .connect()
                .await
                .context("Failed to connect to the drone")?;
        }

        let instructions = self.builder().instructions().to_vec();
        info!(
            "Flying '{}' ({} entries)",
            self.builder().flight_name,
            instructions.len()
        );
        let outcome = if record {
            self.autopilot.run_and_record(&instructions).await?
        } else {
            self.autopilot.run(&instructions).await?
        };
        Ok(outcome)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("autopilot", &self.autopilot)
            .finish()
    }
}
