use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dronepath::{
    init_logging, App, Config, HostLink, NoOpLink, PlanOp, PlaybackOutcome, PlaybackState,
    SceneMode, UdpDroneLink, BUILD_DATE, VERSION,
};
use dronepath_core::event_bus::{AppEvent, EventCategory, EventFilter, PlaybackEvent};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "build, preview and fly autonomous drone flight paths")]
struct Args {
    /// Config file (.toml or .json); defaults to the platform config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a flight file holding only takeoff and land
    New {
        file: PathBuf,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Apply editing operations, e.g. `forward up-left cw:90 hold:2 undo`
    Edit {
        file: PathBuf,
        /// Step distance in metres for the moves that follow
        #[arg(short, long)]
        distance: Option<f64>,
        /// Speed in cm/s for the moves that follow
        #[arg(short, long)]
        speed: Option<u32>,
        #[arg(required = true)]
        ops: Vec<PlanOp>,
    },
    /// Print the instruction list, SDK commands and projected path
    Show { file: PathBuf },
    /// Build the 3D scene and print what a renderer would receive
    Scene {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ModeArg::Build)]
        mode: ModeArg,
    },
    /// Fly a flight file; Ctrl-C cancels and lands
    Fly {
        file: PathBuf,
        /// Record video while flying
        #[arg(long)]
        record: bool,
        /// Replay against a link that sends nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the effective configuration
    Config {
        /// Write the defaults to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Build,
    Run,
}

impl From<ModeArg> for SceneMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Build => SceneMode::Build,
            ModeArg::Run => SceneMode::Run,
        }
    }
}

fn config_path(args: &Args) -> anyhow::Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => Ok(Config::default_path()?),
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

fn offline_app(config: Config) -> App {
    App::new(config, Arc::new(NoOpLink::new()))
}

fn new_flight(config: Config, file: &Path, name: Option<String>) -> anyhow::Result<()> {
    let mut app = offline_app(config);
    if let Some(name) = name {
        app.builder_mut().flight_name = name;
    }
    app.save_flight(file)?;
    println!("Created {}", file.display());
    Ok(())
}

fn edit_flight(
    config: Config,
    file: &Path,
    distance: Option<f64>,
    speed: Option<u32>,
    ops: &[PlanOp],
) -> anyhow::Result<()> {
    let mut app = offline_app(config);
    app.open_flight(file)?;

    let builder = app.builder_mut();
    if let Some(distance) = distance {
        builder.set_distance(distance);
    }
    if let Some(speed) = speed {
        builder.set_speed(speed);
    }
    for op in ops {
        op.apply(builder)
            .with_context(|| format!("Cannot apply '{}'", op))?;
    }

    app.save_flight(file)?;
    print_plan(&app);
    Ok(())
}

fn print_plan(app: &App) {
    let builder = app.builder();
    println!("{}", builder.flight_name);
    for (index, instruction) in builder.instructions().iter().enumerate() {
        println!(
            "{:>3}  {:<40} {}",
            index,
            instruction.message(),
            instruction.drone_command()
        );
    }

    let path: Vec<String> = builder.path().iter().map(|p| p.to_string()).collect();
    println!("path: {}", path.join(" -> "));
    println!("heading: {}", builder.heading());

    let limits = builder.control_limits();
    let disabled: Vec<String> = dronepath_planner::Control::ALL
        .iter()
        .filter(|control| limits.is_disabled(**control))
        .map(|control| format!("{:?}", control))
        .collect();
    if !disabled.is_empty() {
        println!("disabled controls: {}", disabled.join(", "));
    }
}

fn show_scene(config: Config, file: &Path, mode: SceneMode) -> anyhow::Result<()> {
    let mut app = offline_app(config);
    app.open_flight(file)?;
    let report = app.refresh_scene(mode);

    let description = app.describe_scene(mode);
    println!("{}", serde_json::to_string_pretty(&report_json(&app, &report, &description))?);
    Ok(())
}

fn report_json(
    app: &App,
    report: &dronepath::SyncReport,
    description: &dronepath::SceneDescription,
) -> serde_json::Value {
    let stats = app.renderer().stats();
    let primitives: Vec<serde_json::Value> = description
        .primitives
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": format!("{:?}", p.id),
                "vertices": p.shape.vertex_count(),
                "color": p.color,
            })
        })
        .collect();
    let eye = description.camera.get_eye_position();

    serde_json::json!({
        "primitives": primitives,
        "added": report.added.len(),
        "total_vertices": stats.total_vertices,
        "bounds": [stats.bounds.0.to_array(), stats.bounds.1.to_array()],
        "drone": {
            "position": description.drone.position.to_array(),
            "yaw": description.drone.yaw,
            "scale": description.drone.scale,
        },
        "camera": {
            "eye": eye.to_array(),
            "target": description.camera.target.to_array(),
        },
    })
}

async fn fly(config: Config, file: &Path, record: bool, dry_run: bool) -> anyhow::Result<()> {
    let link: Arc<dyn HostLink> = if dry_run {
        Arc::new(NoOpLink::new())
    } else {
        Arc::new(UdpDroneLink::new(dronepath::app::udp_config(&config)))
    };
    let mut app = App::new(config, link);
    app.open_flight(file)?;

    dronepath_core::event_bus().subscribe(
        EventFilter::Categories(vec![EventCategory::Playback]),
        |event| {
            if let AppEvent::Playback(PlaybackEvent::Step {
                index,
                label,
                position,
                ..
            }) = event
            {
                println!("{:>3}  {:<40} {}", index, label, position);
            }
        },
    );

    let autopilot = app.autopilot();
    let flight = app.fly(record);
    tokio::pin!(flight);

    let outcome = tokio::select! {
        outcome = &mut flight => outcome?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, landing");
            autopilot.cancel().await?;
            flight.await?
        }
    };

    match outcome {
        PlaybackOutcome::Completed => {
            while autopilot.state() == PlaybackState::Settling {
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            info!("Flight finished");
        }
        PlaybackOutcome::Cancelled { index } => {
            println!("Cancelled before step {}", index);
        }
    }
    Ok(())
}

fn show_config(path: &Path, config: &Config, init: bool) -> anyhow::Result<()> {
    if init && !path.exists() {
        config.save_to_file(path)?;
        println!("Wrote {}", path.display());
    }
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = Args::parse();
    info!("dronepath {} (built {})", VERSION, BUILD_DATE);

    let path = config_path(&args)?;
    let config = load_config(&path)?;

    match args.command {
        Command::New { file, name } => new_flight(config, &file, name),
        Command::Edit {
            file,
            distance,
            speed,
            ops,
        } => edit_flight(config, &file, distance, speed, &ops),
        Command::Show { file } => {
            let mut app = offline_app(config);
            app.open_flight(&file)?;
            print_plan(&app);
            Ok(())
        }
        Command::Scene { file, mode } => show_scene(config, &file, mode.into()),
        Command::Fly {
            file,
            record,
            dry_run,
        } => fly(config, &file, record, dry_run).await,
        Command::Config { init } => show_config(&path, &config, init),
    }
}
