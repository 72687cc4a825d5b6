// src/main.rs
//! Workout Tracker - record a GPS route and summarise the workout

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::{
    io,
    path::PathBuf,
    sync::{atomic::AtomicBool, Arc},
    time::Duration,
};
use tokio::time::Instant;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker::{
    config::WorkoutConfig,
    display::{TerminalDisplay, TerminalSummary},
    location::{
        authorize, list_serial_ports, ConsentAuthorization, GpsdProvider, LocationGrant, LocationProvider,
        ReplayProvider, SerialProvider,
    },
    summary::{JsonSummary, SummaryNavigator, WorkoutSummary},
    tracker::TrackerService,
};

#[derive(Parser)]
#[command(name = "workout-tracker", version, about = "Record a workout route from GPS and summarise it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Track a workout until Ctrl+C, then show the summary
    Track(TrackArgs),
    /// Inspect or edit the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List available serial ports
    ListPorts,
}

#[derive(Args)]
struct TrackArgs {
    /// Location source
    #[arg(long, value_parser = ["gpsd", "serial", "replay"])]
    source: Option<String>,
    /// Serial port of an NMEA receiver
    #[arg(long)]
    port: Option<String>,
    #[arg(long)]
    baud: Option<u32>,
    /// gpsd host
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    gpsd_port: Option<u16>,
    /// JSON file of coordinates to replay
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Stop automatically after this many seconds
    #[arg(long)]
    duration: Option<u64>,
    /// Print the summary as JSON instead of the terminal dashboard
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    /// Set the physiological parameters used for calorie estimates
    Profile {
        #[arg(long)]
        mass_kg: Option<f64>,
        #[arg(long)]
        age: Option<f64>,
        #[arg(long)]
        resting_hr: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        slope: Option<f64>,
        #[arg(long)]
        treadmill: Option<bool>,
    },
    /// Forget the stored answer to the location permission prompt
    ResetConsent,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let loaded = WorkoutConfig::load();

    match cli.command {
        Command::Track(args) => {
            let config = loaded.unwrap_or_else(|e| {
                warn!("using default configuration: {}", e);
                WorkoutConfig::default()
            });
            track(args, config).await
        }
        Command::Config { action } => configure(action, loaded.context("reading configuration")?),
        Command::ListPorts => {
            let ports = list_serial_ports()?;
            if ports.is_empty() {
                println!("No serial ports found.");
            } else {
                println!("Available serial ports:");
                for port in ports {
                    println!("  {}", port);
                }
            }
            Ok(())
        }
    }
}

async fn track(args: TrackArgs, mut config: WorkoutConfig) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);
    config.validate()?;
    let provider = build_provider(&config)?;
    let grant = request_location(&config)?;

    let service = TrackerService::spawn(Arc::clone(&provider), config.location, config.tracker_settings());
    service.start(&grant).await?;

    let deadline = args.duration.map(|secs| Instant::now() + Duration::from_secs(secs));
    if args.json {
        match deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => tokio::signal::ctrl_c().await.context("waiting for Ctrl+C")?,
        }
    } else {
        let running = Arc::new(AtomicBool::new(true));
        TerminalDisplay::new(provider.name())
            .run(&service, running, deadline)
            .await?;
    }

    let snapshot = service.stop().await?;
    service.shutdown().await;

    let summary = WorkoutSummary::from_snapshot(&snapshot, &config.calories, config.region_padding_deg)?;
    let mut navigator: Box<dyn SummaryNavigator> = if args.json {
        Box::new(JsonSummary::new(io::stdout()))
    } else {
        Box::new(TerminalSummary::stdout())
    };
    navigator.show(&summary)?;
    Ok(())
}

fn apply_overrides(config: &mut WorkoutConfig, args: &TrackArgs) {
    if let Some(port) = &args.port {
        let baud = args.baud.or(config.serial_baudrate).unwrap_or(9600);
        config.update_serial(port.clone(), baud);
    }
    if args.host.is_some() || args.gpsd_port.is_some() {
        let host = args
            .host
            .clone()
            .or_else(|| config.gpsd_host.clone())
            .unwrap_or_else(|| "localhost".to_string());
        config.update_gpsd(host, args.gpsd_port.or(config.gpsd_port).unwrap_or(2947));
    }
    if let Some(path) = &args.replay {
        config.update_replay(path.clone());
    }
    if let Some(source) = &args.source {
        config.update_source(source);
    }
}

fn build_provider(config: &WorkoutConfig) -> anyhow::Result<Arc<dyn LocationProvider>> {
    match config.source_type.as_str() {
        "gpsd" => Ok(Arc::new(GpsdProvider::new(
            config.gpsd_host.clone().unwrap_or_else(|| "localhost".to_string()),
            config.gpsd_port.unwrap_or(2947),
        ))),
        "serial" => {
            let port = config.serial_port.clone().context("serial source needs --port")?;
            Ok(Arc::new(SerialProvider::new(port, config.serial_baudrate.unwrap_or(9600))))
        }
        "replay" => {
            let path = config.replay_file.as_deref().context("replay source needs --replay FILE")?;
            let provider = ReplayProvider::from_file(path)
                .with_context(|| format!("loading replay file {}", path.display()))?;
            Ok(Arc::new(provider))
        }
        other => bail!("Unknown source type: {}", other),
    }
}

/// Ask for location access, remembering the answer for next time
fn request_location(config: &WorkoutConfig) -> anyhow::Result<LocationGrant> {
    let stdin = io::stdin();
    let mut auth = ConsentAuthorization::new(config.location_consent, stdin.lock(), io::stderr());
    let grant = authorize(&mut auth);

    if auth.consent() != config.location_consent {
        if let Err(e) = WorkoutConfig::store_consent(auth.consent()) {
            warn!("location consent not saved, config file left unchanged: {}", e);
        }
    }

    grant.context("Permission needed")
}

fn configure(action: ConfigAction, mut config: WorkoutConfig) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", WorkoutConfig::get_config_path()?.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Profile {
            mass_kg,
            age,
            resting_hr,
            slope,
            treadmill,
        } => {
            let profile = &mut config.calories;
            if let Some(mass_kg) = mass_kg {
                profile.mass_kg = mass_kg;
            }
            if let Some(age) = age {
                profile.age = age;
            }
            if let Some(resting_hr) = resting_hr {
                profile.resting_heart_rate = resting_hr;
            }
            if let Some(slope) = slope {
                profile.slope = slope;
            }
            if let Some(treadmill) = treadmill {
                profile.treadmill = treadmill;
            }
            config.validate()?;
            config.save()?;
            println!("Calorie profile saved.");
            println!(
                "  estimated max heart rate {:.0} bpm, VO2max {:.1} ml/kg/min",
                config.calories.max_heart_rate(),
                config.calories.estimated_vo2max()
            );
        }
        ConfigAction::ResetConsent => {
            config.location_consent = None;
            config.save()?;
            println!("Location consent cleared.");
        }
    }
    Ok(())
}
