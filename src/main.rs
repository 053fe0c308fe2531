//! Fuzzy Thermal - Entry Point
//!
//! Parses the command line, builds the control loop and drives it either with
//! the live terminal display or headless, printing one line per tick.

use clap::{Parser, ValueEnum};
use fuzzy_thermal::core::config::SimulationConfig;
use fuzzy_thermal::core::error::{Result, ThermalError};
use fuzzy_thermal::simulation::{parse_command, ControlLoop, Driver, LoopCommand, Snapshot};
use fuzzy_thermal::ui::run_interactive;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

/// Fuzzy thermal controller with a simulated plant
#[derive(Parser, Debug)]
#[command(name = "fuzzy-thermal")]
#[command(about = "Fuzzy Thermal Controller with Plant")]
struct Args {
    /// Target temperature (°C)
    #[arg(long, required_unless_present = "config")]
    temp: Option<f64>,

    /// Initial environment temperature (°C)
    #[arg(long)]
    init: Option<f64>,

    /// Skew rate: seconds to apply a ±3°C change
    #[arg(long)]
    skew: Option<f64>,

    /// Simulated seconds per control tick
    #[arg(long)]
    dt: Option<f64>,

    /// TOML config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Print snapshots instead of the live display
    #[arg(long)]
    headless: bool,

    /// Headless output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Wall-clock milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let args = Args::parse();

    // The live display owns stdout, keep logs quiet unless asked
    let default_level = if args.headless {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    tracing::info!(
        "Starting fuzzy thermal control: target {}°C, initial {}°C, skew {}s, dt {}s",
        config.target,
        config.initial_temperature,
        config.skew_rate,
        config.time_step
    );

    let control = ControlLoop::new(&config)?;
    let (driver, commands) = Driver::new(control);

    if args.headless {
        // Without a tick limit, pace the run in real time
        let default_ms = if args.ticks.is_some() {
            0
        } else {
            (config.time_step * 1000.0) as u64
        };
        let interval = Duration::from_millis(args.tick_ms.unwrap_or(default_ms));
        run_headless(driver, commands, interval, args.ticks, args.format)
    } else {
        let interval = Duration::from_millis(args.tick_ms.unwrap_or(200));
        let state = run_interactive(driver, commands, interval, config.history_len, args.ticks)?;
        if let Some(last) = state.latest {
            println!("{}", last);
            println!("Goodbye! Stopped after {} ticks ({:.1}s simulated).", last.tick, last.time);
        }
        Ok(())
    }
}

/// Merge the optional config file with command-line overrides
fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match (&args.config, args.temp) {
        (Some(path), _) => SimulationConfig::load(path)?,
        (None, Some(target)) => SimulationConfig::new(target),
        (None, None) => {
            return Err(ThermalError::InvalidConfig(
                "a target is required (--temp or --config)".into(),
            ))
        }
    };

    if let Some(target) = args.temp {
        config.target = target;
    }
    if let Some(init) = args.init {
        config.initial_temperature = init;
    }
    if let Some(skew) = args.skew {
        config.skew_rate = skew;
    }
    if let Some(dt) = args.dt {
        config.time_step = dt;
    }

    config.validate()?;
    Ok(config)
}

fn run_headless(
    mut driver: Driver,
    commands: Sender<LoopCommand>,
    interval: Duration,
    max_ticks: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    spawn_stdin_reader(commands);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    while let Some(snapshot) = driver.tick() {
        print_snapshot(&mut out, &snapshot, format)?;

        if max_ticks.is_some_and(|max| snapshot.tick >= max) {
            break;
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    let state = driver.control().state();
    tracing::info!(
        "Stopped after {} ticks at {:.2}°C (target {:.2}°C)",
        state.tick,
        state.current,
        state.target
    );
    Ok(())
}

fn print_snapshot(out: &mut impl Write, snapshot: &Snapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", snapshot)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(snapshot)?)?,
    }
    out.flush()?;
    Ok(())
}

/// Forward `c <value>` / `q` lines from stdin to the driver
fn spawn_stdin_reader(commands: Sender<LoopCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Ok(command) => {
                    if commands.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("Ignoring input: {}", e),
            }
        }
    });
}
