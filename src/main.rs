//! Headless command-line runner for the lot simulator.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use lot_simulator::builders::{build_arrivals, build_lot};
use lot_simulator::config::{parse_total, SimulationConfig};
use lot_simulator::core::{AppResult, ShutdownSignal};
use lot_simulator::runtime::{spawn_monitor, ReportFormat, Simulation, TokioSpawner};
use lot_simulator::util::init_tracing;

#[derive(Parser, Debug)]
#[command(version, about = "Simulate a bounded parking lot under random arrivals")]
struct Args {
    #[arg(long, help = "JSON config file; its fields override LOT_* environment variables")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Number of spots")]
    capacity: Option<usize>,

    #[arg(short, long, help = "Vehicles to emit, or `unbounded`")]
    total_cars: Option<String>,

    #[arg(short, long, help = "Mean arrivals per second (λ)")]
    arrival_rate: Option<f64>,

    #[arg(long, help = "Shortest dwell time in seconds")]
    dwell_min: Option<f64>,

    #[arg(long, help = "Longest dwell time in seconds")]
    dwell_max: Option<f64>,

    #[arg(long, help = "Observer polling period in milliseconds")]
    poll_ms: Option<u64>,

    #[arg(long, help = "PRNG seed")]
    seed: Option<u64>,

    #[arg(long, help = "Print occupancy and the final report as JSON")]
    json: bool,

    #[arg(long, help = "Tokio worker threads (defaults to the CPU count)")]
    worker_threads: Option<usize>,
}

impl Args {
    fn load_config(&self) -> AppResult<SimulationConfig> {
        let raw = self
            .config
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))
            })
            .transpose()?;
        let mut cfg = SimulationConfig::layered(raw.as_deref()).map_err(anyhow::Error::msg)?;
        if let Some(capacity) = self.capacity {
            cfg.capacity = capacity;
        }
        if let Some(total) = &self.total_cars {
            cfg.total_cars = parse_total(total).map_err(anyhow::Error::msg)?;
        }
        if let Some(rate) = self.arrival_rate {
            cfg.arrival_rate = rate;
        }
        if let Some(min) = self.dwell_min {
            cfg.dwell_min_secs = min;
        }
        if let Some(max) = self.dwell_max {
            cfg.dwell_max_secs = max;
        }
        if let Some(poll) = self.poll_ms {
            cfg.poll_interval_ms = poll;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

fn main() -> AppResult<()> {
    init_tracing();
    let args = Args::parse();
    let cfg = args
        .load_config()
        .context("invalid simulation configuration")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.worker_threads.unwrap_or_else(num_cpus::get).max(1))
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let format = if args.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };
    runtime.block_on(run(cfg, format))
}

async fn run(cfg: SimulationConfig, format: ReportFormat) -> AppResult<()> {
    let lot = build_lot(&cfg, TokioSpawner::current()?)?;
    let arrivals = build_arrivals(&cfg)?;
    let sim = Simulation::start(lot, arrivals, cfg.total_cars);

    let (monitor_stop, monitor_listener) = ShutdownSignal::channel();
    let monitor = spawn_monitor(
        sim.lot().clone(),
        Duration::from_millis(cfg.poll_interval_ms),
        format,
        monitor_listener,
    );

    let cancel = sim.shutdown_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; stopping arrivals");
            cancel.cancel();
        }
    });

    let report = sim.finish().await?;
    monitor_stop.cancel();
    let polls = monitor.await.context("observer monitor failed")?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => info!(
            run_id = %report.run_id,
            emitted = report.emitted,
            parked = report.stats.parked,
            departed = report.stats.departed,
            dropped = report.stats.dropped,
            polls,
            "final report"
        ),
    }
    Ok(())
}
