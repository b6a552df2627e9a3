use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use crossroads_sim::simulation::{self, Density, IntersectionModel, SimConfig};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DensityArg {
    Low,
    Medium,
    High,
}

impl From<DensityArg> for Density {
    fn from(arg: DensityArg) -> Self {
        match arg {
            DensityArg::Low => Density::Low,
            DensityArg::Medium => Density::Medium,
            DensityArg::High => Density::High,
        }
    }
}

#[derive(Parser)]
#[command(name = "crossroads_sim")]
#[command(about = "Four-way intersection simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "1800")]
    ticks: u32,

    /// Traffic density preset
    #[arg(long, value_enum, default_value = "medium")]
    density: DensityArg,

    /// Explicit per-tick spawn probability, overrides --density
    #[arg(long)]
    spawn_probability: Option<f64>,

    /// Ticks per signal phase
    #[arg(long, default_value = "150")]
    cycle_length: u32,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks between map snapshots in headless mode (0 disables them)
    #[arg(long, default_value = "300")]
    report_every: u32,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        let config = SimConfig::default()
            .with_density(self.density.into())
            .with_cycle_length(self.cycle_length);
        match self.spawn_probability {
            Some(p) => config.with_spawn_probability(p),
            None => config,
        }
    }

    fn build_model(&self) -> Result<IntersectionModel> {
        let config = self.sim_config();
        let model = match self.seed {
            Some(seed) => IntersectionModel::with_seed(config, seed),
            None => IntersectionModel::new(config),
        };
        model.context("Invalid simulation configuration")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            let model = cli.build_model()?;
            run_with_ui(model);
            Ok(())
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui");
        }
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
        if cli.spawn_probability.is_some() {
            warn!("--spawn-probability given, ignoring --density {:?}", cli.density);
        }
        let model = cli.build_model()?;
        run_headless(model, cli.ticks, cli.report_every);
        Ok(())
    }
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(mut model: IntersectionModel, ticks: u32, report_every: u32) {
    info!("Running intersection simulation in headless mode...");
    info!(
        "Ticks: {}, spawn rate: {}, cycle length: {}",
        ticks,
        model.config().spawn_rate,
        model.config().cycle_length
    );

    println!("Initial state:");
    println!("{}", simulation::summary(&model));
    println!();

    for tick in 1..=ticks {
        model.step();

        if report_every > 0 && tick % report_every == 0 {
            println!("--- After tick {} ({:.1}s at 60 Hz) ---", tick, tick as f32 / 60.0);
            println!("{}", simulation::summary(&model));
            print!("{}", simulation::render_map(&model));
            println!();
        }
    }

    let stats = model.stats();
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks simulated: {}", stats.ticks);
    info!("Total vehicles spawned: {}", stats.vehicles_spawned);
    info!("Total vehicles exited: {}", stats.vehicles_exited);
    info!("Active vehicles: {}", model.active_count());
    info!("Signal changes: {}", stats.signal_changes);
    info!("Average wait: {:.1} ticks", stats.average_wait());
    info!("Longest wait: {} ticks", stats.max_wait_ticks);
    info!("Throughput: {:.1}%", stats.throughput());
}

#[cfg(feature = "ui")]
fn run_with_ui(model: IntersectionModel) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;
    use crossroads_sim::ui;

    println!("Starting Crossroads Sim UI...");
    println!();
    println!("Controls:");
    println!("  1/2/3       - Low/medium/high traffic density");
    println!("  Up/Down     - Raise/lower spawn probability");
    println!("  Space       - Pause/resume");
    println!("  R           - Reset");
    println!("  ESC         - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,crossroads_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Crossroads Sim".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(ui::SimModelResource(model))
        .add_plugins(ui::IntersectionUIPlugin)
        .run();
}
