//! Choice Wheel - spin a wheel of named choices and pick a winner
//!
//! CLI commands:
//! - gui: Launch the native wheel viewer
//! - spin: Run one spin against a synthetic clock and print its trajectory
//! - simulate: Run many spins and report the winner distribution
//! - list: List configured choices

mod choices;
mod config;
mod gui;
mod logging;
mod wheel;

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use choices::ChoiceList;
use wheel::{SpinController, SpinTuning, POINTER_ANGLE};

#[derive(Parser)]
#[command(name = "choice_wheel")]
#[command(about = "Animated wheel that picks one of your choices, uniformly at random")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to choices.yaml config
    #[arg(short, long, default_value = "choices.yaml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the native wheel viewer
    Gui,

    /// Run a single spin without a display, printing sampled snapshots
    Spin {
        /// Seed for a reproducible spin
        #[arg(long)]
        seed: Option<u64>,

        /// Synthetic clock step between ticks, in milliseconds
        #[arg(long, default_value = "250")]
        step_ms: u64,
    },

    /// Run many spins and print the empirical winner distribution
    Simulate {
        /// Number of spins to run
        #[arg(long, default_value = "10000")]
        spins: u32,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Write a JSON summary here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List configured choices
    List,
}

fn main() -> anyhow::Result<()> {
    logging::init_logging("logs");
    tracing::info!("Choice Wheel starting up");

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        config::Config::load(&cli.config)?
    } else {
        tracing::warn!("Config file not found: {:?}, using defaults", cli.config);
        default_config()
    };
    tracing::info!("Config loaded: {} choices", config.choices.len());

    match cli.command {
        Commands::Gui => {
            tracing::info!("Launching native wheel viewer");
            gui::run_viewer(config)?;
        }

        Commands::Spin { seed, step_ms } => {
            run_spin(&config, seed, step_ms)?;
        }

        Commands::Simulate {
            spins,
            seed,
            output,
        } => {
            run_simulation(&config, spins, seed, output.as_deref())?;
        }

        Commands::List => {
            list_choices(&config);
        }
    }

    Ok(())
}

fn build_controller(config: &config::Config, seed: Option<u64>) -> anyhow::Result<SpinController> {
    let list = ChoiceList::from_names(&config.choices);
    if list.len() < 2 {
        anyhow::bail!(
            "need at least two distinct choices to spin (have {})",
            list.len()
        );
    }

    let tuning = config.tuning();
    let mut controller = match seed {
        Some(seed) => SpinController::with_seed(tuning, seed),
        None => SpinController::new(tuning),
    };
    controller.set_choices(list.entries());
    Ok(controller)
}

/// Run one spin against a synthetic clock and print its trajectory
fn run_spin(config: &config::Config, seed: Option<u64>, step_ms: u64) -> anyhow::Result<()> {
    let mut controller = build_controller(config, seed)?;
    let step = step_ms.max(1);

    let mut now = 0u64;
    if !controller.spin(now) {
        anyhow::bail!("spin request was rejected");
    }

    println!(
        "Spinning a wheel of {} choices (target {:.1} deg)...",
        controller.layout().len(),
        controller.state().target_rotation
    );
    println!();

    loop {
        now += step;
        let settled = controller.tick(now);
        let state = controller.state();
        let passing = controller
            .layout()
            .choice_at(POINTER_ANGLE - state.rotation)
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        println!(
            "  t={:>6}ms  rotation={:>8.1} deg  under pointer: {}",
            now, state.rotation, passing
        );

        if let Some(winner) = settled {
            println!();
            println!("Winner: {}", winner.name);
            break;
        }
    }

    Ok(())
}

/// Run many spins back to back and report the winner distribution
fn run_simulation(
    config: &config::Config,
    spins: u32,
    seed: Option<u64>,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let mut controller = build_controller(config, seed)?;
    let duration = config.tuning().duration_ms;

    println!("Running {} spins over {} choices...", spins, controller.layout().len());

    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut now = 0u64;
    for _ in 0..spins {
        if !controller.spin(now) {
            anyhow::bail!("spin request was rejected mid-simulation");
        }
        now += duration;
        let winner = controller
            .tick(now)
            .ok_or_else(|| anyhow::anyhow!("spin failed to settle"))?;
        *counts.entry(winner.name).or_insert(0) += 1;
        now += 1;
    }

    println!();
    let expected = 100.0 / controller.layout().len() as f64;
    for segment in controller.layout().segments() {
        let count = counts.get(&segment.choice.name).copied().unwrap_or(0);
        let share = 100.0 * count as f64 / spins as f64;
        println!(
            "  {:<20} {:>8} wins  {:>6.2}% (fair: {:.2}%)",
            segment.choice.name, count, share, expected
        );
    }

    if let Some(path) = output {
        let data = serde_json::json!({
            "spins": spins,
            "seed": seed,
            "choices": controller.layout().len(),
            "counts": counts,
        });
        std::fs::write(path, serde_json::to_string_pretty(&data)?)?;
        println!();
        println!("Summary written to {:?}", path);
    }

    Ok(())
}

/// List configured choices
fn list_choices(config: &config::Config) {
    let list = ChoiceList::from_names(&config.choices);

    println!("Configured choices ({}):", list.len());
    println!();
    if list.is_empty() {
        println!("  (none)");
    } else {
        for choice in list.entries() {
            println!("  - {} [{}]", choice.name, choice.id);
        }
    }

    if list.len() < 2 {
        println!();
        println!("Add at least two choices to spin.");
    }
}

/// Default config when no file exists
fn default_config() -> config::Config {
    config::Config {
        choices: vec![
            "Pizza".to_string(),
            "Sushi".to_string(),
            "Tacos".to_string(),
            "Ramen".to_string(),
        ],
        wheel: SpinTuning::default(),
    }
}
