//! Galton Board entry point
//!
//! Headless runner: builds the board, drops one batch of balls, plays the
//! simulation for a fixed time and prints the resulting distribution.
//!
//! Usage: `galton-board [settings.json]`

use std::process::ExitCode;

use galton_board::consts::SIM_DT;
use galton_board::{KinematicWorld, Result, Settings, SimulationController};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    log::info!("Galton board starting (seed {})", settings.seed);

    let world = KinematicWorld::new(settings.physics.clone());
    let mut sim = SimulationController::with_settings(world, &settings);
    sim.start(&settings.board)?;

    let (x, y) = settings.effective_drop_point();
    sim.spawn_balls(x, y, settings.balls_per_click)?;

    let steps = (settings.run_seconds / SIM_DT).ceil() as u32;
    for _ in 0..steps {
        sim.step()?;
    }

    let histogram = sim.histogram();
    println!("{}", histogram.render_text(50));
    if let Some(mean) = histogram.mean_bin() {
        println!("mean bin: {mean:.2}");
    }
    log::info!(
        "{} of {} balls counted, {} cross-bin hits ignored",
        histogram.total(),
        sim.balls_spawned(),
        sim.cross_bin_hits()
    );
    if sim.rejected_hits() > 0 {
        println!("unplaced sensor hits: {}", sim.rejected_hits());
    }

    sim.shutdown();
    Ok(())
}
