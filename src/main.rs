//! Runs the BB84 pipeline once with the default configuration and prints a
//! stage-by-stage report. Set `RUST_LOG=debug` for per-stage logging.

use bb84_sim::random::RngSource;
use bb84_sim::simulation::{run_simulation, SimulationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SimulationConfig::default();
    let mut rng = RngSource::from_entropy();

    println!("--- BB84 Key Distribution Simulation ---\n");
    let report = run_simulation(&config, &mut rng)?;
    print!("{}", report);

    Ok(())
}
