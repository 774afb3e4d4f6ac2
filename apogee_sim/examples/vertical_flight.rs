// apogee_sim/examples/vertical_flight.rs

//! Flies the bundled hop scenario and prints what the flight computer sees.
//!
//! To run this example:
//! `cargo run -p apogee_sim --example vertical_flight`

use apogee_sim::prelude::*;

/// A minimal flight computer: tracks the highest barometric altitude and
/// calls apogee once the reading has dropped clearly below it.
#[derive(Debug, Default)]
struct ApogeeWatcher {
    ground_pressure: f64,
    max_altitude: f64,
    apogee_ms: Option<u32>,
}

impl FlightComputer for ApogeeWatcher {
    fn setup(&mut self, telemetry: &Telemetry) {
        self.ground_pressure = telemetry.pressure();
        println!("setup: ground pressure {:.0} Pa", self.ground_pressure);
    }

    fn on_telemetry(&mut self, telemetry: &Telemetry) {
        self.max_altitude = self.max_altitude.max(telemetry.baro_altitude);
        if self.apogee_ms.is_none() && telemetry.baro_altitude < self.max_altitude - 2.0 {
            self.apogee_ms = Some(telemetry.timestamp_ms);
            println!(
                "apogee detected at {} ms (peak baro {:.1} m)",
                telemetry.timestamp_ms, self.max_altitude
            );
        }
    }
}

fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt::init();

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/hop.toml");
    let config = ScenarioConfig::load(path)?;

    let mut sim = FlightSimulation::from_scenario(&config, ApogeeWatcher::default())?;
    let records = sim.run(config.simulation.duration);

    println!("{:>6} {:>9} {:>9} {:>9} {:>9}", "t [s]", "h [m]", "v [m/s]", "baro [m]", "acc");
    for record in records.iter().step_by(10) {
        println!(
            "{:>6.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
            record.time,
            record.state.altitude,
            record.state.velocity,
            record.telemetry.baro_altitude,
            record.telemetry.acceleration
        );
    }

    let true_apogee = records
        .iter()
        .map(|r| r.state.altitude)
        .fold(0.0, f64::max);
    println!("true apogee {:.1} m", true_apogee);
    if sim.computer().apogee_ms.is_none() {
        println!("no apogee detected");
    }
    Ok(())
}
