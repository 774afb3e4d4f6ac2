// apogee_sim/src/simulation.rs

//! The fixed-step loop that flies the vehicle and feeds a flight computer.

use apogee_core::error::ConfigError;
use apogee_core::models::dynamics::Vehicle;
use apogee_core::models::environment::CelestialBody;
use apogee_core::models::measurement::SampleAndHold;
use apogee_core::types::FlightState;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use crate::computer::{FlightComputer, Telemetry};
use crate::config::ScenarioConfig;
use crate::error::SimError;
use crate::prng::SimulationRng;

/// Ground truth and sensor output after one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightRecord {
    /// Time the true state refers to [s].
    pub time: f64,
    pub state: FlightState,
    pub acceleration: f64,
    pub telemetry: Telemetry,
}

pub struct FlightSimulation<C> {
    vehicle: Vehicle<CelestialBody>,
    barometer: SampleAndHold<ChaCha8Rng>,
    accelerometer: SampleAndHold<ChaCha8Rng>,
    computer: C,
    dt: f64,
    time: f64,
    steps: u64,
    started: bool,
}

impl<C: FlightComputer> FlightSimulation<C> {
    pub fn new(
        vehicle: Vehicle<CelestialBody>,
        barometer: SampleAndHold<ChaCha8Rng>,
        accelerometer: SampleAndHold<ChaCha8Rng>,
        computer: C,
        dt: f64,
    ) -> Result<Self, ConfigError> {
        let dt = ConfigError::require_positive("dt", dt)?;
        Ok(Self {
            vehicle,
            barometer,
            accelerometer,
            computer,
            dt,
            time: 0.0,
            steps: 0,
            started: false,
        })
    }

    /// Builds the vehicle, its engines and both sensors from a scenario.
    /// Sensor noise streams are forked from the scenario seed.
    pub fn from_scenario(config: &ScenarioConfig, computer: C) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = SimulationRng::new(config.simulation.seed)?;

        let mut vehicle = Vehicle::new(config.vehicle, config.body.build()?)?
            .with_state(config.simulation.initial_state());
        for engine in &config.engines {
            vehicle.add_engine(engine.build()?);
        }

        let barometer = SampleAndHold::new(config.sensors.barometer, rng.fork())?;
        let accelerometer = SampleAndHold::new(config.sensors.accelerometer, rng.fork())?;

        Ok(Self::new(
            vehicle,
            barometer,
            accelerometer,
            computer,
            config.simulation.dt,
        )?)
    }

    /// Advances one step.
    ///
    /// The vehicle is integrated from `t` to `t + dt`, both sensors are
    /// polled at `t` and the resulting telemetry is handed to the computer.
    /// The very first call also runs the computer's `setup`.
    pub fn step(&mut self) -> Telemetry {
        if !self.started {
            let initial = Telemetry {
                baro_altitude: self.barometer.reading().value,
                acceleration: self.accelerometer.reading().value,
                timestamp_ms: 0,
            };
            self.computer.setup(&initial);
            self.started = true;
        }

        let t = self.time;
        self.vehicle.update(self.dt, t);
        let telemetry = Telemetry {
            baro_altitude: self.barometer.poll(self.vehicle.altitude(), t),
            acceleration: self.accelerometer.poll(self.vehicle.acceleration(), t),
            timestamp_ms: self.timestamp_ms(),
        };
        self.computer.on_telemetry(&telemetry);

        self.steps += 1;
        // Derived from the step count so long runs do not accumulate drift.
        self.time = self.steps as f64 * self.dt;
        telemetry
    }

    /// Runs for `duration` seconds (rounded to whole steps) and records
    /// every step.
    pub fn run(&mut self, duration: f64) -> Vec<FlightRecord> {
        let steps = (duration / self.dt).round() as usize;
        info!(duration, dt = self.dt, steps, "Starting flight simulation");

        let mut records = Vec::with_capacity(steps);
        let mut max_altitude = self.vehicle.altitude();
        for _ in 0..steps {
            let telemetry = self.step();
            max_altitude = max_altitude.max(self.vehicle.altitude());
            records.push(FlightRecord {
                time: self.time,
                state: self.vehicle.state(),
                acceleration: self.vehicle.acceleration(),
                telemetry,
            });
        }

        info!(time = self.time, max_altitude, "Flight simulation finished");
        records
    }

    fn timestamp_ms(&self) -> u32 {
        (self.steps as f64 * self.dt * 1000.0).round() as u32
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn vehicle(&self) -> &Vehicle<CelestialBody> {
        &self.vehicle
    }

    pub fn computer(&self) -> &C {
        &self.computer
    }

    pub fn into_computer(self) -> C {
        self.computer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computer::TelemetryRecorder;
    use crate::config::EngineConfig;
    use approx::assert_abs_diff_eq;

    fn scenario() -> ScenarioConfig {
        let mut config = ScenarioConfig::default();
        config.simulation.seed = Some(1);
        config.engines.push(EngineConfig::Constant {
            thrust: 90.0,
            burn_time: 1.0,
            initial_mass: 0.3,
            final_mass: 0.1,
        });
        config
    }

    #[test]
    fn test_setup_runs_once_before_first_step() {
        let mut sim = FlightSimulation::from_scenario(&scenario(), TelemetryRecorder::default()).unwrap();
        sim.step();
        sim.step();
        let recorder = sim.into_computer();
        assert_eq!(
            recorder.initial,
            Some(Telemetry {
                baro_altitude: 0.0,
                acceleration: 0.0,
                timestamp_ms: 0
            })
        );
        assert_eq!(recorder.received.len(), 2);
    }

    #[test]
    fn test_timestamps_follow_step_index() {
        let mut sim = FlightSimulation::from_scenario(&scenario(), TelemetryRecorder::default()).unwrap();
        let records = sim.run(2.0);
        assert_eq!(records.len(), 40);
        let stamps: Vec<u32> = records.iter().map(|r| r.telemetry.timestamp_ms).collect();
        assert_eq!(stamps[0], 0);
        assert_eq!(stamps[1], 50);
        assert_eq!(stamps[39], 1950);
        assert!(stamps.windows(2).all(|w| w[1] > w[0]));
        assert_abs_diff_eq!(sim.time(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_barometer_holds_between_refreshes() {
        let mut sim = FlightSimulation::from_scenario(&scenario(), TelemetryRecorder::default()).unwrap();
        let records = sim.run(1.0);
        // Polled at t = 0.0, 0.05, ...; the first refresh happens at t = 0.3.
        for record in &records[..6] {
            assert_eq!(record.telemetry.baro_altitude, 0.0);
        }
        assert_ne!(records[6].telemetry.baro_altitude, 0.0);
        assert_eq!(
            records[7].telemetry.baro_altitude,
            records[6].telemetry.baro_altitude
        );
    }

    #[test]
    fn test_same_seed_same_flight() {
        let run = |seed| {
            let mut config = scenario();
            config.simulation.seed = Some(seed);
            FlightSimulation::from_scenario(&config, TelemetryRecorder::default())
                .unwrap()
                .run(3.0)
        };
        assert_eq!(run(5), run(5));

        let (a, b) = (run(5), run(6));
        // Same physics, different noise.
        assert_eq!(a.last().map(|r| r.state), b.last().map(|r| r.state));
        assert_ne!(a, b);
    }

    #[test]
    fn test_free_fall_scenario() {
        let mut config = ScenarioConfig::default();
        config.simulation.dt = 0.01;
        config.simulation.seed = Some(0);
        config.simulation.initial_altitude = 100.0;
        let mut sim = FlightSimulation::from_scenario(&config, TelemetryRecorder::default()).unwrap();
        let records = sim.run(1.0);
        let last = records.last().unwrap();
        assert_abs_diff_eq!(last.time, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(last.state.altitude, 95.09, epsilon = 0.05);
    }

    #[test]
    fn test_rejects_non_positive_dt() {
        let mut config = scenario();
        config.simulation.dt = -0.01;
        assert!(matches!(
            FlightSimulation::from_scenario(&config, TelemetryRecorder::default()),
            Err(SimError::Model(ConfigError::NotPositive { .. }))
        ));
    }
}
