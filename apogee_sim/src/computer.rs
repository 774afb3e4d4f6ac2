// apogee_sim/src/computer.rs

use apogee_core::models::environment::{pressure_at, SEA_LEVEL_PRESSURE};
use serde::{Deserialize, Serialize};

/// What the flight computer sees once per simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Barometric altitude above the launch site [m].
    pub baro_altitude: f64,
    /// Vertical acceleration reported by the accelerometer [m/s²].
    pub acceleration: f64,
    /// Milliseconds since the start of the run.
    pub timestamp_ms: u32,
}

impl Telemetry {
    /// Static pressure a barometer would read at `baro_altitude` [Pa],
    /// assuming standard pressure at the launch site.
    pub fn pressure(&self) -> f64 {
        self.pressure_with_reference(SEA_LEVEL_PRESSURE)
    }

    pub fn pressure_with_reference(&self, ground_pressure: f64) -> f64 {
        pressure_at(self.baro_altitude, ground_pressure)
    }
}

/// The flight software under test.
pub trait FlightComputer {
    /// Called once, before the first step, with the sensors' initial readings.
    fn setup(&mut self, telemetry: &Telemetry);

    /// Called after every step.
    fn on_telemetry(&mut self, telemetry: &Telemetry);
}

/// Records everything it is handed. Useful as a stand-in computer.
#[derive(Debug, Clone, Default)]
pub struct TelemetryRecorder {
    pub initial: Option<Telemetry>,
    pub received: Vec<Telemetry>,
}

impl FlightComputer for TelemetryRecorder {
    fn setup(&mut self, telemetry: &Telemetry) {
        self.initial = Some(*telemetry);
    }

    fn on_telemetry(&mut self, telemetry: &Telemetry) {
        self.received.push(*telemetry);
    }
}

impl<C: FlightComputer + ?Sized> FlightComputer for &mut C {
    fn setup(&mut self, telemetry: &Telemetry) {
        (**self).setup(telemetry);
    }

    fn on_telemetry(&mut self, telemetry: &Telemetry) {
        (**self).on_telemetry(telemetry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apogee_core::models::environment::altitude_from_pressure;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pressure_matches_barometric_altitude() {
        let telemetry = Telemetry {
            baro_altitude: 120.0,
            acceleration: 0.0,
            timestamp_ms: 0,
        };
        let p = telemetry.pressure();
        assert!(p < SEA_LEVEL_PRESSURE);
        assert_abs_diff_eq!(
            altitude_from_pressure(p, SEA_LEVEL_PRESSURE),
            120.0,
            epsilon = 1e-6
        );
    }

    fn feed<C: FlightComputer>(mut computer: C, telemetry: &Telemetry) {
        computer.setup(telemetry);
        computer.on_telemetry(telemetry);
    }

    #[test]
    fn test_recorder_through_mutable_reference() {
        let mut recorder = TelemetryRecorder::default();
        let telemetry = Telemetry {
            baro_altitude: 1.0,
            acceleration: 2.0,
            timestamp_ms: 3,
        };
        feed(&mut recorder, &telemetry);
        assert_eq!(recorder.initial, Some(telemetry));
        assert_eq!(recorder.received, vec![telemetry]);
    }
}
