// apogee_core/src/models/dynamics/vertical.rs

//! Single-axis (vertical) point-mass dynamics under thrust, drag and gravity.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::error::ConfigError;
use crate::models::environment::Environment;
use crate::models::propulsion::ThrustSource;
use crate::types::{FlightState, StateVector};
use crate::utils::integrators::{Stepper, RK4};

/// Airframe parameters. Engine mass is added on top of `dry_mass`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleParams {
    /// Mass without engines [kg].
    pub dry_mass: f64,
    pub drag_coefficient: f64,
    /// Body-tube radius, sets the drag reference area [m].
    pub radius: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            dry_mass: 3.0,
            drag_coefficient: 0.4,
            radius: 0.1,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("dry mass", self.dry_mass)?;
        ConfigError::require_non_negative("drag coefficient", self.drag_coefficient)?;
        ConfigError::require_non_negative("radius", self.radius)?;
        Ok(())
    }

    /// Frontal area `πr²` [m²].
    pub fn reference_area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}

/// A vehicle constrained to move along the local vertical.
///
/// Positive altitude and velocity point up. The ground is at altitude zero
/// and is never penetrated: a step that would end below it leaves the
/// vehicle resting at zero altitude with zero velocity.
#[derive(Debug, Clone)]
pub struct Vehicle<E: Environment> {
    params: VehicleParams,
    environment: E,
    engines: Vec<Box<dyn ThrustSource>>,
    stepper: Stepper<RK4, f64, 2>,
    /// Total thrust held over the last step [N].
    force: f64,
    /// Acceleration from the final derivative evaluation of the last step [m/s²].
    acceleration: f64,
}

impl<E: Environment> Vehicle<E> {
    /// A vehicle at rest on the ground with no engines attached.
    pub fn new(params: VehicleParams, environment: E) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            environment,
            engines: Vec::new(),
            stepper: Stepper::new(RK4, FlightState::default().into()),
            force: 0.0,
            acceleration: 0.0,
        })
    }

    pub fn with_state(mut self, state: FlightState) -> Self {
        self.stepper.set_state(state.into());
        self
    }

    pub fn add_engine(&mut self, engine: Box<dyn ThrustSource>) {
        debug!(
            engine = ?engine,
            burnout_time = engine.burnout_time(),
            "Attached engine"
        );
        self.engines.push(engine);
    }

    /// Advances the vehicle from `t` to `t + dt`.
    ///
    /// Thrust is sampled once at `t` and held for the whole step, while mass,
    /// drag and gravity are re-evaluated at every integrator stage.
    ///
    /// # Panics
    /// If `dt` is not strictly positive.
    pub fn update(&mut self, dt: f64, t: f64) -> FlightState {
        let was_on_ground = self.on_ground();
        self.force = self.engines.iter().map(|engine| engine.thrust(t)).sum();

        let Self {
            params,
            environment,
            engines,
            stepper,
            force,
            acceleration,
        } = self;
        let force = *force;
        let area = params.reference_area();

        let mut derivative = |x: &StateVector, tau: f64| {
            let mass = params.dry_mass + engines.iter().map(|e| e.mass(tau)).sum::<f64>();
            let altitude = x[0];
            // Below ground the vehicle is held: no motion and no gravity.
            let velocity = if altitude < 0.0 { 0.0 } else { x[1] };
            let gravity = if altitude > 0.0 {
                environment.gravity(altitude)
            } else {
                0.0
            };
            let drag = 0.5
                * environment.density(altitude)
                * params.drag_coefficient
                * area
                * velocity
                * velocity.abs();

            let a = (force - drag) / mass + gravity;
            *acceleration = a;
            StateVector::new(velocity, a)
        };
        stepper.step(t, dt, &mut derivative);

        if stepper.state()[0] < 0.0 {
            stepper.set_state(StateVector::zeros());
        }

        let state = self.state();
        match (was_on_ground, self.on_ground()) {
            (false, true) => debug!(t = t + dt, "Touchdown"),
            (true, false) => debug!(t, thrust = self.force, "Lift-off"),
            _ => {}
        }
        state
    }

    pub fn state(&self) -> FlightState {
        FlightState::from_vector(self.stepper.state())
    }

    pub fn altitude(&self) -> f64 {
        self.stepper.state()[0]
    }

    pub fn velocity(&self) -> f64 {
        self.stepper.state()[1]
    }

    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    pub fn force(&self) -> f64 {
        self.force
    }

    /// Dry mass plus the mass of every engine at `t` [kg].
    pub fn mass(&self, t: f64) -> f64 {
        self.params.dry_mass + self.engines.iter().map(|e| e.mass(t)).sum::<f64>()
    }

    /// Resting on the ground (zero altitude, not climbing).
    pub fn on_ground(&self) -> bool {
        self.altitude() <= 0.0 && self.velocity() <= 0.0
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn engines(&self) -> &[Box<dyn ThrustSource>] {
        &self.engines
    }
}
