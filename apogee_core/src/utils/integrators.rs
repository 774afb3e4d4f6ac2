// apogee_core/src/utils/integrators.rs

//! Fixed-step explicit integrators over statically sized state vectors.
//!
//! There is no adaptive step-size control. Stability and accuracy depend on
//! the caller picking a small enough `dt`; divergence is not detected.

use nalgebra::{RealField, SVector};

pub trait Integrator<T: RealField + Copy, const N: usize> {
    /// Advances `x0` from `t0` to `tf` using the derivative `func(x, t)`.
    ///
    /// `func` is `FnMut` so a model may record values computed while the
    /// derivative is evaluated (the vehicle caches its acceleration this way).
    fn step(
        &self,
        func: &mut dyn FnMut(&SVector<T, N>, T) -> SVector<T, N>,
        x0: &SVector<T, N>,
        t0: T,
        tf: T,
    ) -> SVector<T, N>;
}

// Runge-Kutta methods
#[derive(Debug, Default, Clone, Copy)]
pub struct RK1;

impl<T: RealField + Copy, const N: usize> Integrator<T, N> for RK1 {
    fn step(
        &self,
        func: &mut dyn FnMut(&SVector<T, N>, T) -> SVector<T, N>,
        x0: &SVector<T, N>,
        t0: T,
        tf: T,
    ) -> SVector<T, N> {
        let dt = tf - t0;
        x0 + func(x0, t0) * dt // Euler's method
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RK4;

impl<T: RealField + Copy, const N: usize> Integrator<T, N> for RK4 {
    fn step(
        &self,
        func: &mut dyn FnMut(&SVector<T, N>, T) -> SVector<T, N>,
        x0: &SVector<T, N>,
        t0: T,
        tf: T,
    ) -> SVector<T, N> {
        let dt = tf - t0;
        let half: T = nalgebra::convert(0.5);
        let two: T = nalgebra::convert(2.0);
        let sixth: T = nalgebra::convert(1.0 / 6.0);
        let half_dt = half * dt;

        let k1 = func(x0, t0);
        let k2 = func(&(x0 + k1 * half_dt), t0 + half_dt);
        let k3 = func(&(x0 + k2 * half_dt), t0 + half_dt);
        let k4 = func(&(x0 + k3 * dt), tf);

        x0 + (k1 + k2 * two + k3 * two + k4) * (dt * sixth)
    }
}

/// Owns a state vector and advances it in place with an [`Integrator`].
#[derive(Debug, Clone)]
pub struct Stepper<I, T, const N: usize> {
    integrator: I,
    state: SVector<T, N>,
}

impl<I, T, const N: usize> Stepper<I, T, N>
where
    I: Integrator<T, N>,
    T: RealField + Copy,
{
    pub fn new(integrator: I, initial_state: SVector<T, N>) -> Self {
        Self {
            integrator,
            state: initial_state,
        }
    }

    pub fn state(&self) -> &SVector<T, N> {
        &self.state
    }

    pub fn set_state(&mut self, state: SVector<T, N>) {
        self.state = state;
    }

    /// Advances the owned state from `t` to `t + dt` and returns it.
    ///
    /// # Panics
    /// If `dt` is not strictly positive.
    pub fn step(
        &mut self,
        t: T,
        dt: T,
        func: &mut dyn FnMut(&SVector<T, N>, T) -> SVector<T, N>,
    ) -> &SVector<T, N> {
        assert!(dt > T::zero(), "Stepper::step: dt must be positive");
        self.state = self.integrator.step(func, &self.state, t, t + dt);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Vector1, Vector2};
    use std::f64::consts::PI;

    fn oscillator(x: &Vector2<f64>, _t: f64) -> Vector2<f64> {
        Vector2::new(x[1], -x[0])
    }

    fn oscillator_error(dt: f64) -> f64 {
        let steps = (PI / 2.0 / dt).round() as usize;
        let mut stepper = Stepper::new(RK4, Vector2::new(1.0, 0.0));
        let mut t = 0.0;
        for _ in 0..steps {
            stepper.step(t, dt, &mut oscillator);
            t += dt;
        }
        // x(t) = cos(t), v(t) = -sin(t)
        let x = stepper.state();
        ((x[0] - t.cos()).powi(2) + (x[1] + t.sin()).powi(2)).sqrt()
    }

    #[test]
    fn test_rk4_exponential_decay() {
        let mut stepper = Stepper::new(RK4, Vector1::new(1.0));
        let dt = 0.01;
        let mut t = 0.0;
        for _ in 0..100 {
            stepper.step(t, dt, &mut |x: &Vector1<f64>, _t| -x);
            t += dt;
        }
        assert_relative_eq!(stepper.state()[0], (-1.0_f64).exp(), epsilon = 1e-8);
    }

    #[test]
    fn test_rk4_evaluates_stages_at_expected_times() {
        let mut times = Vec::new();
        let x0 = Vector1::new(0.0);
        RK4.step(
            &mut |_x: &Vector1<f64>, t: f64| {
                times.push(t);
                Vector1::new(0.0)
            },
            &x0,
            1.0,
            1.5,
        );
        assert_eq!(times, vec![1.0, 1.25, 1.25, 1.5]);
    }

    #[test]
    fn test_rk4_free_fall_matches_closed_form() {
        let g = 9.81;
        let (h0, v0) = (100.0, 3.0);
        let dt = 0.01;
        let mut stepper = Stepper::new(RK4, Vector2::new(h0, v0));
        let mut t = 0.0;
        for _ in 0..150 {
            stepper.step(t, dt, &mut |x: &Vector2<f64>, _t| Vector2::new(x[1], -g));
            t += dt;
        }
        let expected = h0 + v0 * t - 0.5 * g * t * t;
        assert_relative_eq!(stepper.state()[0], expected, epsilon = 1e-9);
        assert_relative_eq!(stepper.state()[1], v0 - g * t, epsilon = 1e-9);
    }

    #[test]
    fn test_rk4_error_shrinks_with_step_size() {
        let coarse = oscillator_error(0.1);
        let fine = oscillator_error(0.05);
        assert!(coarse < 1e-4, "coarse error {coarse}");
        // Fourth order: halving dt should cut the error by roughly 16x.
        assert!(fine * 8.0 < coarse, "coarse {coarse}, fine {fine}");
    }

    #[test]
    fn test_rk4_more_accurate_than_euler() {
        let dt = 0.1;
        let mut rk4 = Stepper::new(RK4, Vector1::new(1.0));
        let mut euler = Stepper::new(RK1, Vector1::new(1.0));
        let mut t = 0.0;
        for _ in 0..10 {
            rk4.step(t, dt, &mut |x: &Vector1<f64>, _t| -x);
            euler.step(t, dt, &mut |x: &Vector1<f64>, _t| -x);
            t += dt;
        }
        let exact = (-1.0_f64).exp();
        let rk4_error = (rk4.state()[0] - exact).abs();
        let euler_error = (euler.state()[0] - exact).abs();
        assert!(rk4_error < euler_error / 100.0);
    }

    #[test]
    #[should_panic(expected = "dt must be positive")]
    fn test_stepper_rejects_non_positive_dt() {
        let mut stepper = Stepper::new(RK4, Vector1::new(1.0));
        stepper.step(0.0, 0.0, &mut |x: &Vector1<f64>, _t| -x);
    }
}
