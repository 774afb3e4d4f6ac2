// apogee_core/src/models/measurement/axes.rs

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Vec3;

/// Maps vectors from a sensor's native axes onto the vehicle body axes.
///
/// Must be a signed permutation: every row and every column holds exactly
/// one `±1`. Stored as integer rows so scenario files stay readable:
///
/// ```toml
/// axis_mapping = [[0, 0, 1], [0, 1, 0], [-1, 0, 0]]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[[i8; 3]; 3]", into = "[[i8; 3]; 3]")]
pub struct AxisMapping {
    rows: [[i8; 3]; 3],
}

impl AxisMapping {
    pub fn from_rows(rows: [[i8; 3]; 3]) -> Result<Self, ConfigError> {
        if rows.iter().flatten().any(|&e| !(-1..=1).contains(&e)) {
            return Err(ConfigError::InvalidAxisMapping(
                "entries must be -1, 0 or 1",
            ));
        }
        if rows.iter().any(|row| row.iter().filter(|&&e| e != 0).count() != 1) {
            return Err(ConfigError::InvalidAxisMapping(
                "each row needs exactly one non-zero entry",
            ));
        }
        if (0..3).any(|col| rows.iter().filter(|row| row[col] != 0).count() != 1) {
            return Err(ConfigError::InvalidAxisMapping(
                "each column needs exactly one non-zero entry",
            ));
        }
        Ok(Self { rows })
    }

    /// Sensor axes coincide with body axes.
    pub fn identity() -> Self {
        Self {
            rows: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
        }
    }

    /// Sensor mounted a quarter turn about its Y axis:
    /// body = (s.z, s.y, -s.x).
    pub fn quarter_turn_about_y() -> Self {
        Self {
            rows: [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
        }
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::from_fn(|r, c| f64::from(self.rows[r][c]))
    }

    /// Expresses a sensor-frame vector in body axes.
    pub fn apply(&self, v: &Vec3) -> Vec3 {
        self.matrix() * v
    }
}

impl Default for AxisMapping {
    fn default() -> Self {
        Self::identity()
    }
}

impl TryFrom<[[i8; 3]; 3]> for AxisMapping {
    type Error = ConfigError;

    fn try_from(rows: [[i8; 3]; 3]) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<AxisMapping> for [[i8; 3]; 3] {
    fn from(mapping: AxisMapping) -> Self {
        mapping.rows
    }
}

/// One timestamped reading from a 6-axis IMU, in the sensor's own axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    /// [s]
    pub timestamp: f64,
    /// Specific force [m/s²].
    pub accel: Vec3,
    /// Angular rate [rad/s].
    pub gyro: Vec3,
}

impl ImuSample {
    pub fn new(timestamp: f64, accel: Vec3, gyro: Vec3) -> Self {
        Self {
            timestamp,
            accel,
            gyro,
        }
    }

    /// For gyros that report degrees per second.
    pub fn from_degrees(timestamp: f64, accel: Vec3, gyro_deg_per_s: Vec3) -> Self {
        Self::new(timestamp, accel, gyro_deg_per_s.map(f64::to_radians))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_leaves_vector() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(AxisMapping::identity().apply(&v), v);
        assert_eq!(AxisMapping::default(), AxisMapping::identity());
    }

    #[test]
    fn test_quarter_turn_remaps_axes() {
        let s = Vec3::new(1.0, 2.0, 3.0);
        let body = AxisMapping::quarter_turn_about_y().apply(&s);
        assert_eq!(body, Vec3::new(3.0, 2.0, -1.0));
        // A proper rotation, not a reflection.
        assert_relative_eq!(
            AxisMapping::quarter_turn_about_y().matrix().determinant(),
            1.0
        );
    }

    #[test]
    fn test_rejects_non_permutations() {
        let cases = [
            [[2, 0, 0], [0, 1, 0], [0, 0, 1]],
            [[1, 1, 0], [0, 1, 0], [0, 0, 1]],
            [[1, 0, 0], [1, 0, 0], [0, 0, 1]],
            [[0, 0, 0], [0, 1, 0], [0, 0, 1]],
        ];
        for rows in cases {
            assert!(
                matches!(
                    AxisMapping::from_rows(rows),
                    Err(ConfigError::InvalidAxisMapping(_))
                ),
                "{rows:?} should be rejected"
            );
        }
        assert!(AxisMapping::from_rows([[0, -1, 0], [1, 0, 0], [0, 0, -1]]).is_ok());
    }

    #[test]
    fn test_from_degrees_converts_gyro() {
        let sample = ImuSample::from_degrees(
            0.5,
            Vec3::new(0.0, 0.0, 9.81),
            Vec3::new(180.0, -90.0, 0.0),
        );
        assert_relative_eq!(sample.gyro.x, std::f64::consts::PI);
        assert_relative_eq!(sample.gyro.y, -std::f64::consts::FRAC_PI_2);
        assert_eq!(sample.accel, Vec3::new(0.0, 0.0, 9.81));
    }
}
