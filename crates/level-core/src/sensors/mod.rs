//! Motion sensor abstractions.
//!
//! A [`MotionSensor`] delivers one 3-axis vector per read. What that vector
//! means depends on the [`SensorKind`]: a gravity sensor already isolates
//! gravity, while a raw accelerometer must go through [`LowPassFilter`] first.

mod low_pass;
mod manager;

pub use low_pass::LowPassFilter;
pub use manager::SensorManager;

use thiserror_no_std::Error;

/// Errors raised by motion sources.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("no motion sensor is available")]
    Unavailable,
    #[error("{sensor} read failed: {details}")]
    ReadFailed {
        sensor: &'static str,
        details: &'static str,
    },
}

/// The kind of hardware a motion sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Fused gravity vector, used as-is.
    Gravity,
    /// Raw acceleration, low-pass filtered to approximate gravity.
    Accelerometer,
}

impl SensorKind {
    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Gravity => "gravity",
            SensorKind::Accelerometer => "accelerometer",
        }
    }
}

/// One 3-axis gravity (or acceleration) vector in m/s².
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GravitySample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GravitySample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Scale the vector to unit length. The caller guarantees a non-zero magnitude.
    pub fn normalized(&self, magnitude: f32) -> Self {
        Self {
            x: self.x / magnitude,
            y: self.y / magnitude,
            z: self.z / magnitude,
        }
    }
}

impl From<[f32; 3]> for GravitySample {
    fn from(values: [f32; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

/// A source of motion samples.
pub trait MotionSensor {
    /// Which kind of vector [`MotionSensor::read`] returns.
    fn kind(&self) -> SensorKind;

    /// Read the next sample.
    fn read(&mut self) -> impl Future<Output = Result<GravitySample, SensorError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        let sample = GravitySample::new(3.0, 4.0, 12.0);
        assert_eq!(sample.magnitude(), 13.0);
    }

    #[test]
    fn test_normalized_has_unit_length() {
        let sample = GravitySample::new(0.0, 6.0, 8.0);
        let unit = sample.normalized(sample.magnitude());
        assert_eq!(unit, GravitySample::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_is_finite() {
        assert!(GravitySample::new(0.0, 0.0, 9.8).is_finite());
        assert!(!GravitySample::new(f32::NAN, 0.0, 9.8).is_finite());
        assert!(!GravitySample::new(0.0, f32::INFINITY, 9.8).is_finite());
    }

    #[test]
    fn test_from_array() {
        let sample = GravitySample::from([1.0, 2.0, 3.0]);
        assert_eq!(sample, GravitySample::new(1.0, 2.0, 3.0));
    }
}
