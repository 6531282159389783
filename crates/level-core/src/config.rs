//! Tuning parameters for the tilt pipeline and gauges.

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Smoothing factor of the accelerometer low-pass filter.
pub const DEFAULT_LOW_PASS_ALPHA: f32 = 0.2;

/// Gravity magnitudes at or below this are treated as degenerate and skipped.
pub const DEFAULT_MIN_GRAVITY_MAGNITUDE: f32 = 0.1;

/// Tilt (degrees) that maps to a fully deflected bubble.
pub const DEFAULT_FULL_SCALE_TILT_DEG: f32 = 45.0;

/// Per-frame smoothing factor of the circular level bubble.
pub const DEFAULT_CIRCULAR_SMOOTHING: f32 = 0.15;

/// Per-frame smoothing factor of a spirit tube bubble.
pub const DEFAULT_TUBE_SMOOTHING: f32 = 0.2;

/// Total tilt below which the circular level reads "level".
pub const DEFAULT_CIRCULAR_LEVEL_THRESHOLD_DEG: f32 = 2.0;

/// Single-axis tilt below which a spirit tube reads "level".
pub const DEFAULT_TUBE_LEVEL_THRESHOLD_DEG: f32 = 1.0;

/// Tilt below which a gauge reads "slightly tilted" rather than "tilted".
pub const DEFAULT_SLIGHT_TILT_THRESHOLD_DEG: f32 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be in (0, 1], got {value}")]
    FactorOutOfRange { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("level threshold {level} must be below the slight tilt threshold {slight}")]
    ThresholdOrder { level: f32, slight: f32 },
}

/// Complete tuning of the level.
///
/// `Default` carries the values the gauges were designed around; hosts may
/// override individual fields and call [`LevelConfig::validate`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub low_pass_alpha: f32,
    pub min_gravity_magnitude: f32,
    pub full_scale_tilt_deg: f32,
    pub circular_smoothing: f32,
    pub tube_smoothing: f32,
    pub circular_level_threshold_deg: f32,
    pub tube_level_threshold_deg: f32,
    pub slight_tilt_threshold_deg: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            low_pass_alpha: DEFAULT_LOW_PASS_ALPHA,
            min_gravity_magnitude: DEFAULT_MIN_GRAVITY_MAGNITUDE,
            full_scale_tilt_deg: DEFAULT_FULL_SCALE_TILT_DEG,
            circular_smoothing: DEFAULT_CIRCULAR_SMOOTHING,
            tube_smoothing: DEFAULT_TUBE_SMOOTHING,
            circular_level_threshold_deg: DEFAULT_CIRCULAR_LEVEL_THRESHOLD_DEG,
            tube_level_threshold_deg: DEFAULT_TUBE_LEVEL_THRESHOLD_DEG,
            slight_tilt_threshold_deg: DEFAULT_SLIGHT_TILT_THRESHOLD_DEG,
        }
    }
}

impl LevelConfig {
    /// Check that every factor and threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_factor("low_pass_alpha", self.low_pass_alpha)?;
        check_factor("circular_smoothing", self.circular_smoothing)?;
        check_factor("tube_smoothing", self.tube_smoothing)?;
        check_positive("min_gravity_magnitude", self.min_gravity_magnitude)?;
        check_positive("full_scale_tilt_deg", self.full_scale_tilt_deg)?;
        check_positive(
            "circular_level_threshold_deg",
            self.circular_level_threshold_deg,
        )?;
        check_positive("tube_level_threshold_deg", self.tube_level_threshold_deg)?;

        for level in [
            self.circular_level_threshold_deg,
            self.tube_level_threshold_deg,
        ] {
            if level >= self.slight_tilt_threshold_deg {
                return Err(ConfigError::ThresholdOrder {
                    level,
                    slight: self.slight_tilt_threshold_deg,
                });
            }
        }

        Ok(())
    }
}

fn check_factor(name: &'static str, value: f32) -> Result<(), ConfigError> {
    // NaN fails both comparisons and is rejected here
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::FactorOutOfRange { name, value })
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}
