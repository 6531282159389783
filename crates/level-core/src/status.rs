//! Level-status classification for tilt readings
//!
//! Maps a tilt magnitude onto one of three statuses that drive the color of
//! the bubbles and of the status read-out.

use embedded_graphics::pixelcolor::Rgb565;

use crate::config::LevelConfig;
use crate::ui::colors::{COLOR_LEVEL, COLOR_SLIGHTLY_TILTED, COLOR_TILTED};

/// How far from level a reading is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    /// Below the gauge's level threshold
    Level,
    /// Below the slight-tilt threshold
    SlightlyTilted,
    /// Everything else
    Tilted,
}

/// Which gauge a reading is classified for; each has its own level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeKind {
    /// Two-axis circular level, classified by total tilt
    Circular,
    /// Single-axis spirit tube, classified by the absolute axis angle
    Tube,
}

/// Thresholds (degrees) separating the three statuses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThresholds {
    pub level_deg: f32,
    pub slight_deg: f32,
}

impl StatusThresholds {
    pub fn for_gauge(kind: GaugeKind, config: &LevelConfig) -> Self {
        let level_deg = match kind {
            GaugeKind::Circular => config.circular_level_threshold_deg,
            GaugeKind::Tube => config.tube_level_threshold_deg,
        };
        Self {
            level_deg,
            slight_deg: config.slight_tilt_threshold_deg,
        }
    }
}

impl LevelStatus {
    /// Classify a non-negative tilt magnitude.
    ///
    /// Each threshold belongs to the more tilted class: exactly `level_deg`
    /// reads as slightly tilted, exactly `slight_deg` as tilted.
    pub fn classify(tilt_deg: f32, thresholds: StatusThresholds) -> Self {
        if tilt_deg < thresholds.level_deg {
            Self::Level
        } else if tilt_deg < thresholds.slight_deg {
            Self::SlightlyTilted
        } else {
            Self::Tilted
        }
    }

    /// Classify a signed single-axis angle for a spirit tube.
    pub fn classify_axis(angle_deg: f32, thresholds: StatusThresholds) -> Self {
        Self::classify(libm::fabsf(angle_deg), thresholds)
    }

    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Level => COLOR_LEVEL,
            Self::SlightlyTilted => COLOR_SLIGHTLY_TILTED,
            Self::Tilted => COLOR_TILTED,
        }
    }

    /// Label for the status read-out. Both tilted classes share a label and
    /// differ only in color.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Level => "Level",
            Self::SlightlyTilted | Self::Tilted => "Tilted",
        }
    }

    pub const fn is_level(self) -> bool {
        matches!(self, Self::Level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circular() -> StatusThresholds {
        StatusThresholds::for_gauge(GaugeKind::Circular, &LevelConfig::default())
    }

    fn tube() -> StatusThresholds {
        StatusThresholds::for_gauge(GaugeKind::Tube, &LevelConfig::default())
    }

    #[test]
    fn test_circular_classification() {
        assert_eq!(LevelStatus::classify(0.0, circular()), LevelStatus::Level);
        assert_eq!(
            LevelStatus::classify(5.0, circular()),
            LevelStatus::SlightlyTilted
        );
        assert_eq!(LevelStatus::classify(15.0, circular()), LevelStatus::Tilted);
    }

    #[test]
    fn test_circular_boundaries() {
        assert_eq!(LevelStatus::classify(1.99, circular()), LevelStatus::Level);
        assert_eq!(
            LevelStatus::classify(2.0, circular()),
            LevelStatus::SlightlyTilted
        );
        assert_eq!(
            LevelStatus::classify(9.99, circular()),
            LevelStatus::SlightlyTilted
        );
        assert_eq!(LevelStatus::classify(10.0, circular()), LevelStatus::Tilted);
    }

    #[test]
    fn test_tube_boundaries() {
        assert_eq!(LevelStatus::classify(0.99, tube()), LevelStatus::Level);
        assert_eq!(
            LevelStatus::classify(1.0, tube()),
            LevelStatus::SlightlyTilted
        );
        assert_eq!(LevelStatus::classify(10.0, tube()), LevelStatus::Tilted);
    }

    #[test]
    fn test_axis_classification_uses_absolute_angle() {
        assert_eq!(LevelStatus::classify_axis(-0.5, tube()), LevelStatus::Level);
        assert_eq!(
            LevelStatus::classify_axis(-5.0, tube()),
            LevelStatus::SlightlyTilted
        );
        assert_eq!(LevelStatus::classify_axis(-30.0, tube()), LevelStatus::Tilted);
    }

    #[test]
    fn test_colors_and_labels() {
        assert_eq!(LevelStatus::Level.color(), COLOR_LEVEL);
        assert_eq!(LevelStatus::SlightlyTilted.color(), COLOR_SLIGHTLY_TILTED);
        assert_eq!(LevelStatus::Tilted.color(), COLOR_TILTED);
        assert_eq!(LevelStatus::Level.label(), "Level");
        assert_eq!(LevelStatus::Tilted.label(), "Tilted");
        assert!(LevelStatus::Level.is_level());
        assert!(!LevelStatus::SlightlyTilted.is_level());
    }
}
