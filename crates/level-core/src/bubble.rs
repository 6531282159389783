//! Bubble position smoothing
//!
//! Tilt angles map to a normalized bubble displacement in [-1, 1]. Each
//! render tick the displayed position moves a fixed fraction of the way
//! toward that target, giving the bubble its damped glide. The functions here
//! are pure: the caller owns the state and decides when a tick happens.

/// Map a tilt angle to a normalized displacement, clamped to [-1, 1].
///
/// `full_scale_deg` is the angle that deflects the bubble fully; anything
/// beyond it pins the bubble to the edge. Non-finite angles map to center.
pub fn normalize_tilt(angle_deg: f32, full_scale_deg: f32) -> f32 {
    let position = angle_deg / full_scale_deg;
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(-1.0, 1.0)
}

/// One exponential smoothing step: `current + (target - current) * factor`.
pub fn smooth_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Bubble state along one axis (spirit tube).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBubble {
    pub target: f32,
    pub current: f32,
}

impl AxisBubble {
    pub fn with_target(self, angle_deg: f32, full_scale_deg: f32) -> Self {
        Self {
            target: normalize_tilt(angle_deg, full_scale_deg),
            ..self
        }
    }

    /// Advance one render tick.
    pub fn step(self, factor: f32) -> Self {
        Self {
            current: smooth_toward(self.current, self.target, factor),
            ..self
        }
    }
}

/// Bubble state in the plane (circular level). `x` follows roll, `y` follows pitch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneBubble {
    pub x: AxisBubble,
    pub y: AxisBubble,
}

impl PlaneBubble {
    pub fn with_target(self, pitch_deg: f32, roll_deg: f32, full_scale_deg: f32) -> Self {
        Self {
            x: self.x.with_target(roll_deg, full_scale_deg),
            y: self.y.with_target(pitch_deg, full_scale_deg),
        }
    }

    pub fn step(self, factor: f32) -> Self {
        Self {
            x: self.x.step(factor),
            y: self.y.step(factor),
        }
    }
}

/// Pixel offset of a tube bubble from the track center.
///
/// The bubble edge never leaves the track: the offset is bounded by
/// `half_track_px - bubble_radius_px`.
pub fn tube_offset(position: f32, half_track_px: f32, bubble_radius_px: f32) -> f32 {
    let max_offset = (half_track_px - bubble_radius_px).max(0.0);
    (position * max_offset).clamp(-max_offset, max_offset)
}

/// Pixel offset of the circular level bubble from the ring center.
///
/// Each axis scales to `ring_radius_px - bubble_radius_px`; the resulting
/// vector is then clamped radially so diagonal tilts stay inside the ring.
pub fn circular_offset(
    x: f32,
    y: f32,
    ring_radius_px: f32,
    bubble_radius_px: f32,
) -> (f32, f32) {
    let max_distance = (ring_radius_px - bubble_radius_px).max(0.0);
    let dx = x * max_distance;
    let dy = y * max_distance;
    let distance = libm::sqrtf(dx * dx + dy * dy);

    if distance > max_distance && distance > 0.0 {
        let scale = max_distance / distance;
        (dx * scale, dy * scale)
    } else {
        (dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        libm::fabsf(a - b) < 1e-4
    }

    #[test]
    fn test_normalize_tilt_scales_by_full_scale() {
        assert!(close(normalize_tilt(22.5, 45.0), 0.5));
        assert!(close(normalize_tilt(-9.0, 45.0), -0.2));
        assert_eq!(normalize_tilt(0.0, 45.0), 0.0);
    }

    #[test]
    fn test_normalize_tilt_clamps() {
        assert_eq!(normalize_tilt(90.0, 45.0), 1.0);
        assert_eq!(normalize_tilt(-180.0, 45.0), -1.0);
        assert_eq!(normalize_tilt(f32::NAN, 45.0), 0.0);
    }

    #[test]
    fn test_smooth_toward_moves_by_factor() {
        assert!(close(smooth_toward(0.0, 1.0, 0.15), 0.15));
        assert!(close(smooth_toward(1.0, 0.0, 0.2), 0.8));
    }

    #[test]
    fn test_converges_monotonically_without_overshoot() {
        for factor in [0.05, 0.15, 0.2, 0.5, 0.95] {
            let mut bubble = AxisBubble::default().with_target(30.0, 45.0);
            let target = bubble.target;
            let mut previous = bubble.current;

            for _ in 0..200 {
                bubble = bubble.step(factor);
                assert!(bubble.current >= previous);
                assert!(bubble.current <= target);
                previous = bubble.current;
            }
            assert!(close(bubble.current, target));
        }
    }

    #[test]
    fn test_converges_from_above() {
        let mut bubble = AxisBubble {
            target: -0.5,
            current: 1.0,
        };
        let mut previous = bubble.current;
        for _ in 0..100 {
            bubble = bubble.step(0.2);
            assert!(bubble.current <= previous);
            assert!(bubble.current >= -0.5);
            previous = bubble.current;
        }
    }

    #[test]
    fn test_plane_bubble_maps_roll_to_x_and_pitch_to_y() {
        let bubble = PlaneBubble::default().with_target(-45.0, 90.0, 45.0);
        assert_eq!(bubble.x.target, 1.0);
        assert_eq!(bubble.y.target, -1.0);

        let bubble = bubble.step(0.15);
        assert!(close(bubble.x.current, 0.15));
        assert!(close(bubble.y.current, -0.15));
    }

    #[test]
    fn test_retargeting_keeps_current_position() {
        let bubble = AxisBubble::default().with_target(45.0, 45.0).step(0.5);
        let retargeted = bubble.with_target(0.0, 45.0);
        assert_eq!(retargeted.current, 0.5);
        assert_eq!(retargeted.target, 0.0);
    }

    #[test]
    fn test_tube_offset_stays_inside_track() {
        assert!(close(tube_offset(1.0, 50.0, 10.0), 40.0));
        assert!(close(tube_offset(-0.5, 50.0, 10.0), -20.0));
        assert!(close(tube_offset(2.0, 50.0, 10.0), 40.0));
        assert_eq!(tube_offset(1.0, 5.0, 10.0), 0.0);
    }

    #[test]
    fn test_circular_offset_axis_aligned() {
        let (dx, dy) = circular_offset(0.5, 0.0, 100.0, 15.0);
        assert!(close(dx, 42.5));
        assert_eq!(dy, 0.0);
    }

    #[test]
    fn test_circular_offset_clamps_diagonal() {
        let (dx, dy) = circular_offset(1.0, 1.0, 100.0, 15.0);
        let distance = libm::sqrtf(dx * dx + dy * dy);
        assert!(close(distance, 85.0));
        assert!(close(dx, dy));
    }

    #[test]
    fn test_circular_offset_at_center() {
        assert_eq!(circular_offset(0.0, 0.0, 100.0, 15.0), (0.0, 0.0));
    }
}
