//! Circular bubble level widget
//!
//! Draws a ring with a center crosshair and 45° tick marks, and a bubble whose
//! offset from center encodes roll (x) and pitch (y). The bubble is filled
//! with the color of the current [`LevelStatus`].

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};

use crate::bubble::{PlaneBubble, circular_offset};
use crate::config::LevelConfig;
use crate::status::{GaugeKind, LevelStatus, StatusThresholds};
use crate::tilt::TiltState;
use crate::ui::colors::{
    COLOR_BACKGROUND, COLOR_CENTER_INDICATOR, COLOR_GAUGE_BORDER, COLOR_GAUGE_OUTLINE,
    HIGHLIGHT_ALPHA, WHITE, blend,
};
use crate::ui::core::Drawable;

/// Ring radius as a fraction of the shorter side of the bounds
const RING_RADIUS_RATIO: f32 = 0.4;

/// Bubble radius as a fraction of the ring radius
const BUBBLE_RADIUS_RATIO: f32 = 0.15;

/// Crosshair arm length as a fraction of the ring radius
const CROSSHAIR_RATIO: f32 = 0.1;

/// Tick mark length as a fraction of the ring radius
const TICK_RATIO: f32 = 0.05;

/// Highlight radius as a fraction of the bubble radius
const HIGHLIGHT_RADIUS_RATIO: f32 = 0.6;

/// Highlight offset (up and left) as a fraction of the bubble radius
const HIGHLIGHT_OFFSET_RATIO: f32 = 0.2;

const RING_STROKE_PX: u32 = 3;
const BORDER_GAP_PX: u32 = 3;
const CENTER_DOT_DIAMETER_PX: u32 = 4;

/// Tick mark positions in degrees, clockwise from the positive x axis
const TICK_ANGLES_DEG: [f32; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

pub(crate) fn to_point(x: f32, y: f32) -> Point {
    Point::new(libm::roundf(x) as i32, libm::roundf(y) as i32)
}

pub struct CircularLevel {
    bounds: Rectangle,
    bubble: PlaneBubble,
    tilt: TiltState,
    thresholds: StatusThresholds,
    full_scale_deg: f32,
    smoothing: f32,
    dirty: bool,
}

impl CircularLevel {
    pub fn new(bounds: Rectangle, config: &LevelConfig) -> Self {
        Self {
            bounds,
            bubble: PlaneBubble::default(),
            tilt: TiltState::default(),
            thresholds: StatusThresholds::for_gauge(GaugeKind::Circular, config),
            full_scale_deg: config.full_scale_tilt_deg,
            smoothing: config.circular_smoothing,
            dirty: true,
        }
    }

    /// Retarget the bubble. The displayed position follows on later ticks.
    pub fn set_tilt(&mut self, tilt: TiltState) {
        if self.tilt != tilt {
            self.tilt = tilt;
            self.bubble = self
                .bubble
                .with_target(tilt.pitch, tilt.roll, self.full_scale_deg);
            self.dirty = true;
        }
    }

    /// Advance the bubble one frame toward its target.
    pub fn tick(&mut self) {
        let next = self.bubble.step(self.smoothing);
        if next != self.bubble {
            self.bubble = next;
            self.dirty = true;
        }
    }

    pub fn tilt(&self) -> TiltState {
        self.tilt
    }

    pub fn bubble(&self) -> PlaneBubble {
        self.bubble
    }

    pub fn status(&self) -> LevelStatus {
        LevelStatus::classify(self.tilt.total_tilt(), self.thresholds)
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    pub fn ring_radius(&self) -> f32 {
        let size = self.bounds.size.width.min(self.bounds.size.height);
        size as f32 * RING_RADIUS_RATIO
    }

    pub fn bubble_radius(&self) -> f32 {
        self.ring_radius() * BUBBLE_RADIUS_RATIO
    }

    /// Where the bubble is drawn this frame.
    pub fn bubble_center(&self) -> Point {
        let center = self.center();
        let (dx, dy) = circular_offset(
            self.bubble.x.current,
            self.bubble.y.current,
            self.ring_radius(),
            self.bubble_radius(),
        );
        to_point(center.x as f32 + dx, center.y as f32 + dy)
    }

    fn draw_ring<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let center = self.center();
        let diameter = (self.ring_radius() * 2.0) as u32;

        Circle::with_center(center, diameter + 2 * BORDER_GAP_PX)
            .into_styled(PrimitiveStyle::with_stroke(COLOR_GAUGE_BORDER, 1))
            .draw(display)?;
        Circle::with_center(center, diameter)
            .into_styled(PrimitiveStyle::with_stroke(
                COLOR_GAUGE_OUTLINE,
                RING_STROKE_PX,
            ))
            .draw(display)?;

        Ok(())
    }

    fn draw_center_indicator<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let center = self.center();
        let arm = libm::roundf(self.ring_radius() * CROSSHAIR_RATIO) as i32;
        let style = PrimitiveStyle::with_stroke(COLOR_CENTER_INDICATOR, 1);

        Line::new(center - Point::new(arm, 0), center + Point::new(arm, 0))
            .into_styled(style)
            .draw(display)?;
        Line::new(center - Point::new(0, arm), center + Point::new(0, arm))
            .into_styled(style)
            .draw(display)?;
        Circle::with_center(center, CENTER_DOT_DIAMETER_PX)
            .into_styled(PrimitiveStyle::with_fill(COLOR_CENTER_INDICATOR))
            .draw(display)?;

        Ok(())
    }

    fn draw_degree_marks<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let center = self.center();
        let (cx, cy) = (center.x as f32, center.y as f32);
        let radius = self.ring_radius();
        let inner = radius - radius * TICK_RATIO;
        let style = PrimitiveStyle::with_stroke(COLOR_GAUGE_BORDER, 1);

        for angle in TICK_ANGLES_DEG {
            let rad = angle.to_radians();
            let (cos, sin) = (libm::cosf(rad), libm::sinf(rad));
            Line::new(
                to_point(cx + inner * cos, cy + inner * sin),
                to_point(cx + radius * cos, cy + radius * sin),
            )
            .into_styled(style)
            .draw(display)?;
        }

        Ok(())
    }

    fn draw_bubble<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let position = self.bubble_center();
        let radius = self.bubble_radius();
        let color = self.status().color();

        Circle::with_center(position, (radius * 2.0) as u32)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)?;

        let offset = radius * HIGHLIGHT_OFFSET_RATIO;
        Circle::with_center(
            to_point(position.x as f32 - offset, position.y as f32 - offset),
            (radius * HIGHLIGHT_RADIUS_RATIO * 2.0) as u32,
        )
        .into_styled(PrimitiveStyle::with_fill(blend(
            color,
            WHITE,
            HIGHLIGHT_ALPHA,
        )))
        .draw(display)?;

        Ok(())
    }
}

impl Drawable for CircularLevel {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        // The bubble moves every frame, so the whole gauge is repainted
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(COLOR_BACKGROUND))
            .draw(display)?;

        self.draw_ring(display)?;
        self.draw_center_indicator(display)?;
        self.draw_degree_marks(display)?;
        self.draw_bubble(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use crate::ui::colors::{COLOR_LEVEL, COLOR_TILTED};

    fn gauge() -> CircularLevel {
        CircularLevel::new(
            Rectangle::new(Point::zero(), Size::new(200, 200)),
            &LevelConfig::default(),
        )
    }

    #[test]
    fn test_geometry() {
        let gauge = gauge();
        assert_eq!(gauge.center(), Point::new(99, 99));
        assert!(libm::fabsf(gauge.ring_radius() - 80.0) < 1e-4);
        assert!(libm::fabsf(gauge.bubble_radius() - 12.0) < 1e-4);
    }

    #[test]
    fn test_bubble_starts_centered() {
        let gauge = gauge();
        assert_eq!(gauge.bubble_center(), gauge.center());
    }

    #[test]
    fn test_bubble_glides_toward_target() {
        let mut gauge = gauge();
        let center = gauge.center();
        gauge.set_tilt(TiltState::new(0.0, 45.0));

        // Target is set but nothing moves until a tick
        assert_eq!(gauge.bubble_center(), center);

        gauge.tick();
        let first = gauge.bubble_center() - center;
        assert!(first.x > 0);
        assert_eq!(first.y, 0);

        for _ in 0..200 {
            gauge.tick();
        }
        // Fully deflected: ring radius 80 - bubble radius 12
        assert_eq!(gauge.bubble_center() - center, Point::new(68, 0));
    }

    #[test]
    fn test_bubble_stays_inside_ring_on_diagonal() {
        let mut gauge = gauge();
        gauge.set_tilt(TiltState::new(90.0, 90.0));
        for _ in 0..300 {
            gauge.tick();
        }

        let offset = gauge.bubble_center() - gauge.center();
        let distance = libm::sqrtf((offset.x * offset.x + offset.y * offset.y) as f32);
        assert!(offset.x > 0 && offset.y > 0);
        assert!(distance <= 69.0);
    }

    #[test]
    fn test_status_follows_total_tilt() {
        let mut gauge = gauge();
        assert_eq!(gauge.status(), LevelStatus::Level);

        gauge.set_tilt(TiltState::new(3.0, 4.0));
        assert_eq!(gauge.status(), LevelStatus::SlightlyTilted);

        gauge.set_tilt(TiltState::new(0.0, 90.0));
        assert_eq!(gauge.status(), LevelStatus::Tilted);
    }

    #[test]
    fn test_tick_without_motion_stays_clean() {
        let mut gauge = gauge();
        gauge.mark_clean();
        gauge.tick();
        assert!(!gauge.is_dirty());

        gauge.set_tilt(TiltState::new(10.0, 0.0));
        assert!(gauge.is_dirty());
    }

    #[test]
    fn test_draws_bubble_in_status_color() {
        let mut gauge = gauge();
        let center = gauge.center();
        let mut fb = FrameBuffer::new();

        gauge.draw(&mut fb).unwrap();
        // Inside the bubble, below the highlight
        assert_eq!(fb.pixel(center + Point::new(0, 10)), Some(COLOR_LEVEL));

        gauge.set_tilt(TiltState::new(0.0, 90.0));
        for _ in 0..200 {
            gauge.tick();
        }
        gauge.draw(&mut fb).unwrap();
        assert_eq!(fb.pixel(center + Point::new(68, 10)), Some(COLOR_TILTED));
        assert_eq!(fb.pixel(center + Point::new(0, 10)), Some(COLOR_BACKGROUND));
    }
}
