//! Spirit level tube widget
//!
//! A capsule-shaped tube with a center line and a bubble sliding along one
//! axis. The vertical tube follows pitch (forward tilt moves the bubble down),
//! the horizontal tube follows roll (right tilt moves the bubble right).

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, RoundedRectangle};

use super::circular_level::to_point;
use crate::bubble::{AxisBubble, tube_offset};
use crate::config::LevelConfig;
use crate::status::{GaugeKind, LevelStatus, StatusThresholds};
use crate::ui::colors::{
    COLOR_BACKGROUND, COLOR_CENTER_INDICATOR, COLOR_GAUGE_OUTLINE, HIGHLIGHT_ALPHA, WHITE, blend,
};
use crate::ui::core::Drawable;

/// Tube extent across its axis, as a fraction of the bounds
const TUBE_THICKNESS_RATIO: f32 = 0.6;

/// Tube extent along its axis, as a fraction of the bounds
const TUBE_LENGTH_RATIO: f32 = 0.9;

/// Bubble radius as a fraction of the tube's shorter side
const BUBBLE_RADIUS_RATIO: f32 = 0.15;

const HIGHLIGHT_RADIUS_RATIO: f32 = 0.6;
const HIGHLIGHT_OFFSET_RATIO: f32 = 0.2;

const TUBE_STROKE_PX: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TubeOrientation {
    /// Pitch axis; the bubble moves up and down
    Vertical,
    /// Roll axis; the bubble moves left and right
    Horizontal,
}

pub struct SpiritTube {
    bounds: Rectangle,
    orientation: TubeOrientation,
    bubble: AxisBubble,
    angle: f32,
    thresholds: StatusThresholds,
    full_scale_deg: f32,
    smoothing: f32,
    dirty: bool,
}

impl SpiritTube {
    pub fn new(bounds: Rectangle, orientation: TubeOrientation, config: &LevelConfig) -> Self {
        Self {
            bounds,
            orientation,
            bubble: AxisBubble::default(),
            angle: 0.0,
            thresholds: StatusThresholds::for_gauge(GaugeKind::Tube, config),
            full_scale_deg: config.full_scale_tilt_deg,
            smoothing: config.tube_smoothing,
            dirty: true,
        }
    }

    pub fn orientation(&self) -> TubeOrientation {
        self.orientation
    }

    /// Retarget the bubble from this tube's axis angle (degrees, signed).
    pub fn set_angle(&mut self, angle: f32) {
        if self.angle != angle {
            self.angle = angle;
            self.bubble = self.bubble.with_target(angle, self.full_scale_deg);
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

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn bubble(&self) -> AxisBubble {
        self.bubble
    }

    pub fn status(&self) -> LevelStatus {
        LevelStatus::classify_axis(self.angle, self.thresholds)
    }

    /// Width and height of the tube body in pixels.
    fn tube_size(&self) -> (f32, f32) {
        let (w, h) = (
            self.bounds.size.width as f32,
            self.bounds.size.height as f32,
        );
        match self.orientation {
            TubeOrientation::Vertical => (w * TUBE_THICKNESS_RATIO, h * TUBE_LENGTH_RATIO),
            TubeOrientation::Horizontal => (w * TUBE_LENGTH_RATIO, h * TUBE_THICKNESS_RATIO),
        }
    }

    /// Rectangle occupied by the tube body, centered in the bounds.
    pub fn tube_rect(&self) -> Rectangle {
        let (w, h) = self.tube_size();
        Rectangle::with_center(self.bounds.center(), Size::new(w as u32, h as u32))
    }

    pub fn bubble_radius(&self) -> f32 {
        let (w, h) = self.tube_size();
        w.min(h) * BUBBLE_RADIUS_RATIO
    }

    /// Where the bubble is drawn this frame.
    pub fn bubble_center(&self) -> Point {
        let center = self.bounds.center();
        let (w, h) = self.tube_size();
        let (cx, cy) = (center.x as f32, center.y as f32);
        let radius = self.bubble_radius();

        match self.orientation {
            TubeOrientation::Vertical => {
                to_point(cx, cy + tube_offset(self.bubble.current, h / 2.0, radius))
            }
            TubeOrientation::Horizontal => {
                to_point(cx + tube_offset(self.bubble.current, w / 2.0, radius), cy)
            }
        }
    }

    fn draw_tube<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let rect = self.tube_rect();
        let corner = rect.size.width.min(rect.size.height) / 2;

        RoundedRectangle::with_equal_corners(rect, Size::new(corner, corner))
            .into_styled(PrimitiveStyle::with_stroke(
                COLOR_GAUGE_OUTLINE,
                TUBE_STROKE_PX,
            ))
            .draw(display)?;

        Ok(())
    }

    fn draw_center_line<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let rect = self.tube_rect();
        let center = rect.center();
        let half_w = rect.size.width as i32 / 2;
        let half_h = rect.size.height as i32 / 2;

        let line = match self.orientation {
            TubeOrientation::Vertical => Line::new(
                Point::new(center.x, center.y - half_h),
                Point::new(center.x, center.y + half_h),
            ),
            TubeOrientation::Horizontal => Line::new(
                Point::new(center.x - half_w, center.y),
                Point::new(center.x + half_w, center.y),
            ),
        };

        line.into_styled(PrimitiveStyle::with_stroke(COLOR_CENTER_INDICATOR, 1))
            .draw(display)?;

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

impl Drawable for SpiritTube {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(COLOR_BACKGROUND))
            .draw(display)?;

        self.draw_tube(display)?;
        self.draw_center_line(display)?;
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
    use crate::ui::colors::{COLOR_LEVEL, COLOR_SLIGHTLY_TILTED};

    fn vertical() -> SpiritTube {
        SpiritTube::new(
            Rectangle::new(Point::zero(), Size::new(100, 200)),
            TubeOrientation::Vertical,
            &LevelConfig::default(),
        )
    }

    fn horizontal() -> SpiritTube {
        SpiritTube::new(
            Rectangle::new(Point::zero(), Size::new(200, 100)),
            TubeOrientation::Horizontal,
            &LevelConfig::default(),
        )
    }

    fn settle(tube: &mut SpiritTube) {
        for _ in 0..200 {
            tube.tick();
        }
    }

    #[test]
    fn test_tube_geometry() {
        let tube = vertical();
        assert_eq!(tube.tube_rect().size, Size::new(60, 180));
        assert!(libm::fabsf(tube.bubble_radius() - 9.0) < 1e-4);

        let tube = horizontal();
        assert_eq!(tube.tube_rect().size, Size::new(180, 60));
    }

    #[test]
    fn test_positive_pitch_moves_vertical_bubble_down() {
        let mut tube = vertical();
        let center = Rectangle::new(Point::zero(), Size::new(100, 200)).center();
        tube.set_angle(20.0);
        settle(&mut tube);

        let position = tube.bubble_center();
        assert_eq!(position.x, center.x);
        assert!(position.y > center.y);
    }

    #[test]
    fn test_positive_roll_moves_horizontal_bubble_right() {
        let mut tube = horizontal();
        let center = Rectangle::new(Point::zero(), Size::new(200, 100)).center();
        tube.set_angle(20.0);
        settle(&mut tube);

        let position = tube.bubble_center();
        assert!(position.x > center.x);
        assert_eq!(position.y, center.y);
    }

    #[test]
    fn test_bubble_stops_at_tube_end() {
        let mut tube = vertical();
        let center = Rectangle::new(Point::zero(), Size::new(100, 200)).center();
        tube.set_angle(-90.0);
        settle(&mut tube);

        // Half length 90 - bubble radius 9
        assert_eq!(tube.bubble_center(), center - Point::new(0, 81));
        assert_eq!(tube.bubble().target, -1.0);
    }

    #[test]
    fn test_tube_status_thresholds() {
        let mut tube = horizontal();
        tube.set_angle(-0.5);
        assert_eq!(tube.status(), LevelStatus::Level);
        tube.set_angle(1.0);
        assert_eq!(tube.status(), LevelStatus::SlightlyTilted);
        tube.set_angle(-12.0);
        assert_eq!(tube.status(), LevelStatus::Tilted);
    }

    #[test]
    fn test_draws_bubble_in_status_color() {
        let mut tube = horizontal();
        let mut fb = FrameBuffer::new();
        let center = tube.bounds().center();

        tube.draw(&mut fb).unwrap();
        assert_eq!(fb.pixel(center + Point::new(0, 6)), Some(COLOR_LEVEL));

        tube.set_angle(5.0);
        settle(&mut tube);
        tube.draw(&mut fb).unwrap();

        let bubble = tube.bubble_center();
        assert_eq!(fb.pixel(bubble + Point::new(0, 6)), Some(COLOR_SLIGHTLY_TILTED));
    }
}
