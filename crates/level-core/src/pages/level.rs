//! Level page
//!
//! Layout on the 320x240 screen:
//!
//! ```text
//! +--------------------------------+------+
//! | status             angle       |      |
//! +--------------------------------+  V   |
//! |                                | tube |
//! |        circular level          |      |
//! |                                |      |
//! +--------------------------------+------+
//! |        horizontal tube         |      |
//! +--------------------------------+------+
//! ```
//!
//! The vertical tube follows pitch and the horizontal tube follows roll. The
//! status line classifies the total tilt with the circular thresholds.

use core::fmt::Write;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Alignment;
use heapless::Vec;
use log::{debug, info};

use crate::config::LevelConfig;
use crate::pages::page::{MAX_DIRTY_REGIONS, Page};
use crate::status::{GaugeKind, LevelStatus, StatusThresholds};
use crate::tilt::TiltState;
use crate::ui::colors::COLOR_BACKGROUND;
use crate::ui::components::MAX_TEXT_LEN;
use crate::ui::core::{DirtyRegion, Drawable, LifecycleEvent, PageEvent, PageId};
use crate::ui::{CircularLevel, SpiritTube, TextComponent, TextSize, TubeOrientation};

const HEADER_HEIGHT_PX: u32 = 24;
const SIDE_TUBE_WIDTH_PX: u32 = 56;
const BOTTOM_TUBE_HEIGHT_PX: u32 = 56;
const TEXT_MARGIN_PX: i32 = 8;

/// Format the total tilt read-out, e.g. `"3.5°"`.
pub fn format_angle(total_tilt_deg: f32) -> heapless::String<MAX_TEXT_LEN> {
    let mut text = heapless::String::new();
    // Overflow leaves a partial string; only non-physical angles get there
    write!(text, "{:.1}°", total_tilt_deg).ok();
    text
}

pub struct LevelPage {
    bounds: Rectangle,
    thresholds: StatusThresholds,
    tilt: TiltState,
    circular: CircularLevel,
    vertical_tube: SpiritTube,
    horizontal_tube: SpiritTube,
    status_text: TextComponent,
    angle_text: TextComponent,
    running: bool,
    needs_full_redraw: bool,
}

impl LevelPage {
    pub fn new(bounds: Rectangle, config: &LevelConfig) -> Self {
        let origin = bounds.top_left;
        let width = bounds.size.width;
        let height = bounds.size.height;
        let body_width = width.saturating_sub(SIDE_TUBE_WIDTH_PX);
        let body_height = height.saturating_sub(HEADER_HEIGHT_PX + BOTTOM_TUBE_HEIGHT_PX);

        let header = Rectangle::new(origin, Size::new(width, HEADER_HEIGHT_PX));
        let body_top = origin + Point::new(0, HEADER_HEIGHT_PX as i32);
        let bottom_top = body_top + Point::new(0, body_height as i32);

        let circular = CircularLevel::new(
            Rectangle::new(body_top, Size::new(body_width, body_height)),
            config,
        );
        let vertical_tube = SpiritTube::new(
            Rectangle::new(
                body_top + Point::new(body_width as i32, 0),
                Size::new(SIDE_TUBE_WIDTH_PX, body_height),
            ),
            TubeOrientation::Vertical,
            config,
        );
        let horizontal_tube = SpiritTube::new(
            Rectangle::new(bottom_top, Size::new(body_width, BOTTOM_TUBE_HEIGHT_PX)),
            TubeOrientation::Horizontal,
            config,
        );

        let half_header = Size::new(
            (width / 2).saturating_sub(TEXT_MARGIN_PX as u32),
            HEADER_HEIGHT_PX,
        );
        let status_text = TextComponent::new(
            Rectangle::new(header.top_left + Point::new(TEXT_MARGIN_PX, 0), half_header),
            LevelStatus::Level.label(),
            TextSize::Large,
        )
        .with_color(LevelStatus::Level.color())
        .with_background(COLOR_BACKGROUND);
        let angle_text = TextComponent::new(
            Rectangle::new(header.top_left + Point::new((width / 2) as i32, 0), half_header),
            &format_angle(0.0),
            TextSize::Large,
        )
        .with_alignment(Alignment::Right)
        .with_background(COLOR_BACKGROUND);

        Self {
            bounds,
            thresholds: StatusThresholds::for_gauge(GaugeKind::Circular, config),
            tilt: TiltState::default(),
            circular,
            vertical_tube,
            horizontal_tube,
            status_text,
            angle_text,
            running: false,
            needs_full_redraw: true,
        }
    }

    /// Feed a new tilt to every gauge and refresh the read-outs.
    pub fn apply_tilt(&mut self, tilt: TiltState) {
        self.tilt = tilt;
        self.circular.set_tilt(tilt);
        self.vertical_tube.set_angle(tilt.pitch);
        self.horizontal_tube.set_angle(tilt.roll);

        let total = tilt.total_tilt();
        let status = self.status();
        self.status_text.set_text(status.label());
        self.status_text.set_color(status.color());
        self.angle_text.set_text(&format_angle(total));
    }

    pub fn tilt(&self) -> TiltState {
        self.tilt
    }

    pub fn status(&self) -> LevelStatus {
        LevelStatus::classify(self.tilt.total_tilt(), self.thresholds)
    }

    pub fn status_text(&self) -> &TextComponent {
        &self.status_text
    }

    pub fn angle_text(&self) -> &TextComponent {
        &self.angle_text
    }

    pub fn circular(&self) -> &CircularLevel {
        &self.circular
    }

    pub fn vertical_tube(&self) -> &SpiritTube {
        &self.vertical_tube
    }

    pub fn horizontal_tube(&self) -> &SpiritTube {
        &self.horizontal_tube
    }

    /// Whether the bubbles are animating.
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn mark_children_dirty(&mut self) {
        self.circular.mark_dirty();
        self.vertical_tube.mark_dirty();
        self.horizontal_tube.mark_dirty();
        self.status_text.mark_dirty();
        self.angle_text.mark_dirty();
    }
}

/// Draw a child if it changed, then mark it clean.
fn draw_if_dirty<T: Drawable, D: DrawTarget<Color = Rgb565>>(
    child: &mut T,
    display: &mut D,
) -> Result<(), D::Error> {
    if child.is_dirty() {
        child.draw(display)?;
        child.mark_clean();
    }
    Ok(())
}

impl Page for LevelPage {
    fn id(&self) -> PageId {
        PageId::Level
    }

    fn title(&self) -> &str {
        "Level"
    }

    fn on_activate(&mut self) {
        info!("Level page active");
        self.running = true;
        self.mark_dirty();
    }

    fn on_deactivate(&mut self) {
        self.running = false;
    }

    fn update(&mut self) {
        if !self.running {
            return;
        }

        self.circular.tick();
        self.vertical_tube.tick();
        self.horizontal_tube.tick();

        // Continuous animation: the gauges repaint every tick while visible
        self.circular.mark_dirty();
        self.vertical_tube.mark_dirty();
        self.horizontal_tube.mark_dirty();
    }

    fn on_event(&mut self, event: &PageEvent) -> bool {
        match event {
            PageEvent::Tilt(tilt_event) => {
                self.apply_tilt(tilt_event.tilt);
                true
            }
            PageEvent::Lifecycle(LifecycleEvent::Paused) => {
                debug!("Level page paused");
                self.running = false;
                false
            }
            PageEvent::Lifecycle(LifecycleEvent::Resumed) => {
                debug!("Level page resumed");
                self.running = true;
                self.mark_dirty();
                true
            }
        }
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        if self.needs_full_redraw {
            self.bounds
                .into_styled(PrimitiveStyle::with_fill(COLOR_BACKGROUND))
                .draw(display)?;
            self.mark_children_dirty();
            self.needs_full_redraw = false;
        }

        draw_if_dirty(&mut self.status_text, display)?;
        draw_if_dirty(&mut self.angle_text, display)?;
        draw_if_dirty(&mut self.circular, display)?;
        draw_if_dirty(&mut self.vertical_tube, display)?;
        draw_if_dirty(&mut self.horizontal_tube, display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.needs_full_redraw
            || self.circular.is_dirty()
            || self.vertical_tube.is_dirty()
            || self.horizontal_tube.is_dirty()
            || self.status_text.is_dirty()
            || self.angle_text.is_dirty()
    }

    fn mark_clean(&mut self) {
        self.needs_full_redraw = false;
        self.circular.mark_clean();
        self.vertical_tube.mark_clean();
        self.horizontal_tube.mark_clean();
        self.status_text.mark_clean();
        self.angle_text.mark_clean();
    }

    fn mark_dirty(&mut self) {
        self.needs_full_redraw = true;
    }

    fn dirty_regions(&self) -> Vec<DirtyRegion, MAX_DIRTY_REGIONS> {
        let mut regions = Vec::new();
        if self.needs_full_redraw {
            regions.push(DirtyRegion::new(self.bounds)).ok();
            return regions;
        }

        let children = [
            self.status_text.dirty_region(),
            self.angle_text.dirty_region(),
            self.circular.dirty_region(),
            self.vertical_tube.dirty_region(),
            self.horizontal_tube.dirty_region(),
        ];
        for region in children.into_iter().flatten() {
            regions.push(region).ok();
        }
        regions
    }
}
