//! Sensor unavailable page
//!
//! Shown instead of the level when the device has neither a gravity sensor
//! nor an accelerometer. The status line reads "Sensor unavailable" in red
//! and the angle read-out is left empty.

use crate::pages::Page;
use crate::ui::colors::{COLOR_BACKGROUND, COLOR_TILTED, LIGHT_GRAY};
use crate::ui::core::{Drawable, PageEvent, PageId};
use crate::ui::{FONT_10X20_CHAR_HEIGHT_PX, TextComponent, TextSize};
use embedded_graphics::{
    Drawable as EgDrawable,
    mono_font::{MonoTextStyle, iso_8859_1::FONT_6X10},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};
use embedded_layout::prelude::*;

/// Status line of the unavailable page
pub const SENSOR_UNAVAILABLE_MESSAGE: &str = "Sensor unavailable";

const HINT: &str = "No gravity sensor or accelerometer";

pub struct SensorUnavailablePage {
    bounds: Rectangle,
    status_text: TextComponent,
    dirty: bool,
}

impl SensorUnavailablePage {
    pub fn new(bounds: Rectangle) -> Self {
        let line = Rectangle::new(
            Point::zero(),
            Size::new(bounds.size.width, FONT_10X20_CHAR_HEIGHT_PX + 4),
        )
        .align_to(&bounds, horizontal::Center, vertical::Center);

        let status_text = TextComponent::new(line, SENSOR_UNAVAILABLE_MESSAGE, TextSize::Large)
            .with_alignment(Alignment::Center)
            .with_color(COLOR_TILTED);

        Self {
            bounds,
            status_text,
            dirty: true,
        }
    }

    pub fn status_text(&self) -> &TextComponent {
        &self.status_text
    }

    /// Always empty: there is no angle to report.
    pub fn angle_text(&self) -> &str {
        ""
    }
}

impl Page for SensorUnavailablePage {
    fn id(&self) -> PageId {
        PageId::SensorUnavailable
    }

    fn title(&self) -> &str {
        "Sensor unavailable"
    }

    fn on_activate(&mut self) {
        self.dirty = true;
    }

    fn update(&mut self) {
        // Static page
    }

    fn on_event(&mut self, _event: &PageEvent) -> bool {
        // No sensor means no tilt events; lifecycle changes need no redraw
        false
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        if !self.dirty {
            return Ok(());
        }

        self.bounds
            .into_styled(PrimitiveStyle::with_fill(COLOR_BACKGROUND))
            .draw(display)?;

        self.status_text.draw(display)?;

        // Hint one line-height below the message
        let hint_anchor =
            self.status_text.bounds().center() + Point::new(0, FONT_10X20_CHAR_HEIGHT_PX as i32);
        Text::with_alignment(
            HINT,
            hint_anchor,
            MonoTextStyle::new(&FONT_6X10, LIGHT_GRAY),
            Alignment::Center,
        )
        .draw(display)?;

        self.mark_clean();
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
    use crate::sensors::SensorKind;
    use crate::tilt::{TiltEvent, TiltState};
    use crate::ui::core::LifecycleEvent;
    use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

    fn screen() -> Rectangle {
        Rectangle::new(
            Point::zero(),
            Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32),
        )
    }

    #[test]
    fn test_readout() {
        let page = SensorUnavailablePage::new(screen());
        assert_eq!(page.status_text().text(), "Sensor unavailable");
        assert_eq!(page.status_text().color(), COLOR_TILTED);
        assert_eq!(page.angle_text(), "");
    }

    #[test]
    fn test_message_is_vertically_centered() {
        let page = SensorUnavailablePage::new(screen());
        let bounds = page.status_text().bounds();
        assert_eq!(bounds.top_left, Point::new(0, 108));
        assert_eq!(bounds.size, Size::new(320, 24));
    }

    #[test]
    fn test_ignores_events() {
        let mut page = SensorUnavailablePage::new(screen());
        let tilt = PageEvent::Tilt(TiltEvent {
            tilt: TiltState::new(10.0, 0.0),
            source: SensorKind::Gravity,
        });
        assert!(!page.on_event(&tilt));
        assert!(!page.on_event(&PageEvent::Lifecycle(LifecycleEvent::Resumed)));
    }

    #[test]
    fn test_draws_once() {
        let mut page = SensorUnavailablePage::new(screen());
        let mut fb = FrameBuffer::new();

        page.draw_page(&mut fb).unwrap();
        assert!(!page.is_dirty());
        assert_eq!(fb.pixel(Point::zero()), Some(COLOR_BACKGROUND));

        let rendered = fb.dirty_area();
        assert!(rendered.is_some());

        page.on_activate();
        assert!(page.is_dirty());
    }
}
