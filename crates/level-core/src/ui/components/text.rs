// src/ui/components/text.rs
//! Text component for the status and angle read-outs

use crate::ui::colors::WHITE;
use crate::ui::core::Drawable;
use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, iso_8859_1};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text as EgText, TextStyleBuilder};

/// Maximum number of bytes a text component holds.
pub const MAX_TEXT_LEN: usize = 32;

/// Text size variants
///
/// Provides three preset text sizes with corresponding embedded-graphics fonts:
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
///
/// The ISO 8859-1 variants are used so the degree sign renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &iso_8859_1::FONT_5X8,
            TextSize::Medium => &iso_8859_1::FONT_6X10,
            TextSize::Large => &iso_8859_1::FONT_10X20,
        }
    }
}

/// Single line of text, vertically centered in its bounds.
///
/// Text longer than [`MAX_TEXT_LEN`] bytes is dropped rather than truncated
/// mid-character. When a background color is set the bounds are filled first,
/// so shorter text fully replaces longer text on redraw.
pub struct TextComponent {
    bounds: Rectangle,
    text: heapless::String<MAX_TEXT_LEN>,
    size: TextSize,
    alignment: Alignment,
    color: Rgb565,
    background: Option<Rgb565>,
    dirty: bool,
}

impl TextComponent {
    pub fn new(bounds: Rectangle, text: &str, size: TextSize) -> Self {
        let mut text_string = heapless::String::new();
        text_string.push_str(text).ok();

        Self {
            bounds,
            text: text_string,
            size,
            alignment: Alignment::Left,
            color: WHITE,
            background: None,
            dirty: true,
        }
    }

    /// Set the text alignment (Left, Center, or Right).
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = color;
        self
    }

    pub fn with_background(mut self, background: Rgb565) -> Self {
        self.background = Some(background);
        self
    }

    /// Update the displayed text.
    ///
    /// Automatically marks the component as dirty if the text changed.
    pub fn set_text(&mut self, text: &str) {
        let mut new_text = heapless::String::new();
        new_text.push_str(text).ok();

        if self.text != new_text {
            self.text = new_text;
            self.dirty = true;
        }
    }

    pub fn set_color(&mut self, color: Rgb565) {
        if self.color != color {
            self.color = color;
            self.dirty = true;
        }
    }

    /// Get the current text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Rgb565 {
        self.color
    }

    fn text_position(&self) -> Point {
        let y = self.bounds.center().y;
        match self.alignment {
            Alignment::Left => Point::new(self.bounds.top_left.x, y),
            Alignment::Center => Point::new(self.bounds.center().x, y),
            Alignment::Right => Point::new(
                self.bounds.top_left.x + self.bounds.size.width as i32 - 1,
                y,
            ),
        }
    }
}

impl Drawable for TextComponent {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if let Some(background) = self.background {
            self.bounds
                .into_styled(PrimitiveStyle::with_fill(background))
                .draw(display)?;
        }

        let character_style = MonoTextStyle::new(self.size.font(), self.color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(Baseline::Middle)
            .build();

        EgText::with_text_style(&self.text, self.text_position(), character_style, text_style)
            .draw(display)?;

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

    fn bounds() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(100, 20))
    }

    #[test]
    fn test_set_text_marks_dirty_only_on_change() {
        let mut text = TextComponent::new(bounds(), "Level", TextSize::Medium);
        text.mark_clean();

        text.set_text("Level");
        assert!(!text.is_dirty());

        text.set_text("Tilted");
        assert!(text.is_dirty());
        assert_eq!(text.text(), "Tilted");
    }

    #[test]
    fn test_set_color_marks_dirty_only_on_change() {
        let mut text = TextComponent::new(bounds(), "Level", TextSize::Medium).with_color(WHITE);
        text.mark_clean();

        text.set_color(WHITE);
        assert!(!text.is_dirty());

        text.set_color(Rgb565::RED);
        assert!(text.is_dirty());
    }

    #[test]
    fn test_overlong_text_is_dropped() {
        let long = "this read-out is far longer than the buffer allows";
        let text = TextComponent::new(bounds(), long, TextSize::Small);
        assert_eq!(text.text(), "");
    }
}
