//! RAM framebuffer with per-pixel change detection.
//!
//! Pages draw into this buffer instead of the panel. After drawing completes,
//! only the rectangle containing changed pixels is flushed to the real
//! display in a single `fill_contiguous` call. Since the level repaints its
//! gauges every frame, this keeps the transfer down to the area the bubbles
//! actually moved through.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Heap-allocated RGB565 framebuffer implementing `DrawTarget`.
///
/// Tracks a dirty bounding box so that only changed pixels are flushed.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Allocate a full-display framebuffer filled with black pixels.
    pub fn new() -> Self {
        Self::with_size(Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32))
    }

    /// Allocate a framebuffer of arbitrary size filled with black pixels.
    pub fn with_size(size: Size) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width * height],
            dirty: None,
        }
    }

    /// Color at `point`, or `None` outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        let (x, y) = self.index_of(point)?;
        Some(self.pixels[y * self.width + x])
    }

    /// Region that the next [`FrameBuffer::flush`] will send, if any.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    fn index_of(&self, point: Point) -> Option<(usize, usize)> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Flush the dirty region to a display, then reset the dirty state.
    ///
    /// If nothing changed since the last flush, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.to_rectangle();
        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        // Borrow the pixel slice so the closure captures a shared reference,
        // avoiding the `FnMut` escaping-reference issue with `&mut self`.
        let pixels = &self.pixels;
        let stride = self.width;
        let row_len = area.size.width as usize;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + row_len].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = self.index_of(coord) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let (w, h) = (self.width, self.height);

        let x_start = (area.top_left.x.max(0) as usize).min(w);
        let y_start = (area.top_left.y.max(0) as usize).min(h);
        let x_end = ((area.top_left.x + area.size.width as i32).max(0) as usize).min(w);
        let y_end = ((area.top_left.y + area.size.height as i32).max(0) as usize).min(h);

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}
