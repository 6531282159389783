// src/ui/core.rs
//! Core UI traits and types for the level UI

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::tilt::TiltEvent;

/// Page identifier for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    /// Circular level, both tubes and the status read-out
    Level,
    /// Static notice shown when no motion sensor exists
    SensorUnavailable,
}

/// Dirty region tracking for efficient rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtyRegion {
    pub bounds: Rectangle,
    pub is_dirty: bool,
}

impl DirtyRegion {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            is_dirty: true,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Expand this dirty region to include another region
    pub fn expand_to_include(&mut self, other: Rectangle) {
        if !self.is_dirty {
            self.bounds = other;
            self.is_dirty = true;
        } else {
            let min_x = self.bounds.top_left.x.min(other.top_left.x);
            let min_y = self.bounds.top_left.y.min(other.top_left.y);

            let max_x = (self.bounds.top_left.x + self.bounds.size.width as i32)
                .max(other.top_left.x + other.size.width as i32);
            let max_y = (self.bounds.top_left.y + self.bounds.size.height as i32)
                .max(other.top_left.y + other.size.height as i32);

            self.bounds = Rectangle::new(
                Point::new(min_x, min_y),
                Size::new((max_x - min_x) as u32, (max_y - min_y) as u32),
            );
        }
    }
}

/// Trait for any UI element that can be drawn
pub trait Drawable {
    /// Draw the element to the display within its bounds
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error>;

    /// Get the bounds of this drawable element
    fn bounds(&self) -> Rectangle;

    /// Check if this element needs to be redrawn
    fn is_dirty(&self) -> bool;

    /// Mark this element as clean (already drawn)
    fn mark_clean(&mut self);

    /// Mark this element as dirty (needs redraw)
    fn mark_dirty(&mut self);

    /// Get the dirty region for partial updates
    fn dirty_region(&self) -> Option<DirtyRegion> {
        if self.is_dirty() {
            Some(DirtyRegion::new(self.bounds()))
        } else {
            None
        }
    }
}

/// Events that pages can subscribe to for updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// New tilt from the estimator
    Tilt(TiltEvent),
    /// Visibility change of the host screen
    Lifecycle(LifecycleEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Screen hidden; animation and sensor delivery stop
    Paused,
    /// Screen visible again
    Resumed,
}
