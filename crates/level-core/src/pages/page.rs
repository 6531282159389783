// src/pages/page.rs
//! Core page abstraction and the enum wrapper the display manager holds.
//!
//! [`Page`] defines the lifecycle, event and rendering contract for every
//! screen. [`PageWrapper`] stores one concrete page without `dyn`, delegating
//! each call to the boxed page inside.

use crate::ui::core::{DirtyRegion, PageEvent, PageId};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Vec;

extern crate alloc;
use alloc::boxed::Box;

/// Maximum number of dirty regions a page reports per frame.
pub const MAX_DIRTY_REGIONS: usize = 8;

/// Trait that all UI pages must implement.
///
/// The [`DisplayManager`](crate::display_manager::DisplayManager) calls these
/// methods in a fixed order each tick:
///
/// 1. **`on_activate`**: once, when the page becomes current.
/// 2. **`on_event`**: for every tilt or lifecycle event received.
/// 3. **`update`**: once per tick to advance animations.
/// 4. **`draw_page`**: when `is_dirty()` is true.
/// 5. **`on_deactivate`**: once, when the page is replaced.
pub trait Page {
    fn id(&self) -> PageId;

    /// Human-readable title, used in logs.
    fn title(&self) -> &str;

    fn on_activate(&mut self) {}

    fn on_deactivate(&mut self) {}

    /// Advance per-tick state.
    fn update(&mut self);

    /// Handle an incoming [`PageEvent`].
    ///
    /// Returns `true` if the event changed something that must be redrawn.
    fn on_event(&mut self, _event: &PageEvent) -> bool {
        false
    }

    /// Render the dirty parts of the page and mark them clean.
    fn draw_page<D: DrawTarget<Color = Rgb565>>(&mut self, display: &mut D)
    -> Result<(), D::Error>;

    fn bounds(&self) -> Rectangle;

    fn is_dirty(&self) -> bool;

    fn mark_clean(&mut self);

    /// Force a full redraw on the next tick.
    fn mark_dirty(&mut self);

    /// Sub-regions that need redrawing.
    ///
    /// The default implementation returns the full page bounds when dirty.
    fn dirty_regions(&self) -> Vec<DirtyRegion, MAX_DIRTY_REGIONS> {
        let mut regions = Vec::new();
        if self.is_dirty() {
            regions.push(DirtyRegion::new(self.bounds())).ok();
        }
        regions
    }
}

/// The page currently owned by the display manager.
///
/// Each variant boxes its page to keep the enum small regardless of the
/// page's own footprint.
pub enum PageWrapper {
    Level(Box<crate::pages::level::LevelPage>),
    SensorUnavailable(Box<crate::pages::sensor_unavailable::SensorUnavailablePage>),
}

impl Page for PageWrapper {
    fn id(&self) -> PageId {
        match self {
            PageWrapper::Level(page) => page.id(),
            PageWrapper::SensorUnavailable(page) => page.id(),
        }
    }

    fn title(&self) -> &str {
        match self {
            PageWrapper::Level(page) => page.title(),
            PageWrapper::SensorUnavailable(page) => page.title(),
        }
    }

    fn on_activate(&mut self) {
        match self {
            PageWrapper::Level(page) => page.on_activate(),
            PageWrapper::SensorUnavailable(page) => page.on_activate(),
        }
    }

    fn on_deactivate(&mut self) {
        match self {
            PageWrapper::Level(page) => page.on_deactivate(),
            PageWrapper::SensorUnavailable(page) => page.on_deactivate(),
        }
    }

    fn update(&mut self) {
        match self {
            PageWrapper::Level(page) => page.update(),
            PageWrapper::SensorUnavailable(page) => page.update(),
        }
    }

    fn on_event(&mut self, event: &PageEvent) -> bool {
        match self {
            PageWrapper::Level(page) => page.on_event(event),
            PageWrapper::SensorUnavailable(page) => page.on_event(event),
        }
    }

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        match self {
            PageWrapper::Level(page) => page.draw_page(display),
            PageWrapper::SensorUnavailable(page) => page.draw_page(display),
        }
    }

    fn bounds(&self) -> Rectangle {
        match self {
            PageWrapper::Level(page) => page.bounds(),
            PageWrapper::SensorUnavailable(page) => page.bounds(),
        }
    }

    fn is_dirty(&self) -> bool {
        match self {
            PageWrapper::Level(page) => page.is_dirty(),
            PageWrapper::SensorUnavailable(page) => page.is_dirty(),
        }
    }

    fn mark_clean(&mut self) {
        match self {
            PageWrapper::Level(page) => page.mark_clean(),
            PageWrapper::SensorUnavailable(page) => page.mark_clean(),
        }
    }

    fn mark_dirty(&mut self) {
        match self {
            PageWrapper::Level(page) => page.mark_dirty(),
            PageWrapper::SensorUnavailable(page) => page.mark_dirty(),
        }
    }

    fn dirty_regions(&self) -> Vec<DirtyRegion, MAX_DIRTY_REGIONS> {
        match self {
            PageWrapper::Level(page) => page.dirty_regions(),
            PageWrapper::SensorUnavailable(page) => page.dirty_regions(),
        }
    }
}
