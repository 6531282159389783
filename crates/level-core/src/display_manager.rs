//! Display Manager for screen rendering and page lifecycle
//!
//! The manager owns the draw target and the current page. Once per render
//! tick it:
//! - drains tilt events from its subscriber into the page
//! - advances the page's animations
//! - redraws the page if anything is dirty
//!
//! Navigation and pause/resume arrive as [`DisplayRequest`]s.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};

use crate::config::LevelConfig;
use crate::pages::{LevelPage, Page, PageWrapper, SensorUnavailablePage};
use crate::tilt::TiltSubscriber;
use crate::ui::core::{DirtyRegion, LifecycleEvent, PageEvent, PageId};

extern crate alloc;
use alloc::boxed::Box;

/// Request to change the current page or its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRequest {
    /// Replace the current page
    NavigateToPage(PageId),
    /// Force a full redraw of the current page
    Redraw,
    /// Host screen hidden
    Pause,
    /// Host screen visible again
    Resume,
}

/// Display manager that owns the display and drives the current page
pub struct DisplayManager<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    display: D,
    current_page: PageWrapper,
    bounds: Rectangle,
    config: LevelConfig,
    tilt_events: Option<TiltSubscriber<'a>>,
}

impl<'a, D> DisplayManager<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Create a display manager showing `initial_page` over the whole display.
    pub fn new(display: D, initial_page: PageId, config: LevelConfig) -> Self {
        let bounds = display.bounding_box();
        let mut current_page = build_page(initial_page, bounds, &config);
        current_page.on_activate();

        Self {
            display,
            current_page,
            bounds,
            config,
            tilt_events: None,
        }
    }

    /// Start receiving tilt events.
    pub fn subscribe(&mut self, subscriber: TiltSubscriber<'a>) {
        self.tilt_events = Some(subscriber);
    }

    pub fn current_page_id(&self) -> PageId {
        self.current_page.id()
    }

    pub fn current_page(&self) -> &PageWrapper {
        &self.current_page
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    fn navigate_to(&mut self, page_id: PageId) {
        debug!("Navigating to page: {:?}", page_id);
        self.current_page.on_deactivate();
        self.current_page = build_page(page_id, self.bounds, &self.config);
        self.current_page.on_activate();
        self.current_page.mark_dirty();
    }

    fn dispatch(&mut self, event: PageEvent) {
        if self.current_page.on_event(&event) {
            debug!("{} needs redraw after {:?}", self.current_page.title(), event);
        }
    }

    /// Union of the current page's dirty regions, or its full bounds if it
    /// reports none.
    fn dirty_area(&self) -> Rectangle {
        let mut area = DirtyRegion {
            bounds: Rectangle::zero(),
            is_dirty: false,
        };
        for region in self.current_page.dirty_regions() {
            area.expand_to_include(region.bounds);
        }
        if area.is_dirty() {
            area.bounds
        } else {
            self.current_page.bounds()
        }
    }

    /// Draw the current page if it is dirty, clipped to its dirty area.
    /// Returns whether anything was drawn.
    fn render(&mut self) -> Result<bool, D::Error> {
        if !self.current_page.is_dirty() {
            return Ok(false);
        }

        let area = self.dirty_area();
        debug!("Rendering {} over {:?}", self.current_page.title(), area);

        self.current_page.draw_page(&mut self.display.clipped(&area))?;
        self.current_page.mark_clean();
        Ok(true)
    }

    /// Apply a display request and render the result.
    pub fn process_request(&mut self, request: DisplayRequest) -> Result<(), D::Error> {
        self.apply(request);
        self.render().map(|_| ())
    }

    /// Apply a display request, leaving the drawing to the next tick.
    pub fn apply(&mut self, request: DisplayRequest) {
        debug!("Processing request: {:?}", request);
        match request {
            DisplayRequest::NavigateToPage(page_id) => self.navigate_to(page_id),
            DisplayRequest::Redraw => self.current_page.mark_dirty(),
            DisplayRequest::Pause => {
                info!("Display paused");
                self.dispatch(PageEvent::Lifecycle(LifecycleEvent::Paused));
            }
            DisplayRequest::Resume => {
                info!("Display resumed");
                self.dispatch(PageEvent::Lifecycle(LifecycleEvent::Resumed));
            }
        }
    }

    /// Run one render tick. Returns whether the display was drawn to.
    pub fn tick(&mut self) -> Result<bool, D::Error> {
        if let Some(subscriber) = self.tilt_events.as_mut() {
            while let Some(event) = subscriber.try_next_message_pure() {
                if self.current_page.on_event(&PageEvent::Tilt(event)) {
                    debug!("Tilt {:?} applied", event.tilt);
                }
            }
        }

        self.current_page.update();
        self.render()
    }
}

fn build_page(page_id: PageId, bounds: Rectangle, config: &LevelConfig) -> PageWrapper {
    match page_id {
        PageId::Level => PageWrapper::Level(Box::new(LevelPage::new(bounds, config))),
        PageId::SensorUnavailable => {
            PageWrapper::SensorUnavailable(Box::new(SensorUnavailablePage::new(bounds)))
        }
    }
}
