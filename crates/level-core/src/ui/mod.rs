// src/ui/mod.rs
//! Level UI system - widgets and drawing primitives for the bubble level
//!
//! This module provides:
//! - Core traits for drawable elements and dirty tracking
//! - The color palette, including the three status colors
//! - Gauge widgets (circular level, spirit tubes) and text read-outs
//! - Events that pages subscribe to

pub mod colors;
pub mod components;
pub mod core;

pub use components::{CircularLevel, SpiritTube, TextComponent, TextSize, TubeOrientation};
pub use self::core::{DirtyRegion, Drawable, LifecycleEvent, PageEvent, PageId};

/// Display width in pixels (landscape).
pub const DISPLAY_WIDTH_PX: u16 = 320;

/// Display height in pixels (landscape).
pub const DISPLAY_HEIGHT_PX: u16 = 240;

/// Glyph height of the 10x20 font, used to space centered message lines.
pub const FONT_10X20_CHAR_HEIGHT_PX: u32 = 20;
