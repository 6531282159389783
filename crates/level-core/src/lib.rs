//! Hardware-independent core library for the bubble level
//!
//! This crate contains all platform-agnostic logic: gravity filtering and tilt
//! estimation, bubble smoothing, level-status classification, gauge widgets,
//! page management and the display manager that drives them once per frame.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod app_state;
pub mod bubble;
pub mod config;
pub mod display_manager;
pub mod framebuffer;
pub mod pages;
pub mod sensors;
pub mod status;
pub mod tilt;
pub mod ui;
