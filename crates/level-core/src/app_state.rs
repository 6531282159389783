//! Application state for the level
//!
//! [`LevelApp`] wires the sensor manager to the display manager through a
//! [`TiltChannel`]: the estimator publishes, the display manager subscribes.

use embassy_sync::pubsub;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::{info, warn};
use thiserror_no_std::Error;

use crate::config::{ConfigError, LevelConfig};
use crate::display_manager::{DisplayManager, DisplayRequest};
use crate::sensors::{GravitySample, MotionSensor, SensorError, SensorKind, SensorManager};
use crate::tilt::{TiltChannel, TiltState};
use crate::ui::core::PageId;

/// Global pub-sub channel for tilt events
///
/// Hosts with a single level instance can hand this to [`LevelApp::new`].
pub static TILT_CHANNEL: TiltChannel = TiltChannel::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRunState {
    /// Sensor delivery on, bubbles animating
    Running,
    /// Screen hidden: no sensor delivery, no animation
    Paused,
    /// No motion sensor; the unavailable page is shown
    SensorUnavailable,
}

#[derive(Error, Debug, PartialEq)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),
    #[error("tilt channel has no free {0} slot")]
    ChannelFull(&'static str),
}

fn channel_error(err: pubsub::Error) -> AppError {
    match err {
        pubsub::Error::MaximumSubscribersReached => AppError::ChannelFull("subscriber"),
        pubsub::Error::MaximumPublishersReached => AppError::ChannelFull("publisher"),
    }
}

/// Main application state container
pub struct LevelApp<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    run_state: AppRunState,
    channel: &'a TiltChannel,
    sensors: SensorManager<'a>,
    display: DisplayManager<'a, D>,
}

impl<'a, D> LevelApp<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Build the app for a platform offering `available` sensor kinds.
    ///
    /// With no usable sensor the app starts on the unavailable page instead of
    /// failing.
    pub fn new(
        display: D,
        channel: &'a TiltChannel,
        available: &[SensorKind],
        config: LevelConfig,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let mut sensors = SensorManager::new(available, &config);
        if !sensors.is_available() {
            warn!("Starting without a motion sensor");
            return Ok(Self {
                run_state: AppRunState::SensorUnavailable,
                channel,
                sensors,
                display: DisplayManager::new(display, PageId::SensorUnavailable, config),
            });
        }

        let mut display = DisplayManager::new(display, PageId::Level, config);
        display.subscribe(channel.subscriber().map_err(channel_error)?);
        sensors.register(channel.publisher().map_err(channel_error)?)?;
        info!("Level running");

        Ok(Self {
            run_state: AppRunState::Running,
            channel,
            sensors,
            display,
        })
    }

    pub fn run_state(&self) -> AppRunState {
        self.run_state
    }

    pub fn sensors(&self) -> &SensorManager<'a> {
        &self.sensors
    }

    pub fn display_manager(&self) -> &DisplayManager<'a, D> {
        &self.display
    }

    pub fn display_manager_mut(&mut self) -> &mut DisplayManager<'a, D> {
        &mut self.display
    }

    /// Feed a sample pushed by the platform.
    pub fn on_sample(&mut self, kind: SensorKind, sample: GravitySample) -> Option<TiltState> {
        self.sensors.on_sample(kind, sample)
    }

    /// Pull a sample from `sensor`.
    pub async fn poll<S: MotionSensor>(
        &mut self,
        sensor: &mut S,
    ) -> Result<Option<TiltState>, SensorError> {
        self.sensors.poll(sensor).await
    }

    /// Stop sensor delivery and animation.
    ///
    /// The page stops animating from the next [`LevelApp::tick`].
    pub fn pause(&mut self) {
        if self.run_state != AppRunState::Running {
            return;
        }
        self.sensors.unregister();
        self.run_state = AppRunState::Paused;
        self.display.apply(DisplayRequest::Pause);
    }

    /// Restart sensor delivery and animation.
    ///
    /// Fails with [`AppError::ChannelFull`] when the channel's publisher slot
    /// was taken while paused; the app then stays [`AppRunState::Paused`].
    pub fn resume(&mut self) -> Result<(), AppError> {
        if self.run_state != AppRunState::Paused {
            return Ok(());
        }

        let channel = self.channel;
        let publisher = channel.publisher().map_err(channel_error)?;
        self.sensors.register(publisher)?;

        self.run_state = AppRunState::Running;
        self.display.apply(DisplayRequest::Resume);
        Ok(())
    }

    /// Run one render tick.
    pub fn tick(&mut self) -> Result<bool, D::Error> {
        self.display.tick()
    }
}
