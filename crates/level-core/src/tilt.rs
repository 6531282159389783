//! Tilt estimation from gravity vectors.
//!
//! [`TiltEstimator`] turns gravity samples into pitch/roll angles and pushes
//! every accepted update to an optional observer. The observer is a
//! [`TiltPublisher`] on a [`TiltChannel`], so any number of consumers (up to
//! [`TILT_SUBSCRIBERS`]) can follow the tilt without the estimator knowing
//! about them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};
use log::debug;

use crate::config::LevelConfig;
use crate::sensors::{GravitySample, LowPassFilter, SensorKind};

/// Queued tilt events per subscriber before the oldest is dropped.
/// Sensor delivery and rendering run at similar rates, so a few is plenty.
pub const TILT_CHANNEL_CAPACITY: usize = 4;

/// Number of subscribers that can follow tilt events
/// - Subscriber 0: display manager
/// - Subscriber 1: host status read-out (optional)
pub const TILT_SUBSCRIBERS: usize = 2;

/// Number of publishers (just the estimator)
pub const TILT_PUBLISHERS: usize = 1;

pub type TiltChannel = PubSubChannel<
    CriticalSectionRawMutex,
    TiltEvent,
    TILT_CHANNEL_CAPACITY,
    TILT_SUBSCRIBERS,
    TILT_PUBLISHERS,
>;

pub type TiltPublisher<'a> = Publisher<
    'a,
    CriticalSectionRawMutex,
    TiltEvent,
    TILT_CHANNEL_CAPACITY,
    TILT_SUBSCRIBERS,
    TILT_PUBLISHERS,
>;

pub type TiltSubscriber<'a> = Subscriber<
    'a,
    CriticalSectionRawMutex,
    TiltEvent,
    TILT_CHANNEL_CAPACITY,
    TILT_SUBSCRIBERS,
    TILT_PUBLISHERS,
>;

/// Device tilt in degrees.
///
/// Pitch is forward/backward tilt (rotation about the lateral axis), roll is
/// left/right tilt (rotation about the longitudinal axis).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltState {
    pub pitch: f32,
    pub roll: f32,
}

impl TiltState {
    pub const fn new(pitch: f32, roll: f32) -> Self {
        Self { pitch, roll }
    }

    /// Combined tilt magnitude, `sqrt(pitch² + roll²)`.
    pub fn total_tilt(&self) -> f32 {
        libm::sqrtf(self.pitch * self.pitch + self.roll * self.roll)
    }
}

/// Published after every accepted gravity sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltEvent {
    pub tilt: TiltState,
    pub source: SensorKind,
}

/// Compute pitch and roll from a gravity vector.
///
/// Returns `None` for degenerate vectors: a magnitude at or below
/// `min_magnitude`, or one that is not a finite number.
pub fn tilt_from_gravity(gravity: GravitySample, min_magnitude: f32) -> Option<TiltState> {
    let magnitude = gravity.magnitude();
    if !(magnitude > min_magnitude && magnitude.is_finite()) {
        return None;
    }

    let norm = gravity.normalized(magnitude);
    Some(TiltState {
        pitch: libm::atan2f(norm.y, norm.z).to_degrees(),
        roll: libm::atan2f(norm.x, norm.z).to_degrees(),
    })
}

/// Stateful estimator holding the latest tilt and the accelerometer filter.
pub struct TiltEstimator<'a> {
    tilt: TiltState,
    filter: LowPassFilter,
    min_magnitude: f32,
    observer: Option<TiltPublisher<'a>>,
}

impl<'a> TiltEstimator<'a> {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            tilt: TiltState::default(),
            filter: LowPassFilter::new(config.low_pass_alpha),
            min_magnitude: config.min_gravity_magnitude,
            observer: None,
        }
    }

    /// Attach the observer that receives every accepted update.
    pub fn register(&mut self, publisher: TiltPublisher<'a>) {
        self.observer = Some(publisher);
    }

    /// Detach the observer, releasing its publisher slot on the channel.
    pub fn unregister(&mut self) {
        self.observer = None;
    }

    pub fn is_registered(&self) -> bool {
        self.observer.is_some()
    }

    pub fn tilt(&self) -> TiltState {
        self.tilt
    }

    /// Process one sample from a source of the given kind.
    ///
    /// Accelerometer samples are low-pass filtered first. Returns the new tilt,
    /// or `None` when the (filtered) vector was degenerate and nothing changed.
    pub fn process(&mut self, kind: SensorKind, sample: GravitySample) -> Option<TiltState> {
        // A NaN would stick in the filter history for good
        if !sample.is_finite() {
            debug!("Skipping non-finite sample {:?}", sample);
            return None;
        }

        let gravity = match kind {
            SensorKind::Gravity => sample,
            SensorKind::Accelerometer => self.filter.apply(sample),
        };

        let Some(tilt) = tilt_from_gravity(gravity, self.min_magnitude) else {
            debug!("Skipping degenerate gravity vector {:?}", gravity);
            return None;
        };

        self.tilt = tilt;
        if let Some(observer) = &self.observer {
            observer.publish_immediate(TiltEvent { tilt, source: kind });
        }

        Some(tilt)
    }

    /// Forget the current tilt and filter history.
    pub fn reset(&mut self) {
        self.tilt = TiltState::default();
        self.filter.reset();
    }
}
