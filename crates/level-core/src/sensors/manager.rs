//! Sensor selection and sample routing.

use log::{info, warn};

use super::{GravitySample, MotionSensor, SensorError, SensorKind};
use crate::config::LevelConfig;
use crate::tilt::{TiltEstimator, TiltPublisher, TiltState};

/// Owns the chosen motion source and the tilt estimator it feeds.
///
/// The gravity sensor is preferred; a raw accelerometer is used only when no
/// gravity sensor exists. With neither, the manager reports itself unavailable
/// and every operation becomes a no-op.
pub struct SensorManager<'a> {
    source: Option<SensorKind>,
    estimator: TiltEstimator<'a>,
}

impl<'a> SensorManager<'a> {
    /// Pick a source from the kinds the host platform offers.
    pub fn new(available: &[SensorKind], config: &LevelConfig) -> Self {
        let source = if available.contains(&SensorKind::Gravity) {
            Some(SensorKind::Gravity)
        } else if available.contains(&SensorKind::Accelerometer) {
            warn!("No gravity sensor, falling back to filtered accelerometer");
            Some(SensorKind::Accelerometer)
        } else {
            warn!("No motion sensor available");
            None
        };

        if let Some(kind) = source {
            info!("Using {} sensor", kind.name());
        }

        Self {
            source,
            estimator: TiltEstimator::new(config),
        }
    }

    pub fn is_available(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<SensorKind> {
        self.source
    }

    /// Start delivering tilt events to `publisher`.
    ///
    /// Returns [`SensorError::Unavailable`] when there is nothing to listen to.
    pub fn register(&mut self, publisher: TiltPublisher<'a>) -> Result<(), SensorError> {
        if self.source.is_none() {
            return Err(SensorError::Unavailable);
        }
        self.estimator.register(publisher);
        Ok(())
    }

    /// Stop delivering tilt events.
    pub fn unregister(&mut self) {
        self.estimator.unregister();
    }

    pub fn is_registered(&self) -> bool {
        self.estimator.is_registered()
    }

    /// Route a sample through the estimator.
    ///
    /// Samples are ignored while unregistered (delivery is paused) and when
    /// they come from a kind other than the selected source.
    pub fn on_sample(&mut self, kind: SensorKind, sample: GravitySample) -> Option<TiltState> {
        if !self.is_registered() || self.source != Some(kind) {
            return None;
        }
        self.estimator.process(kind, sample)
    }

    /// Read one sample from `sensor` and process it.
    pub async fn poll<S: MotionSensor>(
        &mut self,
        sensor: &mut S,
    ) -> Result<Option<TiltState>, SensorError> {
        if self.source.is_none() {
            return Err(SensorError::Unavailable);
        }
        let sample = sensor.read().await?;
        Ok(self.on_sample(sensor.kind(), sample))
    }

    pub fn tilt(&self) -> TiltState {
        self.estimator.tilt()
    }

    pub fn total_tilt_angle(&self) -> f32 {
        self.estimator.tilt().total_tilt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilt::TiltChannel;

    struct FixedSensor {
        kind: SensorKind,
        sample: GravitySample,
        fail: bool,
    }

    impl MotionSensor for FixedSensor {
        fn kind(&self) -> SensorKind {
            self.kind
        }

        async fn read(&mut self) -> Result<GravitySample, SensorError> {
            if self.fail {
                return Err(SensorError::ReadFailed {
                    sensor: "fixed",
                    details: "test failure",
                });
            }
            Ok(self.sample)
        }
    }

    #[test]
    fn test_prefers_gravity_sensor() {
        let manager = SensorManager::new(
            &[SensorKind::Accelerometer, SensorKind::Gravity],
            &LevelConfig::default(),
        );
        assert_eq!(manager.source(), Some(SensorKind::Gravity));
    }

    #[test]
    fn test_falls_back_to_accelerometer() {
        let manager = SensorManager::new(&[SensorKind::Accelerometer], &LevelConfig::default());
        assert_eq!(manager.source(), Some(SensorKind::Accelerometer));
        assert!(manager.is_available());
    }

    #[test]
    fn test_no_sensor_is_unavailable() {
        let channel = TiltChannel::new();
        let mut manager = SensorManager::new(&[], &LevelConfig::default());
        assert!(!manager.is_available());
        assert_eq!(
            manager.register(channel.publisher().unwrap()),
            Err(SensorError::Unavailable)
        );
    }

    #[test]
    fn test_samples_ignored_until_registered() {
        let channel = TiltChannel::new();
        let mut manager = SensorManager::new(&[SensorKind::Gravity], &LevelConfig::default());

        let sample = GravitySample::new(9.8, 0.0, 0.0);
        assert_eq!(manager.on_sample(SensorKind::Gravity, sample), None);

        manager.register(channel.publisher().unwrap()).unwrap();
        assert!(manager.on_sample(SensorKind::Gravity, sample).is_some());
        assert!(libm::fabsf(manager.total_tilt_angle() - 90.0) < 1e-3);
    }

    #[test]
    fn test_samples_from_other_kind_are_ignored() {
        let channel = TiltChannel::new();
        let mut manager = SensorManager::new(&[SensorKind::Gravity], &LevelConfig::default());
        manager.register(channel.publisher().unwrap()).unwrap();

        let sample = GravitySample::new(9.8, 0.0, 0.0);
        assert_eq!(manager.on_sample(SensorKind::Accelerometer, sample), None);
        assert_eq!(manager.tilt(), TiltState::default());
    }

    #[test]
    fn test_poll_reads_and_processes() {
        let channel = TiltChannel::new();
        let mut subscriber = channel.subscriber().unwrap();
        let mut manager = SensorManager::new(&[SensorKind::Gravity], &LevelConfig::default());
        manager.register(channel.publisher().unwrap()).unwrap();

        let mut sensor = FixedSensor {
            kind: SensorKind::Gravity,
            sample: GravitySample::new(0.0, 0.0, 9.8),
            fail: false,
        };
        let tilt = embassy_futures::block_on(manager.poll(&mut sensor)).unwrap();

        assert_eq!(tilt, Some(TiltState::new(0.0, 0.0)));
        assert!(subscriber.try_next_message_pure().is_some());
    }

    #[test]
    fn test_poll_propagates_read_errors() {
        let channel = TiltChannel::new();
        let mut manager = SensorManager::new(&[SensorKind::Gravity], &LevelConfig::default());
        manager.register(channel.publisher().unwrap()).unwrap();

        let mut sensor = FixedSensor {
            kind: SensorKind::Gravity,
            sample: GravitySample::default(),
            fail: true,
        };
        let result = embassy_futures::block_on(manager.poll(&mut sensor));

        assert!(matches!(result, Err(SensorError::ReadFailed { .. })));
    }
}
