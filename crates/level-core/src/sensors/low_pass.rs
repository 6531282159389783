use super::GravitySample;

/// Single-pole low-pass filter isolating gravity from raw acceleration.
///
/// `filtered = alpha * sample + (1 - alpha) * filtered`, starting from zero.
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    alpha: f32,
    filtered: GravitySample,
}

impl LowPassFilter {
    pub const fn new(alpha: f32) -> Self {
        Self {
            alpha,
            filtered: GravitySample::new(0.0, 0.0, 0.0),
        }
    }

    /// Feed one raw sample and return the updated filter output.
    pub fn apply(&mut self, sample: GravitySample) -> GravitySample {
        let keep = 1.0 - self.alpha;
        self.filtered = GravitySample {
            x: self.alpha * sample.x + keep * self.filtered.x,
            y: self.alpha * sample.y + keep * self.filtered.y,
            z: self.alpha * sample.z + keep * self.filtered.z,
        };
        self.filtered
    }

    pub fn output(&self) -> GravitySample {
        self.filtered
    }

    pub fn reset(&mut self) {
        self.filtered = GravitySample::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_scaled_by_alpha() {
        let mut filter = LowPassFilter::new(0.2);
        let out = filter.apply(GravitySample::new(10.0, -5.0, 0.0));
        assert_eq!(out, GravitySample::new(2.0, -1.0, 0.0));
    }

    #[test]
    fn test_second_sample_blends_with_history() {
        let mut filter = LowPassFilter::new(0.2);
        filter.apply(GravitySample::new(10.0, 0.0, 0.0));
        let out = filter.apply(GravitySample::new(10.0, 0.0, 0.0));
        // 0.2 * 10 + 0.8 * 2
        assert!(libm::fabsf(out.x - 3.6) < 1e-5);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let mut filter = LowPassFilter::new(0.2);
        for _ in 0..200 {
            filter.apply(GravitySample::new(0.0, 0.0, 9.8));
        }
        assert!(libm::fabsf(filter.output().z - 9.8) < 1e-3);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut filter = LowPassFilter::new(0.2);
        filter.apply(GravitySample::new(1.0, 1.0, 1.0));
        filter.reset();
        assert_eq!(filter.output(), GravitySample::default());
    }
}
