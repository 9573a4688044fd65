//! The x-values at which every trace is sampled.

/// An evenly spaced, half-open range of sample points `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampleDomain {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

/// [-10, 10) in steps of 0.01.
pub const DEFAULT_DOMAIN: SampleDomain = SampleDomain {
    start: -10.0,
    end: 10.0,
    step: 0.01,
};

impl Default for SampleDomain {
    fn default() -> Self {
        DEFAULT_DOMAIN
    }
}

impl SampleDomain {
    /// Number of sample points.
    pub fn len(&self) -> usize {
        let steps = ((self.end - self.start) / self.step).ceil();
        if steps.is_finite() && steps > 0.0 {
            steps as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sample points.
    ///
    /// Each point is computed as `start + i * step` rather than by accumulation,
    /// so rounding error does not grow along the range.
    pub fn points(&self) -> Vec<f64> {
        let SampleDomain { start, step, .. } = *self;
        (0..self.len()).map(|i| start + (i as f64) * step).collect()
    }
}
