//! # Iterative refinement dominant vector estimator.
//!
//! Starting from an initial center, the center is repeatedly replaced with the mean of the
//! samples in its proximity window, until it settles or the iteration limit is reached.
//!
//! This converges to a local mode and is cheaper than a full scan, but, unlike
//! `mode-seek-estimator`, the result depends on where it starts.

use polarflow::prelude::v1::*;

/// Dominant vector estimator walking a center towards a local mode.
#[derive(Clone, Copy, Debug)]
pub struct RefineEstimator {
    margins: Margins,
    /// Maximum number of refinement steps. At least one step is always taken.
    iterations: usize,
    /// Initial center. `None` to start at the first sample.
    start: Option<PolarSample>,
}

impl Default for RefineEstimator {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            iterations: 8,
            start: None,
        }
    }
}

impl From<&EstimatorConfig> for RefineEstimator {
    fn from(config: &EstimatorConfig) -> Self {
        Self::default()
            .margins(config.margins)
            .iterations(config.iterations)
    }
}

impl RefineEstimator {
    pub fn margins(self, margins: Margins) -> Self {
        Self { margins, ..self }
    }

    pub fn iterations(self, iterations: usize) -> Self {
        Self { iterations, ..self }
    }

    pub fn start(self, start: PolarSample) -> Self {
        Self {
            start: Some(start),
            ..self
        }
    }
}

impl Estimator for RefineEstimator {
    fn estimate(&mut self, samples: &[PolarSample]) -> Result<PolarSample> {
        let mut center = match (self.start, samples.first()) {
            (_, None) => return Err(Error::EmptyInput),
            (Some(start), _) => start,
            (None, Some(&first)) => first,
        };

        for i in 0..self.iterations.max(1) {
            let next = self.margins.cluster_mean(samples, center)?;

            log::trace!("step {}: {:?} -> {:?}", i, center, next);

            if next == center {
                break;
            }

            center = next;
        }

        Ok(center)
    }
}
