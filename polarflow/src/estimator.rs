//! # Dominant motion estimator

use nalgebra as na;

use crate::prelude::v1::*;

/// Generic dominant motion vector estimator
pub trait Estimator {
    /// Estimate the dominant vector of a sample set.
    ///
    /// Estimators do not keep state between calls, but may cache scratch buffers, thus this
    /// function takes a mutable reference.
    ///
    /// # Arguments
    ///
    /// * `samples` - polar displacement samples of tracked features.
    fn estimate(&mut self, samples: &[PolarSample]) -> Result<PolarSample>;

    /// Estimate the dominant vector straight from point correspondences.
    ///
    /// # Arguments
    ///
    /// * `before` - feature positions in the first frame.
    /// * `after` - feature positions in the second frame, aligned with `before`.
    fn estimate_pairs(
        &mut self,
        before: &[na::Point2<f32>],
        after: &[na::Point2<f32>],
    ) -> Result<PolarSample> {
        let samples = to_polar(before, after)?;
        self.estimate(&samples)
    }
}

impl<T: Estimator + ?Sized> Estimator for Box<T> {
    fn estimate(&mut self, samples: &[PolarSample]) -> Result<PolarSample> {
        (**self).estimate(samples)
    }
}
