//! # Mode seeking dominant vector estimator.
//!
//! Every polar sample is tried as a cluster center. The center with the most samples within its
//! proximity window wins, and the mean of its neighbourhood is the motion estimate.
//!
//! The scan is quadratic in the number of samples, which is fine for the tens to hundreds of
//! features a tracker usually produces.

use polarflow::prelude::v1::*;
use rayon::prelude::*;

/// Dominant vector estimator selecting the densest sample neighbourhood.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeSeekEstimator {
    margins: Margins,
    /// Scan candidate centers on the rayon thread pool.
    parallel: bool,
}

impl From<&EstimatorConfig> for ModeSeekEstimator {
    fn from(config: &EstimatorConfig) -> Self {
        Self::default()
            .margins(config.margins)
            .parallel(config.parallel)
    }
}

impl ModeSeekEstimator {
    pub fn margins(self, margins: Margins) -> Self {
        Self { margins, ..self }
    }

    pub fn parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    /// Find the best supported cluster center.
    ///
    /// Returns index of the winning sample and the number of samples around it. On ties, the
    /// lowest index wins.
    pub fn best_center(&self, samples: &[PolarSample]) -> Result<(usize, usize)> {
        if samples.is_empty() {
            return Err(Error::EmptyInput);
        }

        let best = if self.parallel {
            self.best_center_par(samples)
        } else {
            self.best_center_seq(samples)
        };

        // Only non-finite samples have no support at all.
        best.ok_or(Error::EmptyCluster)
    }

    fn best_center_seq(&self, samples: &[PolarSample]) -> Option<(usize, usize)> {
        let mut best = None;
        let mut best_support = 0;

        for (i, &center) in samples.iter().enumerate() {
            let support = self.margins.support(samples, center);
            if support > best_support {
                best_support = support;
                best = Some(i);
            }
        }

        best.map(|i| (i, best_support))
    }

    fn best_center_par(&self, samples: &[PolarSample]) -> Option<(usize, usize)> {
        samples
            .par_iter()
            .enumerate()
            .map(|(i, &center)| (i, self.margins.support(samples, center)))
            .filter(|&(_, support)| support > 0)
            .reduce_with(|a, b| {
                if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
                    b
                } else {
                    a
                }
            })
    }
}

impl Estimator for ModeSeekEstimator {
    fn estimate(&mut self, samples: &[PolarSample]) -> Result<PolarSample> {
        let (best, support) = self.best_center(samples)?;

        log::debug!(
            "center {:?} supported by {}/{} samples",
            samples[best],
            support,
            samples.len()
        );

        self.margins.cluster_mean(samples, samples[best])
    }
}
