//! # Sample proximity
//!
//! Two polar samples belong to the same cluster if their directions and their lengths are both
//! close enough. Direction closeness is evaluated on a circle, so that displacements pointing
//! just above and just below the negative horizontal axis are neighbours.

use crate::error::{Error, Result};
use crate::polar::PolarSample;
use std::f32::consts::TAU;

/// Rule for comparing angles across the `±π` seam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WrapRule {
    /// Accept if the plain difference, or the difference with either operand shifted by a full
    /// turn, is within the margin.
    #[default]
    ShiftedTurns,
    /// Accept if the shortest arc between the angles is within the margin.
    ///
    /// Matches `ShiftedTurns` for angles in `atan2` range, but also handles angles that are
    /// several turns apart.
    Circular,
}

impl WrapRule {
    /// Check whether two angles are closer than `margin` radians.
    pub fn within(self, a: f32, b: f32, margin: f32) -> bool {
        match self {
            Self::ShiftedTurns => {
                (a - b).abs() < margin
                    || (a + TAU - b).abs() < margin
                    || (a - b - TAU).abs() < margin
            }
            Self::Circular => circular_distance(a, b) < margin,
        }
    }
}

/// Shortest arc length between two angles, in `[0; π]` range.
pub fn circular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs().rem_euclid(TAU);
    d.min(TAU - d)
}

/// Clustering tolerances.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Margins {
    /// Angular tolerance, in radians.
    pub angle_margin: f32,
    /// Magnitude tolerance, in image units.
    pub size_margin: f32,
    /// How angles are compared across the `±π` seam.
    pub wrap: WrapRule,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            angle_margin: 0.3,
            size_margin: 15.0,
            wrap: WrapRule::ShiftedTurns,
        }
    }
}

impl Margins {
    pub fn angle_margin(self, angle_margin: f32) -> Self {
        Self {
            angle_margin,
            ..self
        }
    }

    pub fn size_margin(self, size_margin: f32) -> Self {
        Self {
            size_margin,
            ..self
        }
    }

    pub fn wrap(self, wrap: WrapRule) -> Self {
        Self { wrap, ..self }
    }

    /// Check whether `sample` is within the proximity window of `center`.
    ///
    /// The relation is symmetric, and reflexive for finite samples.
    pub fn inside(&self, center: PolarSample, sample: PolarSample) -> bool {
        self.wrap
            .within(center.angle, sample.angle, self.angle_margin)
            && (center.magnitude - sample.magnitude).abs() < self.size_margin
    }

    /// Iterate samples within the proximity window of `center`.
    pub fn neighbours<'a>(
        &'a self,
        samples: &'a [PolarSample],
        center: PolarSample,
    ) -> impl Iterator<Item = PolarSample> + 'a {
        samples
            .iter()
            .copied()
            .filter(move |&s| self.inside(center, s))
    }

    /// Count samples within the proximity window of `center`.
    ///
    /// If `center` is itself one of the samples, it is counted.
    pub fn support(&self, samples: &[PolarSample], center: PolarSample) -> usize {
        self.neighbours(samples, center).count()
    }

    /// Average all neighbours of `center`.
    ///
    /// Angles and magnitudes are averaged independently.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// use polarflow::prelude::v1::*;
    ///
    /// let samples = [PolarSample::new(0.1, 10.0), PolarSample::new(0.2, 12.0)];
    /// let mean = Margins::default().cluster_mean(&samples, samples[0]).unwrap();
    ///
    /// assert_approx_eq!(mean.angle, 0.15);
    /// assert_approx_eq!(mean.magnitude, 11.0);
    /// ```
    pub fn cluster_mean(
        &self,
        samples: &[PolarSample],
        center: PolarSample,
    ) -> Result<PolarSample> {
        let (sum_angle, sum_magnitude, num) = self
            .neighbours(samples, center)
            .fold((0f32, 0f32, 0usize), |(a, m, n), s| {
                (a + s.angle, m + s.magnitude, n + 1)
            });

        if num == 0 {
            return Err(Error::EmptyCluster);
        }

        Ok(PolarSample::new(
            sum_angle / num as f32,
            sum_magnitude / num as f32,
        ))
    }
}
