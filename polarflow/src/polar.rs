//! # Polar displacement samples

use crate::error::{Error, Result};
use nalgebra as na;

/// Displacement expressed as direction and length.
///
/// `angle` is in radians, as produced by `atan2`, in `(-π; π]` range. `magnitude` is the
/// euclidean length of the displacement in image units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct PolarSample {
    pub angle: f32,
    pub magnitude: f32,
}

impl PolarSample {
    pub fn new(angle: f32, magnitude: f32) -> Self {
        Self { angle, magnitude }
    }

    /// Convert a displacement in mathematical (y up) frame.
    ///
    /// A zero displacement maps to `(0, 0)`.
    pub fn from_displacement(delta: na::Vector2<f32>) -> Self {
        Self {
            angle: delta.y.atan2(delta.x),
            magnitude: delta.magnitude(),
        }
    }

    /// Convert back to cartesian displacement in mathematical (y up) frame.
    pub fn to_displacement(self) -> na::Vector2<f32> {
        na::Vector2::new(self.angle.cos(), self.angle.sin()) * self.magnitude
    }

    /// Check whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.angle.is_finite() && self.magnitude.is_finite()
    }
}

/// How per-point tracking status is treated during conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusFilter {
    /// Pass every correspondence through, regardless of its status.
    #[default]
    AcceptAll,
    /// Drop correspondences the tracker failed to follow.
    TrackedOnly,
}

/// Image space displacement between two positions of the same feature.
///
/// The vertical axis is flipped, so that upwards motion in the image has positive `dy`.
fn displacement(before: na::Point2<f32>, after: na::Point2<f32>) -> na::Vector2<f32> {
    na::Vector2::new(after.x - before.x, before.y - after.y)
}

/// Convert aligned point correspondences into polar samples.
///
/// Element `i` of the output describes motion from `before[i]` to `after[i]`.
///
/// # Arguments
///
/// * `before` - feature positions in the first frame.
/// * `after` - feature positions in the second frame.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// use nalgebra as na;
/// use polarflow::polar::to_polar;
///
/// let before = [na::Point2::new(10.0, 10.0)];
/// let after = [na::Point2::new(10.0, 5.0)];
///
/// let samples = to_polar(&before, &after).unwrap();
///
/// assert_approx_eq!(samples[0].angle, std::f32::consts::FRAC_PI_2);
/// assert_approx_eq!(samples[0].magnitude, 5.0);
/// ```
pub fn to_polar(
    before: &[na::Point2<f32>],
    after: &[na::Point2<f32>],
) -> Result<Vec<PolarSample>> {
    if before.len() != after.len() {
        return Err(Error::MismatchedInputLength {
            before: before.len(),
            after: after.len(),
        });
    }

    Ok(before
        .iter()
        .zip(after)
        .map(|(&b, &a)| PolarSample::from_displacement(displacement(b, a)))
        .collect())
}

/// Convert point correspondences, consulting tracker status flags.
///
/// With `StatusFilter::AcceptAll` the flags are only length checked and this is the same as
/// [`to_polar`].
///
/// # Arguments
///
/// * `before` - feature positions in the first frame.
/// * `after` - feature positions in the second frame.
/// * `status` - `true` if the tracker successfully followed the feature.
/// * `filter` - status handling mode.
pub fn to_polar_tracked(
    before: &[na::Point2<f32>],
    after: &[na::Point2<f32>],
    status: &[bool],
    filter: StatusFilter,
) -> Result<Vec<PolarSample>> {
    if status.len() != before.len() {
        return Err(Error::MismatchedInputLength {
            before: before.len(),
            after: status.len(),
        });
    }

    match filter {
        StatusFilter::AcceptAll => to_polar(before, after),
        StatusFilter::TrackedOnly => {
            if before.len() != after.len() {
                return Err(Error::MismatchedInputLength {
                    before: before.len(),
                    after: after.len(),
                });
            }

            let samples = before
                .iter()
                .zip(after)
                .zip(status)
                .filter(|(_, tracked)| **tracked)
                .map(|((&b, &a), _)| PolarSample::from_displacement(displacement(b, a)))
                .collect::<Vec<_>>();

            if samples.len() < before.len() {
                log::warn!(
                    "dropped {} untracked correspondences",
                    before.len() - samples.len()
                );
            }

            Ok(samples)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::PI;

    fn points(coords: &[(f32, f32)]) -> Vec<na::Point2<f32>> {
        coords.iter().map(|&(x, y)| na::Point2::new(x, y)).collect()
    }

    #[test]
    fn inverted_vertical_axis() {
        let before = points(&[(0.0, 0.0), (0.0, 0.0), (5.0, 5.0)]);
        let after = points(&[(3.0, -4.0), (0.0, 2.0), (2.0, 5.0)]);

        let samples = to_polar(&before, &after).unwrap();

        assert_approx_eq!(samples[0].magnitude, 5.0);
        assert_approx_eq!(samples[0].angle, 4f32.atan2(3.0));
        // Moving down in the image points down in the mathematical frame.
        assert_approx_eq!(samples[1].angle, -PI / 2.0);
        assert_approx_eq!(samples[2].angle, PI);
        assert_approx_eq!(samples[2].magnitude, 3.0);
    }

    #[test]
    fn zero_displacement() {
        let p = points(&[(7.0, 7.0)]);
        let samples = to_polar(&p, &p).unwrap();
        assert_eq!(samples, vec![PolarSample::new(0.0, 0.0)]);
    }

    #[test]
    fn mismatched_length() {
        let before = points(&[(0.0, 0.0), (1.0, 1.0)]);
        let after = points(&[(0.0, 0.0)]);

        assert_eq!(
            to_polar(&before, &after),
            Err(Error::MismatchedInputLength {
                before: 2,
                after: 1
            })
        );
    }

    #[test]
    fn preserves_length_order_and_range() {
        let rng = &mut rand::rngs::StdRng::seed_from_u64(7);

        for len in [0, 1, 5, 64] {
            let before: Vec<na::Point2<f32>> = (0..len)
                .map(|_| na::Point2::new(rng.gen_range(0.0..640.0), rng.gen_range(0.0..480.0)))
                .collect();
            let after: Vec<na::Point2<f32>> = before
                .iter()
                .map(|&p| {
                    p + na::Vector2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0))
                })
                .collect();

            let samples = to_polar(&before, &after).unwrap();
            assert_eq!(samples.len(), len);

            for ((&b, &a), s) in before.iter().zip(&after).zip(&samples) {
                assert!(s.angle >= -PI && s.angle <= PI, "{}", s.angle);
                assert!(s.magnitude >= 0.0);
                assert_approx_eq!(s.magnitude, (a - b).magnitude(), 1e-3);
                let back = s.to_displacement();
                assert_approx_eq!(back.x, a.x - b.x, 1e-3);
                assert_approx_eq!(back.y, b.y - a.y, 1e-3);
            }
        }
    }

    #[test]
    fn status_ignored_by_default() {
        let before = points(&[(0.0, 0.0), (0.0, 0.0)]);
        let after = points(&[(1.0, 0.0), (0.0, 1.0)]);
        let status = [true, false];

        let all = to_polar_tracked(&before, &after, &status, StatusFilter::default()).unwrap();
        assert_eq!(all, to_polar(&before, &after).unwrap());

        let tracked =
            to_polar_tracked(&before, &after, &status, StatusFilter::TrackedOnly).unwrap();
        assert_eq!(tracked, vec![PolarSample::new(0.0, 1.0)]);
    }

    #[test]
    fn status_length_checked() {
        let p = points(&[(0.0, 0.0), (0.0, 0.0)]);
        let res = to_polar_tracked(&p, &p, &[true], StatusFilter::AcceptAll);
        assert!(matches!(res, Err(Error::MismatchedInputLength { .. })));
    }
}
