//! # Camera abstraction

use crate::polar::PolarSample;
use nalgebra as na;

/// Frame geometry needed to turn an image space estimate into a physical shift.
///
/// The camera is defined by the frame size in pixels and x and y angle field-of-view.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct FrameCamera {
    width: f32,
    height: f32,
    fov_x: f32,
    fov_y: f32,
}

impl FrameCamera {
    /// Create a new camera
    ///
    /// # Arguments
    ///
    /// * `width` - frame width in pixels.
    /// * `height` - frame height in pixels.
    /// * `fov_x` - horizontal field-of-view (in degrees).
    /// * `fov_y` - vertical field-of-view (in degrees).
    pub fn new(width: f32, height: f32, fov_x: f32, fov_y: f32) -> Self {
        Self {
            width,
            height,
            fov_x,
            fov_y,
        }
    }

    /// Get the camera's field of view.
    ///
    /// Returns horizontal and vertical field of view in degrees as a tuple.
    pub fn fov(&self) -> (f32, f32) {
        (self.fov_x, self.fov_y)
    }

    /// Get the frame dimensions in pixels.
    pub fn dim(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Get horizontal and vertical view angle covered by a pixel displacement, in radians.
    ///
    /// # Arguments
    ///
    /// * `delta` - displacement in pixels.
    pub fn view_angle(&self, delta: na::Vector2<f32>) -> na::Vector2<f32> {
        na::Vector2::new(
            delta.x / self.width * self.fov_x.to_radians(),
            delta.y / self.height * self.fov_y.to_radians(),
        )
    }

    /// Convert a motion estimate into a shift at given scene depth.
    ///
    /// Depth is assumed to be constant across the frame.
    ///
    /// # Arguments
    ///
    /// * `estimate` - dominant displacement in pixels.
    /// * `depth` - distance to the scene.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// use polarflow::prelude::v1::*;
    ///
    /// let camera = FrameCamera::new(640.0, 480.0, 90.0, 60.0);
    ///
    /// // A third of the frame to the right covers 30 degrees.
    /// let shift = camera.shift(PolarSample::new(0.0, 640.0 / 3.0), 2.0);
    ///
    /// assert_approx_eq!(shift.x, 1.0, 1e-5);
    /// assert_approx_eq!(shift.y, 0.0, 1e-5);
    /// ```
    pub fn shift(&self, estimate: PolarSample, depth: f32) -> na::Vector2<f32> {
        self.view_angle(estimate.to_displacement())
            .map(|angle| depth * angle.sin())
    }
}
