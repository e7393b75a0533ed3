//! # Polar Flow Estimation Library
//!
//! This library estimates a single dominant displacement vector from a set of tracked feature
//! correspondences between two frames. Displacements are converted into polar samples, clustered
//! by angular and magnitude proximity, and the best supported cluster is averaged into the
//! motion estimate.
//!
//! The easiest way to use the library is to import its prelude:
//!
//! ```
//! use polarflow::prelude::v1::*;
//! ```
//!
//! You may need [`nalgebra`](https://crates.io/crates/nalgebra) to make use of the functionality.

pub mod camera;
pub mod config;
pub mod error;
pub mod estimator;
pub mod polar;
pub mod proximity;

pub mod prelude {
    pub mod v1 {
        pub use crate::{
            camera::FrameCamera,
            config::{EstimatorConfig, Strategy},
            error::{Error, Result},
            estimator::Estimator,
            polar::{to_polar, to_polar_tracked, PolarSample, StatusFilter},
            proximity::{Margins, WrapRule},
        };
    }
}
