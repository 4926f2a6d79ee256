/*
    Erebos, spherical harmonic gravity for astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::linalg::Vector3;
use crate::math::{MathError, SphericalHarmonicsCache};
use snafu::Snafu;

use std::fmt;

/// Point mass (central body) gravity model.
pub mod gravity;
pub use self::gravity::PointMassGravity;

/// Spherical harmonic gravity field summation.
pub mod sph_harmonics;
pub use self::sph_harmonics::Harmonics;

/// The closed set of acceleration model kinds.
///
/// Model selection layers match on this tag instead of inspecting the concrete
/// type behind an [`AccelModel`] trait object, so dispatch is total.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccelModelKind {
    PointMassGravity,
    SphericalHarmonicGravity,
}

impl fmt::Display for AccelModelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PointMassGravity => write!(f, "point mass gravity"),
            Self::SphericalHarmonicGravity => write!(f, "spherical harmonic gravity"),
        }
    }
}

/// A trait for immutable models that return an acceleration at a Cartesian
/// position, in m/s^2.
///
/// The evaluation cache is owned by the caller and passed in mutably: models
/// update it for the requested point, and one cache instance must not be
/// shared between two concurrent evaluation streams.
pub trait AccelModel: Send + Sync + fmt::Display {
    /// The kind tag of this model, used for dispatch.
    fn kind(&self) -> AccelModelKind;

    /// Computes the acceleration at the provided position in meters.
    fn eom(
        &self,
        position: &Vector3<f64>,
        cache: &mut SphericalHarmonicsCache,
    ) -> Result<Vector3<f64>, DynamicsError>;
}

/// Acceleration model errors. All of these are fatal to the call that raised
/// them: the models never continue with partial or default values.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    #[snafu(display("reference radius must be strictly positive, got {reference_radius} m"))]
    NonPositiveReferenceRadius { reference_radius: f64 },
    #[snafu(display(
        "cosine coefficients are {cosine_rows}x{cosine_cols} but sine coefficients are {sine_rows}x{sine_cols}"
    ))]
    CoefficientDimensionsMismatch {
        cosine_rows: usize,
        cosine_cols: usize,
        sine_rows: usize,
        sine_cols: usize,
    },
    #[snafu(display("coefficient table must contain at least the degree zero term"))]
    EmptyCoefficientTable,
    #[snafu(display(
        "cache sized for degree {cache_degree} and order {cache_order} cannot serve a field of degree {degree} and order {order}"
    ))]
    InsufficientCacheResolution {
        cache_degree: usize,
        cache_order: usize,
        degree: usize,
        order: usize,
    },
    #[snafu(display("math error during acceleration evaluation: {source}"))]
    DynamicsMath { source: MathError },
}
