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

use snafu::Snafu;

/// Stateless Cartesian/spherical conversions for positions and gradients.
pub mod coordinates;

mod legendre;
pub use self::legendre::LegendreCache;

mod harmonics;
pub use self::harmonics::SphericalHarmonicsCache;

/// Errors raised by the math caches.
///
/// `CacheNotUpdated` indicates a caller protocol violation (reading before the
/// first `update`), whereas the out-of-bounds variants indicate a request
/// beyond the capacity the cache was built with.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MathError {
    #[snafu(display("cache queried before its first update call"))]
    CacheNotUpdated,
    #[snafu(display(
        "Legendre polynomial of degree {degree} and order {order} exceeds cache bounds ({max_degree}, {max_order})"
    ))]
    LegendreOutOfBounds {
        degree: usize,
        order: usize,
        max_degree: usize,
        max_order: usize,
    },
    #[snafu(display("radius ratio power {exponent} exceeds cached maximum of {max_exponent}"))]
    RadiusPowerOutOfBounds {
        exponent: usize,
        max_exponent: usize,
    },
    #[snafu(display("longitude multiple {order} exceeds cached maximum order of {max_order}"))]
    LongitudeMultipleOutOfBounds { order: usize, max_order: usize },
}
