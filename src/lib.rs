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

/*! # erebos

[Erebos](https://en.wikipedia.org/wiki/Erebus): evaluation of the gravitational
acceleration of a central body whose potential is expanded in geodesy-normalized
spherical harmonics, at an arbitrary Cartesian field point.

All positions are in meters, gravitational parameters in m^3/s^2, and
accelerations in m/s^2. Evaluation caches are owned by the caller and reused
across calls to amortize allocations; see [`math::SphericalHarmonicsCache`].
*/

/// Coordinate transformations and the recursive special functions backing the harmonic summation.
pub mod math;

/// Acceleration models built on top of the math module, and the trait they share.
pub mod dynamics;

#[macro_use]
extern crate log;
extern crate nalgebra as na;

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

pub use self::dynamics::{AccelModel, AccelModelKind};
