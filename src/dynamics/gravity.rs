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

use super::{AccelModel, AccelModelKind, DynamicsError};
use crate::linalg::Vector3;
use crate::math::SphericalHarmonicsCache;

use std::fmt;

/// Earth gravitational parameter from the JGM-3 model, in m^3/s^2.
pub const EARTH_GM: f64 = 3.986_004_415e14;
/// Earth equatorial radius from the JGM-3 model, in m.
pub const EARTH_EQ_RADIUS: f64 = 6_378_136.3;

/// `PointMassGravity` exposes the analytic central-body acceleration
/// -mu * r / |r|^3, equivalent to a spherical harmonic field truncated to its
/// degree zero term.
///
/// At the origin the acceleration is NaN (0/0) and propagates by policy.
#[derive(Clone, Copy, Debug)]
pub struct PointMassGravity {
    mu: f64,
}

impl PointMassGravity {
    /// Initializes the model from the gravitational parameter in m^3/s^2.
    pub fn new(mu: f64) -> Self {
        Self { mu }
    }

    /// Point mass Earth, using the embedded JGM-3 parameter.
    pub fn earth_jgm3() -> Self {
        Self::new(EARTH_GM)
    }

    /// Gravitational parameter of this model, in m^3/s^2.
    pub fn gm(&self) -> f64 {
        self.mu
    }
}

impl fmt::Display for PointMassGravity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "point mass gravity with GM = {} m^3/s^2", self.mu)
    }
}

impl AccelModel for PointMassGravity {
    fn kind(&self) -> AccelModelKind {
        AccelModelKind::PointMassGravity
    }

    fn eom(
        &self,
        position: &Vector3<f64>,
        _cache: &mut SphericalHarmonicsCache,
    ) -> Result<Vector3<f64>, DynamicsError> {
        let radius = position.norm();
        Ok(-self.mu / (radius * radius * radius) * position)
    }
}
