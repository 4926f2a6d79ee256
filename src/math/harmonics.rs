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

use super::{
    CacheNotUpdatedSnafu, LegendreCache, LongitudeMultipleOutOfBoundsSnafu, MathError,
    RadiusPowerOutOfBoundsSnafu,
};
use snafu::ensure;

/// Point-dependent state shared by every term of a spherical harmonic
/// summation: the Legendre cache, the powers of the reference radius over the
/// current radius, and the cosines and sines of the longitude multiples.
///
/// One instance serves one evaluation stream. The instance is reused across
/// evaluation points by calling [`SphericalHarmonicsCache::update`] before
/// each new point; there is no implicit invalidation, and getters return the
/// values of the most recent update only.
#[derive(Clone, Debug)]
pub struct SphericalHarmonicsCache {
    legendre_cache: LegendreCache,
    /// (reference_radius / radius)^k for k in 0..=max_degree + 1.
    radius_ratio_powers: Vec<f64>,
    cosine_longitude_multiples: Vec<f64>,
    sine_longitude_multiples: Vec<f64>,
    updated: bool,
}

impl SphericalHarmonicsCache {
    /// Initializes the cache, sized for fields up to the provided maximum
    /// degree and order (inclusive).
    pub fn new(max_degree: usize, max_order: usize) -> Self {
        Self {
            legendre_cache: LegendreCache::new(max_degree, max_order),
            radius_ratio_powers: vec![0.0; max_degree + 2],
            cosine_longitude_multiples: vec![0.0; max_order + 1],
            sine_longitude_multiples: vec![0.0; max_order + 1],
            updated: false,
        }
    }

    /// Maximum degree this cache can serve.
    pub fn max_degree(&self) -> usize {
        self.legendre_cache.max_degree()
    }

    /// Maximum order this cache can serve.
    pub fn max_order(&self) -> usize {
        self.legendre_cache.max_order()
    }

    /// Recomputes every cached quantity for a new evaluation point. Must be
    /// called whenever the evaluation point changes.
    ///
    /// The longitude multiples are built from a single cosine/sine pair via
    /// the angle-addition recurrence rather than one trigonometric call per
    /// order. A radius of zero makes the ratio powers non-finite and the NaN
    /// propagates to the summation by policy.
    pub fn update(
        &mut self,
        radius: f64,
        sine_of_latitude: f64,
        longitude: f64,
        reference_radius: f64,
    ) {
        self.legendre_cache.update(sine_of_latitude);

        let ratio = reference_radius / radius;
        self.radius_ratio_powers[0] = 1.0;
        for k in 1..self.radius_ratio_powers.len() {
            self.radius_ratio_powers[k] = self.radius_ratio_powers[k - 1] * ratio;
        }

        let (sin_lon, cos_lon) = longitude.sin_cos();
        self.cosine_longitude_multiples[0] = 1.0;
        self.sine_longitude_multiples[0] = 0.0;
        for m in 1..self.cosine_longitude_multiples.len() {
            self.cosine_longitude_multiples[m] = self.cosine_longitude_multiples[m - 1] * cos_lon
                - self.sine_longitude_multiples[m - 1] * sin_lon;
            self.sine_longitude_multiples[m] = self.sine_longitude_multiples[m - 1] * cos_lon
                + self.cosine_longitude_multiples[m - 1] * sin_lon;
        }

        self.updated = true;
    }

    /// Read access to the owned Legendre cache.
    pub fn legendre_cache(&self) -> &LegendreCache {
        &self.legendre_cache
    }

    /// Returns (reference_radius / radius)^exponent for the current point.
    pub fn reference_radius_ratio_power(&self, exponent: usize) -> Result<f64, MathError> {
        ensure!(self.updated, CacheNotUpdatedSnafu);
        ensure!(
            exponent < self.radius_ratio_powers.len(),
            RadiusPowerOutOfBoundsSnafu {
                exponent,
                max_exponent: self.radius_ratio_powers.len() - 1,
            }
        );
        Ok(self.radius_ratio_powers[exponent])
    }

    /// Returns cos(order * longitude) for the current point.
    pub fn cosine_of_multiple_longitude(&self, order: usize) -> Result<f64, MathError> {
        ensure!(self.updated, CacheNotUpdatedSnafu);
        ensure!(
            order <= self.max_order(),
            LongitudeMultipleOutOfBoundsSnafu {
                order,
                max_order: self.max_order(),
            }
        );
        Ok(self.cosine_longitude_multiples[order])
    }

    /// Returns sin(order * longitude) for the current point.
    pub fn sine_of_multiple_longitude(&self, order: usize) -> Result<f64, MathError> {
        ensure!(self.updated, CacheNotUpdatedSnafu);
        ensure!(
            order <= self.max_order(),
            LongitudeMultipleOutOfBoundsSnafu {
                order,
                max_order: self.max_order(),
            }
        );
        Ok(self.sine_longitude_multiples[order])
    }
}
