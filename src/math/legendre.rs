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

use super::{CacheNotUpdatedSnafu, LegendreOutOfBoundsSnafu, MathError};
use crate::linalg::DMatrix;
use snafu::ensure;
use std::cmp::min;

/// Cache of geodesy-normalized associated Legendre polynomials and of their
/// first derivative with respect to the sine of the latitude.
///
/// The cache is built once for a maximum degree and order, and repopulated for
/// each evaluation point via [`LegendreCache::update`]. All normalization
/// constants depend only on degree and order, so they are computed at
/// construction and reused across updates. The recursion is an iterative
/// bottom-up table fill: the degree-direction three-term recurrence only ever
/// references entries of lower degree, which are filled first.
///
/// Getters are only valid for the most recently updated point; reading before
/// the first update is a usage error.
#[derive(Clone, Debug)]
pub struct LegendreCache {
    max_degree: usize,
    max_order: usize,
    /// Triangular value table, one order column wider than `max_order` so the
    /// derivative recurrence may reference order `max_order + 1`. Entries with
    /// order above the degree stay identically zero.
    values: DMatrix<f64>,
    derivatives: DMatrix<f64>,
    /// sqrt((2m + 1) / (2m)), the diagonal (sectoral) recurrence ratio.
    sectoral_ratios: Vec<f64>,
    /// sqrt(2m + 3), mapping the diagonal entry to the sub-diagonal one.
    subdiagonal_factors: Vec<f64>,
    /// Factor on the degree n-1 term of the three-term recurrence.
    degree_factors: DMatrix<f64>,
    /// Factor on the degree n-2 term of the three-term recurrence.
    degree_carry_factors: DMatrix<f64>,
    /// sqrt((n - m)(n + m + 1)), with the extra sqrt(1/2) at order zero,
    /// relating the order-incremented polynomial to the derivative.
    derivative_factors: DMatrix<f64>,
    updated: bool,
}

impl LegendreCache {
    /// Initializes the cache for all degrees and orders up to the provided
    /// bounds (inclusive), precomputing the point-independent constants.
    pub fn new(max_degree: usize, max_order: usize) -> Self {
        let order_cap = max_order + 1;
        let mut sectoral_ratios = vec![0.0; order_cap + 1];
        let mut subdiagonal_factors = vec![0.0; order_cap + 1];
        for (m, (sect, subd)) in sectoral_ratios
            .iter_mut()
            .zip(subdiagonal_factors.iter_mut())
            .enumerate()
        {
            let mf64 = m as f64;
            if m >= 2 {
                *sect = ((2.0 * mf64 + 1.0) / (2.0 * mf64)).sqrt();
            }
            *subd = (2.0 * mf64 + 3.0).sqrt();
        }

        let mut degree_factors = DMatrix::from_element(max_degree + 1, order_cap + 1, 0.0);
        let mut degree_carry_factors = DMatrix::from_element(max_degree + 1, order_cap + 1, 0.0);
        for n in 2..=max_degree {
            let nf64 = n as f64;
            for m in 0..=min(n - 2, order_cap) {
                let mf64 = m as f64;
                degree_factors[(n, m)] = (((2.0 * nf64 - 1.0) * (2.0 * nf64 + 1.0))
                    / ((nf64 - mf64) * (nf64 + mf64)))
                    .sqrt();
                degree_carry_factors[(n, m)] = (((2.0 * nf64 + 1.0)
                    * (nf64 + mf64 - 1.0)
                    * (nf64 - mf64 - 1.0))
                    / ((nf64 - mf64) * (nf64 + mf64) * (2.0 * nf64 - 3.0)))
                    .sqrt();
            }
        }

        let mut derivative_factors = DMatrix::from_element(max_degree + 1, max_order + 1, 0.0);
        for n in 0..=max_degree {
            let nf64 = n as f64;
            for m in 0..=min(n, max_order) {
                let mf64 = m as f64;
                let mut factor = ((nf64 - mf64) * (nf64 + mf64 + 1.0)).sqrt();
                if m == 0 {
                    factor *= 0.5_f64.sqrt();
                }
                derivative_factors[(n, m)] = factor;
            }
        }

        Self {
            max_degree,
            max_order,
            values: DMatrix::from_element(max_degree + 1, order_cap + 1, 0.0),
            derivatives: DMatrix::from_element(max_degree + 1, max_order + 1, 0.0),
            sectoral_ratios,
            subdiagonal_factors,
            degree_factors,
            degree_carry_factors,
            derivative_factors,
            updated: false,
        }
    }

    /// Maximum degree this cache can serve.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Maximum order this cache can serve.
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Recomputes the full triangular table of polynomial values and
    /// derivatives for the provided sine of the latitude.
    ///
    /// WARNING: at the exact poles (sine of latitude of ±1) the derivative
    /// entries are not finite, since the derivative recurrence divides by the
    /// cosine of the latitude. The polynomial values themselves remain exact.
    pub fn update(&mut self, sine_of_latitude: f64) {
        let x = sine_of_latitude;
        let u = (1.0 - x * x).sqrt();
        let order_cap = self.max_order + 1;
        let sqrt_3 = 3.0_f64.sqrt();

        // Closed-form seeds for degrees zero and one.
        self.values[(0, 0)] = 1.0;
        if self.max_degree >= 1 {
            self.values[(1, 0)] = sqrt_3 * x;
            self.values[(1, 1)] = sqrt_3 * u;
        }

        // Diagonal, then sub-diagonal, then the degree-direction recurrence.
        for m in 2..=min(self.max_degree, order_cap) {
            self.values[(m, m)] = self.sectoral_ratios[m] * u * self.values[(m - 1, m - 1)];
        }
        if self.max_degree >= 1 {
            for m in 0..=min(self.max_degree - 1, order_cap) {
                self.values[(m + 1, m)] = self.subdiagonal_factors[m] * x * self.values[(m, m)];
            }
        }
        for n in 2..=self.max_degree {
            for m in 0..=min(n - 2, order_cap) {
                self.values[(n, m)] = self.degree_factors[(n, m)] * x * self.values[(n - 1, m)]
                    - self.degree_carry_factors[(n, m)] * self.values[(n - 2, m)];
            }
        }

        // d P_nm / d(sin latitude), from the order-incremented identity. The
        // extra value column guarantees (n, m + 1) is always a stored entry.
        for n in 0..=self.max_degree {
            for m in 0..=min(n, self.max_order) {
                self.derivatives[(n, m)] = self.derivative_factors[(n, m)]
                    * self.values[(n, m + 1)]
                    / u
                    - (m as f64) * x / (u * u) * self.values[(n, m)];
            }
        }

        self.updated = true;
    }

    /// Returns the geodesy-normalized polynomial value for the most recently
    /// updated point. Entries with order above the degree are zero.
    pub fn legendre_polynomial(&self, degree: usize, order: usize) -> Result<f64, MathError> {
        self.check_bounds(degree, order)?;
        Ok(self.values[(degree, order)])
    }

    /// Returns the derivative with respect to the sine of the latitude for the
    /// most recently updated point.
    pub fn legendre_polynomial_derivative(
        &self,
        degree: usize,
        order: usize,
    ) -> Result<f64, MathError> {
        self.check_bounds(degree, order)?;
        Ok(self.derivatives[(degree, order)])
    }

    fn check_bounds(&self, degree: usize, order: usize) -> Result<(), MathError> {
        ensure!(self.updated, CacheNotUpdatedSnafu);
        ensure!(
            degree <= self.max_degree && order <= self.max_order,
            LegendreOutOfBoundsSnafu {
                degree,
                order,
                max_degree: self.max_degree,
                max_order: self.max_order,
            }
        );
        Ok(())
    }
}
