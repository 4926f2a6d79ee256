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

use super::gravity::{EARTH_EQ_RADIUS, EARTH_GM};
use super::{
    AccelModel, AccelModelKind, CoefficientDimensionsMismatchSnafu, DynamicsError,
    DynamicsMathSnafu, EmptyCoefficientTableSnafu, InsufficientCacheResolutionSnafu,
    NonPositiveReferenceRadiusSnafu,
};
use crate::linalg::{DMatrix, Vector3};
use crate::math::coordinates::{cartesian_to_spherical, spherical_to_cartesian_gradient};
use crate::math::SphericalHarmonicsCache;
use snafu::{ensure, ResultExt};
use std::cmp::min;
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// A spherical harmonic gravity field defined by its gravitational parameter,
/// its equatorial reference radius, and geodesy-normalized cosine and sine
/// coefficient matrices (degree-major, order-minor).
///
/// Coefficients are used as provided: this engine performs no renormalization,
/// so the provider must supply them in the geodesy-normalized convention. Only
/// entries with order at most equal to the degree participate in the
/// summation; entries above the diagonal are ignored.
///
/// The evaluation caches are owned by the caller and passed to each call, so a
/// single field may be evaluated from several threads provided each thread
/// owns its cache.
#[derive(Clone, Debug)]
pub struct Harmonics {
    mu: f64,
    reference_radius: f64,
    cosine_coefficients: DMatrix<f64>,
    sine_coefficients: DMatrix<f64>,
}

impl Harmonics {
    /// Creates a field after validating its configuration: the reference
    /// radius must be strictly positive and finite, and both coefficient
    /// matrices must have the same, non-empty shape.
    pub fn try_new(
        mu: f64,
        reference_radius: f64,
        cosine_coefficients: DMatrix<f64>,
        sine_coefficients: DMatrix<f64>,
    ) -> Result<Self, DynamicsError> {
        ensure!(
            reference_radius > 0.0 && reference_radius.is_finite(),
            NonPositiveReferenceRadiusSnafu { reference_radius }
        );
        ensure!(
            cosine_coefficients.shape() == sine_coefficients.shape(),
            CoefficientDimensionsMismatchSnafu {
                cosine_rows: cosine_coefficients.nrows(),
                cosine_cols: cosine_coefficients.ncols(),
                sine_rows: sine_coefficients.nrows(),
                sine_cols: sine_coefficients.ncols(),
            }
        );
        ensure!(
            cosine_coefficients.nrows() > 0 && cosine_coefficients.ncols() > 0,
            EmptyCoefficientTableSnafu
        );

        let mut ignored = 0;
        for degree in 0..cosine_coefficients.nrows() {
            for order in (degree + 1)..cosine_coefficients.ncols() {
                if cosine_coefficients[(degree, order)] != 0.0
                    || sine_coefficients[(degree, order)] != 0.0
                {
                    ignored += 1;
                }
            }
        }
        if ignored > 0 {
            warn!("{ignored} nonzero coefficient entries have order above degree and are ignored by the summation");
        }
        info!(
            "spherical harmonic gravity field of degree {} and order {}",
            cosine_coefficients.nrows() - 1,
            cosine_coefficients.ncols() - 1
        );

        Ok(Self {
            mu,
            reference_radius,
            cosine_coefficients,
            sine_coefficients,
        })
    }

    /// Earth J<sub>2</sub>-only field using the JGM-3 model (available in GMAT).
    ///
    /// *WARNING:* this is an EARTH gravity model, and _should not_ be used
    /// around any other body.
    pub fn j2_jgm3() -> Self {
        let mut cosine = DMatrix::from_element(3, 1, 0.0);
        cosine[(0, 0)] = 1.0;
        cosine[(2, 0)] = -4.84165374886470e-04;
        let sine = DMatrix::from_element(3, 1, 0.0);
        Self::try_new(EARTH_GM, EARTH_EQ_RADIUS, cosine, sine)
            .expect("embedded J2 JGM3 coefficients are valid")
    }

    /// Earth J<sub>2</sub>-only field using the EGM2008 model.
    ///
    /// *WARNING:* this is an EARTH gravity model, and _should not_ be used
    /// around any other body.
    pub fn j2_egm2008() -> Self {
        let mut cosine = DMatrix::from_element(3, 1, 0.0);
        cosine[(0, 0)] = 1.0;
        cosine[(2, 0)] = -0.484165143790815e-03;
        let sine = DMatrix::from_element(3, 1, 0.0);
        Self::try_new(EARTH_GM, EARTH_EQ_RADIUS, cosine, sine)
            .expect("embedded J2 EGM2008 coefficients are valid")
    }

    /// Earth field to degree and order four, using the embedded EGM96
    /// normalized coefficients.
    ///
    /// *WARNING:* this is an EARTH gravity model, and _should not_ be used
    /// around any other body.
    pub fn egm96_4x4() -> Self {
        let mut cosine = DMatrix::from_element(5, 5, 0.0);
        let mut sine = DMatrix::from_element(5, 5, 0.0);
        cosine[(0, 0)] = 1.0;
        cosine[(2, 0)] = -0.484165371736e-03;
        cosine[(2, 1)] = -0.186987635955e-09;
        cosine[(2, 2)] = 0.243914352398e-05;
        cosine[(3, 0)] = 0.957254173792e-06;
        cosine[(3, 1)] = 0.202998882184e-05;
        cosine[(3, 2)] = 0.904627768605e-06;
        cosine[(3, 3)] = 0.721072657057e-06;
        cosine[(4, 0)] = 0.539873863789e-06;
        cosine[(4, 1)] = -0.536321616971e-06;
        cosine[(4, 2)] = 0.350694105785e-06;
        cosine[(4, 3)] = 0.990771803829e-06;
        cosine[(4, 4)] = -0.188560802735e-06;
        sine[(2, 1)] = 0.119528012031e-08;
        sine[(2, 2)] = -0.140016683654e-05;
        sine[(3, 1)] = 0.248513158716e-06;
        sine[(3, 2)] = -0.619025944205e-06;
        sine[(3, 3)] = 0.141435626958e-05;
        sine[(4, 1)] = -0.473440265853e-06;
        sine[(4, 2)] = 0.662671572540e-06;
        sine[(4, 3)] = -0.200928369177e-06;
        sine[(4, 4)] = 0.308853169333e-06;
        Self::try_new(EARTH_GM, EARTH_EQ_RADIUS, cosine, sine)
            .expect("embedded EGM96 coefficients are valid")
    }

    /// Gravitational parameter of this field, in m^3/s^2.
    pub fn gm(&self) -> f64 {
        self.mu
    }

    /// Equatorial reference radius of this field, in m.
    pub fn reference_radius(&self) -> f64 {
        self.reference_radius
    }

    /// Highest degree stored in the coefficient tables.
    pub fn degree(&self) -> usize {
        self.cosine_coefficients.nrows() - 1
    }

    /// Highest order stored in the coefficient tables.
    pub fn order(&self) -> usize {
        self.cosine_coefficients.ncols() - 1
    }

    /// Computes the full double-sum acceleration at the provided Cartesian
    /// position in meters, in m/s^2.
    ///
    /// The summation runs over the triangular region degree in
    /// `0..=self.degree()`, order in `0..=min(degree, self.order())`; the
    /// degree zero term reduces analytically to the point mass acceleration.
    /// A NaN or zero-radius position propagates NaN through the result rather
    /// than raising an error, matching downstream numerical pipelines.
    pub fn acceleration(
        &self,
        position: &Vector3<f64>,
        cache: &mut SphericalHarmonicsCache,
    ) -> Result<Vector3<f64>, DynamicsError> {
        self.check_cache_capacity(cache, self.degree(), min(self.degree(), self.order()))?;
        let spherical = update_cache_for(position, self.reference_radius, cache);
        let pre_multiplier = self.mu / self.reference_radius;

        let highest_degree = self.cosine_coefficients.nrows();
        let highest_order = self.cosine_coefficients.ncols();
        let mut spherical_gradient = Vector3::zeros();
        for degree in 0..highest_degree {
            for order in 0..=min(degree, highest_order - 1) {
                let legendre = cache
                    .legendre_cache()
                    .legendre_polynomial(degree, order)
                    .context(DynamicsMathSnafu)?;
                let legendre_derivative = cache
                    .legendre_cache()
                    .legendre_polynomial_derivative(degree, order)
                    .context(DynamicsMathSnafu)?;
                spherical_gradient += potential_gradient(
                    &spherical,
                    pre_multiplier,
                    degree,
                    order,
                    self.cosine_coefficients[(degree, order)],
                    self.sine_coefficients[(degree, order)],
                    legendre,
                    legendre_derivative,
                    cache,
                )?;
            }
        }

        Ok(spherical_to_cartesian_gradient(&spherical_gradient, position))
    }

    /// Computes the acceleration contributed by exactly one (degree, order)
    /// term with an explicit coefficient pair, e.g. for partial derivatives of
    /// the field with respect to an individual coefficient.
    ///
    /// The per-term spherical gradient comes from the same helper as the full
    /// sum, so summing this call over every stored coefficient pair reproduces
    /// [`Harmonics::acceleration`] up to the reordering of the final additions.
    pub fn single_term_acceleration(
        &self,
        position: &Vector3<f64>,
        degree: usize,
        order: usize,
        cosine_coefficient: f64,
        sine_coefficient: f64,
        cache: &mut SphericalHarmonicsCache,
    ) -> Result<Vector3<f64>, DynamicsError> {
        self.check_cache_capacity(cache, degree, order)?;
        let spherical = update_cache_for(position, self.reference_radius, cache);
        let pre_multiplier = self.mu / self.reference_radius;

        let legendre = cache
            .legendre_cache()
            .legendre_polynomial(degree, order)
            .context(DynamicsMathSnafu)?;
        let legendre_derivative = cache
            .legendre_cache()
            .legendre_polynomial_derivative(degree, order)
            .context(DynamicsMathSnafu)?;
        let spherical_gradient = potential_gradient(
            &spherical,
            pre_multiplier,
            degree,
            order,
            cosine_coefficient,
            sine_coefficient,
            legendre,
            legendre_derivative,
            cache,
        )?;

        Ok(spherical_to_cartesian_gradient(&spherical_gradient, position))
    }

    fn check_cache_capacity(
        &self,
        cache: &SphericalHarmonicsCache,
        degree: usize,
        order: usize,
    ) -> Result<(), DynamicsError> {
        ensure!(
            cache.max_degree() >= degree && cache.max_order() >= order,
            InsufficientCacheResolutionSnafu {
                cache_degree: cache.max_degree(),
                cache_order: cache.max_order(),
                degree,
                order,
            }
        );
        Ok(())
    }
}

impl fmt::Display for Harmonics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} spherical harmonic gravity field with GM = {} m^3/s^2",
            self.degree(),
            self.order(),
            self.mu
        )
    }
}

impl AccelModel for Harmonics {
    fn kind(&self) -> AccelModelKind {
        AccelModelKind::SphericalHarmonicGravity
    }

    fn eom(
        &self,
        position: &Vector3<f64>,
        cache: &mut SphericalHarmonicsCache,
    ) -> Result<Vector3<f64>, DynamicsError> {
        self.acceleration(position, cache)
    }
}

/// Converts the position to spherical coordinates, swaps the colatitude for
/// the elevation the summation works with, and updates the cache for that
/// point. Returns (radius, elevation, longitude).
fn update_cache_for(
    position: &Vector3<f64>,
    reference_radius: f64,
    cache: &mut SphericalHarmonicsCache,
) -> Vector3<f64> {
    let mut spherical = cartesian_to_spherical(position);
    spherical[1] = FRAC_PI_2 - spherical[1];
    cache.update(
        spherical[0],
        spherical[1].sin(),
        spherical[2],
        reference_radius,
    );
    spherical
}

/// Potential gradient (radial, elevation, azimuth) of a single geodesy
/// normalized term. Shared by the full summation and the single-term entry
/// point so both produce bit-identical per-term values.
#[allow(clippy::too_many_arguments)]
fn potential_gradient(
    spherical_position: &Vector3<f64>,
    pre_multiplier: f64,
    degree: usize,
    order: usize,
    cosine_coefficient: f64,
    sine_coefficient: f64,
    legendre_polynomial: f64,
    legendre_polynomial_derivative: f64,
    cache: &SphericalHarmonicsCache,
) -> Result<Vector3<f64>, DynamicsError> {
    let radius_power = cache
        .reference_radius_ratio_power(degree + 1)
        .context(DynamicsMathSnafu)?;
    let cosine_of_order_longitude = cache
        .cosine_of_multiple_longitude(order)
        .context(DynamicsMathSnafu)?;
    let sine_of_order_longitude = cache
        .sine_of_multiple_longitude(order)
        .context(DynamicsMathSnafu)?;
    let longitude_pair = cosine_coefficient * cosine_of_order_longitude
        + sine_coefficient * sine_of_order_longitude;

    Ok(Vector3::new(
        -pre_multiplier / spherical_position[0]
            * radius_power
            * (degree as f64 + 1.0)
            * legendre_polynomial
            * longitude_pair,
        pre_multiplier
            * radius_power
            * legendre_polynomial_derivative
            * spherical_position[1].cos()
            * longitude_pair,
        pre_multiplier
            * radius_power
            * (order as f64)
            * legendre_polynomial
            * (sine_coefficient * cosine_of_order_longitude
                - cosine_coefficient * sine_of_order_longitude),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::DynamicsError;
    use crate::math::MathError;

    #[test]
    fn rejects_non_positive_reference_radius() {
        let cosine = DMatrix::from_element(1, 1, 1.0);
        let sine = DMatrix::from_element(1, 1, 0.0);
        for bad in [0.0, -6378.137e3, f64::NAN] {
            assert!(matches!(
                Harmonics::try_new(EARTH_GM, bad, cosine.clone(), sine.clone()),
                Err(DynamicsError::NonPositiveReferenceRadius { .. })
            ));
        }
    }

    #[test]
    fn rejects_mismatched_coefficient_tables() {
        let cosine = DMatrix::from_element(3, 3, 0.0);
        let sine = DMatrix::from_element(3, 2, 0.0);
        assert_eq!(
            Harmonics::try_new(EARTH_GM, EARTH_EQ_RADIUS, cosine, sine).unwrap_err(),
            DynamicsError::CoefficientDimensionsMismatch {
                cosine_rows: 3,
                cosine_cols: 3,
                sine_rows: 3,
                sine_cols: 2,
            }
        );
    }

    #[test]
    fn rejects_undersized_cache() {
        let field = Harmonics::egm96_4x4();
        let mut cache = SphericalHarmonicsCache::new(2, 2);
        assert!(matches!(
            field.acceleration(&Vector3::new(7000.0e3, 0.0, 0.0), &mut cache),
            Err(DynamicsError::InsufficientCacheResolution {
                cache_degree: 2,
                cache_order: 2,
                degree: 4,
                order: 4,
            })
        ));
    }

    #[test]
    fn single_term_beyond_cache_is_out_of_bounds() {
        let field = Harmonics::j2_jgm3();
        let mut cache = SphericalHarmonicsCache::new(2, 2);
        let err = field
            .single_term_acceleration(&Vector3::new(7000.0e3, 0.0, 0.0), 3, 0, 1.0, 0.0, &mut cache)
            .unwrap_err();
        assert!(matches!(
            err,
            DynamicsError::InsufficientCacheResolution { .. }
        ));
    }

    #[test]
    fn stale_cache_is_reported_from_the_math_layer() {
        let cache = SphericalHarmonicsCache::new(2, 2);
        assert_eq!(
            cache.legendre_cache().legendre_polynomial(2, 0),
            Err(MathError::CacheNotUpdated)
        );
    }

    #[test]
    fn embedded_fields_are_valid() {
        assert_eq!(Harmonics::j2_jgm3().degree(), 2);
        assert_eq!(Harmonics::j2_jgm3().order(), 0);
        assert_eq!(Harmonics::egm96_4x4().degree(), 4);
        assert_eq!(Harmonics::egm96_4x4().order(), 4);
    }
}
