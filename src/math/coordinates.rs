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

use crate::linalg::{Matrix3, Vector3};

/// Convert a Cartesian position to spherical coordinates, returned as
/// (radius, colatitude, longitude).
///
/// The colatitude is measured from the +z axis and lies in `[0, π]`; the
/// longitude is `atan2(y, x)` and lies in `(-π, π]`.
///
/// If the norm of the position is below machine epsilon, both angles are
/// defined as zero. This is the degenerate-origin convention, not an error.
pub fn cartesian_to_spherical(cartesian: &Vector3<f64>) -> Vector3<f64> {
    let radius = cartesian.norm();
    if radius < f64::EPSILON {
        Vector3::new(radius, 0.0, 0.0)
    } else {
        Vector3::new(
            radius,
            (cartesian.z / radius).acos(),
            cartesian.y.atan2(cartesian.x),
        )
    }
}

/// Convert spherical coordinates (radius, colatitude, longitude) to a
/// Cartesian position. Inverse of [`cartesian_to_spherical`].
pub fn spherical_to_cartesian(spherical: &Vector3<f64>) -> Vector3<f64> {
    let (radius, colatitude, longitude) = (spherical[0], spherical[1], spherical[2]);
    Vector3::new(
        radius * colatitude.sin() * longitude.cos(),
        radius * colatitude.sin() * longitude.sin(),
        radius * colatitude.cos(),
    )
}

/// Matrix by which to premultiply a spherical gradient vector to obtain the
/// Cartesian gradient, following the Vallado partials.
///
/// The spherical gradient is ordered (∂U/∂r, ∂U/∂φ, ∂U/∂λ) where φ is the
/// elevation measured from the xy-plane toward +z and λ the azimuth about +z.
///
/// On the polar axis (x² + y² negligible versus r²) the azimuth partial and
/// the off-axis elevation partials divide by zero; those entries are replaced
/// by their axis limit (zero) so that a gradient with no azimuthal content
/// converts cleanly. At the origin itself every entry is 0/0 and the resulting
/// NaN propagates to the caller by policy.
pub fn spherical_to_cartesian_gradient_matrix(cartesian: &Vector3<f64>) -> Matrix3<f64> {
    let (x, y, z) = (cartesian.x, cartesian.y, cartesian.z);
    let radius_sq = x * x + y * y + z * z;
    let radius = radius_sq.sqrt();
    let xy_sq = x * x + y * y;
    let xy_norm = xy_sq.sqrt();

    if xy_sq <= f64::EPSILON * radius_sq {
        // Polar axis: only the radial column survives for x and y, and the
        // elevation column of the z row vanishes with xy_norm.
        Matrix3::new(
            x / radius, 0.0, 0.0, //
            y / radius, 0.0, 0.0, //
            z / radius, 0.0, 0.0,
        )
    } else {
        Matrix3::new(
            x / radius,
            -x * z / (radius_sq * xy_norm),
            -y / xy_sq,
            y / radius,
            -y * z / (radius_sq * xy_norm),
            x / xy_sq,
            z / radius,
            xy_norm / radius_sq,
            0.0,
        )
    }
}

/// Convert a gradient with respect to spherical coordinates into the
/// equivalent Cartesian gradient at the provided Cartesian position.
///
/// The spherical gradient ordering is (∂U/∂r, ∂U/∂φ, ∂U/∂λ) with φ the
/// elevation from the xy-plane, λ the azimuth. See
/// [`spherical_to_cartesian_gradient_matrix`] for the degenerate-input policy.
pub fn spherical_to_cartesian_gradient(
    spherical_gradient: &Vector3<f64>,
    cartesian: &Vector3<f64>,
) -> Vector3<f64> {
    spherical_to_cartesian_gradient_matrix(cartesian) * spherical_gradient
}
