extern crate erebos;
extern crate nalgebra as na;

use approx::assert_relative_eq;
use erebos::dynamics::gravity::{EARTH_EQ_RADIUS, EARTH_GM};
use erebos::dynamics::{AccelModel, AccelModelKind, Harmonics, PointMassGravity};
use erebos::math::coordinates::spherical_to_cartesian;
use erebos::math::SphericalHarmonicsCache;
use na::{DMatrix, Vector3};
use std::sync::Arc;

fn degree_zero_field() -> Harmonics {
    let cosine = DMatrix::from_element(1, 1, 1.0);
    let sine = DMatrix::from_element(1, 1, 0.0);
    Harmonics::try_new(EARTH_GM, EARTH_EQ_RADIUS, cosine, sine).unwrap()
}

#[test]
fn degree_zero_reproduces_point_mass() {
    let _ = pretty_env_logger::try_init();
    let field = degree_zero_field();
    let point_mass = PointMassGravity::new(EARTH_GM);
    let mut cache = SphericalHarmonicsCache::new(0, 0);

    for direction in [
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(-1.0, 0.2, 0.5),
        Vector3::new(0.3, -0.9, 0.1),
    ] {
        for radius in [6900.0e3, 7000.0e3, 42164.0e3] {
            let pos = radius * direction / direction.norm();
            let accel = field.acceleration(&pos, &mut cache).unwrap();
            let expected = -EARTH_GM / (radius * radius) * pos / radius;
            assert_relative_eq!(accel, expected, max_relative = 1e-12);
            let oracle = point_mass.eom(&pos, &mut cache).unwrap();
            assert_relative_eq!(accel, oracle, max_relative = 1e-12);
        }
    }
}

#[test]
fn degree_zero_follows_inverse_square_law() {
    let field = degree_zero_field();
    let mut cache = SphericalHarmonicsCache::new(0, 0);
    let pos = Vector3::new(4000.0e3, 5000.0e3, 3000.0e3);
    let near = field.acceleration(&pos, &mut cache).unwrap();
    let far = field.acceleration(&(2.0 * pos), &mut cache).unwrap();
    assert_relative_eq!(near.norm() / far.norm(), 4.0, max_relative = 1e-12);
}

#[test]
fn single_term_sum_matches_full_acceleration() {
    let field = Harmonics::egm96_4x4();
    let mut cache = SphericalHarmonicsCache::new(4, 4);
    let pos = Vector3::new(5000.0e3, -4000.0e3, 3000.0e3);

    let full = field.acceleration(&pos, &mut cache).unwrap();

    let mut summed = Vector3::zeros();
    for degree in 0..=field.degree() {
        for order in 0..=degree.min(field.order()) {
            let (c_nm, s_nm) = coefficient_pair(degree, order);
            summed += field
                .single_term_acceleration(&pos, degree, order, c_nm, s_nm, &mut cache)
                .unwrap();
        }
    }

    assert_relative_eq!(summed, full, max_relative = 1e-10);
}

/// The EGM96 coefficient pairs embedded in [`Harmonics::egm96_4x4`].
fn coefficient_pair(degree: usize, order: usize) -> (f64, f64) {
    match (degree, order) {
        (0, 0) => (1.0, 0.0),
        (2, 0) => (-0.484165371736e-03, 0.0),
        (2, 1) => (-0.186987635955e-09, 0.119528012031e-08),
        (2, 2) => (0.243914352398e-05, -0.140016683654e-05),
        (3, 0) => (0.957254173792e-06, 0.0),
        (3, 1) => (0.202998882184e-05, 0.248513158716e-06),
        (3, 2) => (0.904627768605e-06, -0.619025944205e-06),
        (3, 3) => (0.721072657057e-06, 0.141435626958e-05),
        (4, 0) => (0.539873863789e-06, 0.0),
        (4, 1) => (-0.536321616971e-06, -0.473440265853e-06),
        (4, 2) => (0.350694105785e-06, 0.662671572540e-06),
        (4, 3) => (0.990771803829e-06, -0.200928369177e-06),
        (4, 4) => (-0.188560802735e-06, 0.308853169333e-06),
        _ => (0.0, 0.0),
    }
}

#[test]
fn j2_equatorial_closed_form() {
    let field = Harmonics::j2_jgm3();
    let mut cache = SphericalHarmonicsCache::new(2, 0);
    let r = 7000.0e3;
    let accel = field
        .acceleration(&Vector3::new(r, 0.0, 0.0), &mut cache)
        .unwrap();

    let c20 = -4.84165374886470e-04;
    let expected_x = -EARTH_GM / (r * r)
        + 1.5 * 5.0_f64.sqrt() * EARTH_GM * EARTH_EQ_RADIUS * EARTH_EQ_RADIUS * c20 / r.powi(4);
    assert_relative_eq!(accel[0], expected_x, max_relative = 1e-12);
    assert!(accel[1].abs() < 1e-18);
    assert!(accel[2].abs() < 1e-18);
}

#[test]
fn j2_perturbation_matches_vallado_form() {
    // Difference between the J2 field and the pure point mass term must match
    // the textbook J2 perturbation at a general point.
    let field = Harmonics::j2_jgm3();
    let mut cache = SphericalHarmonicsCache::new(2, 0);
    let pos = Vector3::new(4000.0e3, 5000.0e3, 3000.0e3);
    let r = pos.norm();

    let total = field.acceleration(&pos, &mut cache).unwrap();
    let central = -EARTH_GM / (r * r * r) * pos;
    let j2_contrib = total - central;

    let j2 = 5.0_f64.sqrt() * 4.84165374886470e-04;
    let z_sq_ratio = (pos.z / r) * (pos.z / r);
    let factor = -1.5 * j2 * EARTH_GM * EARTH_EQ_RADIUS * EARTH_EQ_RADIUS / r.powi(5);
    let expected = Vector3::new(
        factor * pos.x * (1.0 - 5.0 * z_sq_ratio),
        factor * pos.y * (1.0 - 5.0 * z_sq_ratio),
        factor * pos.z * (3.0 - 5.0 * z_sq_ratio),
    );

    assert_relative_eq!(j2_contrib, expected, max_relative = 1e-6);
}

#[test]
fn acceleration_is_periodic_in_longitude() {
    let field = Harmonics::egm96_4x4();
    let mut cache = SphericalHarmonicsCache::new(4, 4);
    let (radius, colatitude, longitude) = (8000.0e3, 1.0, 0.73);

    let pos = spherical_to_cartesian(&Vector3::new(radius, colatitude, longitude));
    let wrapped = spherical_to_cartesian(&Vector3::new(
        radius,
        colatitude,
        longitude + 2.0 * std::f64::consts::PI,
    ));

    let accel = field.acceleration(&pos, &mut cache).unwrap();
    let accel_wrapped = field.acceleration(&wrapped, &mut cache).unwrap();
    assert_relative_eq!(accel, accel_wrapped, max_relative = 1e-12);
}

#[test]
fn nan_position_propagates() {
    let field = Harmonics::j2_jgm3();
    let mut cache = SphericalHarmonicsCache::new(2, 0);
    let accel = field.acceleration(&Vector3::zeros(), &mut cache).unwrap();
    assert!(accel.iter().all(|c| c.is_nan()), "{accel}");
}

#[test]
fn oversized_cache_is_accepted() {
    // A cache may serve any field up to its construction bounds.
    let field = Harmonics::j2_jgm3();
    let mut small = SphericalHarmonicsCache::new(2, 0);
    let mut large = SphericalHarmonicsCache::new(50, 50);
    let pos = Vector3::new(6378.0e3, 1000.0e3, -2000.0e3);
    let from_small = field.acceleration(&pos, &mut small).unwrap();
    let from_large = field.acceleration(&pos, &mut large).unwrap();
    assert_eq!(from_small, from_large);
}

#[test]
fn models_dispatch_by_kind() {
    let models: Vec<Box<dyn AccelModel>> = vec![
        Box::new(PointMassGravity::earth_jgm3()),
        Box::new(Harmonics::j2_jgm3()),
    ];
    let mut cache = SphericalHarmonicsCache::new(2, 0);
    let pos = Vector3::new(7000.0e3, 0.0, 0.0);
    for model in &models {
        // Total match over the closed set of kinds.
        let name = match model.kind() {
            AccelModelKind::PointMassGravity => "point mass gravity",
            AccelModelKind::SphericalHarmonicGravity => "spherical harmonic gravity",
        };
        assert_eq!(format!("{}", model.kind()), name);
        assert!(model.eom(&pos, &mut cache).is_ok());
    }
}

#[test]
fn concurrent_streams_each_own_a_cache() {
    let field = Arc::new(Harmonics::egm96_4x4());
    let pos = Vector3::new(5000.0e3, -4000.0e3, 3000.0e3);
    let mut reference_cache = SphericalHarmonicsCache::new(4, 4);
    let expected = field.acceleration(&pos, &mut reference_cache).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let field = field.clone();
            std::thread::spawn(move || {
                let mut cache = SphericalHarmonicsCache::new(4, 4);
                field.acceleration(&pos, &mut cache).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
