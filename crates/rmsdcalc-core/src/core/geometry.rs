//! Centroids, optimal superposition and RMSD of paired point sets.
//!
//! All routines are pure functions over slices of `Point3<f64>`; the i-th point of one set is
//! paired with the i-th point of the other. The Kabsch rotation is obtained from the singular
//! value decomposition of the cross-covariance matrix, with a determinant-sign correction so the
//! result is always a proper rotation and never a reflection.

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum GeometryError {
    #[error("Point set is empty; at least one point is required")]
    EmptyInput,

    #[error("Point sets differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Singular value decomposition of the covariance matrix did not produce U and V")]
    DegenerateDecomposition,
}

/// The optimal superposition of a mobile point set onto a reference set.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    /// RMSD after superposition.
    pub rmsd: f64,
    /// Rotation applied to the centered mobile points.
    pub rotation: Rotation3<f64>,
    /// Mobile points expressed in the reference frame.
    pub transformed: Vec<Point3<f64>>,
}

fn ensure_paired(p: &[Point3<f64>], q: &[Point3<f64>]) -> Result<(), GeometryError> {
    if p.len() != q.len() {
        return Err(GeometryError::LengthMismatch {
            left: p.len(),
            right: q.len(),
        });
    }
    if p.is_empty() {
        return Err(GeometryError::EmptyInput);
    }
    Ok(())
}

/// Arithmetic mean of the points.
pub fn centroid(points: &[Point3<f64>]) -> Result<Point3<f64>, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::EmptyInput);
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Ok(Point3::from(sum / points.len() as f64))
}

/// Subtracts `offset` from every point.
pub fn translate(points: &[Point3<f64>], offset: &Vector3<f64>) -> Vec<Point3<f64>> {
    points.iter().map(|p| p - offset).collect()
}

/// Moves a point set so that its centroid sits at the origin.
pub fn center(points: &[Point3<f64>]) -> Result<(Vec<Point3<f64>>, Point3<f64>), GeometryError> {
    let c = centroid(points)?;
    Ok((translate(points, &c.coords), c))
}

/// RMSD of two already-positioned point sets, without any superposition.
pub fn naive_rmsd(p: &[Point3<f64>], q: &[Point3<f64>]) -> Result<f64, GeometryError> {
    ensure_paired(p, q)?;
    let squared_dist_sum: f64 = p
        .iter()
        .zip(q.iter())
        .map(|(a, b)| (a - b).norm_squared())
        .sum();
    Ok((squared_dist_sum / p.len() as f64).sqrt())
}

fn covariance(p: &[Point3<f64>], q: &[Point3<f64>]) -> Matrix3<f64> {
    p.iter()
        .zip(q.iter())
        .fold(Matrix3::zeros(), |acc, (a, b)| acc + a.coords * b.coords.transpose())
}

// Returns (U, singular values, Vᵀ, d) for C = Pᵀ·Q, where d = sign(det(V·Uᵀ)).
fn decompose(
    p: &[Point3<f64>],
    q: &[Point3<f64>],
) -> Result<(Matrix3<f64>, Vector3<f64>, Matrix3<f64>, f64), GeometryError> {
    let svd = covariance(p, q).svd(true, true);
    let u = svd.u.ok_or(GeometryError::DegenerateDecomposition)?;
    let v_t = svd.v_t.ok_or(GeometryError::DegenerateDecomposition)?;
    let det = (v_t.transpose() * u.transpose()).determinant();
    let d = if det < 0.0 { -1.0 } else { 1.0 };
    Ok((u, svd.singular_values, v_t, d))
}

/// Optimal rotation taking the centered set `p` onto the centered set `q`.
///
/// Computes `C = Pᵀ·Q = U·S·Vᵀ` and returns `R = V·diag(1, 1, d)·Uᵀ` with
/// `d = sign(det(V·Uᵀ))`. Singular values are sorted in descending order, so the
/// correction flips the axis of the smallest one.
pub fn kabsch_rotation(
    p: &[Point3<f64>],
    q: &[Point3<f64>],
) -> Result<Rotation3<f64>, GeometryError> {
    ensure_paired(p, q)?;
    let (u, _, v_t, d) = decompose(p, q)?;

    let mut correction = Matrix3::identity();
    correction[(2, 2)] = d;

    let rotation_matrix = v_t.transpose() * correction * u.transpose();
    Ok(Rotation3::from_matrix_unchecked(rotation_matrix))
}

/// RMSD between `p` and `q` after optimal superposition.
///
/// Both sets are re-centered on their own centroids first (a no-op for centered input),
/// then `p` is explicitly rotated onto `q` and compared point by point.
pub fn kabsch_rmsd(p: &[Point3<f64>], q: &[Point3<f64>]) -> Result<f64, GeometryError> {
    ensure_paired(p, q)?;
    let (p_centered, _) = center(p)?;
    let (q_centered, _) = center(q)?;

    let rotation = kabsch_rotation(&p_centered, &q_centered)?;
    let rotated: Vec<Point3<f64>> = p_centered.iter().map(|point| rotation * point).collect();
    naive_rmsd(&rotated, &q_centered)
}

/// Same value as [`kabsch_rmsd`], computed from the singular values without rotating.
pub fn kabsch_rmsd_closed_form(p: &[Point3<f64>], q: &[Point3<f64>]) -> Result<f64, GeometryError> {
    ensure_paired(p, q)?;
    let (p_centered, _) = center(p)?;
    let (q_centered, _) = center(q)?;

    let (_, sigma, _, d) = decompose(&p_centered, &q_centered)?;
    let e0: f64 = p_centered
        .iter()
        .chain(q_centered.iter())
        .map(|point| point.coords.norm_squared())
        .sum();
    let residual = e0 - 2.0 * (sigma[0] + sigma[1] + d * sigma[2]);

    // Cancellation can leave a tiny negative residual for identical sets.
    Ok((residual.max(0.0) / p.len() as f64).sqrt())
}

/// Superposes `mobile` onto `reference`.
///
/// The returned points are `R·(m − c_mobile) + c_reference`, i.e. the mobile set expressed in
/// the reference frame.
pub fn superpose(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Result<Superposition, GeometryError> {
    ensure_paired(mobile, reference)?;
    let (mobile_centered, _) = center(mobile)?;
    let (reference_centered, reference_centroid) = center(reference)?;

    let rotation = kabsch_rotation(&mobile_centered, &reference_centered)?;
    let rotated: Vec<Point3<f64>> = mobile_centered
        .iter()
        .map(|point| rotation * point)
        .collect();
    let rmsd = naive_rmsd(&rotated, &reference_centered)?;
    let transformed = rotated
        .iter()
        .map(|point| point + reference_centroid.coords)
        .collect();

    Ok(Superposition {
        rmsd,
        rotation,
        transformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Unit;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-9;

    fn triangle() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn irregular() -> Vec<Point3<f64>> {
        vec![
            Point3::new(1.2, -0.4, 3.3),
            Point3::new(2.9, 1.1, -0.7),
            Point3::new(-1.5, 2.2, 0.4),
            Point3::new(0.3, -2.8, 1.9),
            Point3::new(4.1, 0.6, 2.5),
            Point3::new(-0.9, -1.3, -2.2),
        ]
    }

    fn perturbed() -> Vec<Point3<f64>> {
        vec![
            Point3::new(1.0, -0.1, 3.0),
            Point3::new(3.2, 1.0, -0.5),
            Point3::new(-1.1, 2.6, 0.1),
            Point3::new(0.7, -3.0, 2.4),
            Point3::new(3.8, 0.2, 2.9),
            Point3::new(-1.4, -1.0, -2.5),
        ]
    }

    fn transform(points: &[Point3<f64>], rotation: &Rotation3<f64>, shift: Vector3<f64>) -> Vec<Point3<f64>> {
        points.iter().map(|p| rotation * p + shift).collect()
    }

    fn arbitrary_rotation() -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::new(0.3, -1.0, 0.7)), 1.234)
    }

    #[test]
    fn centroid_is_mean_of_points() {
        let c = centroid(&triangle()).unwrap();
        assert!((c - Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).norm() < TOL);
    }

    #[test]
    fn centroid_of_single_point_is_the_point() {
        let p = Point3::new(4.0, -2.0, 7.5);
        assert_eq!(centroid(&[p]).unwrap(), p);
    }

    #[test]
    fn centroid_of_empty_set_fails() {
        assert_eq!(centroid(&[]), Err(GeometryError::EmptyInput));
    }

    #[test]
    fn translate_returns_new_points_and_leaves_input_untouched() {
        let points = triangle();
        let moved = translate(&points, &Vector3::new(1.0, 2.0, 3.0));

        assert_eq!(moved[1], Point3::new(0.0, -2.0, -3.0));
        assert_eq!(points, triangle());
    }

    #[test]
    fn center_puts_centroid_at_origin() {
        let (centered, c) = center(&irregular()).unwrap();
        assert!(centroid(&centered).unwrap().coords.norm() < TOL);
        assert!((c - centroid(&irregular()).unwrap()).norm() < TOL);
    }

    #[test]
    fn naive_rmsd_of_shifted_set_is_shift_length() {
        let p = triangle();
        let q = translate(&p, &Vector3::new(3.0, 4.0, 0.0));
        assert!((naive_rmsd(&p, &q).unwrap() - 5.0).abs() < TOL);
    }

    #[test]
    fn naive_rmsd_rejects_mismatched_lengths() {
        let result = naive_rmsd(&triangle(), &irregular());
        assert_eq!(result, Err(GeometryError::LengthMismatch { left: 3, right: 6 }));
    }

    #[test]
    fn naive_rmsd_rejects_empty_sets() {
        assert_eq!(naive_rmsd(&[], &[]), Err(GeometryError::EmptyInput));
    }

    #[test]
    fn kabsch_rmsd_of_set_with_itself_is_zero() {
        assert!(kabsch_rmsd(&irregular(), &irregular()).unwrap() < TOL);
        assert!(kabsch_rmsd(&triangle(), &triangle()).unwrap() < TOL);
    }

    #[test]
    fn kabsch_rmsd_of_single_point_pair_is_zero() {
        let p = [Point3::new(1.0, 2.0, 3.0)];
        let q = [Point3::new(-5.0, 0.5, 9.0)];
        assert!(kabsch_rmsd(&p, &q).unwrap() < TOL);
    }

    #[test]
    fn kabsch_rmsd_is_symmetric() {
        let forward = kabsch_rmsd(&irregular(), &perturbed()).unwrap();
        let backward = kabsch_rmsd(&perturbed(), &irregular()).unwrap();
        assert!(forward > 0.1);
        assert!((forward - backward).abs() < TOL);
    }

    #[test]
    fn kabsch_rmsd_is_rotation_and_translation_invariant() {
        let base = kabsch_rmsd(&irregular(), &perturbed()).unwrap();

        let moved = transform(&irregular(), &arbitrary_rotation(), Vector3::new(-7.0, 3.5, 12.0));
        let moved_model = translate(&perturbed(), &Vector3::new(100.0, -50.0, 25.0));

        assert!((kabsch_rmsd(&moved, &perturbed()).unwrap() - base).abs() < TOL);
        assert!((kabsch_rmsd(&irregular(), &moved_model).unwrap() - base).abs() < TOL);
    }

    #[test]
    fn kabsch_rmsd_never_exceeds_naive_rmsd() {
        let pairs = [
            (irregular(), perturbed()),
            (irregular(), transform(&perturbed(), &arbitrary_rotation(), Vector3::new(1.0, 1.0, 1.0))),
            (triangle(), vec![Point3::new(0.0, 0.0, 0.5), Point3::new(2.0, 0.0, 0.0), Point3::new(0.0, 0.8, 0.0)]),
        ];
        for (p, q) in pairs {
            assert!(kabsch_rmsd(&p, &q).unwrap() <= naive_rmsd(&p, &q).unwrap() + TOL);
        }
    }

    #[test]
    fn translated_triangle_aligns_perfectly() {
        let target = triangle();
        let model = translate(&target, &Vector3::new(-5.0, -5.0, -5.0));

        assert_eq!(model[0], Point3::new(5.0, 5.0, 5.0));
        assert!(kabsch_rmsd(&model, &target).unwrap() < TOL);
    }

    #[test]
    fn rotated_triangle_aligns_perfectly() {
        let target = triangle();
        let quarter_turn = Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let model = transform(&target, &quarter_turn, Vector3::new(2.5, -1.0, 8.0));

        assert!(naive_rmsd(&model, &target).unwrap() > 1.0);
        assert!(kabsch_rmsd(&model, &target).unwrap() < TOL);
    }

    #[test]
    fn kabsch_rotation_recovers_known_rotation() {
        let rotation = arbitrary_rotation();
        let (p, _) = center(&irregular()).unwrap();
        let q: Vec<_> = p.iter().map(|point| rotation * point).collect();

        let estimated = kabsch_rotation(&p, &q).unwrap();
        assert!((estimated.matrix() - rotation.matrix()).norm() < 1e-8);
    }

    #[test]
    fn kabsch_rotation_is_proper_for_mirror_images() {
        let (p, _) = center(&irregular()).unwrap();
        let mirrored: Vec<_> = p.iter().map(|point| Point3::new(point.x, point.y, -point.z)).collect();

        let rotation = kabsch_rotation(&p, &mirrored).unwrap();
        assert!((rotation.matrix().determinant() - 1.0).abs() < 1e-9);
        assert!((rotation.matrix() * rotation.matrix().transpose() - Matrix3::identity()).norm() < 1e-9);

        // A reflection would reach zero; the best proper rotation cannot.
        assert!(kabsch_rmsd(&p, &mirrored).unwrap() > 1e-3);
    }

    #[test]
    fn closed_form_matches_explicit_rotation() {
        let (p, _) = center(&irregular()).unwrap();
        let mirrored: Vec<_> = p.iter().map(|point| Point3::new(-point.x, point.y, point.z)).collect();
        let cases = [
            (irregular(), perturbed()),
            (irregular(), irregular()),
            (p.clone(), mirrored),
            (triangle(), transform(&triangle(), &arbitrary_rotation(), Vector3::new(0.0, 4.0, 0.0))),
        ];
        for (a, b) in cases {
            let explicit = kabsch_rmsd(&a, &b).unwrap();
            let closed = kabsch_rmsd_closed_form(&a, &b).unwrap();
            assert!(
                (explicit - closed).abs() < TOL,
                "explicit {} vs closed form {}",
                explicit,
                closed
            );
        }
    }

    #[test]
    fn kabsch_functions_reject_mismatched_lengths() {
        let expected = Err(GeometryError::LengthMismatch { left: 6, right: 3 });
        assert_eq!(kabsch_rmsd(&irregular(), &triangle()), expected);
        assert_eq!(kabsch_rmsd_closed_form(&irregular(), &triangle()), expected);
        assert!(matches!(
            kabsch_rotation(&irregular(), &triangle()),
            Err(GeometryError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn superpose_maps_mobile_into_reference_frame() {
        let reference = irregular();
        let mobile = transform(&reference, &arbitrary_rotation(), Vector3::new(10.0, -3.0, 6.0));

        let result = superpose(&mobile, &reference).unwrap();

        assert!(result.rmsd < TOL);
        for (moved, expected) in result.transformed.iter().zip(reference.iter()) {
            assert!((moved - expected).norm() < 1e-8);
        }
        assert!((naive_rmsd(&result.transformed, &reference).unwrap() - result.rmsd).abs() < TOL);
    }
}
