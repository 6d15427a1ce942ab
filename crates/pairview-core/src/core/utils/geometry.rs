use nalgebra::{Matrix3, Point3, Rotation3, SymmetricEigen, Unit, Vector3};

/// Result of a least-squares rigid superposition mapping template
/// coordinates onto observed coordinates.
#[derive(Debug, Clone)]
pub struct Superposition {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
    pub rmsd: f64,
}

impl Superposition {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }
}

/// Kabsch superposition of `template` onto `observed` (same length, ≥ 3,
/// non-degenerate). Returns `None` when the problem is under-determined.
pub fn superpose(template: &[Point3<f64>], observed: &[Point3<f64>]) -> Option<Superposition> {
    if template.len() != observed.len() || template.len() < 3 {
        return None;
    }
    let n = template.len() as f64;

    let template_centroid = centroid(template);
    let observed_centroid = centroid(observed);

    let mut cross_covariance = Matrix3::zeros();
    for (t, o) in template.iter().zip(observed.iter()) {
        let a = t - template_centroid;
        let b = o - observed_centroid;
        cross_covariance += a * b.transpose();
    }

    let svd = cross_covariance.svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;
    let v = v_t.transpose();

    let d = (v * u.transpose()).determinant().signum();
    let correction = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, d));
    let rotation_matrix = v * correction * u.transpose();
    let rotation = Rotation3::from_matrix_unchecked(rotation_matrix);

    let translation = observed_centroid.coords - rotation * template_centroid.coords;

    let mut sum_sq = 0.0;
    for (t, o) in template.iter().zip(observed.iter()) {
        let mapped = rotation * t + translation;
        sum_sq += (mapped - o).norm_squared();
    }
    let rmsd = (sum_sq / n).sqrt();

    Some(Superposition {
        rotation,
        translation,
        rmsd,
    })
}

pub fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    let mut sum = Vector3::zeros();
    for p in points {
        sum += p.coords;
    }
    Point3::from(sum / points.len().max(1) as f64)
}

/// Best-fit plane through a point set: centroid plus unit normal (the
/// eigenvector of the smallest covariance eigenvalue). `None` below 3 points.
pub fn plane_fit(points: &[Point3<f64>]) -> Option<(Point3<f64>, Unit<Vector3<f64>>)> {
    if points.len() < 3 {
        return None;
    }
    let center = centroid(points);
    let mut covariance = Matrix3::zeros();
    for p in points {
        let d = p - center;
        covariance += d * d.transpose();
    }
    let eigen = SymmetricEigen::new(covariance);
    let mut min_index = 0;
    for i in 1..3 {
        if eigen.eigenvalues[i] < eigen.eigenvalues[min_index] {
            min_index = i;
        }
    }
    let normal = eigen.eigenvectors.column(min_index).into_owned();
    Some((center, Unit::new_normalize(normal)))
}

/// Angle at `vertex` formed by `a` and `c`, in degrees.
pub fn angle_deg(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let va = a - vertex;
    let vc = c - vertex;
    let denom = va.norm() * vc.norm();
    if denom == 0.0 {
        return 0.0;
    }
    let cos = (va.dot(&vc) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Signed dihedral angle for the chain `p1-p2-p3-p4`, degrees in
/// `(-180, 180]`.
pub fn dihedral_deg(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let m1 = n1.cross(&(b2.normalize()));

    let x = n1.dot(&n2);
    let y = m1.dot(&n2);
    y.atan2(x).to_degrees()
}

/// Unsigned angle between two direction vectors folded into `[0, 90]`
/// degrees (plane-vs-plane comparisons ignore normal polarity).
pub fn plane_angle_deg(n1: &Vector3<f64>, n2: &Vector3<f64>) -> f64 {
    let denom = n1.norm() * n2.norm();
    if denom == 0.0 {
        return 0.0;
    }
    let cos = (n1.dot(n2).abs() / denom).clamp(0.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn superpose_recovers_a_pure_rotation() {
        let template = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let shift = Vector3::new(3.0, -1.0, 2.0);
        let observed: Vec<_> = template.iter().map(|p| rotation * p + shift).collect();

        let fit = superpose(&template, &observed).unwrap();
        assert!(fit.rmsd < 1e-9);
        for (t, o) in template.iter().zip(observed.iter()) {
            assert!((fit.apply(t) - o).norm() < 1e-9);
        }
    }

    #[test]
    fn superpose_does_not_mirror() {
        let template = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        // Mirror image: no proper rotation maps it exactly, so rmsd stays
        // visibly non-zero and the returned matrix is a proper rotation.
        let observed: Vec<_> = template
            .iter()
            .map(|p| Point3::new(-p.x, p.y, p.z))
            .collect();
        let fit = superpose(&template, &observed).unwrap();
        assert!((fit.rotation.matrix().determinant() - 1.0).abs() < 1e-9);
        assert!(fit.rmsd > 0.1);
    }

    #[test]
    fn superpose_rejects_degenerate_input() {
        let points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(superpose(&points, &points).is_none());
        let three = vec![Point3::origin(); 3];
        let four = vec![Point3::origin(); 4];
        assert!(superpose(&three, &four).is_none());
    }

    #[test]
    fn plane_fit_finds_the_xy_plane() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let (center, normal) = plane_fit(&points).unwrap();
        assert!(close(center.z, 0.0));
        assert!(close(normal.z.abs(), 1.0));
    }

    #[test]
    fn angle_at_vertex() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let vertex = Point3::origin();
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!(close(angle_deg(&a, &vertex, &c), 90.0));
    }

    #[test]
    fn dihedral_of_a_planar_cis_chain_is_zero() {
        let p1 = Point3::new(1.0, 1.0, 0.0);
        let p2 = Point3::new(1.0, 0.0, 0.0);
        let p3 = Point3::new(2.0, 0.0, 0.0);
        let p4 = Point3::new(2.0, 1.0, 0.0);
        assert!(dihedral_deg(&p1, &p2, &p3, &p4).abs() < 1e-9);
    }

    #[test]
    fn dihedral_of_a_planar_trans_chain_is_180() {
        let p1 = Point3::new(1.0, 1.0, 0.0);
        let p2 = Point3::new(1.0, 0.0, 0.0);
        let p3 = Point3::new(2.0, 0.0, 0.0);
        let p4 = Point3::new(2.0, -1.0, 0.0);
        assert!(close(dihedral_deg(&p1, &p2, &p3, &p4).abs(), 180.0));
    }

    #[test]
    fn plane_angle_folds_to_ninety() {
        let n1 = Vector3::new(0.0, 0.0, 1.0);
        let n2 = Vector3::new(0.0, 0.0, -1.0);
        assert!(close(plane_angle_deg(&n1, &n2), 0.0));
        let n3 = Vector3::new(1.0, 0.0, 0.0);
        assert!(close(plane_angle_deg(&n1, &n3), 90.0));
    }
}
