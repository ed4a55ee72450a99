//! Sample points covering a rotated actuator disk.
//!
//! Points are laid out on a lattice in the disk plane with the grid's native
//! spacing, then rotated about the disk center.
//!
//! Sign conventions:
//! - positive yaw rotates toward `+z` about the vertical axis (Howland et al., 2022),
//!   so at 90° the disk's local `+y` direction points along world `-x`;
//! - positive tilt rotates toward `+y` about the horizontal axis (Bossuyt et al., 2021).
//!
//! Yaw is applied first and tilt acts on the yawed points.

use uom::{
    ConstZero,
    si::{angle::radian, f64::Angle},
};

use super::TurbineParams;

/// World-frame sample points on an actuator disk.
///
/// Every point carries equal weight in the kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoints {
    points: Vec<[f64; 3]>,
}

impl ControlPoints {
    /// Lays out points on an unyawed, untilted disk facing `+x`.
    ///
    /// The lattice spans `⌈R/dy⌉` steps of `dy` and `⌈R/dz⌉` steps of `dz` on
    /// each side of the center, and keeps only offsets strictly inside the
    /// rotor (`y² + z² < R²`). The center itself is always kept for `R > 0`.
    #[must_use]
    pub fn on_disk(center: [f64; 3], radius: f64, dy: f64, dz: f64) -> Self {
        let steps = |spacing: f64| (radius / spacing).ceil() as i64;
        let (ny, nz) = (steps(dy), steps(dz));
        let [xloc, yloc, zloc] = center;

        let mut points = Vec::new();
        for i in -ny..=ny {
            for j in -nz..=nz {
                let (y, z) = (i as f64 * dy, j as f64 * dz);
                if y * y + z * z < radius * radius {
                    points.push([xloc, yloc + y, zloc + z]);
                }
            }
        }

        Self { points }
    }

    /// Lays out and rotates the control points for a turbine.
    #[must_use]
    pub fn for_turbine(params: &TurbineParams, dy: f64, dz: f64) -> Self {
        Self::on_disk(params.position(), params.radius(), dy, dz).rotated(
            params.position(),
            params.yaw,
            params.tilt,
        )
    }

    /// Rotates the points about `center`, yaw first, then tilt.
    ///
    /// Zero yaw and tilt leave the points untouched.
    #[must_use]
    pub fn rotated(mut self, center: [f64; 3], yaw: Angle, tilt: Angle) -> Self {
        if yaw == Angle::ZERO && tilt == Angle::ZERO {
            return self;
        }

        let (sin_yaw, cos_yaw) = yaw.get::<radian>().sin_cos();
        let (sin_tilt, cos_tilt) = tilt.get::<radian>().sin_cos();
        let [xc, yc, zc] = center;

        for point in &mut self.points {
            let (dx, dy, dz) = (point[0] - xc, point[1] - yc, point[2] - zc);

            let dx_yawed = dx * cos_yaw - dy * sin_yaw;
            let dy_yawed = dx * sin_yaw + dy * cos_yaw;

            *point = [
                xc + dx_yawed * cos_tilt + dz * sin_tilt,
                yc + dy_yawed,
                zc - dx_yawed * sin_tilt + dz * cos_tilt,
            ];
        }

        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64; 3]> {
        self.points.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Axis-aligned bounds `(lower, upper)` of the points, or `None` if empty.
    #[must_use]
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(mut lo, mut hi), p| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
            (lo, hi)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::angle::degree;

    fn degrees(value: f64) -> Angle {
        Angle::new::<degree>(value)
    }

    #[test]
    fn lattice_stays_strictly_inside_the_rotor() {
        let points = ControlPoints::on_disk([1.0, 2.0, 3.0], 0.5, 0.05, 0.05);

        // 10 steps per radius, so this is the lattice-point count of a circle.
        assert_eq!(points.len(), 305);
        for p in points.iter() {
            assert_relative_eq!(p[0], 1.0);
            let r2 = (p[1] - 2.0).powi(2) + (p[2] - 3.0).powi(2);
            assert!(r2 < 0.25);
        }
        assert!(points.iter().any(|p| *p == [1.0, 2.0, 3.0]));
    }

    #[test]
    fn boundary_points_are_excluded() {
        // With spacing equal to the radius only the center is strictly inside.
        let points = ControlPoints::on_disk([0.0, 0.0, 0.0], 1.0, 1.0, 1.0);
        assert_eq!(points.as_slice(), &[[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn small_rotor_keeps_its_center() {
        let points = ControlPoints::on_disk([0.0, 0.0, 0.0], 0.01, 0.5, 0.5);
        assert_eq!(points.len(), 1);
        assert!(!points.is_empty());
    }

    #[test]
    fn zero_rotation_is_exact_identity() {
        let points = ControlPoints::on_disk([0.3, -0.7, 0.11], 0.5, 0.07, 0.03);
        let rotated = points
            .clone()
            .rotated([0.3, -0.7, 0.11], Angle::ZERO, Angle::ZERO);
        assert_eq!(rotated, points);
    }

    #[test]
    fn yaw_maps_local_y_onto_negative_x() {
        let points = ControlPoints {
            points: vec![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
        .rotated([0.0, 0.0, 0.0], degrees(90.0), Angle::ZERO);

        let [y_axis, z_axis] = [points.points[0], points.points[1]];
        assert_relative_eq!(y_axis[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(y_axis[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(y_axis[2], 0.0, epsilon = 1e-12);

        // Yaw leaves the vertical untouched.
        assert_eq!(z_axis, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn tilt_maps_local_z_onto_positive_x() {
        let points = ControlPoints {
            points: vec![[0.0, 0.0, 1.0]],
        }
        .rotated([0.0, 0.0, 0.0], Angle::ZERO, degrees(90.0));

        let p = points.points[0];
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn tilt_acts_on_yawed_points() {
        let center = [10.0, 5.0, 2.0];
        let points = ControlPoints {
            points: vec![[10.0, 6.0, 2.0]],
        }
        .rotated(center, degrees(90.0), degrees(90.0));

        // Yaw sends +y to -x, then tilt sends -x to +z.
        let p = points.points[0];
        assert_relative_eq!(p[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 5.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_preserves_distance_to_center() {
        let center = [2.0, 1.0, 0.5];
        let points = ControlPoints::on_disk(center, 0.5, 0.1, 0.1);
        let rotated = points.clone().rotated(center, degrees(-30.0), degrees(12.0));

        assert_eq!(rotated.len(), points.len());
        for (a, b) in points.iter().zip(rotated.iter()) {
            let dist = |p: &[f64; 3]| {
                ((p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2) + (p[2] - center[2]).powi(2))
                    .sqrt()
            };
            assert_relative_eq!(dist(a), dist(b), epsilon = 1e-12);
        }
    }

    #[test]
    fn bounds_cover_all_points() {
        let points = ControlPoints::on_disk([0.0, 0.0, 0.0], 0.5, 0.1, 0.1);
        let (lo, hi) = points.bounds().unwrap();
        assert_relative_eq!(lo[0], 0.0);
        assert_relative_eq!(hi[0], 0.0);
        assert_relative_eq!(lo[1], -0.4, epsilon = 1e-12);
        assert_relative_eq!(hi[2], 0.4, epsilon = 1e-12);

        let empty = ControlPoints { points: Vec::new() };
        assert_eq!(empty.bounds(), None);
    }
}
