use crate::{
    ray::Ray,
    vec3::{unit_vector, Float, Point3, Vec3},
};
use rand::Rng;

/// Thin-lens camera. Everything is derived once in [`Camera::new`].
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: Float,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lookfrom: Point3,
        lookat: Point3,
        vup: Vec3,
        vertical_fov: Float, // degrees
        aspect_ratio: Float,
        aperture: Float,
        focus_distance: Float, // Distance from the lens to the plane of perfect focus
    ) -> Self {
        let h = (vertical_fov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Right handed basis, w points back toward the viewer
        let w = unit_vector(lookfrom - lookat);
        let u = unit_vector(vup.cross(w));
        let v = w.cross(u);

        // Viewport spans are placed on the focus plane
        let horizontal = u * (focus_distance * viewport_width);
        let vertical = v * (focus_distance * viewport_height);
        let lower_left_corner = lookfrom - horizontal / 2.0 - vertical / 2.0 - w * focus_distance;

        Camera {
            origin: lookfrom,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        }
    }

    /// Return a ray starting on the lens disk and passing through the point `(s, t)` of the
    /// viewport, where `(0, 0)` is the lower left corner and `(1, 1)` the upper right.
    pub fn get_ray<R: Rng + ?Sized>(&self, s: Float, t: Float, rng: &mut R) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = Vec3::random_in_unit_disk(rng) * self.lens_radius;
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO // pinhole, no blur
        };
        let origin = self.origin + offset;
        let target = self.lower_left_corner + self.horizontal * s + self.vertical * t;
        Ray::new(origin, target - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-9);
    }

    fn pinhole() -> Camera {
        Camera::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            2.0,
            0.0,
            1.0,
        )
    }

    #[test]
    fn test_center_ray() {
        let mut rng = StdRng::seed_from_u64(0);
        let ray = pinhole().get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert_vec_eq(ray.direction, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_corners() {
        let mut rng = StdRng::seed_from_u64(0);
        let camera = pinhole();
        // 90 degree fov: viewport is 2 high and 4 wide at distance 1
        assert_vec_eq(
            camera.get_ray(0.0, 0.0, &mut rng).direction,
            Vec3::new(-2.0, -1.0, -1.0),
        );
        assert_vec_eq(
            camera.get_ray(1.0, 1.0, &mut rng).direction,
            Vec3::new(2.0, 1.0, -1.0),
        );
    }

    #[test]
    fn test_basis() {
        let camera = Camera::new(
            Vec3::new(13.0, 2.0, 3.0),
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
            20.0,
            16.0 / 9.0,
            0.1,
            10.0,
        );
        assert_abs_diff_eq!(camera.u.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.v.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.u.dot(camera.v), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.u.dot(camera.w), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.v.dot(camera.w), 0.0, epsilon = 1e-12);
        assert_vec_eq(camera.w, unit_vector(Vec3::new(13.0, 2.0, 3.0)));
    }

    #[test]
    fn test_defocus_blur_converges_on_focus_plane() {
        let mut rng = StdRng::seed_from_u64(9);
        let focus_distance = 4.0;
        let camera = Camera::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            60.0,
            1.0,
            2.0,
            focus_distance,
        );
        let target = camera.get_ray(0.3, 0.6, &mut rng).at(1.0);
        let mut origins_moved = false;
        for _ in 0..50 {
            let ray = camera.get_ray(0.3, 0.6, &mut rng);
            // origin stays on the lens disk
            assert!(ray.origin.length() <= 1.0 + 1e-12);
            assert_abs_diff_eq!(ray.origin.z, 0.0, epsilon = 1e-12);
            origins_moved |= ray.origin != Vec3::ZERO;
            // every sample passes through the same point on the focus plane
            assert_vec_eq(ray.at(1.0), target);
        }
        assert!(origins_moved);
        assert_abs_diff_eq!(target.z, -focus_distance, epsilon = 1e-9);
    }
}
