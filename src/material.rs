use crate::{
    intersection::HitRecord,
    ray::Ray,
    vec3::{unit_vector, Color, Float, Vec3},
};
use enum_dispatch::enum_dispatch;
use rand::{Rng, RngCore};

#[enum_dispatch]
pub trait Scatter: Send + Sync {
    /// Decides whether the incoming ray continues past `hit`.
    ///
    /// `None` means the ray was absorbed. Otherwise returns the attenuation to apply to the light
    /// carried back along the scattered ray, and the scattered ray itself.
    fn scatter(
        &self,
        ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<(Color, Ray)>;
}

/// Closed set of surface behaviours. Shared between primitives behind an `Arc`.
#[enum_dispatch(Scatter)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Lambertian,
    Metal,
    Dielectric,
}

/// Mirror `incoming_direction` about the plane with normal `surface_normal`
pub fn reflect(incoming_direction: Vec3, surface_normal: Vec3) -> Vec3 {
    // Subtract twice the component of the incoming direction along the normal
    incoming_direction - surface_normal * (2.0 * incoming_direction.dot(surface_normal))
}

/// Snell's law. Expects `incoming_direction` to be a unit vector and the normal to face it.
pub fn refract(incoming_direction: Vec3, surface_normal: Vec3, refractive_ratio: Float) -> Vec3 {
    let cos_theta = (-incoming_direction.dot(surface_normal)).min(1.0);
    let r_out_perp = (incoming_direction + surface_normal * cos_theta) * refractive_ratio;
    // abs() keeps rounding error near grazing angles out of sqrt's domain
    let r_out_parallel = surface_normal * -((1.0 - r_out_perp.length_squared()).abs().sqrt());
    r_out_perp + r_out_parallel
}

/// Returns Schlick's approximation for reflectance at a given angle.
pub fn reflectance(cosine: Float, refractive_ratio: Float) -> Float {
    let r0 = (1.0 - refractive_ratio) / (1.0 + refractive_ratio);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    pub albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Lambertian { albedo }
    }
}

impl Scatter for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<(Color, Ray)> {
        // A sample that almost cancels the normal is left as is
        let scatter_dir = hit.normal + Vec3::random_unit_vector(rng);
        Some((self.albedo, Ray::new(hit.point, scatter_dir)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    pub albedo: Color,
    /// Radius of the sphere the reflected direction is perturbed within, in `[0, 1]`
    pub fuzz: Float,
}

impl Metal {
    pub fn new(albedo: Color, fuzz: Float) -> Self {
        Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Scatter for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<(Color, Ray)> {
        let reflected = reflect(unit_vector(ray_in.direction), hit.normal)
            + Vec3::random_in_unit_sphere(rng) * self.fuzz;
        // Fuzz can push the ray back under the surface, in which case it's absorbed
        if reflected.dot(hit.normal) > 0.0 {
            Some((self.albedo, Ray::new(hit.point, reflected)))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// refractive index over the refractive index of the enclosing media
    pub refraction_index: Float,
}

impl Dielectric {
    pub fn new(refraction_index: Float) -> Self {
        Dielectric { refraction_index }
    }
}

impl Scatter for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<(Color, Ray)> {
        let ri = if hit.is_front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = unit_vector(ray_in.direction);
        let cos_theta = (-unit_direction.dot(hit.normal)).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        let cannot_refract = ri * sin_theta > 1.0;

        let direction = if cannot_refract || reflectance(cos_theta, ri) > rng.gen::<Float>() {
            reflect(unit_direction, hit.normal)
        } else {
            refract(unit_direction, hit.normal, ri)
        };
        Some((Color::ONE, Ray::new(hit.point, direction)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn assert_vec_eq(a: Vec3, b: Vec3, epsilon: Float) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = epsilon);
        assert_abs_diff_eq!(a.y, b.y, epsilon = epsilon);
        assert_abs_diff_eq!(a.z, b.z, epsilon = epsilon);
    }

    fn hit_at_origin<'a>(ray: &Ray, material: &'a Material) -> HitRecord<'a> {
        HitRecord::new(ray, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 1.0, material)
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(reflect(v, n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let v = Vec3::new(0.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert_vec_eq(refract(v, n, 1.0 / 1.5), v, 1e-12);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let v = unit_vector(Vec3::new(1.0, -1.0, 0.0));
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = refract(v, n, 1.0 / 1.5);
        assert_abs_diff_eq!(r.length(), 1.0, epsilon = 1e-12);
        // sin of the refracted angle shrinks by the ratio
        assert_abs_diff_eq!(r.x, v.x / 1.5, epsilon = 1e-12);
        assert!(r.y < v.y);
    }

    #[test]
    fn test_reflectance() {
        // head on, glass reflects about 4%
        assert_abs_diff_eq!(reflectance(1.0, 1.5), 0.04, epsilon = 1e-12);
        // grazing, everything reflects
        assert_abs_diff_eq!(reflectance(0.0, 1.5), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reflectance(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_lambertian() {
        let mut rng = StdRng::seed_from_u64(1);
        let albedo = Color::new(0.2, 0.4, 0.6);
        let material: Material = Lambertian::new(albedo).into();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = hit_at_origin(&ray, &material);
        for _ in 0..100 {
            let (attenuation, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
            assert_eq!(attenuation, albedo);
            assert_eq!(scattered.origin, hit.point);
            // normal plus a unit vector never points below the surface
            assert!(scattered.direction.dot(hit.normal) >= 0.0);
        }
    }

    #[test]
    fn test_metal_mirror() {
        let mut rng = StdRng::seed_from_u64(2);
        let material: Material = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0).into();
        let incoming = unit_vector(Vec3::new(1.0, -2.0, 0.5));
        let ray = Ray::new(Vec3::new(-1.0, 2.0, -0.5), incoming);
        let hit = hit_at_origin(&ray, &material);
        let (attenuation, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
        assert_eq!(attenuation, Color::new(0.8, 0.8, 0.8));
        assert_vec_eq(scattered.direction, reflect(incoming, hit.normal), 1e-12);
        assert_eq!(scattered.origin, hit.point);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz, 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz, 0.0);
    }

    #[test]
    fn test_metal_absorbs_rays_pushed_under_surface() {
        let mut rng = StdRng::seed_from_u64(3);
        let material: Material = Metal::new(Color::ONE, 1.0).into();
        // grazing incidence, fuzz will often push the reflection below the surface
        let ray = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let hit = hit_at_origin(&ray, &material);
        let mut absorbed = 0;
        for _ in 0..200 {
            match material.scatter(&ray, &hit, &mut rng) {
                Some((_, scattered)) => assert!(scattered.direction.dot(hit.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_index_one_passes_through() {
        let mut rng = StdRng::seed_from_u64(4);
        let material: Material = Dielectric::new(1.0).into();
        for incoming in [
            Vec3::new(0.0, -1.0, 0.0),
            unit_vector(Vec3::new(0.3, -1.0, 0.1)),
            unit_vector(Vec3::new(-0.2, -1.0, -0.2)),
        ] {
            let ray = Ray::new(Vec3::ZERO - incoming, incoming);
            let hit = hit_at_origin(&ray, &material);
            let (attenuation, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
            assert_eq!(attenuation, Color::ONE);
            assert_vec_eq(scattered.direction, incoming, 1e-9);
        }
    }

    #[test]
    fn test_dielectric_index_one_grazing_reflects_or_passes_through() {
        let mut rng = StdRng::seed_from_u64(6);
        let material: Material = Dielectric::new(1.0).into();
        // about 3 degrees above the surface, where Schlick still reflects most rays
        let incoming = unit_vector(Vec3::new(1.0, -0.0524, 0.0));
        let ray = Ray::new(Vec3::ZERO - incoming, incoming);
        let hit = hit_at_origin(&ray, &material);
        let reflected = reflect(incoming, hit.normal);

        let (mut straight, mut mirrored) = (0, 0);
        for _ in 0..1000 {
            let (_, scattered) = material.scatter(&ray, &hit, &mut rng).unwrap();
            let direction = scattered.direction;
            if (direction - incoming).length() < 1e-9 {
                straight += 1;
            } else {
                // never bent, only mirrored
                assert_vec_eq(direction, reflected, 1e-9);
                mirrored += 1;
            }
        }
        assert!(straight > 0);
        assert!(mirrored > straight);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(5);
        let material: Material = Dielectric::new(1.5).into();
        // leaving glass at 60 degrees from the normal: 1.5 * sin(60) > 1
        let incoming = unit_vector(Vec3::new(3.0_f64.sqrt(), 1.0, 0.0));
        let ray = Ray::new(Vec3::ZERO - incoming, incoming);
        let rec = HitRecord::new(&ray, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 1.0, &material);
        assert!(!rec.is_front_face);
        for _ in 0..20 {
            let (_, scattered) = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_vec_eq(scattered.direction, reflect(incoming, rec.normal), 1e-12);
        }
    }
}
