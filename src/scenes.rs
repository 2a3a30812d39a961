use crate::{
    camera::Camera,
    hittable::{Sphere, World},
    material::{Dielectric, Lambertian, Material, Metal},
    vec3::{Color, Float, Point3, Vec3},
};
use itertools::iproduct;
use log::debug;
use rand::Rng;
use std::sync::Arc;

const GLASS_INDEX: Float = 1.5;

/// The book cover: a field of small random spheres around three large ones
pub fn random_scene<R: Rng + ?Sized>(rng: &mut R) -> World {
    let mut world = World::new();

    let ground: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)).into());
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    let radius = 0.2;
    let big_metal_clearance = Point3::new(4.0, radius, 0.0);
    let glass: Arc<Material> = Arc::new(Dielectric::new(GLASS_INDEX).into());

    for (a, b) in iproduct!(-11..11, -11..11) {
        let choose = rng.gen::<Float>();
        let center = Point3::new(
            a as Float + 0.9 * rng.gen::<Float>(),
            radius,
            b as Float + 0.9 * rng.gen::<Float>(),
        );

        // Don't put it too close to the big metal ball
        if (center - big_metal_clearance).length() <= 0.9 {
            continue;
        }

        let material: Arc<Material> = if choose < 0.8 {
            let albedo = Color::random(rng, 0.0, 1.0) * Color::random(rng, 0.0, 1.0);
            Arc::new(Lambertian::new(albedo).into())
        } else if choose < 0.95 {
            let albedo = Color::random(rng, 0.5, 1.0);
            let fuzz = rng.gen_range(0.0..0.5);
            Arc::new(Metal::new(albedo, fuzz).into())
        } else {
            glass.clone()
        };
        world.add(Sphere::new(center, radius, material));
    }

    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));

    let brown: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)).into());
    world.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown));

    let mirror: Arc<Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0).into());
    world.add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, mirror));

    debug!("Built cover scene with {} spheres", world.len());
    world
}

pub fn cover_camera(aspect_ratio: Float) -> Camera {
    let lookfrom = Vec3::new(13.0, 2.0, 3.0);
    let lookat = Vec3::new(0.0, 0.0, 0.0);
    Camera::new(
        lookfrom,
        lookat,
        Vec3::new(0.0, 1.0, 0.0),
        20.0,
        aspect_ratio,
        0.1,
        10.0,
    )
}

/// Diffuse, metal and glass side by side on a yellow ground. With `hollow` the glass ball
/// gets a negative-radius bubble inside it.
pub fn material_showcase(hollow: bool) -> World {
    let ground: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)).into());
    let center: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.3)).into());
    let metal: Arc<Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3).into());
    let glass: Arc<Material> = Arc::new(Dielectric::new(GLASS_INDEX).into());

    let mut world = World::new();
    world.add(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground));
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, center));
    world.add(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, metal));
    world.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass.clone()));
    if hollow {
        world.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass));
    }
    debug!("Built showcase scene with {} spheres", world.len());
    world
}

pub fn showcase_camera(aspect_ratio: Float) -> Camera {
    Camera::new(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 1.0, 0.0),
        90.0,
        aspect_ratio,
        0.0,
        1.0,
    )
}

/// A lone grey ball lit only by the sky
pub fn single_sphere() -> World {
    let grey: Arc<Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)).into());
    let mut world = World::new();
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey));
    world
}
