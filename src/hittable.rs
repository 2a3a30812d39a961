use crate::{
    intersection::HitRecord,
    material::Material,
    ray::Ray,
    vec3::{Float, Point3},
};
use enum_dispatch::enum_dispatch;
use std::sync::Arc;

#[enum_dispatch]
pub trait Hit: Send + Sync {
    /// Nearest intersection with `t` strictly inside `(t_min, t_max)`, if any
    fn hit(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<HitRecord<'_>>;
}

#[enum_dispatch(Hit)]
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere,
}

#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Point3,
    /// A negative radius keeps the same surface but turns the normals inward,
    /// which makes a hollow bubble when nested inside a dielectric sphere
    pub radius: Float,
    pub material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Point3, radius: Float, material: Arc<Material>) -> Self {
        Sphere {
            center,
            radius,
            material,
        }
    }
}

impl Hit for Sphere {
    fn hit(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<HitRecord<'_>> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        // A ray that only grazes the surface doesn't count as a hit
        if discriminant <= 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let in_range = |t: Float| t_min < t && t < t_max;

        // Nearest root first, then the far one
        let mut t = (-half_b - sqrt_disc) / a;
        if !in_range(t) {
            t = (-half_b + sqrt_disc) / a;
            if !in_range(t) {
                return None;
            }
        }

        let point = ray.at(t);
        let outward_normal = (point - self.center) / self.radius;
        Some(HitRecord::new(ray, point, outward_normal, t, &self.material))
    }
}

/// Every primitive in the scene. Answers with the closest hit along a ray.
#[derive(Debug, Clone, Default)]
pub struct World {
    shapes: Vec<Shape>,
}

impl World {
    pub fn new() -> Self {
        World::default()
    }

    pub fn build(shapes: Vec<Shape>) -> Self {
        World { shapes }
    }

    pub fn add(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

impl Hit for World {
    fn hit(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<HitRecord<'_>> {
        // Shrink the far limit to the nearest hit so far, so anything behind it is skipped
        let mut nearest_t = t_max;
        let mut nearest_hit = None;

        for shape in self.shapes.iter() {
            if let Some(hit) = shape.hit(ray, t_min, nearest_t) {
                nearest_t = hit.t;
                nearest_hit = Some(hit);
            }
        }

        nearest_hit
    }
}
