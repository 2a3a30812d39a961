pub mod camera;
pub mod cli;
pub mod hittable;
pub mod intersection;
pub mod material;
pub mod output;
pub mod ray;
pub mod renderer;
pub mod scenes;
pub mod vec3;
