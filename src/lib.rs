//! MarchTrace sphere renderer
//!
//! Renders a scene of spheres, an optional ground plane and one directional
//! light in one of two modes:
//! - ray marching over a signed distance field, with soft shadows and glow
//! - path tracing with analytic intersections and metal reflections
//!
//! Frames are rendered in parallel on the CPU into a cached float frame buffer
//! and can be written as PNG or EXR.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod hittable;
pub mod interval;
pub mod light;
pub mod marcher;
pub mod material;
pub mod output;
pub mod params;
pub mod pathtracer;
pub mod random;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod scene_builder;
pub mod sdf;
pub mod skybox;
pub mod sphere;

pub use error::{RenderError, Result};
