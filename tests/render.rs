use approx::assert_abs_diff_eq;
use glam::{Vec2, Vec3};
use marchtrace::camera::Camera;
use marchtrace::hittable::intersect;
use marchtrace::light::DirectionalLight;
use marchtrace::params::{RenderMode, RenderParameters};
use marchtrace::pathtracer::PathTracer;
use marchtrace::ray::Ray;
use marchtrace::renderer::{FrameInputs, FrameRenderer};
use marchtrace::scene::{GroundPlane, Scene, Surface};
use marchtrace::scene_builder::SphereGrid;
use marchtrace::skybox::UniformSky;
use marchtrace::sphere::Sphere;

const SIZE: u32 = 33;
const SKY: UniformSky = UniformSky(Vec3::new(0.1, 0.2, 0.3));

fn overhead_light() -> DirectionalLight {
    DirectionalLight::new(Vec3::NEG_Y, Vec3::ONE, 1.0).unwrap()
}

fn unit_sphere_scene() -> Scene {
    let sphere = Sphere::diffuse(Vec3::ZERO, 1.0, Vec3::new(0.9, 0.6, 0.3), 0.05);
    Scene::new(vec![sphere], None, overhead_light()).unwrap()
}

fn front_camera() -> Camera {
    Camera::look_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y, 40.0, 1.0).unwrap()
}

fn inputs<'a>(
    scene: &'a Scene,
    params: &'a RenderParameters,
    camera: &'a Camera,
    mode: RenderMode,
) -> FrameInputs<'a> {
    FrameInputs {
        scene,
        params,
        skybox: &SKY,
        camera,
        mode,
    }
}

#[test]
fn centre_ray_hits_front_of_unit_sphere() {
    let scene = unit_sphere_scene();
    let ray = front_camera()
        .primary_ray(Vec2::splat(SIZE as f32 / 2.0), SIZE, SIZE)
        .unwrap();
    let hit = intersect(&scene, &ray).unwrap().unwrap();

    assert_eq!(hit.surface, Surface::Sphere(0));
    assert_abs_diff_eq!(hit.distance, 4.0, epsilon = 1e-4);
    assert!(hit.normal.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    assert!(ray.direction.dot(hit.normal) < 0.0);
}

#[test]
fn upper_front_is_lit_and_bottom_is_dark() {
    let scene = unit_sphere_scene();
    let params = RenderParameters::default();
    let tracer = PathTracer::new(&scene, &params, &SKY);

    let toward_upper_front = Ray::try_new(Vec3::new(0.0, 3.0, -3.0), Vec3::new(0.0, -1.0, 1.0)).unwrap();
    let lit = intersect(&scene, &toward_upper_front).unwrap().unwrap();
    let lit_color = tracer.direct_light(&lit).unwrap();
    let cos_theta = std::f32::consts::FRAC_1_SQRT_2;
    assert!(lit_color.abs_diff_eq(Vec3::new(0.9, 0.6, 0.3) * cos_theta, 1e-4));

    let from_below = Ray::new(Vec3::new(0.0, -5.0, 0.0), Vec3::Y);
    let bottom = intersect(&scene, &from_below).unwrap().unwrap();
    assert!(bottom.normal.abs_diff_eq(Vec3::NEG_Y, 1e-4));
    assert_eq!(tracer.direct_light(&bottom).unwrap(), Vec3::ZERO);
}

#[test]
fn single_sample_without_bounces_is_direct_light() {
    let scene = unit_sphere_scene();
    let camera = front_camera();
    let params = RenderParameters {
        bounces: 0,
        samples_per_pixel: 1,
        ..RenderParameters::default()
    };
    let mut renderer = FrameRenderer::new();
    let frame = renderer
        .render(&inputs(&scene, &params, &camera, RenderMode::PathTrace), SIZE, SIZE)
        .unwrap();

    let tracer = PathTracer::new(&scene, &params, &SKY);
    for (x, y) in [(16, 16), (16, 12), (20, 16), (0, 0)] {
        let ray = camera
            .primary_ray(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), SIZE, SIZE)
            .unwrap();
        let expected = match intersect(&scene, &ray).unwrap() {
            Some(hit) => tracer.direct_light(&hit).unwrap() * params.albedo_strength,
            None => SKY.0,
        };
        let pixel = frame.get(x, y).unwrap();
        assert_eq!(pixel.truncate(), expected, "pixel ({x}, {y})");
        assert_eq!(pixel.w, 1.0);
    }
}

#[test]
fn frames_are_bit_identical_across_runs() {
    let scene = Scene::new(
        SphereGrid {
            count_x: 2,
            count_y: 2,
            count_z: 2,
            ..SphereGrid::default()
        }
        .spawn()
        .unwrap()
        .spheres_at(0.7),
        Some(GroundPlane::default()),
        DirectionalLight::default(),
    )
    .unwrap();
    let camera = Camera::look_at(Vec3::new(-4.0, 5.0, -6.0), Vec3::new(1.0, 1.5, 1.0), Vec3::Y, 60.0, 1.5).unwrap();
    let params = RenderParameters {
        samples_per_pixel: 4,
        seed: 42,
        ..RenderParameters::default()
    };

    for mode in [RenderMode::PathTrace, RenderMode::RayMarch] {
        let frame = inputs(&scene, &params, &camera, mode);
        let first = FrameRenderer::new().render(&frame, 24, 16).unwrap().clone();
        let second = FrameRenderer::new().render(&frame, 24, 16).unwrap().clone();
        assert_eq!(first, second, "{}", mode.as_str());
    }
}

#[test]
fn empty_scene_shows_only_sky() {
    let scene = Scene::new(Vec::new(), None, DirectionalLight::default()).unwrap();
    let camera = front_camera();
    let params = RenderParameters::default();

    for mode in [RenderMode::PathTrace, RenderMode::RayMarch] {
        let mut renderer = FrameRenderer::new();
        let frame = renderer.render(&inputs(&scene, &params, &camera, mode), 9, 7).unwrap();
        assert!(frame.pixels().iter().all(|p| p.truncate() == SKY.0), "{}", mode.as_str());
    }
}

#[test]
fn ray_march_sees_sky_above_and_lit_ground_below() {
    let scene = Scene::new(Vec::new(), Some(GroundPlane::default()), overhead_light()).unwrap();
    let camera = Camera::look_at(Vec3::new(0.0, 2.0, -5.0), Vec3::ZERO, Vec3::Y, 60.0, 1.0).unwrap();
    let params = RenderParameters::default();

    let mut renderer = FrameRenderer::new();
    let frame = renderer
        .render(&inputs(&scene, &params, &camera, RenderMode::RayMarch), SIZE, SIZE)
        .unwrap();

    assert_eq!(frame.get(16, 0).unwrap().truncate(), SKY.0);

    // Unshadowed ground under an overhead light: albedo * (ambient + 1) plus a highlight.
    let ground = frame.get(16, SIZE - 1).unwrap().truncate();
    let floor = params.albedo * 1.05;
    assert!(ground.cmpge(floor - Vec3::splat(1e-3)).all(), "{ground}");
}

#[test]
fn resizing_reallocates_and_keeps_rendering() {
    let scene = unit_sphere_scene();
    let camera = front_camera();
    let params = RenderParameters::default();
    let frame = inputs(&scene, &params, &camera, RenderMode::PathTrace);
    let mut renderer = FrameRenderer::new();

    renderer.render(&frame, 16, 16).unwrap();
    renderer.render(&frame, 16, 16).unwrap();
    assert_eq!(renderer.allocations(), 1);

    let resized = renderer.render(&frame, 32, 8).unwrap();
    assert_eq!(resized.dimensions(), (32, 8));
    assert_eq!(resized.pixels().len(), 256);
    assert_eq!(renderer.allocations(), 2);
}
