use cgmath::{Deg, InnerSpace, Point3, Rad, Vector2, Vector3};
use crt_menu::{
    camera::{Camera, CameraRig, CameraView, Projection, RaySource, ease_out_quad, pixel_to_ndc},
    config::CameraConfig,
};
use instant::Duration;

use crate::common::test_utils::{approx_eq, fixed_camera};

mod common;

#[test]
fn centre_ray_follows_the_view_direction() {
    let camera = Camera::new((1.0, 2.0, 3.0), Deg(-10.0), Deg(25.0));
    let projection = Projection::new(1280, 720, Deg(75.0), 0.1, 1000.0);
    let view = CameraView {
        camera: &camera,
        projection: &projection,
    };

    let ray = view.ray_through(Vector2::new(0.0, 0.0));
    let forward = camera.forward();
    assert_eq!(ray.origin, camera.position);
    assert!(approx_eq(ray.direction.magnitude(), 1.0));
    assert!(ray.direction.dot(forward) > 0.9999);
}

#[test]
fn rays_spread_with_the_field_of_view() {
    let (camera, projection) = fixed_camera();
    let view = CameraView {
        camera: &camera,
        projection: &projection,
    };

    let ray = view.ray_through(Vector2::new(0.5, -0.25));
    let at_depth_two = ray.at(2.0 / -ray.direction.z);
    assert!(approx_eq(at_depth_two.x, 1.0));
    assert!(approx_eq(at_depth_two.y, -0.5));
    assert!(approx_eq(at_depth_two.z, -2.0));
}

#[test]
fn forward_of_an_unrotated_camera_is_negative_z() {
    let camera = Camera::new((0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
    let forward = camera.forward();
    assert!(approx_eq(forward.x, 0.0));
    assert!(approx_eq(forward.y, 0.0));
    assert!(approx_eq(forward.z, -1.0));
}

#[test]
fn pixels_map_to_device_coordinates() {
    let top_left = pixel_to_ndc(0.0, 0.0, 800, 600);
    assert_eq!(top_left, Vector2::new(-1.0, 1.0));
    let bottom_right = pixel_to_ndc(800.0, 600.0, 800, 600);
    assert_eq!(bottom_right, Vector2::new(1.0, -1.0));
    let centre = pixel_to_ndc(400.0, 300.0, 800, 600);
    assert_eq!(centre, Vector2::new(0.0, 0.0));
}

#[test]
fn easing_starts_fast_and_settles() {
    assert_eq!(ease_out_quad(0.0), 0.0);
    assert_eq!(ease_out_quad(0.5), 0.75);
    assert_eq!(ease_out_quad(1.0), 1.0);
    assert_eq!(ease_out_quad(2.0), 1.0);
}

#[test]
fn intro_dolly_reaches_the_rest_pose() {
    let config = CameraConfig::default();
    let mut rig = CameraRig::new(&config);
    let mut camera = rig.start_pose();
    assert_eq!(camera.position, Point3::from(config.start_position));
    assert_eq!(camera.pitch, Rad(config.start_pitch));

    rig.update(&mut camera, Duration::from_millis(config.intro_millis / 2));
    assert!(!rig.intro_finished());
    let start = Vector3::from(config.start_position);
    let rest = Vector3::from(config.rest_position);
    let halfway = start + (rest - start) * 0.75;
    assert!(approx_eq(camera.position.z, halfway.z));
    assert!(approx_eq(camera.pitch.0, config.start_pitch * 0.25));

    rig.update(&mut camera, Duration::from_millis(config.intro_millis));
    assert!(rig.intro_finished());
    assert!(approx_eq(camera.position.x, config.rest_position[0]));
    assert!(approx_eq(camera.position.y, config.rest_position[1]));
    assert!(approx_eq(camera.position.z, config.rest_position[2]));
    assert!(approx_eq(camera.pitch.0, config.rest_pitch));
}

#[test]
fn sway_follows_the_pointer_within_limits() {
    let config = CameraConfig::default();
    let limit = config.sway_limit_degrees.to_radians();
    let mut rig = CameraRig::new(&config);
    let mut camera = rig.start_pose();

    rig.follow_pointer(1.0);
    assert!(approx_eq(rig.target_yaw().0, -limit));
    rig.update(&mut camera, Duration::from_millis(16));
    assert!(camera.yaw.0 < 0.0);
    assert!(camera.yaw.0 > -limit);

    // Beyond the viewport edge the target stays clamped.
    rig.follow_pointer(-5.0);
    assert!(approx_eq(rig.target_yaw().0, limit));
    for _ in 0..600 {
        rig.update(&mut camera, Duration::from_millis(16));
        assert!(camera.yaw.0.abs() <= limit + 1e-6);
    }
    assert!(approx_eq(camera.yaw.0, limit));
}
