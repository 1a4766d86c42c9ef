//! Camera, projection and pointer rays.
//!
//! The camera looks down `-Z` and is oriented by a pitch (about X) and a yaw
//! (about Y) applied in X-then-Y order. [`CameraView`] combines it with a
//! [`Projection`] to turn normalised device coordinates into world-space
//! [`Ray`]s for picking. [`CameraRig`] drives the intro dolly and the gentle
//! pointer-following sway of the menu scene.

use cgmath::{
    EuclideanSpace, InnerSpace, Matrix, Matrix3, Matrix4, Point3, Rad, SquareMatrix, Vector2,
    Vector3, Vector4, perspective,
};
use instant::Duration;

use crate::config::CameraConfig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub pitch: Rad<f32>,
    pub yaw: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, P: Into<Rad<f32>>, Y: Into<Rad<f32>>>(
        position: V,
        pitch: P,
        yaw: Y,
    ) -> Self {
        Self {
            position: position.into(),
            pitch: pitch.into(),
            yaw: yaw.into(),
        }
    }

    pub fn rotation(&self) -> Matrix3<f32> {
        Matrix3::from_angle_x(self.pitch) * Matrix3::from_angle_y(self.yaw)
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation() * -Vector3::unit_z()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        // The inverse of a rotation is its transpose.
        Matrix4::from(self.rotation().transpose())
            * Matrix4::from_translation(-self.position.to_vec())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// OpenGL-style clip space, used for unprojecting pointer positions.
    pub fn calc_gl_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.calc_gl_matrix()
    }
}

/// Half-line `origin + t * direction` with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Anything that can shoot a ray through a point of the viewport.
pub trait RaySource {
    /// `ndc` is in `[-1, 1]²` with `+y` pointing up.
    fn ray_through(&self, ndc: Vector2<f32>) -> Ray;
}

/// A camera seen through a projection.
#[derive(Clone, Copy, Debug)]
pub struct CameraView<'a> {
    pub camera: &'a Camera,
    pub projection: &'a Projection,
}

impl RaySource for CameraView<'_> {
    fn ray_through(&self, ndc: Vector2<f32>) -> Ray {
        let view_proj = self.projection.calc_gl_matrix() * self.camera.calc_matrix();
        let Some(inverse) = view_proj.invert() else {
            log::warn!("Degenerate camera matrix, falling back to the view direction");
            return Ray::new(self.camera.position, self.camera.forward());
        };
        let far = inverse * Vector4::new(ndc.x, ndc.y, 0.5, 1.0);
        let target = Point3::from_homogeneous(far);
        Ray::new(self.camera.position, target - self.camera.position)
    }
}

/// Converts a cursor position in physical pixels into NDC.
pub fn pixel_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Vector2<f32> {
    let width = width.max(1) as f64;
    let height = height.max(1) as f64;
    Vector2::new(
        (x / width * 2.0 - 1.0) as f32,
        (-(y / height) * 2.0 + 1.0) as f32,
    )
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub rig: CameraRig,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// Quadratic ease-out, `t` in `[0, 1]`.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// Intro dolly from a start pose to a rest pose.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: Camera,
    to: Camera,
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    pub fn new(from: Camera, to: Camera, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: Duration) -> Camera {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            ease_out_quad(self.elapsed.as_secs_f32() / self.duration.as_secs_f32())
        };
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        Camera {
            position: Point3::from_vec(
                self.from.position.to_vec() + (self.to.position - self.from.position) * t,
            ),
            pitch: Rad(lerp(self.from.pitch.0, self.to.pitch.0)),
            yaw: Rad(lerp(self.from.yaw.0, self.to.yaw.0)),
        }
    }
}

/// Intro tween plus yaw that lazily follows the pointer.
#[derive(Clone, Copy, Debug)]
pub struct CameraRig {
    tween: Tween,
    target_yaw: Rad<f32>,
    sway_limit: Rad<f32>,
    damping: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        let from = Camera::new(config.start_position, Rad(config.start_pitch), Rad(0.0));
        let to = Camera::new(config.rest_position, Rad(config.rest_pitch), Rad(0.0));
        Self {
            tween: Tween::new(from, to, Duration::from_millis(config.intro_millis)),
            target_yaw: Rad(0.0),
            sway_limit: Rad(config.sway_limit_degrees.to_radians()),
            damping: config.sway_damping,
        }
    }

    pub fn start_pose(&self) -> Camera {
        self.tween.from
    }

    /// The view turns towards the pointer: right of centre is a negative yaw.
    pub fn follow_pointer(&mut self, ndc_x: f32) {
        self.target_yaw = Rad(-ndc_x.clamp(-1.0, 1.0) * self.sway_limit.0);
    }

    pub fn target_yaw(&self) -> Rad<f32> {
        self.target_yaw
    }

    pub fn intro_finished(&self) -> bool {
        self.tween.is_finished()
    }

    /// One frame of camera motion.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let yaw = camera.yaw;
        *camera = self.tween.advance(dt);
        let eased = yaw.0 + (self.target_yaw.0 - yaw.0) * self.damping;
        camera.yaw = Rad(eased.clamp(-self.sway_limit.0, self.sway_limit.0));
    }
}
