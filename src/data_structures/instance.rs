//! Instance transformation data for GPU rendering.
//!
//! An [`Instance`] places a unit mesh in the world: position, rotation and a
//! non-uniform scale that stretches the unit quad or cube to its real size.
//! Instances compose with `*`, so parts of a TV are described relative to
//! the TV body and multiplied by the body transform.

use std::ops::Mul;

use cgmath::{Euler, InnerSpace, Matrix3, Matrix4, One, Point3, Quaternion, Rad, Rotation, Vector3};

use crate::data_structures::model;

/// Per-instance transformation: position, rotation (as quaternion), and scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    /// Identity transformation.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Rotation given as XYZ Euler angles in radians (X applied last).
    pub fn from_euler_xyz(position: [f32; 3], rotation: [f32; 3]) -> Self {
        Self {
            position: position.into(),
            rotation: euler_xyz(rotation),
            ..Default::default()
        }
    }

    pub fn with_scale(self, x: f32, y: f32, z: f32) -> Self {
        Self {
            scale: Vector3::new(x, y, z),
            ..self
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Maps a world-space point into this instance's unscaled local frame.
    pub fn world_to_local(&self, point: Point3<f32>) -> Point3<f32> {
        let offset = Vector3::new(point.x, point.y, point.z) - self.position;
        let local = self.rotation.invert().rotate_vector(offset);
        Point3::new(local.x, local.y, local.z)
    }

    pub fn world_to_local_direction(&self, direction: Vector3<f32>) -> Vector3<f32> {
        self.rotation.invert().rotate_vector(direction)
    }

    /// Local `+Z` in world space.
    pub fn normal(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(Vector3::unit_z()).normalize()
    }

    /// `tint` is rgb + opacity, `emissive` rgb + intensity. Unlit instances
    /// skip the light uniform entirely.
    pub fn to_raw(&self, tint: [f32; 4], emissive: [f32; 4], lit: bool) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: Matrix3::from(self.rotation).into(),
            tint,
            emissive,
            lit: if lit { 1.0 } else { 0.0 },
        }
    }
}

/// Quaternion for XYZ Euler angles, matching `Rx * Ry * Rz`.
pub fn euler_xyz(rotation: [f32; 3]) -> Quaternion<f32> {
    Quaternion::from(Euler::new(
        Rad(rotation[0]),
        Rad(rotation[1]),
        Rad(rotation[2]),
    ))
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    /// `parent * child`: the child's transform expressed in the parent's frame.
    fn mul(self, rhs: &'b Instance) -> Self::Output {
        let scaled_rhs_pos = Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        Instance {
            position: self.position + self.rotation.rotate_vector(scaled_rhs_pos),
            rotation: self.rotation * rhs.rotation,
            scale: Vector3::new(
                self.scale.x * rhs.scale.x,
                self.scale.y * rhs.scale.y,
                self.scale.z * rhs.scale.z,
            ),
        }
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        &self * &rhs
    }
}

impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/**
 * The raw instance is the actual data stored on the GPU: the model matrix,
 * the rotation used for normals, the base colour (rgb + opacity), the
 * emissive colour (rgb + intensity) and whether lighting applies.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    tint: [f32; 4],
    emissive: [f32; 4],
    lit: f32,
}

impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance instead of once per vertex.
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // A mat4 takes up 4 vertex slots as it is technically 4 vec4s.
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 29]>() as wgpu::BufferAddress,
                    shader_location: 13,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 33]>() as wgpu::BufferAddress,
                    shader_location: 14,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
