//! Mesh generation and per-frame triangle assembly

use glam::{Mat3, Mat4, Vec2, Vec3};
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::scene::{DISK_TORUS, PAD_SIZE, PLATFORM_SIZE, Scene, SceneLights};

/// Model-space vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Triangle list in model space
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
}

/// Box of the given size, each face split into `segments` x `segments` quads
///
/// Subdivision matters because lighting is evaluated per vertex.
pub fn cuboid(size: Vec3, uv_repeat: Vec2, segments: u32) -> Mesh {
    let h = size * 0.5;
    let segments = segments.max(1);
    // (normal, u axis, v axis) with u x v == normal so faces wind CCW from outside
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(6 * 6 * (segments * segments) as usize);
    for (normal, u_axis, v_axis) in faces {
        let center = normal * h;
        let u = u_axis * h;
        let v = v_axis * h;

        let corner = |i: u32, j: u32| {
            let s = i as f32 / segments as f32;
            let t = j as f32 / segments as f32;
            MeshVertex {
                position: center + u * (s * 2.0 - 1.0) + v * (t * 2.0 - 1.0),
                normal,
                uv: Vec2::new(s, t) * uv_repeat,
            }
        };

        for i in 0..segments {
            for j in 0..segments {
                let a = corner(i, j);
                let b = corner(i + 1, j);
                let c = corner(i + 1, j + 1);
                let d = corner(i, j + 1);
                vertices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
    }

    Mesh { vertices }
}

/// Torus around the z axis
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    let point = |j: u32, i: u32| {
        let u = i as f32 / tubular as f32 * TAU;
        let v = j as f32 / radial as f32 * TAU;
        let ring_center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
        let position = Vec3::new(
            (radius + tube * v.cos()) * u.cos(),
            (radius + tube * v.cos()) * u.sin(),
            tube * v.sin(),
        );
        MeshVertex {
            position,
            normal: (position - ring_center).normalize_or_zero(),
            uv: Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32),
        }
    };

    let mut vertices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = point(j, i - 1);
            let b = point(j - 1, i - 1);
            let c = point(j - 1, i);
            let d = point(j, i);
            vertices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh { vertices }
}

/// Which detail texture a batch samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// Brick normal map (platform, disks, backdrop)
    Brick,
    /// Pad texture
    Pad,
}

/// A run of triangles drawn with one material
#[derive(Debug, Clone)]
pub struct DrawBatch {
    pub material: Material,
    pub vertices: Vec<Vertex>,
}

/// Meshes shared by every frame
#[derive(Debug, Clone)]
pub struct SceneMeshes {
    pub platform: Mesh,
    pub pad: Mesh,
    pub disk: Mesh,
    /// Unit cube stretched over the backdrop model's bounds
    pub backdrop: Mesh,
}

impl Default for SceneMeshes {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneMeshes {
    pub fn new() -> Self {
        Self {
            platform: cuboid(PLATFORM_SIZE, Vec2::new(4.0, 20.0), 16),
            pad: cuboid(PAD_SIZE, Vec2::ONE, 2),
            disk: torus(DISK_TORUS.0, DISK_TORUS.1, 8, 24),
            backdrop: cuboid(Vec3::ONE, Vec2::new(2.0, 2.0), 6),
        }
    }
}

/// Per-frame projection and lighting context
pub struct FrameContext<'a> {
    pub view_proj: Mat4,
    pub lights: &'a SceneLights,
}

/// Transform, light and project a mesh into `out`
pub fn emit(
    mesh: &Mesh,
    model: Mat4,
    albedo: [f32; 3],
    detail: f32,
    ctx: &FrameContext,
    out: &mut Vec<Vertex>,
) {
    let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
    let albedo = Vec3::from(albedo);

    out.extend(mesh.vertices.iter().map(|v| {
        let world = model.transform_point3(v.position);
        let normal = (normal_matrix * v.normal).normalize_or_zero();
        let lit = ctx.lights.shade(world, normal, albedo);
        let clip = ctx.view_proj * world.extend(1.0);
        Vertex::new(clip.to_array(), lit.extend(1.0).to_array(), v.uv.to_array(), detail)
    }));
}

/// Assemble the frame's triangles in painter's order
///
/// There is no depth buffer: the backdrop and platform go first, then the pads,
/// then disks far to near.
pub fn scene_batches(
    scene: &Scene,
    meshes: &SceneMeshes,
    backdrop_fit: Mat4,
    aspect: f32,
) -> Vec<DrawBatch> {
    let ctx = FrameContext {
        view_proj: scene.camera.view_proj(aspect),
        lights: &scene.lights,
    };

    let mut ground = Vec::new();
    emit(
        &meshes.backdrop,
        scene.backdrop * backdrop_fit,
        colors::BACKDROP,
        0.0,
        &ctx,
        &mut ground,
    );
    emit(&meshes.platform, scene.platform, colors::PLATFORM, 1.0, &ctx, &mut ground);

    let mut pads = Vec::new();
    for pad in &scene.pads {
        let albedo = if pad.dark {
            colors::PAD_PRESSED
        } else {
            colors::PAD
        };
        emit(&meshes.pad, pad.transform, albedo, 1.0, &ctx, &mut pads);
    }

    let mut disks = Vec::new();
    for disk in &scene.disks {
        emit(&meshes.disk, disk.transform, colors::DISK, 1.0, &ctx, &mut disks);
    }

    vec![
        DrawBatch {
            material: Material::Brick,
            vertices: ground,
        },
        DrawBatch {
            material: Material::Pad,
            vertices: pads,
        },
        DrawBatch {
            material: Material::Brick,
            vertices: disks,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::build_scene;
    use crate::sim::{GameState, Lane};
    use crate::tuning::Tuning;

    /// Signed area of a triangle's projection onto the plane facing `normal`
    fn winding(a: Vec3, b: Vec3, c: Vec3, normal: Vec3) -> f32 {
        (b - a).cross(c - a).dot(normal)
    }

    #[test]
    fn test_cuboid_faces_wind_outward() {
        let mesh = cuboid(Vec3::new(2.0, 1.0, 3.0), Vec2::ONE, 2);
        assert_eq!(mesh.vertices.len(), 6 * 4 * 6);
        for tri in mesh.vertices.chunks(3) {
            let w = winding(tri[0].position, tri[1].position, tri[2].position, tri[0].normal);
            assert!(w > 0.0);
            // Every vertex lies on the face its normal points out of
            let extent = Vec3::new(1.0, 0.5, 1.5);
            assert!((tri[0].position.dot(tri[0].normal) - extent.dot(tri[0].normal.abs())).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus_shape() {
        let mesh = torus(10.0, 3.0, 8, 24);
        assert_eq!(mesh.vertices.len(), 8 * 24 * 6);
        for v in &mesh.vertices {
            assert!((v.normal.length() - 1.0).abs() < 1e-4);
            let ring = Vec3::new(v.position.x, v.position.y, 0.0).normalize() * 10.0;
            assert!(((v.position - ring).length() - 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_scene_batches() {
        let mut state = GameState::new(
            4,
            Tuning {
                spawn_chance: 0.0,
                ..Default::default()
            },
        );
        state.spawn_disk(Lane::Left);
        state.spawn_disk(Lane::Right);
        state.feedback.flash_pad(Lane::Left, 0.02);

        let meshes = SceneMeshes::new();
        let scene = build_scene(&state);
        let batches = scene_batches(&scene, &meshes, Mat4::IDENTITY, 16.0 / 9.0);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].material, Material::Brick);
        assert_eq!(
            batches[0].vertices.len(),
            meshes.backdrop.vertices.len() + meshes.platform.vertices.len()
        );
        assert_eq!(batches[1].material, Material::Pad);
        assert_eq!(batches[1].vertices.len(), 3 * meshes.pad.vertices.len());
        assert_eq!(batches[2].vertices.len(), 2 * meshes.disk.vertices.len());

        // The pressed (left) pad is drawn black
        let left_pad = &batches[1].vertices[..meshes.pad.vertices.len()];
        assert!(left_pad.iter().all(|v| v.color[..3] == [0.0, 0.0, 0.0]));
        let right_pad = &batches[1].vertices[2 * meshes.pad.vertices.len()..];
        assert!(right_pad.iter().any(|v| v.color[0] > 0.0));
    }
}
