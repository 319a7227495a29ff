//! Scene description derived from the simulation
//!
//! Pure data: world transforms, camera and lights for one frame. The renderer
//! turns this into triangles; nothing here touches the GPU.

use glam::{Mat4, Vec3};

use crate::hex_to_rgb;
use crate::sim::{Feedback, GameState, Lane};

/// Tilt of the platform (and pads) about the x axis, radians
pub const PLATFORM_TILT: f32 = 0.4;
/// Platform box extents (width, thickness, length)
pub const PLATFORM_SIZE: Vec3 = Vec3::new(4.0, 0.1, 20.0);
/// Height disks ride above the platform's centerline
pub const DISK_RIDE_HEIGHT: f32 = 0.2;
/// Torus dimensions before scaling (ring radius, tube radius)
pub const DISK_TORUS: (f32, f32) = (10.0, 3.0);
pub const DISK_SCALE: f32 = 0.035;
/// Disk tilt about x, world space
pub const DISK_TILT: f32 = 2.0;
/// Pad box extents
pub const PAD_SIZE: Vec3 = Vec3::new(0.8, 0.05, 0.8);
/// Pad height and depth; x comes from the lane
pub const PAD_Y: f32 = -1.2;
pub const PAD_Z: f32 = 3.0;

/// Positions of the six coloured point lights (three per side)
pub const LIGHT_POSITIONS: [Vec3; 6] = [
    Vec3::new(-3.0, 0.0, 1.0),
    Vec3::new(-3.0, 1.5, -2.0),
    Vec3::new(-3.0, 3.0, -4.0),
    Vec3::new(3.0, 0.0, 1.0),
    Vec3::new(3.0, 1.5, -2.0),
    Vec3::new(3.0, 3.0, -4.0),
];
pub const POINT_LIGHT_INTENSITY: f32 = 2.0;
pub const POINT_LIGHT_RANGE: f32 = 100.0;

/// White panel light washing the backdrop
pub const AREA_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 8.3, -11.0);
pub const AREA_LIGHT_TARGET: Vec3 = Vec3::new(0.0, 5.7, -11.8);

const AMBIENT: f32 = 0.08;
const POINT_FALLOFF: f32 = 0.12;

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view, radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Combined projection * view for the given aspect ratio
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), self.near, self.far);
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        proj * view
    }
}

/// A coloured point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

/// All lights for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLights {
    pub points: [PointLight; 6],
    /// Direction the area light shines in (unit)
    pub area_direction: Vec3,
    pub area_intensity: f32,
}

impl SceneLights {
    /// Lights coloured by the current feedback state
    pub fn from_feedback(feedback: &Feedback) -> Self {
        let points = std::array::from_fn(|i| PointLight {
            position: LIGHT_POSITIONS[i],
            color: Vec3::from(hex_to_rgb(feedback.light_colors[i])),
            intensity: POINT_LIGHT_INTENSITY,
            range: POINT_LIGHT_RANGE,
        });
        Self {
            points,
            area_direction: (AREA_LIGHT_TARGET - AREA_LIGHT_POSITION).normalize(),
            area_intensity: 1.0,
        }
    }

    /// Diffuse lighting at a surface point
    pub fn shade(&self, position: Vec3, normal: Vec3, albedo: Vec3) -> Vec3 {
        let mut light = Vec3::splat(AMBIENT);

        for point in &self.points {
            let to_light = point.position - position;
            let dist = to_light.length();
            if dist <= f32::EPSILON || dist > point.range {
                continue;
            }
            let lambert = normal.dot(to_light / dist).max(0.0);
            let falloff = 1.0 / (1.0 + POINT_FALLOFF * dist * dist);
            light += point.color * point.intensity * lambert * falloff;
        }

        let area_lambert = normal.dot(-self.area_direction).max(0.0);
        light += Vec3::ONE * self.area_intensity * area_lambert * 0.5;

        (albedo * light).min(Vec3::ONE)
    }
}

/// A lane pad and whether it is flashing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadInstance {
    pub lane: Lane,
    pub transform: Mat4,
    pub dark: bool,
}

/// A disk ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskInstance {
    pub id: u32,
    pub transform: Mat4,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: Camera,
    pub lights: SceneLights,
    pub platform: Mat4,
    pub pads: [PadInstance; 3],
    /// Far to near, for painter's ordering
    pub disks: Vec<DiskInstance>,
    pub backdrop: Mat4,
}

/// Platform model matrix (origin-centred, tilted toward the camera)
pub fn platform_transform() -> Mat4 {
    Mat4::from_rotation_x(PLATFORM_TILT)
}

/// World position of a point riding the platform at lateral `x`, travel `distance`
pub fn disk_world_position(x: f32, distance: f32) -> Vec3 {
    platform_transform().transform_point3(Vec3::new(x, DISK_RIDE_HEIGHT, distance))
}

pub fn disk_transform(x: f32, distance: f32) -> Mat4 {
    Mat4::from_translation(disk_world_position(x, distance))
        * Mat4::from_rotation_x(DISK_TILT)
        * Mat4::from_scale(Vec3::splat(DISK_SCALE))
}

pub fn pad_transform(x: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, PAD_Y, PAD_Z)) * Mat4::from_rotation_x(PLATFORM_TILT)
}

/// Placement of the backdrop model (before fitting its own bounds)
pub fn backdrop_transform() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 3.7, -10.0))
        * Mat4::from_rotation_y(1.6)
        * Mat4::from_rotation_z(0.5)
        * Mat4::from_scale(Vec3::splat(0.3))
}

/// Build the frame's scene from the game state
pub fn build_scene(state: &GameState) -> Scene {
    let tuning = &state.tuning;

    let pads = Lane::ALL.map(|lane| PadInstance {
        lane,
        transform: pad_transform(lane.offset(tuning)),
        dark: state.feedback.pad_is_dark(lane),
    });

    // Lower distance is further from the camera
    let mut ordered: Vec<_> = state.disks.iter().collect();
    ordered.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let disks = ordered
        .into_iter()
        .map(|d| DiskInstance {
            id: d.id,
            transform: disk_transform(d.lane.offset(tuning), d.distance),
        })
        .collect();

    Scene {
        camera: Camera::default(),
        lights: SceneLights::from_feedback(&state.feedback),
        platform: platform_transform(),
        pads,
        disks,
        backdrop: backdrop_transform(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LIGHT_PALETTE;
    use crate::tuning::Tuning;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_window_center_sits_near_pads() {
        // A disk in the scoring window is drawn over its pad
        let pos = disk_world_position(0.0, 3.0);
        assert!(close(pos, Vec3::new(0.0, -0.9844, 2.8409)), "{pos:?}");
        let pad = pad_transform(0.0).transform_point3(Vec3::ZERO);
        assert!((pos - pad).length() < 0.35);
    }

    #[test]
    fn test_far_end_is_up_and_away() {
        let start = disk_world_position(0.0, -7.0);
        let end = disk_world_position(0.0, 6.0);
        assert!(start.y > end.y);
        assert!(start.z < end.z);
    }

    #[test]
    fn test_camera_centres_target() {
        let camera = Camera::default();
        let clip = camera.view_proj(16.0 / 9.0) * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_lights_follow_feedback() {
        let mut feedback = Feedback::default();
        feedback.light_colors.swap(0, 4);
        let lights = SceneLights::from_feedback(&feedback);
        assert_eq!(lights.points[0].color, Vec3::from(hex_to_rgb(LIGHT_PALETTE[4])));
        assert_eq!(lights.points[4].color, Vec3::from(hex_to_rgb(LIGHT_PALETTE[0])));
        assert_eq!(lights.points[2].position, LIGHT_POSITIONS[2]);
    }

    #[test]
    fn test_shade_is_clamped_and_lit() {
        let lights = SceneLights::from_feedback(&Feedback::default());
        let lit = lights.shade(Vec3::new(-2.5, 0.0, 1.0), Vec3::NEG_X, Vec3::ONE);
        let unlit = lights.shade(Vec3::new(-2.5, 0.0, 1.0), Vec3::X, Vec3::ONE);
        assert!(lit.length() > unlit.length());
        assert!(lit.max_element() <= 1.0);
    }

    #[test]
    fn test_build_scene_orders_disks_far_to_near() {
        let mut state = GameState::new(
            1,
            Tuning {
                spawn_chance: 0.0,
                ..Default::default()
            },
        );
        state.spawn_disk(Lane::Left);
        state.spawn_disk(Lane::Right);
        state.disks[0].distance = 4.0;
        state.disks[1].distance = -2.0;
        state.feedback.flash_pad(Lane::Center, 0.02);

        let scene = build_scene(&state);
        assert_eq!(scene.disks.len(), 2);
        assert_eq!(scene.disks[0].id, state.disks[1].id);
        assert!(scene.pads[1].dark);
        assert!(!scene.pads[0].dark);
    }
}
