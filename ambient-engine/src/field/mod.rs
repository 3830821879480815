// field/ - 3D ambient background
//
// Three layers under one pointer: a clustered point cloud, short line
// segments, and floating orbs. Geometry is generated once at mount;
// `update` only touches layer rotations and orb positions.

mod camera;
mod cloud;
mod lines;
mod orbs;

pub use camera::Camera;
pub use cloud::PointCloud;
pub use lines::LineSegments;
pub use orbs::{Axis, Orb, Wave, ORBS};

use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::config::{ConfigError, FieldConfig};
use crate::rng::Rng;

pub const BACKGROUND: [f32; 3] = [10.0 / 255.0, 10.0 / 255.0, 15.0 / 255.0];
pub const POINT_SIZE: f32 = 0.08;
pub const POINT_OPACITY: f32 = 0.7;
pub const LINE_OPACITY: f32 = 0.1;

#[inline]
pub(crate) fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }

/// One step of exponential smoothing toward `target`
#[inline]
pub fn approach(current: f32, target: f32, damping: f32) -> f32 {
    current + (target - current) * damping
}

/// Pointer in normalized device space, both axes in [-1, 1], y up
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x: x.clamp(-1.0, 1.0), y: y.clamp(-1.0, 1.0) }
    }

    /// From client px within a viewport of `w` x `h`
    pub fn from_client(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        if w <= 0.0 || h <= 0.0 {
            return Self::default();
        }
        Self::new(cx / w * 2.0 - 1.0, -(cy / h) * 2.0 + 1.0)
    }
}

pub struct AmbientField {
    cloud: PointCloud,
    lines: LineSegments,

    pointer: Pointer,
    // Smoothed pointer-driven rotation offset (x, y)
    pull: Vec2,

    cloud_rotation: Vec3,
    line_rotation: Vec3,
    orb_positions: [Vec3; 3],
    elapsed: f32,

    config: FieldConfig,
}

impl AmbientField {
    pub fn new(config: FieldConfig, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let cloud = PointCloud::generate(&config, rng);
        let lines = LineSegments::generate(&config, rng);
        log::debug!("field: generated {} points, {} segments", cloud.len(), lines.len());

        let mut field = Self {
            cloud,
            lines,
            pointer: Pointer::default(),
            pull: Vec2::ZERO,
            cloud_rotation: Vec3::ZERO,
            line_rotation: Vec3::ZERO,
            orb_positions: [Vec3::ZERO; 3],
            elapsed: 0.0,
            config,
        };
        field.place_orbs(0.0);
        Ok(field)
    }

    /// Record the latest pointer; read by the next frame
    pub fn pointer_move(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// Advance using the stored pointer
    pub fn tick(&mut self, elapsed: f32) {
        let pointer = self.pointer;
        self.update(elapsed, pointer);
    }

    /// Per-frame update. `elapsed` is seconds since mount from the host clock.
    pub fn update(&mut self, elapsed: f32, pointer: Pointer) {
        let cfg = &self.config;
        self.elapsed = elapsed;

        // x rotation follows pointer y, y rotation follows pointer x
        let target = Vec2::new(pointer.y, pointer.x) * cfg.pointer_gain;
        self.pull.x = approach(self.pull.x, target.x, cfg.damping);
        self.pull.y = approach(self.pull.y, target.y, cfg.damping);

        self.cloud_rotation = Vec3::new(
            elapsed * cfg.cloud_spin[0] + self.pull.x,
            elapsed * cfg.cloud_spin[1] + self.pull.y,
            0.0,
        );

        let (sway_freq, sway_amp) = cfg.line_sway;
        self.line_rotation = Vec3::new(
            self.pull.x,
            (elapsed * sway_freq).sin() * sway_amp + self.pull.y,
            elapsed * cfg.line_spin,
        );

        self.place_orbs(elapsed);
    }

    fn place_orbs(&mut self, t: f32) {
        for (slot, orb) in self.orb_positions.iter_mut().zip(ORBS.iter()) {
            *slot = orb.position(t);
        }
    }

    pub fn cloud(&self) -> &PointCloud { &self.cloud }
    pub fn lines(&self) -> &LineSegments { &self.lines }
    pub fn pointer(&self) -> Pointer { self.pointer }
    pub fn pull(&self) -> Vec2 { self.pull }
    pub fn elapsed(&self) -> f32 { self.elapsed }
    pub fn cloud_rotation(&self) -> Vec3 { self.cloud_rotation }
    pub fn line_rotation(&self) -> Vec3 { self.line_rotation }
    pub fn orb_positions(&self) -> &[Vec3; 3] { &self.orb_positions }
    pub fn config(&self) -> &FieldConfig { &self.config }

    pub fn cloud_matrix(&self) -> Mat4 { rotation_matrix(self.cloud_rotation) }
    pub fn line_matrix(&self) -> Mat4 { rotation_matrix(self.line_rotation) }

    pub fn orb_matrix(&self, i: usize) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(ORBS[i].radius),
            glam::Quat::IDENTITY,
            self.orb_positions[i],
        )
    }
}

/// Euler XYZ, matching the host scene graph's default order
fn rotation_matrix(r: Vec3) -> Mat4 {
    Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
}
