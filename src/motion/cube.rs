//! Geometry for the 3D "face cube" that mirrors the head orientation.
//!
//! The scene is a 3-unit cube at the origin with eyes, nose and mouth on its
//! +z face, seen by a perspective camera on the +z axis. Projection results are
//! plain screen-space numbers so any painter can draw them.
use nalgebra::{Point3, Rotation3, Vector3};

use crate::motion::Attitude;

/// Euler angles applied to the cube, in radians about x, y and z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubePose {
    pub euler: [f64; 3],
}

impl CubePose {
    /// The cube faces the user, so every angle is mirrored.
    pub fn from_attitude(att: &Attitude) -> Self {
        Self {
            euler: [-att.pitch, -att.yaw, -att.roll],
        }
    }

    /// Roll is applied first, then yaw, then pitch.
    pub fn rotation(&self) -> Rotation3<f64> {
        let [x, y, z] = self.euler;
        Rotation3::from_axis_angle(&Vector3::x_axis(), x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), y)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), z)
    }

    pub fn degrees(&self) -> [f64; 3] {
        self.euler.map(f64::to_degrees)
    }
}

#[derive(Clone, Debug)]
pub struct ProjectedFace {
    /// Screen-space corners, counter-clockwise as seen from outside.
    pub corners: [[f32; 2]; 4],
    /// Distance from the camera to the face centre; larger is farther.
    pub depth: f64,
    /// Lighting factor in `0.0..=1.0`.
    pub shade: f32,
    /// Whether this is the face carrying eyes, nose and mouth.
    pub is_front: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProjectedFeature {
    Disc { center: [f32; 2], radius: f32 },
    Bar { from: [f32; 2], to: [f32; 2], width: f32 },
}

/// Visible faces sorted back to front, then the face features if visible.
#[derive(Clone, Debug, Default)]
pub struct CubeFrame {
    pub faces: Vec<ProjectedFace>,
    pub features: Vec<ProjectedFeature>,
}

pub struct CubeScene {
    pub camera_distance: f64,
    pub fov_deg: f64,
    pub half_extent: f64,
    pub light: Point3<f64>,
    pub ambient: f64,
}

impl Default for CubeScene {
    fn default() -> Self {
        Self {
            camera_distance: 15.0,
            fov_deg: 60.0,
            half_extent: 1.5,
            light: Point3::new(0.0, 10.0, 10.0),
            ambient: 0.25,
        }
    }
}

const EYE_RADIUS: f64 = 0.3;
const MOUTH_HALF_WIDTH: f64 = 0.75;
const MOUTH_THICKNESS: f64 = 0.2;

impl CubeScene {
    fn camera(&self) -> Point3<f64> {
        Point3::new(0.0, 0.0, self.camera_distance)
    }

    /// Scale from camera-space units at distance `d` to pixels.
    fn pixels_per_unit(&self, d: f64, viewport: [f32; 2]) -> f64 {
        let half = (viewport[0].min(viewport[1]) as f64) * 0.5;
        let tan = (self.fov_deg.to_radians() * 0.5).tan();
        half / (d * tan)
    }

    fn to_screen(&self, p: &Point3<f64>, viewport: [f32; 2]) -> [f32; 2] {
        let d = (self.camera_distance - p.z).max(1e-3);
        let k = self.pixels_per_unit(d, viewport);
        [
            viewport[0] * 0.5 + (p.x * k) as f32,
            viewport[1] * 0.5 - (p.y * k) as f32,
        ]
    }

    pub fn project(&self, pose: &CubePose, viewport: [f32; 2]) -> CubeFrame {
        let rot = pose.rotation();
        let h = self.half_extent;
        let camera = self.camera();
        let mut front_visible = false;
        let mut faces = Vec::with_capacity(3);
        for (normal, is_front) in face_normals() {
            let n_world = rot * normal;
            let centre = Point3::from(n_world * h);
            let to_camera = camera - centre;
            if n_world.dot(&to_camera) <= 0.0 {
                continue;
            }
            front_visible |= is_front;
            let to_light = (self.light - centre).normalize();
            let diffuse = n_world.dot(&to_light).max(0.0);
            let shade = (self.ambient + (1.0 - self.ambient) * diffuse).clamp(0.0, 1.0) as f32;
            let corners = face_corners(&normal, h).map(|c| self.to_screen(&(rot * c), viewport));
            faces.push(ProjectedFace {
                corners,
                depth: to_camera.norm(),
                shade,
                is_front,
            });
        }
        faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        let mut features = Vec::new();
        if front_visible {
            let z = h;
            for (x, y) in [(0.6, 0.6), (-0.6, 0.6), (0.0, 0.0)] {
                let p = rot * Point3::new(x, y, z);
                let d = (self.camera_distance - p.z).max(1e-3);
                features.push(ProjectedFeature::Disc {
                    center: self.to_screen(&p, viewport),
                    radius: (EYE_RADIUS * self.pixels_per_unit(d, viewport)) as f32,
                });
            }
            let left = rot * Point3::new(-MOUTH_HALF_WIDTH, -0.6, z);
            let right = rot * Point3::new(MOUTH_HALF_WIDTH, -0.6, z);
            let mid = (self.camera_distance - z).max(1e-3);
            features.push(ProjectedFeature::Bar {
                from: self.to_screen(&left, viewport),
                to: self.to_screen(&right, viewport),
                width: (MOUTH_THICKNESS * self.pixels_per_unit(mid, viewport)) as f32,
            });
        }
        CubeFrame { faces, features }
    }
}

fn face_normals() -> [(Vector3<f64>, bool); 6] {
    [
        (Vector3::z(), true),
        (-Vector3::z(), false),
        (Vector3::x(), false),
        (-Vector3::x(), false),
        (Vector3::y(), false),
        (-Vector3::y(), false),
    ]
}

/// Corners of the face with outward normal `n`, counter-clockwise from outside.
fn face_corners(n: &Vector3<f64>, h: f64) -> [Point3<f64>; 4] {
    // Two in-plane axes (u, v) with u × v = n.
    let helper = if n.y.abs() > 0.5 { Vector3::z() } else { Vector3::y() };
    let u = helper.cross(n).normalize();
    let v = n.cross(&u);
    let c = *n * h;
    [
        Point3::from(c + (-u - v) * h),
        Point3::from(c + (u - v) * h),
        Point3::from(c + (u + v) * h),
        Point3::from(c + (-u + v) * h),
    ]
}
