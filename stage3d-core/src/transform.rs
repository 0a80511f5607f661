/// Node transforms: position, rotation and scale
use nalgebra::{Matrix4, UnitQuaternion, Vector3};

/// Euler rotation around three axes (in radians), order XYZ: the matrix is
/// Rx * Ry * Rz, so Z turns first in local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    pub fn to_quaternion(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.x)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.y)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.z)
    }

    /// Inverse of [`RotationState::to_quaternion`]; at the Y = ±90° pole Z is zero
    pub fn from_quaternion(q: &UnitQuaternion<f32>) -> Self {
        let m = q.to_rotation_matrix().into_inner();
        let y = m[(0, 2)].clamp(-1.0, 1.0).asin();
        let (x, z) = if m[(0, 2)].abs() < 0.9999999 {
            ((-m[(1, 2)]).atan2(m[(2, 2)]), (-m[(0, 1)]).atan2(m[(0, 0)]))
        } else {
            (m[(2, 1)].atan2(m[(1, 1)]), 0.0)
        };
        Self { x, y, z }
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Local transform of a scene node.
///
/// The Euler rotation and the quaternion always describe the same
/// rotation. Demos that nudge a single axis write the Euler angles; the
/// orbit markers write the quaternion. Either write re-derives the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    rotation: RotationState,
    orientation: UnitQuaternion<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: RotationState::zero(),
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vector3::new(s, s, s);
        self
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn orientation(&self) -> &UnitQuaternion<f32> {
        &self.orientation
    }

    pub fn set_rotation(&mut self, rotation: RotationState) {
        self.rotation = rotation;
        self.orientation = rotation.to_quaternion();
    }

    /// Add to the Euler angles (in radians)
    pub fn rotate_euler(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
        self.orientation = self.rotation.to_quaternion();
    }

    pub fn set_orientation(&mut self, orientation: UnitQuaternion<f32>) {
        self.orientation = orientation;
        self.rotation = RotationState::from_quaternion(&orientation);
    }

    /// Apply `rotation` in parent space, before the current orientation
    pub fn premultiply(&mut self, rotation: &UnitQuaternion<f32>) {
        let mut orientation = rotation * self.orientation;
        orientation.renormalize();
        self.set_orientation(orientation);
    }

    pub fn translate(&mut self, offset: &Vector3<f32>) {
        self.position += offset;
    }

    /// Local matrix: translation * rotation * scale
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * self.orientation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
