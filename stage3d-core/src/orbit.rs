//! Orbit-facing update.
//!
//! A [`MovingPoint`] travels along an [`OrbitPath`] and keeps an
//! accumulated orientation that turns with its direction of travel. Each
//! frame the heading is nudged toward the latest travel direction and the
//! minimal rotation between the old and new heading is pre-multiplied onto
//! the orientation, so a mesh whose local +Y is its nose keeps facing
//! forward.

use crate::error::NumericDegeneracy;
use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f32::consts::FRAC_PI_4;

/// Vectors shorter than this have no usable direction
const DIRECTION_EPSILON: f32 = 1e-6;

/// Constants for one orbiting point, fixed for the lifetime of a demo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParameters {
    pub radius: f32,
    /// Radians per second
    pub angular_speed: f32,
    pub phase_offset: f32,
    /// Weight of the travel direction when nudging the heading
    pub turn_scale: f32,
}

impl OrbitParameters {
    pub fn angle_at(&self, elapsed: f32) -> f32 {
        elapsed * self.angular_speed + self.phase_offset
    }
}

impl Default for OrbitParameters {
    fn default() -> Self {
        Self {
            radius: 3.3,
            angular_speed: 0.5,
            phase_offset: FRAC_PI_4,
            turn_scale: 1.0,
        }
    }
}

/// Shape of the closed path a point follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitPath {
    /// Loops over the poles in the plane x = -z
    Tilted,
    /// Circles the equator in the XZ plane
    Equatorial,
}

impl OrbitPath {
    pub fn position(&self, radius: f32, angle: f32) -> Vector3<f32> {
        let (sin, cos) = angle.sin_cos();
        match self {
            OrbitPath::Tilted => Vector3::new(-radius * cos, radius * sin, radius * cos),
            OrbitPath::Equatorial => Vector3::new(radius * cos, 0.0, radius * sin),
        }
    }

    /// Unit direction of travel at `angle` for a positive angular speed
    pub fn tangent(&self, angle: f32) -> Unit<Vector3<f32>> {
        let (sin, cos) = angle.sin_cos();
        let raw = match self {
            OrbitPath::Tilted => Vector3::new(sin, cos, -sin),
            OrbitPath::Equatorial => Vector3::new(-sin, 0.0, cos),
        };
        Unit::new_normalize(raw)
    }
}

/// A point that turns to face where it is going
#[derive(Debug, Clone, PartialEq)]
pub struct MovingPoint {
    pub position: Vector3<f32>,
    heading: Unit<Vector3<f32>>,
    orientation: UnitQuaternion<f32>,
}

impl MovingPoint {
    /// Start at `position`, heading +Y with no rotation
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            heading: Vector3::y_axis(),
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn heading(&self) -> &Unit<Vector3<f32>> {
        &self.heading
    }

    pub fn orientation(&self) -> &UnitQuaternion<f32> {
        &self.orientation
    }

    /// Move to the path position for `elapsed` seconds
    pub fn advance(
        &mut self,
        elapsed: f32,
        params: &OrbitParameters,
        path: OrbitPath,
    ) -> Result<UnitQuaternion<f32>, NumericDegeneracy> {
        let target = path.position(params.radius, params.angle_at(elapsed));
        self.step_to(target, params.turn_scale)
    }

    /// Move to `new_position` and turn toward the travel direction.
    ///
    /// The position is always applied. On success the rotation that was
    /// pre-multiplied onto the orientation is returned; on a degeneracy the
    /// orientation (and, where noted by the variant, the heading) is left
    /// untouched for this frame.
    pub fn step_to(
        &mut self,
        new_position: Vector3<f32>,
        turn_scale: f32,
    ) -> Result<UnitQuaternion<f32>, NumericDegeneracy> {
        let previous_position = std::mem::replace(&mut self.position, new_position);
        let previous_heading = self.heading;

        let delta = Unit::try_new(new_position - previous_position, DIRECTION_EPSILON)
            .ok_or(NumericDegeneracy::StationaryPoint)?;
        let heading = Unit::try_new(
            previous_heading.into_inner() + delta.into_inner() * turn_scale,
            DIRECTION_EPSILON,
        )
        .ok_or(NumericDegeneracy::CancelledHeading)?;
        self.heading = heading;

        let increment = facing_rotation(&previous_heading, &heading)?;
        self.orientation = increment * self.orientation;
        self.orientation.renormalize();
        Ok(increment)
    }
}

/// Minimal rotation taking `from` onto `to`.
///
/// Fails when the two directions are parallel (nothing to do) or
/// antiparallel (every perpendicular axis works, so none is picked).
pub fn facing_rotation(
    from: &Unit<Vector3<f32>>,
    to: &Unit<Vector3<f32>>,
) -> Result<UnitQuaternion<f32>, NumericDegeneracy> {
    let cos = from.dot(&to.into_inner());
    let (axis, sin) = match Unit::try_new_and_get(from.cross(&to.into_inner()), DIRECTION_EPSILON) {
        Some(found) => found,
        None if cos < 0.0 => return Err(NumericDegeneracy::AntiparallelHeading),
        None => return Err(NumericDegeneracy::ParallelHeading),
    };
    // atan2 stays exact for the small per-frame turns where acos does not
    Ok(UnitQuaternion::from_axis_angle(&axis, sin.atan2(cos)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn start() -> MovingPoint {
        MovingPoint::new(Vector3::new(0.0, OrbitParameters::default().radius, 0.0))
    }

    #[test]
    fn test_first_step_is_deterministic() {
        let params = OrbitParameters::default();
        let mut point = start();
        let previous = point.position;

        point.advance(0.0, &params, OrbitPath::Tilted).unwrap();

        let expected_position = Vector3::new(
            -3.3 * FRAC_PI_4.cos(),
            3.3 * FRAC_PI_4.sin(),
            3.3 * FRAC_PI_4.cos(),
        );
        assert!((point.position - expected_position).norm() < 1e-5);

        let delta = (expected_position - previous).normalize();
        let expected_heading = (Vector3::y() + delta).normalize();
        assert!((point.heading().into_inner() - expected_heading).norm() < 1e-5);
        assert!(point.heading().x < 0.0 && point.heading().y > 0.0 && point.heading().z > 0.0);
    }

    #[test]
    fn test_repeated_position_leaves_heading_alone() {
        let params = OrbitParameters::default();
        let mut point = start();
        let target = OrbitPath::Tilted.position(params.radius, params.angle_at(0.0));

        point.step_to(target, params.turn_scale).unwrap();
        let heading = *point.heading();
        let orientation = *point.orientation();

        // Simulated pause: the same position arrives again
        let result = point.step_to(target, params.turn_scale);
        assert_eq!(result, Err(NumericDegeneracy::StationaryPoint));
        assert!((point.heading().into_inner() - heading.into_inner()).norm() < 1e-6);
        assert!(point.orientation().angle_to(&orientation) < 1e-6);
        assert!(point.orientation().coords.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_normalization_holds_every_frame() {
        let params = OrbitParameters::default();
        for path in [OrbitPath::Tilted, OrbitPath::Equatorial] {
            let mut point = start();
            for frame in 0..2000 {
                let _ = point.advance(frame as f32 * FRAME, &params, path);
                assert!((point.heading().norm() - 1.0).abs() < 1e-5);
                assert!((point.orientation().coords.norm() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_heading_converges_to_tangent() {
        let params = OrbitParameters::default();
        for path in [OrbitPath::Tilted, OrbitPath::Equatorial] {
            let mut point = start();
            let frames = 1200;
            for frame in 0..frames {
                let _ = point.advance(frame as f32 * FRAME, &params, path);
            }
            let elapsed = (frames - 1) as f32 * FRAME;
            let tangent = path.tangent(params.angle_at(elapsed));
            assert!(
                point.heading().dot(&tangent.into_inner()) > 0.995,
                "{:?} heading {:?} tangent {:?}",
                path,
                point.heading(),
                tangent
            );
        }
    }

    #[test]
    fn test_orientation_tracks_heading() {
        let params = OrbitParameters::default();
        let mut point = start();
        for frame in 0..600 {
            let _ = point.advance(frame as f32 * FRAME, &params, OrbitPath::Equatorial);
            let nose = point.orientation() * Vector3::y();
            assert!((nose - point.heading().into_inner()).norm() < 1e-3);
        }
    }

    #[test]
    fn test_nose_stays_on_heading_over_long_runs() {
        let params = OrbitParameters::default();
        for path in [OrbitPath::Tilted, OrbitPath::Equatorial] {
            let mut point = start();
            for frame in 0..36_000 {
                let _ = point.advance(frame as f32 * FRAME, &params, path);
            }
            let nose = point.orientation() * Vector3::y();
            let error = (nose - point.heading().into_inner()).norm();
            assert!(error < 1e-3, "{:?} nose is {} away from heading", path, error);
        }
    }

    #[test]
    fn test_small_turn_angle_is_exact() {
        let from = Vector3::y_axis();
        let to = Unit::new_normalize(Vector3::new(0.008f32.sin(), 0.008f32.cos(), 0.0));
        let rotation = facing_rotation(&from, &to).unwrap();
        assert!((rotation * from.into_inner() - to.into_inner()).norm() < 2e-6);
    }

    #[test]
    fn test_parallel_heading_skips_rotation() {
        let mut point = MovingPoint::new(Vector3::zeros());
        let result = point.step_to(Vector3::new(0.0, 1.0, 0.0), 1.0);
        assert_eq!(result, Err(NumericDegeneracy::ParallelHeading));
        assert_eq!(*point.orientation(), UnitQuaternion::identity());
        assert_eq!(point.position, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_reversal_with_full_turn_scale_cancels_heading() {
        let mut point = MovingPoint::new(Vector3::zeros());
        let result = point.step_to(Vector3::new(0.0, -1.0, 0.0), 1.0);
        assert_eq!(result, Err(NumericDegeneracy::CancelledHeading));
        assert_eq!(point.heading().into_inner(), Vector3::y());
    }

    #[test]
    fn test_antiparallel_heading_is_reported() {
        let mut point = MovingPoint::new(Vector3::zeros());
        let result = point.step_to(Vector3::new(0.0, -1.0, 0.0), 3.0);
        assert_eq!(result, Err(NumericDegeneracy::AntiparallelHeading));
        assert!((point.heading().into_inner() + Vector3::y()).norm() < 1e-6);
        assert_eq!(*point.orientation(), UnitQuaternion::identity());

        let up = Vector3::y_axis();
        let down = -Vector3::y_axis();
        assert_eq!(facing_rotation(&up, &down), Err(NumericDegeneracy::AntiparallelHeading));
    }

    #[test]
    fn test_increment_and_inverse_round_trip() {
        let params = OrbitParameters::default();
        let mut point = start();
        let _ = point.advance(0.0, &params, OrbitPath::Tilted);
        let before = *point.orientation();

        let increment = point.advance(FRAME, &params, OrbitPath::Tilted).unwrap();
        let restored = increment.inverse() * point.orientation();
        assert!(restored.angle_to(&before) < 1e-5);
    }

    #[test]
    fn test_facing_rotation_maps_from_onto_to() {
        let from = Unit::new_normalize(Vector3::new(1.0, 0.2, 0.0));
        let to = Unit::new_normalize(Vector3::new(0.0, 0.3, 1.0));
        let rotation = facing_rotation(&from, &to).unwrap();
        assert!((rotation * from.into_inner() - to.into_inner()).norm() < 1e-5);
    }
}
