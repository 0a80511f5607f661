//! Per-mesh movement behaviors for the scatter demo

use crate::transform::Transform;
use nalgebra::Vector3;
use rand::Rng;
use std::ops::Range;

/// Euler step per frame for spinning meshes (radians)
pub const SPIN_STEP: f32 = 0.05;
/// Translation speed per frame is drawn from this range
pub const SPEED_RANGE: Range<f32> = 0.03..0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn component(&self, v: &Vector3<f32>) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn unit(&self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// What a mesh does each frame while the action key is held
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Slide along `axis` by `step` units per frame
    TranslateAxis { axis: Axis, step: f32 },
    /// Add `step` radians to the Euler angle about `axis` per frame
    RotateAxis { axis: Axis, step: f32 },
}

impl Movement {
    /// Pick one of five behaviors uniformly: slide along X, Y or Z toward
    /// the origin (as seen from `position`), or spin about X or Y.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, position: &Vector3<f32>) -> Self {
        let speed = rng.random_range(SPEED_RANGE);
        match rng.random_range(0..5) {
            0 => Self::toward_origin(Axis::X, position, speed),
            1 => Self::toward_origin(Axis::Y, position, speed),
            2 => Self::toward_origin(Axis::Z, position, speed),
            3 => Movement::RotateAxis {
                axis: Axis::X,
                step: SPIN_STEP,
            },
            _ => Movement::RotateAxis {
                axis: Axis::Y,
                step: SPIN_STEP,
            },
        }
    }

    pub fn toward_origin(axis: Axis, position: &Vector3<f32>, speed: f32) -> Self {
        let step = if axis.component(position) < 0.0 { speed } else { -speed };
        Movement::TranslateAxis { axis, step }
    }

    /// Next transform after one frame of this movement
    pub fn apply(&self, transform: &Transform) -> Transform {
        let mut next = *transform;
        match *self {
            Movement::TranslateAxis { axis, step } => next.translate(&(axis.unit() * step)),
            Movement::RotateAxis { axis, step } => {
                let delta = axis.unit() * step;
                next.rotate_euler(delta.x, delta.y, delta.z);
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_translation_heads_toward_origin() {
        let position = Vector3::new(-4.0, 2.0, 0.0);
        let start = Transform::from_position(position.x, position.y, position.z);

        let along_x = Movement::toward_origin(Axis::X, &position, 0.05).apply(&start);
        assert!(along_x.position.x > position.x);
        assert_eq!(along_x.position.y, position.y);

        let along_y = Movement::toward_origin(Axis::Y, &position, 0.05).apply(&start);
        assert!(along_y.position.y < position.y);
    }

    #[test]
    fn test_rotation_touches_only_its_axis() {
        let start = Transform::identity();
        let spun = Movement::RotateAxis {
            axis: Axis::Y,
            step: SPIN_STEP,
        }
        .apply(&spun_twice(start));

        let rotation = spun.rotation();
        assert_eq!(rotation.x, 0.0);
        assert!((rotation.y - 3.0 * SPIN_STEP).abs() < 1e-6);
        assert_eq!(spun.position, start.position);
    }

    fn spun_twice(transform: Transform) -> Transform {
        let spin = Movement::RotateAxis {
            axis: Axis::Y,
            step: SPIN_STEP,
        };
        spin.apply(&spin.apply(&transform))
    }

    #[test]
    fn test_apply_is_pure() {
        let start = Transform::from_position(1.0, 1.0, 1.0);
        let movement = Movement::toward_origin(Axis::Z, &start.position, 0.1);
        let _ = movement.apply(&start);
        assert_eq!(start.position, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_roll_covers_every_behavior_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let position = Vector3::new(3.0, -2.0, 5.0);
        let mut seen = [false; 5];

        for _ in 0..500 {
            match Movement::roll(&mut rng, &position) {
                Movement::TranslateAxis { axis, step } => {
                    assert!(SPEED_RANGE.contains(&step.abs()));
                    // Always toward the origin from where the mesh was
                    assert!(step * axis.component(&position) < 0.0);
                    let index = match axis {
                        Axis::X => 0,
                        Axis::Y => 1,
                        Axis::Z => 2,
                    };
                    seen[index] = true;
                }
                Movement::RotateAxis { axis, step } => {
                    assert_eq!(step, SPIN_STEP);
                    assert_ne!(axis, Axis::Z);
                    seen[if axis == Axis::X { 3 } else { 4 }] = true;
                }
            }
        }

        assert!(seen.iter().all(|s| *s));
    }
}
