//! Scatter: a field of random meshes that drift or spin while the action key is held

use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{Demo, DemoKind};
use crate::clock::FrameTime;
use crate::config::ScatterConfig;
use crate::geometry::Mesh;
use crate::input::InputState;
use crate::motion::Movement;
use crate::projection::Camera;
use crate::scene::{Color, Material, MeshId, NodeId, Scene};
use crate::transform::Transform;

/// Channel range for the pastel mesh colors
const COLOR_FLOOR: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Box,
    Cone,
    Torus,
}

impl Shape {
    const ALL: [Shape; 3] = [Shape::Box, Shape::Cone, Shape::Torus];
}

/// A mesh node and what it currently does
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub node: NodeId,
    pub shape: Shape,
    pub movement: Movement,
}

pub struct ScatterDemo {
    scene: Scene,
    movers: Vec<Mover>,
    rng: StdRng,
    reroll_every: f32,
    next_reroll: f32,
}

impl ScatterDemo {
    pub fn new(config: &ScatterConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut scene = Scene::new(Color::from_hex(0x9e9e9e));
        scene.directional_light.intensity = 2.0;
        scene.directional_light.position = Vector3::new(1.0, 3.0, 1.0);
        scene.ambient_light.intensity = 0.1;

        // One geometry per shape, shared by every node of that shape
        let box_mesh = scene.add_mesh(Mesh::cube(1.0));
        let cone_mesh = scene.add_mesh(Mesh::cone(0.5, 1.0, 16));
        let torus_mesh = scene.add_mesh(Mesh::torus(0.5, 0.2, 8, 16));
        let mesh_for = |shape: Shape| -> MeshId {
            match shape {
                Shape::Box => box_mesh,
                Shape::Cone => cone_mesh,
                Shape::Torus => torus_mesh,
            }
        };

        let total = config.box_count + config.other_count;
        let mut movers = Vec::with_capacity(total);
        for i in 0..total {
            let shape = if i < config.box_count {
                Shape::Box
            } else {
                Shape::ALL[rng.random_range(0..Shape::ALL.len())]
            };
            let range = config.pos_range;
            let position = Vector3::new(
                rng.random_range(-range..=range),
                rng.random_range(-range..=range),
                rng.random_range(-range..=range),
            );
            let color = Color::new(
                rng.random_range(COLOR_FLOOR..1.0),
                rng.random_range(COLOR_FLOOR..1.0),
                rng.random_range(COLOR_FLOOR..1.0),
            );
            let scale = rng.random_range(1.0..config.max_scale);
            let transform = Transform::from_position(position.x, position.y, position.z)
                .with_uniform_scale(scale);

            let node = scene.add_mesh_node(
                format!("mesh-{i}"),
                None,
                mesh_for(shape),
                Material::new(color),
                transform,
            );
            let movement = Movement::roll(&mut rng, &position);
            movers.push(Mover { node, shape, movement });
        }

        info!(meshes = movers.len(), seed = ?config.seed, "Scatter scene built");

        Self {
            scene,
            movers,
            rng,
            reroll_every: config.reshuffle_secs,
            next_reroll: config.reshuffle_secs,
        }
    }

    pub fn movers(&self) -> &[Mover] {
        &self.movers
    }

    /// Give every mesh a fresh movement based on where it is now
    fn reroll(&mut self) {
        for mover in &mut self.movers {
            let position = self.scene.transform(mover.node).position;
            mover.movement = Movement::roll(&mut self.rng, &position);
        }
    }
}

impl Demo for ScatterDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Scatter
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn camera(&self) -> Camera {
        Camera::perspective(60.0, 0.1, 100.0, Point3::new(0.0, 2.0, 20.0), Point3::origin())
    }

    fn step(&mut self, time: FrameTime, input: &InputState) {
        if time.elapsed >= self.next_reroll {
            self.reroll();
            self.next_reroll += self.reroll_every;
            // After a long stall, resume the cadence from now
            if self.next_reroll <= time.elapsed {
                self.next_reroll = time.elapsed + self.reroll_every;
            }
            debug!(elapsed = time.elapsed, "Movements rerolled");
        }

        if input.action_held || input.action_pressed {
            for mover in &self.movers {
                let transform = self.scene.transform_mut(mover.node);
                *transform = mover.movement.apply(transform);
            }
        }
    }
}
