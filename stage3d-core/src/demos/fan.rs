//! Fan: an electric fan assembled from nested groups

use nalgebra::Point3;
use std::f32::consts::{FRAC_PI_2, TAU};
use tracing::debug;

use super::{Demo, DemoKind};
use crate::clock::FrameTime;
use crate::config::FanConfig;
use crate::geometry::Mesh;
use crate::input::InputState;
use crate::projection::Camera;
use crate::scene::{Color, Material, NodeId, Scene};
use crate::transform::{RotationState, Transform};

const CYLINDER_SEGMENTS: u32 = 32;
/// Thin ring slices stacked to give each blade some depth
const BLADE_SLICES: usize = 50;
const SLICE_SPACING: f32 = 0.005;
/// Switch height while the head is swinging
const SWITCH_PRESSED_Y: f32 = -0.3;

pub struct FanDemo {
    scene: Scene,
    body: NodeId,
    switch: NodeId,
    blades: NodeId,
    swing_speed: f32,
    swing_limit: f32,
    blade_speed: f32,
    swing_direction: f32,
    swinging: bool,
    stopped: bool,
}

impl FanDemo {
    pub fn new(config: &FanConfig) -> Self {
        let mut scene = Scene::new(Color::from_hex(0x666666));
        scene.ambient_light.intensity = 0.1;
        let material = Material::new(Color::from_hex(0x6e6e6e)).double_sided();

        let base_mesh = scene.add_mesh(Mesh::cylinder(1.0, 1.5, 0.5, CYLINDER_SEGMENTS));
        let leg_mesh = scene.add_mesh(Mesh::cylinder(0.2, 0.2, 3.0, CYLINDER_SEGMENTS));
        let body_mesh = scene.add_mesh(Mesh::cylinder(0.4, 0.4, 1.5, CYLINDER_SEGMENTS));
        let stem_mesh = scene.add_mesh(Mesh::cylinder(0.1, 0.1, 0.7, CYLINDER_SEGMENTS));
        let cap_mesh = scene.add_mesh(Mesh::cylinder(0.2, 0.2, 0.1, CYLINDER_SEGMENTS));
        let slice_mesh = scene.add_mesh(Mesh::ring(0.3, 2.0, 30, 1, 0.0, 1.0));

        scene.add_mesh_node("base", None, base_mesh, material, Transform::identity());
        let leg = Transform::from_position(0.0, 1.5, 0.0);
        scene.add_mesh_node("leg", None, leg_mesh, material, leg);

        let body = scene.add_group("body", None, Transform::from_position(0.0, 3.0, 0.0));
        scene.add_mesh_node(
            "housing",
            Some(body),
            body_mesh,
            material,
            Transform::from_position(0.0, 0.0, 0.5)
                .with_rotation(RotationState::new(FRAC_PI_2, 0.0, 0.0)),
        );

        let switch =
            scene.add_group("switch", Some(body), Transform::from_position(-0.15, 0.0, 0.0));
        let stem = Transform::from_position(0.0, 0.5, 0.0);
        scene.add_mesh_node("switch-stem", Some(switch), stem_mesh, material, stem);
        let cap = Transform::from_position(0.0, 0.9, 0.0);
        scene.add_mesh_node("switch-cap", Some(switch), cap_mesh, material, cap);

        let blades = scene.add_group("blades", Some(body), Transform::from_position(0.0, 0.0, 1.0));
        let blade_count = config.blade_count.max(1);
        for i in 0..blade_count {
            let angle = TAU / blade_count as f32 * i as f32;
            let blade = scene.add_group(
                format!("blade-{i}"),
                Some(blades),
                Transform::identity().with_rotation(RotationState::new(0.0, 0.0, angle)),
            );
            for j in 0..BLADE_SLICES {
                scene.add_mesh_node(
                    format!("blade-{i}-slice-{j}"),
                    Some(blade),
                    slice_mesh,
                    material,
                    Transform::from_position(0.0, 0.0, -SLICE_SPACING * j as f32),
                );
            }
        }

        Self {
            scene,
            body,
            switch,
            blades,
            swing_speed: config.swing_speed,
            swing_limit: config.swing_limit,
            blade_speed: config.blade_speed,
            swing_direction: 1.0,
            swinging: false,
            stopped: false,
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.swinging
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Yaw of the fan head
    pub fn head_yaw(&self) -> f32 {
        self.scene.transform(self.body).rotation().y
    }

    pub fn blade_angle(&self) -> f32 {
        self.scene.transform(self.blades).rotation().z
    }

    pub fn switch_height(&self) -> f32 {
        self.scene.transform(self.switch).position.y
    }
}

impl Demo for FanDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Fan
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn camera(&self) -> Camera {
        Camera::perspective(60.0, 0.1, 30.0, Point3::new(3.0, 5.0, 10.0), Point3::origin())
    }

    fn step(&mut self, _time: FrameTime, input: &InputState) {
        if input.action_pressed {
            self.swinging = !self.swinging;
            debug!(swinging = self.swinging, "Swing toggled");
        }
        if input.stop_pressed {
            self.stopped = !self.stopped;
            debug!(stopped = self.stopped, "Blades toggled");
        }

        if self.swinging {
            let yaw = self.head_yaw();
            if yaw < -self.swing_limit || yaw > self.swing_limit {
                self.swing_direction = -self.swing_direction;
            }
            let step = self.swing_speed * self.swing_direction;
            self.scene.transform_mut(self.body).rotate_euler(0.0, step, 0.0);
            self.scene.transform_mut(self.switch).position.y = SWITCH_PRESSED_Y;
        } else {
            self.scene.transform_mut(self.switch).position.y = 0.0;
        }

        if !self.stopped {
            self.scene.transform_mut(self.blades).rotate_euler(0.0, 0.0, self.blade_speed);
        }
    }
}
