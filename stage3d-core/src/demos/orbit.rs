//! Orbit: a spinning earth with two markers that face along their orbits

use nalgebra::{Point3, Vector3};
use tracing::{info, trace};

use super::{AssetPaths, Demo, DemoKind};
use crate::assets::load_mesh_or;
use crate::clock::FrameTime;
use crate::error::AssetError;
use crate::geometry::Mesh;
use crate::input::InputState;
use crate::orbit::{MovingPoint, OrbitParameters, OrbitPath};
use crate::projection::Camera;
use crate::scene::{Color, Fog, Material, NodeId, Scene};
use crate::transform::Transform;

const EARTH_RADIUS: f32 = 3.0;
const EARTH_SPIN: f32 = 0.005;
const MARKER_SCALE: f32 = 0.1;

/// Meshes the orbit demo needs before its first frame
#[derive(Debug, Clone)]
pub struct OrbitAssets {
    pub earth: Mesh,
    pub marker: Mesh,
}

impl OrbitAssets {
    /// Load the earth and then the marker, falling back to procedural meshes
    pub fn load(paths: &AssetPaths) -> Result<Self, AssetError> {
        let earth =
            load_mesh_or(paths.earth_mesh.as_deref(), || Mesh::sphere(EARTH_RADIUS, 32, 32))?;
        let marker = load_mesh_or(paths.marker_mesh.as_deref(), || Mesh::cone(2.0, 4.0, 32))?;
        Ok(Self { earth, marker })
    }
}

impl Default for OrbitAssets {
    fn default() -> Self {
        Self {
            earth: Mesh::sphere(EARTH_RADIUS, 32, 32),
            marker: Mesh::cone(2.0, 4.0, 32),
        }
    }
}

struct Marker {
    node: NodeId,
    path: OrbitPath,
    point: MovingPoint,
}

pub struct OrbitDemo {
    scene: Scene,
    earth: NodeId,
    markers: Vec<Marker>,
    params: OrbitParameters,
}

impl OrbitDemo {
    pub fn new(params: OrbitParameters, assets: OrbitAssets) -> Self {
        let mut scene = Scene::new(Color::from_hex(0x001e43));
        scene.ambient_light.intensity = 0.3;
        scene.fog = Some(Fog {
            color: Color::WHITE,
            near: 10.0,
            far: 20.0,
        });

        let earth_mesh = scene.add_mesh(assets.earth);
        let marker_mesh = scene.add_mesh(assets.marker);
        let earth = scene.add_mesh_node(
            "earth",
            None,
            earth_mesh,
            Material::new(Color::WHITE),
            Transform::identity(),
        );

        let start = Vector3::new(0.0, params.radius, 0.0);
        let marker_material = Material::new(Color::from_hex(0xff5533));
        let markers = [OrbitPath::Tilted, OrbitPath::Equatorial]
            .into_iter()
            .enumerate()
            .map(|(i, path)| {
                let transform = Transform::from_position(start.x, start.y, start.z)
                    .with_uniform_scale(MARKER_SCALE);
                let node = scene.add_mesh_node(
                    format!("marker-{i}"),
                    None,
                    marker_mesh,
                    marker_material,
                    transform,
                );
                Marker {
                    node,
                    path,
                    point: MovingPoint::new(start),
                }
            })
            .collect();

        info!(radius = params.radius, speed = params.angular_speed, "Orbit scene built");

        Self {
            scene,
            earth,
            markers,
            params,
        }
    }

    /// Marker states in path order: tilted, then equatorial
    pub fn points(&self) -> impl Iterator<Item = &MovingPoint> {
        self.markers.iter().map(|m| &m.point)
    }

    pub fn earth(&self) -> NodeId {
        self.earth
    }
}

impl Demo for OrbitDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Orbit
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn camera(&self) -> Camera {
        Camera::perspective(60.0, 0.1, 50.0, Point3::new(0.0, 2.0, 10.0), Point3::origin())
    }

    fn step(&mut self, time: FrameTime, _input: &InputState) {
        self.scene.transform_mut(self.earth).rotate_euler(0.0, EARTH_SPIN, EARTH_SPIN);

        for marker in &mut self.markers {
            let turned = marker.point.advance(time.elapsed, &self.params, marker.path);
            let transform = self.scene.transform_mut(marker.node);
            transform.position = marker.point.position;
            match turned {
                Ok(increment) => transform.premultiply(&increment),
                Err(skipped) => {
                    trace!(path = ?marker.path, reason = %skipped, "Facing update skipped")
                }
            }
        }
    }
}
