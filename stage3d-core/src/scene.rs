//! Scene graph: nodes with parent-child grouping, shared meshes, lights

use crate::geometry::Mesh;
use crate::transform::Transform;
use nalgebra::{Matrix4, Vector3};

/// Linear RGB in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn modulate(&self, other: &Color) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Rec. 709 luma
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (byte(self.r), byte(self.g), byte(self.b))
    }
}

impl std::ops::Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    /// Render back faces too (flat meshes such as fan blades)
    pub double_sided: bool,
}

impl Material {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            double_sided: false,
        }
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

/// Light shining from `position` toward the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light
    pub fn direction(&self) -> Vector3<f32> {
        self.position.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Linear distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// 0 before `near`, 1 past `far`
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

impl MeshId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshId>,
    pub material: Option<Material>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A drawable node resolved for rendering
pub struct Renderable<'a> {
    pub id: NodeId,
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub world: Matrix4<f32>,
}

/// Nodes are stored in insertion order and a parent always precedes its
/// children, so world matrices resolve in a single forward pass.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    pub clear_color: Color,
    pub directional_light: DirectionalLight,
    pub ambient_light: AmbientLight,
    pub fog: Option<Fog>,
}

impl Scene {
    pub fn new(clear_color: Color) -> Self {
        Self {
            nodes: Vec::new(),
            meshes: Vec::new(),
            clear_color,
            directional_light: DirectionalLight {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vector3::new(1.0, 1.0, 1.0),
            },
            ambient_light: AmbientLight {
                color: Color::WHITE,
                intensity: 0.1,
            },
            fog: None,
        }
    }

    /// Register geometry once; many nodes may draw it
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Add an empty grouping node
    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        transform: Transform,
    ) -> NodeId {
        self.push_node(name.into(), parent, transform, None, None)
    }

    pub fn add_mesh_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        mesh: MeshId,
        material: Material,
        transform: Transform,
    ) -> NodeId {
        self.push_node(name.into(), parent, transform, Some(mesh), Some(material))
    }

    fn push_node(
        &mut self,
        name: String,
        parent: Option<NodeId>,
        transform: Transform,
        mesh: Option<MeshId>,
        material: Option<Material>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(Node {
            name,
            transform,
            mesh,
            material,
            parent,
            children: Vec::new(),
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].transform
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// World matrix of every node, indexed like the nodes
    pub fn world_matrices(&self) -> Vec<Matrix4<f32>> {
        let mut world: Vec<Matrix4<f32>> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.local_matrix();
            let matrix = match node.parent {
                Some(parent) => world[parent.0] * local,
                None => local,
            };
            world.push(matrix);
        }
        world
    }

    /// Every node that has both a mesh and a material
    pub fn renderables(&self) -> Vec<Renderable<'_>> {
        let world = self.world_matrices();
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match (node.mesh, node.material.as_ref()) {
                (Some(mesh), Some(material)) => Some(Renderable {
                    id: NodeId(i),
                    mesh: &self.meshes[mesh.0],
                    material,
                    world: world[i],
                }),
                _ => None,
            })
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|node| node.mesh)
            .map(|mesh| self.meshes[mesh.0].triangles.len())
            .sum()
    }
}
