/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

/// Triangles with a smaller doubled area than this are dropped by the generators
const DEGENERATE_AREA: f32 = 1e-6;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices, counter-clockwise when seen from the front
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a flat-shaded triangle whose vertex normals equal the face normal
    pub fn from_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = (b - a).cross(&(c - a)).normalize();
        let vertex = |p: Point3<f32>| Vertex {
            position: p,
            normal,
        };
        Self::new(vertex(a), vertex(b), vertex(c))
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a triangle from positions, skipping zero-area ones (poles, cone tips)
    fn push_face(&mut self, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) {
        if (b - a).cross(&(c - a)).norm() > DEGENERATE_AREA {
            self.add_triangle(Triangle::from_points(a, b, c));
        }
    }

    /// Add a quad given counter-clockwise corners
    fn push_quad(&mut self, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>, d: Point3<f32>) {
        self.push_face(a, b, c);
        self.push_face(a, c, d);
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
        let p = Point3::new;
        let mut mesh = Self::with_capacity(12);

        mesh.push_quad(p(-x, -y, z), p(x, -y, z), p(x, y, z), p(-x, y, z));
        mesh.push_quad(p(x, -y, -z), p(-x, -y, -z), p(-x, y, -z), p(x, y, -z));
        mesh.push_quad(p(x, -y, z), p(x, -y, -z), p(x, y, -z), p(x, y, z));
        mesh.push_quad(p(-x, -y, -z), p(-x, -y, z), p(-x, y, z), p(-x, y, -z));
        mesh.push_quad(p(-x, y, z), p(x, y, z), p(x, y, -z), p(-x, y, -z));
        mesh.push_quad(p(-x, -y, -z), p(x, -y, -z), p(x, -y, z), p(-x, -y, z));

        mesh
    }

    /// Create a simple cube mesh
    pub fn cube(size: f32) -> Self {
        Self::cuboid(size, size, size)
    }

    /// Capped cylinder along Y, centered on the origin
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let ring = |radius: f32, y: f32, i: u32| {
            let theta = TAU * i as f32 / segments as f32;
            Point3::new(radius * theta.sin(), y, radius * theta.cos())
        };
        let mut mesh = Self::with_capacity(segments as usize * 4);

        for i in 0..segments {
            let b0 = ring(radius_bottom, -half, i);
            let b1 = ring(radius_bottom, -half, i + 1);
            let t0 = ring(radius_top, half, i);
            let t1 = ring(radius_top, half, i + 1);

            mesh.push_quad(b0, b1, t1, t0);
            if radius_top > 0.0 {
                mesh.push_face(Point3::new(0.0, half, 0.0), t0, t1);
            }
            if radius_bottom > 0.0 {
                mesh.push_face(Point3::new(0.0, -half, 0.0), b1, b0);
            }
        }

        mesh
    }

    /// Cone along Y with its tip at +height/2
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        Self::cylinder(0.0, radius, height, segments)
    }

    /// Torus in the XY plane around the Z axis
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial = radial_segments.max(3);
        let tubular = tubular_segments.max(3);
        let point = |i: u32, j: u32| {
            let u = TAU * i as f32 / tubular as f32;
            let v = TAU * j as f32 / radial as f32;
            let r = radius + tube * v.cos();
            Point3::new(r * u.cos(), r * u.sin(), tube * v.sin())
        };
        let mut mesh = Self::with_capacity((radial * tubular * 2) as usize);

        for i in 0..tubular {
            for j in 0..radial {
                mesh.push_quad(point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1));
            }
        }

        mesh
    }

    /// UV sphere centered on the origin
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width = width_segments.max(3);
        let height = height_segments.max(2);
        let point = |i: u32, j: u32| {
            let phi = TAU * i as f32 / width as f32;
            let theta = PI * j as f32 / height as f32;
            Point3::new(
                radius * theta.sin() * phi.sin(),
                radius * theta.cos(),
                radius * theta.sin() * phi.cos(),
            )
        };
        let mut mesh = Self::with_capacity((width * height * 2) as usize);

        for j in 0..height {
            for i in 0..width {
                mesh.push_quad(point(i, j + 1), point(i + 1, j + 1), point(i + 1, j), point(i, j));
            }
        }

        mesh
    }

    /// Flat annulus sector in the XY plane facing +Z
    pub fn ring(
        inner_radius: f32,
        outer_radius: f32,
        theta_segments: u32,
        phi_segments: u32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        let theta_segments = theta_segments.max(1);
        let phi_segments = phi_segments.max(1);
        let point = |i: u32, j: u32| {
            let theta = theta_start + theta_length * i as f32 / theta_segments as f32;
            let r = inner_radius + (outer_radius - inner_radius) * j as f32 / phi_segments as f32;
            Point3::new(r * theta.cos(), r * theta.sin(), 0.0)
        };
        let mut mesh = Self::with_capacity((theta_segments * phi_segments * 2) as usize);

        for i in 0..theta_segments {
            for j in 0..phi_segments {
                mesh.push_quad(point(i, j), point(i, j + 1), point(i + 1, j + 1), point(i + 1, j));
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every face normal should point away from `center`
    fn assert_outward(mesh: &Mesh, center: Point3<f32>) {
        for triangle in &mesh.triangles {
            let centroid = (triangle.vertices[0].position.coords
                + triangle.vertices[1].position.coords
                + triangle.vertices[2].position.coords)
                / 3.0;
            let outward = centroid - center.coords;
            assert!(
                triangle.calculate_normal().dot(&outward) > 0.0,
                "inward face at {:?}",
                centroid
            );
        }
    }

    #[test]
    fn test_cube_faces() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles.len(), 12);
        assert_outward(&cube, Point3::origin());
    }

    #[test]
    fn test_cylinder_and_cone_are_closed_outward() {
        let cylinder = Mesh::cylinder(0.4, 0.4, 1.5, 16);
        assert_eq!(cylinder.triangles.len(), 16 * 4);
        assert_outward(&cylinder, Point3::origin());

        // The tip fan collapses to a single triangle per segment
        let cone = Mesh::cone(0.5, 1.0, 16);
        assert_eq!(cone.triangles.len(), 16 * 2);
        assert_outward(&cone, Point3::origin());
    }

    #[test]
    fn test_sphere_drops_pole_slivers() {
        let sphere = Mesh::sphere(3.0, 8, 6);
        // Two pole rows contribute one triangle per segment, the rest two
        assert_eq!(sphere.triangles.len(), 8 * 2 + 8 * 4 * 2);
        assert_outward(&sphere, Point3::origin());
        for triangle in &sphere.triangles {
            for vertex in &triangle.vertices {
                assert!((vertex.position.coords.norm() - 3.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_torus_faces_point_out_of_the_tube() {
        let torus = Mesh::torus(0.5, 0.2, 8, 16);
        assert_eq!(torus.triangles.len(), 8 * 16 * 2);
        for triangle in &torus.triangles {
            let p = triangle.vertices[0].position;
            let ring_center = Vector3::new(p.x, p.y, 0.0).normalize() * 0.5;
            let outward = p.coords - ring_center;
            assert!(triangle.calculate_normal().dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_ring_faces_forward() {
        let ring = Mesh::ring(0.3, 2.0, 30, 1, 0.0, 1.0);
        assert_eq!(ring.triangles.len(), 60);
        for triangle in &ring.triangles {
            assert!((triangle.calculate_normal() - Vector3::z()).norm() < 1e-5);
        }
    }
}
