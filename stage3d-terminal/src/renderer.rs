/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use stage3d_core::scene::{Color, Material, Scene};
use stage3d_core::{Camera, Mesh};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

/// Lighting shared by every face of one frame
struct Lighting<'a> {
    scene: &'a Scene,
    eye: Point3<f32>,
    view_projection: Matrix4<f32>,
}

/// Screen-space vertex: pixel x, pixel y, NDC depth
type ScreenVertex = (f32, f32, f32);

/// ASCII renderer that converts a scene to colored terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    background: Color,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::BLACK; size],
            background: Color::BLACK,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate the buffers for a new terminal size
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, background: Color) {
        self.background = background;
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(background);
    }

    /// Clear to the scene's background and draw every mesh node
    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        self.clear(scene.clear_color);
        let lighting = Lighting {
            scene,
            eye: camera.position,
            view_projection: camera.view_projection(),
        };
        for renderable in scene.renderables() {
            self.render_mesh(renderable.mesh, &renderable.world, renderable.material, &lighting);
        }
    }

    fn render_mesh(
        &mut self,
        mesh: &Mesh,
        world: &Matrix4<f32>,
        material: &Material,
        lighting: &Lighting<'_>,
    ) {
        for triangle in &mesh.triangles {
            let [a, b, c] = triangle.vertices.map(|v| world.transform_point(&v.position));

            // Face normal in world space, so scaled and rotated nodes shade correctly
            let Some(mut normal) = (b - a).cross(&(c - a)).try_normalize(f32::EPSILON) else {
                continue;
            };
            if normal.dot(&(lighting.eye - a)) < 0.0 {
                if !material.double_sided {
                    continue;
                }
                normal = -normal;
            }

            let (width, height) = (self.width as u32, self.height as u32);
            let project = |point: &Point3<f32>| {
                Camera::project_to_screen(&lighting.view_projection, point, width, height)
            };
            // Triangle is clipped
            let (Some(sa), Some(sb), Some(sc)) = (project(&a), project(&b), project(&c)) else {
                continue;
            };

            let scene = lighting.scene;
            let sun = &scene.directional_light;
            let diffuse = normal.dot(&sun.direction()).max(0.0) * sun.intensity;
            let ambient = scene.ambient_light.intensity;
            let light = sun.color.scaled(diffuse) + scene.ambient_light.color.scaled(ambient);
            let mut color = material.color.modulate(&light);

            let brightness = (diffuse + ambient).clamp(0.0, 1.0);
            // Lit surfaces never map to the blank background character
            let last = LUMINOSITY_RAMP.len() - 1;
            let char_index = ((brightness * last as f32) as usize).clamp(1, last);

            if let Some(fog) = scene.fog {
                let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
                color = color.lerp(&fog.color, fog.factor((centroid - lighting.eye).norm()));
            }

            self.rasterize_triangle(&[sa, sb, sc], LUMINOSITY_RAMP[char_index], color);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenVertex; 3], character: char, color: Color) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let weights = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py));
                if let Some((w0, w1, w2)) = weights {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.color_buffer[idx] = color;
                        }
                    }
                }
            }
        }
    }

    /// Character and color at a cell, if it is on screen
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Color)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    /// Number of cells covered by geometry this frame
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    /// Queue the frame, only emitting color changes between cells
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_terminal(self.background)))?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let rgb = self.color_buffer[idx].to_rgb8();
                if current != Some(rgb) {
                    writer.queue(SetForegroundColor(rgb_color(rgb)))?;
                    current = Some(rgb);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_terminal(color: Color) -> style::Color {
    rgb_color(color.to_rgb8())
}

fn rgb_color((r, g, b): (u8, u8, u8)) -> style::Color {
    style::Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
