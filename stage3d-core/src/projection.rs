/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: aspect_ratio(width as f32, height as f32),
            near: 0.1,
            far: 100.0,
        }
    }

    /// Perspective camera looking from `position` at `target`
    pub fn perspective(
        fovy_degrees: f32,
        near: f32,
        far: f32,
        position: Point3<f32>,
        target: Point3<f32>,
    ) -> Self {
        Self {
            position,
            target,
            fov: fovy_degrees.to_radians(),
            near,
            far,
            ..Self::default()
        }
    }

    /// Follow a viewport resize
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined projection * view matrix
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to screen space using a precomputed
    /// `view_projection` matrix. Returns `(x, y, depth)` with depth in
    /// normalized device units, smaller meaning closer.
    pub fn project_to_screen(
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = view_projection * point.to_homogeneous();

        // Behind the eye or on the eye plane
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        // Convert to screen space; x/y outside the viewport are clipped per pixel
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn aspect_ratio(width: f32, height: f32) -> f32 {
    if height <= 0.0 {
        1.0
    } else {
        width / height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.fov - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_viewport_resize_updates_aspect() {
        let mut camera =
            Camera::perspective(60.0, 0.1, 100.0, Point3::new(0.0, 2.0, 20.0), Point3::origin());
        camera.set_viewport(1920.0, 1080.0);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);

        // A collapsed window must not poison the projection with inf
        camera.set_viewport(640.0, 0.0);
        assert_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera =
            Camera::perspective(60.0, 0.1, 100.0, Point3::new(0.0, 2.0, 20.0), Point3::origin());
        let vp = camera.view_projection();
        let (x, y, depth) = Camera::project_to_screen(&vp, &Point3::origin(), 80, 40).unwrap();
        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 20.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera =
            Camera::perspective(60.0, 0.1, 100.0, Point3::new(0.0, 0.0, 10.0), Point3::origin());
        let vp = camera.view_projection();
        assert!(Camera::project_to_screen(&vp, &Point3::new(0.0, 0.0, 20.0), 80, 40).is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera =
            Camera::perspective(60.0, 0.1, 100.0, Point3::new(0.0, 0.0, 10.0), Point3::origin());
        let vp = camera.view_projection();
        let (_, _, near) =
            Camera::project_to_screen(&vp, &Point3::new(0.0, 0.0, 5.0), 80, 40).unwrap();
        let (_, _, far) =
            Camera::project_to_screen(&vp, &Point3::new(0.0, 0.0, -5.0), 80, 40).unwrap();
        assert!(near < far);
    }
}
