/// stage3d Web - drive a demo from a browser page
///
/// The page owns the WebGL side. It forwards key events and
/// `requestAnimationFrame` timestamps, then reads node transforms back
/// every frame and copies them onto its own objects.
use stage3d_core::assets::parse_stl;
use stage3d_core::demos::{OrbitAssets, OrbitDemo};
use stage3d_core::{
    build_demo, AssetPaths, Camera, Clock, Config, Demo, DemoKind, InputTracker, Key, ManualClock,
    OrbitControls,
};
use wasm_bindgen::prelude::*;

/// Floats per node in [`WebDemo::transforms`]: position, quaternion (xyzw), scale
pub const TRANSFORM_STRIDE: usize = 10;

#[wasm_bindgen]
pub struct WebDemo {
    demo: Box<dyn Demo>,
    camera: Camera,
    controls: OrbitControls,
    tracker: InputTracker,
    clock: ManualClock,
    /// Timestamp of the first frame; elapsed time counts from here
    start_ms: Option<f64>,
}

#[wasm_bindgen]
impl WebDemo {
    /// Build the named demo (`scatter`, `fan` or `orbit`) with default settings
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str) -> Result<WebDemo, JsValue> {
        let kind: DemoKind = kind.parse().map_err(to_js)?;
        let demo = build_demo(kind, &Config::default(), &AssetPaths::default()).map_err(to_js)?;
        Ok(Self::from_demo(demo))
    }

    /// Orbit demo with STL meshes fetched by the page, earth first
    pub fn orbit_with_meshes(
        earth: Option<js_sys::Uint8Array>,
        marker: Option<js_sys::Uint8Array>,
    ) -> Result<WebDemo, JsValue> {
        Self::orbit_from_stl(earth.map(|a| a.to_vec()), marker.map(|a| a.to_vec()))
            .map_err(to_js)
    }

    pub fn kind(&self) -> String {
        self.demo.kind().to_string()
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(key) = Key::from_name(key) {
            self.tracker.press(key);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(key) = Key::from_name(key) {
            self.tracker.release(key);
        }
    }

    /// Window lost focus: forget held keys
    pub fn blur(&mut self) {
        self.tracker.release_all();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    /// Orbit the camera around its target, in radians
    pub fn orbit_camera(&mut self, yaw: f32, pitch: f32) {
        self.controls.rotate(yaw, pitch);
    }

    /// Positive moves the camera toward its target
    pub fn dolly(&mut self, amount: f32) {
        self.controls.dolly(amount);
    }

    /// Advance one frame at the `requestAnimationFrame` timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        let start = *self.start_ms.get_or_insert(now_ms);
        self.clock.set(((now_ms - start) / 1000.0) as f32);
        let time = self.clock.tick();
        let input = self.tracker.snapshot();
        self.demo.step(time, &input);
        self.controls.update(&mut self.camera);
    }

    /// Advance one frame using `performance.now()`
    pub fn tick(&mut self) -> Result<(), JsValue> {
        let performance = web_sys::window()
            .and_then(|window| window.performance())
            .ok_or_else(|| JsValue::from_str("performance timer unavailable"))?;
        self.frame(performance.now());
        Ok(())
    }

    /// Local transform of every node, [`TRANSFORM_STRIDE`] floats each
    pub fn transforms(&self) -> Vec<f32> {
        let scene = self.demo.scene();
        let mut out = Vec::with_capacity(scene.len() * TRANSFORM_STRIDE);
        for (_, node) in scene.nodes() {
            let t = &node.transform;
            let q = t.orientation().quaternion();
            out.extend_from_slice(&[t.position.x, t.position.y, t.position.z]);
            out.extend_from_slice(&[q.i, q.j, q.k, q.w]);
            out.extend_from_slice(&[t.scale.x, t.scale.y, t.scale.z]);
        }
        out
    }

    /// Parent index of every node, -1 for roots
    pub fn parents(&self) -> Vec<i32> {
        self.demo
            .scene()
            .nodes()
            .map(|(_, node)| node.parent().map_or(-1, |p| p.index() as i32))
            .collect()
    }

    pub fn node_names(&self) -> Vec<String> {
        self.demo.scene().nodes().map(|(_, node)| node.name.clone()).collect()
    }

    /// Mesh index of every node, -1 for groups
    pub fn node_meshes(&self) -> Vec<i32> {
        self.demo
            .scene()
            .nodes()
            .map(|(_, node)| node.mesh.map_or(-1, |m| m.index() as i32))
            .collect()
    }

    /// Material of every node as `r, g, b, double_sided`; groups are all zero
    pub fn node_materials(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.demo.scene().len() * 4);
        for (_, node) in self.demo.scene().nodes() {
            match node.material {
                Some(m) => {
                    let double_sided = if m.double_sided { 1.0 } else { 0.0 };
                    out.extend_from_slice(&[m.color.r, m.color.g, m.color.b, double_sided]);
                }
                None => out.extend_from_slice(&[0.0; 4]),
            }
        }
        out
    }

    pub fn mesh_count(&self) -> usize {
        self.demo.scene().meshes().len()
    }

    /// Triangle soup for mesh `index`: 9 position floats per triangle
    pub fn mesh_positions(&self, index: usize) -> Vec<f32> {
        let Some(mesh) = self.demo.scene().meshes().get(index) else {
            return Vec::new();
        };
        mesh.triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Camera as `position xyz, target xyz, fovy (degrees), aspect, near, far`
    pub fn camera(&self) -> Vec<f32> {
        let c = &self.camera;
        vec![
            c.position.x,
            c.position.y,
            c.position.z,
            c.target.x,
            c.target.y,
            c.target.z,
            c.fov.to_degrees(),
            c.aspect,
            c.near,
            c.far,
        ]
    }

    pub fn clear_color(&self) -> Vec<f32> {
        let c = self.demo.scene().clear_color;
        vec![c.r, c.g, c.b]
    }

    /// Fog as `r, g, b, near, far`; empty when the scene has none
    pub fn fog(&self) -> Vec<f32> {
        match self.demo.scene().fog {
            Some(fog) => vec![fog.color.r, fog.color.g, fog.color.b, fog.near, fog.far],
            None => Vec::new(),
        }
    }
}

impl WebDemo {
    fn from_demo(demo: Box<dyn Demo>) -> Self {
        let camera = demo.camera();
        Self {
            demo,
            camera,
            controls: OrbitControls::default(),
            tracker: InputTracker::new(),
            clock: ManualClock::new(),
            start_ms: None,
        }
    }

    fn orbit_from_stl(
        earth: Option<Vec<u8>>,
        marker: Option<Vec<u8>>,
    ) -> Result<Self, stage3d_core::AssetError> {
        let defaults = OrbitAssets::default();
        let assets = OrbitAssets {
            earth: earth.map(|bytes| parse_stl(&bytes)).transpose()?.unwrap_or(defaults.earth),
            marker: marker.map(|bytes| parse_stl(&bytes)).transpose()?.unwrap_or(defaults.marker),
        };
        let params = Config::default().orbit.parameters();
        tracing::info!(
            earth = assets.earth.triangles.len(),
            marker = assets.marker.triangles.len(),
            "Orbit meshes loaded"
        );
        Ok(Self::from_demo(Box::new(OrbitDemo::new(params, assets))))
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
}
