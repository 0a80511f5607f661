/// stage3d Core Library - Scenes, demos and the orbit-facing update
///
/// This library holds everything the hosts share: geometry generators,
/// STL assets, the scene graph, cameras, configuration and the three demos.
/// Hosts only feed it time and key events and draw what it produces.
pub mod assets;
pub mod clock;
pub mod config;
pub mod controls;
pub mod demos;
pub mod error;
pub mod geometry;
pub mod input;
pub mod motion;
pub mod orbit;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use clock::{Clock, FrameTime, ManualClock, SystemClock};
pub use config::{load_config, Config};
pub use controls::OrbitControls;
pub use demos::{build_demo, AssetPaths, Demo, DemoKind};
pub use error::{AssetError, ConfigError, NumericDegeneracy};
pub use geometry::{Mesh, Triangle, Vertex};
pub use input::{InputState, InputTracker, Key};
pub use orbit::{MovingPoint, OrbitParameters, OrbitPath};
pub use projection::Camera;
pub use scene::{Color, Scene};
pub use transform::{RotationState, Transform};
