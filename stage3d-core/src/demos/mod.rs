//! The three demos and the trait hosts drive them through

mod fan;
mod orbit;
mod scatter;

pub use fan::FanDemo;
pub use orbit::{OrbitAssets, OrbitDemo};
pub use scatter::{Mover, ScatterDemo, Shape};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::clock::FrameTime;
use crate::config::Config;
use crate::error::AssetError;
use crate::input::InputState;
use crate::projection::Camera;
use crate::scene::Scene;

/// A self-contained animated scene.
///
/// Hosts call [`Demo::step`] once per frame, then draw [`Demo::scene`].
pub trait Demo {
    fn kind(&self) -> DemoKind;

    fn scene(&self) -> &Scene;

    /// Where the camera starts
    fn camera(&self) -> Camera;

    /// Advance one frame
    fn step(&mut self, time: FrameTime, input: &InputState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    Scatter,
    Fan,
    Orbit,
}

impl DemoKind {
    pub const ALL: [DemoKind; 3] = [DemoKind::Scatter, DemoKind::Fan, DemoKind::Orbit];

    pub fn name(&self) -> &'static str {
        match self {
            DemoKind::Scatter => "scatter",
            DemoKind::Fan => "fan",
            DemoKind::Orbit => "orbit",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown demo '{0}', expected one of: scatter, fan, orbit")]
pub struct UnknownDemo(pub String);

impl FromStr for DemoKind {
    type Err = UnknownDemo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DemoKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDemo(s.to_string()))
    }
}

/// Optional mesh files replacing the procedural ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPaths {
    pub earth_mesh: Option<PathBuf>,
    pub marker_mesh: Option<PathBuf>,
}

/// Build a demo, loading any assets it needs first
pub fn build_demo(
    kind: DemoKind,
    config: &Config,
    assets: &AssetPaths,
) -> Result<Box<dyn Demo>, AssetError> {
    let demo: Box<dyn Demo> = match kind {
        DemoKind::Scatter => Box::new(ScatterDemo::new(&config.scatter)),
        DemoKind::Fan => Box::new(FanDemo::new(&config.fan)),
        DemoKind::Orbit => {
            let loaded = OrbitAssets::load(assets)?;
            Box::new(OrbitDemo::new(config.orbit.parameters(), loaded))
        }
    };
    tracing::info!(
        demo = %kind,
        nodes = demo.scene().len(),
        triangles = demo.scene().triangle_count(),
        "Demo ready"
    );
    Ok(demo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_kind_parsing() {
        assert_eq!("orbit".parse::<DemoKind>(), Ok(DemoKind::Orbit));
        assert_eq!("Fan".parse::<DemoKind>(), Ok(DemoKind::Fan));
        assert!("teapot".parse::<DemoKind>().is_err());
        assert_eq!(DemoKind::Scatter.to_string(), "scatter");
    }

    #[test]
    fn test_every_demo_builds_and_steps() {
        let mut config = Config::default();
        config.scatter.seed = Some(1);

        for kind in DemoKind::ALL {
            let mut demo = build_demo(kind, &config, &AssetPaths::default()).unwrap();
            assert_eq!(demo.kind(), kind);
            assert!(demo.scene().triangle_count() > 0);

            let input = InputState {
                action_held: true,
                action_pressed: true,
                stop_pressed: false,
            };
            for frame in 0..10 {
                let time = FrameTime {
                    elapsed: frame as f32 / 60.0,
                    delta: 1.0 / 60.0,
                };
                demo.step(time, &input);
            }
            for matrix in demo.scene().world_matrices() {
                assert!(
                    matrix.iter().all(|v| v.is_finite()),
                    "{kind} produced a non-finite transform"
                );
            }
        }
    }
}
