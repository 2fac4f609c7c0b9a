pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod midi;
pub mod pipeline;
pub mod scene;

pub use config::RouterConfig;
pub use engine::{EngineHandle, EngineStats, spawn_engine};
pub use error::{ConfigError, MidiError, RangeError, ScaleError, SceneNotFoundWarning};
pub use events::{Event, EventKind, PortId};
pub use layout::{ScenePreset, build_registry, build_router};
pub use scene::{Scene, SceneId, SceneRegistry, SceneRouter, SwitchMode};
