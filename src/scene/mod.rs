mod registry;
mod router;
mod split;

pub use registry::{Scene, SceneId, SceneRegistry};
pub use router::{ActiveScene, SceneRouter, SwitchAction, SwitchMode};
pub use split::{KeySplit, Side, key_split};
