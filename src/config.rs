use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::events::PortId;
use crate::grid::{A, ScaleName, ScaleTable};
use crate::layout::ScenePreset;
use crate::scene::{SceneId, SwitchMode};

/// How to reach one of the router's ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortSpec {
    /// Attach to an existing port whose name contains this text.
    Connect(String),
    /// Create a named virtual port others can connect to.
    Virtual(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortConfig {
    pub pad_in: PortSpec,
    pub pad_out: PortSpec,
    pub host_control_out: PortSpec,
    pub host_beat_in: Option<PortSpec>,
    pub host_candy_in: Option<PortSpec>,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            pad_in: PortSpec::Connect("Launchpad".into()),
            pad_out: PortSpec::Connect("Launchpad".into()),
            host_control_out: PortSpec::Virtual("To PC".into()),
            host_beat_in: Some(PortSpec::Virtual("Beat".into())),
            host_candy_in: Some(PortSpec::Virtual("Candy".into())),
        }
    }
}

impl PortConfig {
    pub fn spec(&self, port: PortId) -> Option<&PortSpec> {
        match port {
            PortId::PadIn => Some(&self.pad_in),
            PortId::PadOut => Some(&self.pad_out),
            PortId::HostControlOut => Some(&self.host_control_out),
            PortId::HostBeatIn => self.host_beat_in.as_ref(),
            PortId::HostCandyIn => self.host_candy_in.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub tonic: u8,
    pub scale: ScaleName,
    /// Overrides `scale` with explicit intervals when set.
    pub custom_scale: Option<[u8; 8]>,
    /// First note of the keyboard half in split scenes.
    pub split: u8,
    pub half_octaves: i8,
    pub full_octaves: i8,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            tonic: A,
            scale: ScaleName::Minor,
            custom_scale: None,
            split: 64,
            half_octaves: -2,
            full_octaves: 0,
        }
    }
}

impl KeyboardConfig {
    pub fn scale_table(&self) -> Result<ScaleTable, ConfigError> {
        match self.custom_scale {
            Some(intervals) => Ok(ScaleTable::new(intervals)?),
            None => Ok(self.scale.table()),
        }
    }
}

/// Rewrites control `from` to control `to`, keeping the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRemap {
    pub from: u8,
    pub to: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub client_name: String,
    pub ports: PortConfig,
    pub keyboard: KeyboardConfig,
    pub scenes: BTreeMap<SceneId, ScenePreset>,
    pub initial_scene: Option<SceneId>,
    pub scene_switch: SwitchMode,
    pub control_remaps: Vec<ControlRemap>,
    pub reset_pad_on_start: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            client_name: "launchpad".into(),
            ports: PortConfig::default(),
            keyboard: KeyboardConfig::default(),
            scenes: ScenePreset::ALL
                .iter()
                .enumerate()
                .map(|(i, preset)| (i as SceneId + 1, *preset))
                .collect(),
            initial_scene: Some(1),
            scene_switch: SwitchMode::default(),
            // control 7 mutes the channel on the host
            control_remaps: vec![ControlRemap { from: 7, to: 8 }],
            reset_pad_on_start: true,
        }
    }
}

impl RouterConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ron_string = fs::read_to_string(path)?;
        Self::from_ron(&ron_string)
    }

    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaleError;

    #[test]
    fn defaults_hold_the_reference_setup() {
        let config = RouterConfig::default();
        assert_eq!(config.scenes.len(), 6);
        assert_eq!(config.scenes[&1], ScenePreset::ControlKeyboard);
        assert_eq!(config.initial_scene, Some(1));
        assert_eq!(config.control_remaps, vec![ControlRemap { from: 7, to: 8 }]);
        assert_eq!(config.scene_switch, SwitchMode::Cycle { control: 111 });
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = RouterConfig::from_ron(
            r#"(
                client_name: "pad",
                keyboard: (tonic: 24, scale: Dorian),
                scenes: { 1: Keyboard, 2: Control },
                scene_switch: TopRow,
                control_remaps: [],
            )"#,
        )
        .unwrap();
        assert_eq!(config.client_name, "pad");
        assert_eq!(config.keyboard.tonic, 24);
        assert_eq!(config.keyboard.scale, ScaleName::Dorian);
        assert_eq!(config.keyboard.split, 64);
        assert_eq!(config.scenes.len(), 2);
        assert_eq!(config.scene_switch, SwitchMode::TopRow);
        assert!(config.control_remaps.is_empty());
        assert!(config.reset_pad_on_start);
    }

    #[test]
    fn ron_round_trip() {
        let config = RouterConfig::default();
        let parsed = RouterConfig::from_ron(&config.to_ron().unwrap()).unwrap();
        assert_eq!(parsed.scenes, config.scenes);
        assert_eq!(parsed.ports.pad_in, config.ports.pad_in);
        assert_eq!(parsed.ports.host_beat_in, config.ports.host_beat_in);
    }

    #[test]
    fn custom_scale_is_validated() {
        let keyboard = KeyboardConfig {
            custom_scale: Some([0, 2, 3, 5, 7, 8, 10, 11]),
            ..KeyboardConfig::default()
        };
        assert!(matches!(
            keyboard.scale_table(),
            Err(ConfigError::Scale(ScaleError::OpenOctave(11)))
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        assert!(matches!(
            RouterConfig::from_ron("(client_name: 3)"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("padroute_config_{}", std::process::id()));
        let path = dir.join("router.ron");
        let mut config = RouterConfig::default();
        config.initial_scene = None;
        config.save(&path).unwrap();

        let loaded = RouterConfig::load(&path).unwrap();
        assert_eq!(loaded.initial_scene, None);
        fs::remove_dir_all(dir).unwrap();
    }
}
