//! The reference Launchpad layout: pad rows drive patterns on the host,
//! rows can become a scale keyboard, and the host lights the pad back up.
//!
//! ```text
//! rows 0-7 (control):  even rows activate, odd rows mute patterns 0-31
//!                      right key = press the whole row
//! rows 4-7 (split):    scale keyboard, one octave per row
//! host → pad:          octave 8..1 → row 0..7, semitone → column,
//!                      velocity bucket → color
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::config::{ControlRemap, KeyboardConfig, RouterConfig};
use crate::error::{ConfigError, RangeError};
use crate::events::PortId;
use crate::grid::{self, C, GREEN, OCTAVE, ORANGE, RED, ScaleTable, YELLOW};
use crate::pipeline::{
    self, KindClass, PipelineNode, Predicate, Source, Transform, VelocityOp, chain, chain_all,
    fan_out, filter, negate, override_with, transform,
};
use crate::scene::{Scene, SceneRegistry, SceneRouter, key_split};

/// Control value that activates a pattern on the host.
pub const ACTIVE: u8 = 0;
/// Control value that mutes a pattern on the host.
pub const MUTED: u8 = 127;
/// c4: lowest host note lit in split scenes, keeping beat lights off the
/// keyboard rows.
pub const SPLIT_HOST_LOWEST: u8 = 72;

/// Per row: echo color, transpose to the pattern number, control value.
const CONTROL_ROWS: [(u8, i16, u8); 8] = [
    (GREEN, 0, ACTIVE),
    (RED, -16, MUTED),
    (GREEN, -16, ACTIVE),
    (RED, -32, MUTED),
    (GREEN, -32, ACTIVE),
    (RED, -48, MUTED),
    (GREEN, -48, ACTIVE),
    (RED, -64, MUTED),
];

/// Row colors of the full keyboard.
pub const FULL_KEYBOARD_COLORS: [u8; 8] = [2, RED, ORANGE, 35, YELLOW, 50, 49, GREEN];
/// Row colors of the half keyboard.
pub const HALF_KEYBOARD_COLORS: [u8; 8] = [RED, ORANGE, YELLOW, GREEN, RED, ORANGE, YELLOW, GREEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenePreset {
    ControlKeyboard,
    Control,
    Keyboard,
    ControlCandy,
    ControlKeyboardCandy,
    KeyboardCandy,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 6] = [
        ScenePreset::ControlKeyboard,
        ScenePreset::Control,
        ScenePreset::Keyboard,
        ScenePreset::ControlCandy,
        ScenePreset::ControlKeyboardCandy,
        ScenePreset::KeyboardCandy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenePreset::ControlKeyboard => "Control and Keyboard",
            ScenePreset::Control => "Control",
            ScenePreset::Keyboard => "Keyboard",
            ScenePreset::ControlCandy => "Control Candy",
            ScenePreset::ControlKeyboardCandy => "Control Keyboard Candy",
            ScenePreset::KeyboardCandy => "Keyboard Candy",
        }
    }
}

/// Builds the scene graphs for one keyboard setup.
#[derive(Debug, Clone)]
pub struct Layout {
    pub tonic: u8,
    pub scale: ScaleTable,
    pub split: u8,
    pub half_octaves: i8,
    pub full_octaves: i8,
    pub remaps: Vec<ControlRemap>,
}

impl Layout {
    pub fn new(keyboard: &KeyboardConfig, remaps: &[ControlRemap]) -> Result<Self, ConfigError> {
        Ok(Self {
            tonic: keyboard.tonic,
            scale: keyboard.scale_table()?,
            split: keyboard.split,
            half_octaves: keyboard.half_octaves,
            full_octaves: keyboard.full_octaves,
            remaps: remaps.to_vec(),
        })
    }

    /// Pad presses become pattern activate/mute controls; each key echoes
    /// its row color back to the pad.
    pub fn control_map(&self) -> Result<PipelineNode, RangeError> {
        let not_right = negate(pipeline::only_right()?);
        let mut rows = Vec::with_capacity(CONTROL_ROWS.len());
        for (row, (color, shift, value)) in CONTROL_ROWS.into_iter().enumerate() {
            rows.push(chain(
                filter(pipeline::row_filter(row as u8)?),
                fan_out([
                    echo_color(color),
                    chain_all([
                        filter(not_right.clone()),
                        transform(Transform::Transpose(shift)),
                        transform(Transform::ToControl {
                            number: Source::Number,
                            value: Source::Fixed(value),
                        }),
                        transform(Transform::Port(PortId::HostControlOut)),
                    ]),
                ]),
            ));
        }
        Ok(fan_out(rows))
    }

    /// Right keys press their entire row instead, every other event passes.
    pub fn entire_row_override(&self) -> Result<PipelineNode, RangeError> {
        let mut rows = Vec::with_capacity(grid::SIDE as usize);
        for row in 0..grid::SIDE {
            let mut keys = Vec::with_capacity(9);
            for column in 0..grid::SIDE {
                keys.push(pipeline::square_key(row, column)?);
            }
            keys.push(pipeline::right_key(row)?);
            rows.push(chain(filter(pipeline::row_filter(row)?), fan_out(keys)));
        }
        Ok(override_with(
            PipelineNode::Pass,
            fan_out(rows),
            pipeline::only_right()?,
        ))
    }

    /// Configured control-number rewrites, applied in order.
    pub fn remap_chain(&self) -> PipelineNode {
        chain_all(self.remaps.iter().map(|remap| {
            override_with(
                PipelineNode::Pass,
                transform(Transform::ToControl {
                    number: Source::Fixed(remap.to),
                    value: Source::Value,
                }),
                Predicate::controls([remap.from]),
            )
        }))
    }

    pub fn full_control(&self) -> Result<PipelineNode, RangeError> {
        Ok(chain_all([
            self.entire_row_override()?,
            self.control_map()?,
            self.remap_chain(),
        ]))
    }

    /// Rows in `rows` play the scale, one octave per row starting
    /// `octaves` octaves from the tonic.
    pub fn keyboard(
        &self,
        rows: Range<u8>,
        octaves: i8,
        colors: &[u8; 8],
    ) -> Result<PipelineNode, RangeError> {
        let not_right = negate(pipeline::only_right()?);
        let mut branches = Vec::with_capacity(rows.len());
        for row in rows {
            let row_keys = pipeline::row_filter(row)?;
            let shift = self.tonic as i16 + octaves as i16 * OCTAVE as i16 - 4 * row as i16;
            let color = colors[row as usize];
            branches.push(chain(
                filter(row_keys),
                fan_out([
                    echo_color(color),
                    chain_all([
                        filter(not_right.clone()),
                        transform(Transform::Transpose(shift)),
                        grid::make_scale(self.tonic, &self.scale),
                        transform(Transform::Port(PortId::HostControlOut)),
                    ]),
                ]),
            ));
        }
        Ok(fan_out(branches))
    }

    pub fn full_keyboard(&self) -> Result<PipelineNode, RangeError> {
        self.keyboard(0..grid::SIDE, self.full_octaves, &FULL_KEYBOARD_COLORS)
    }

    /// Control rows above the split, keyboard rows below it.
    pub fn half_half(&self) -> Result<PipelineNode, RangeError> {
        let first_row = grid::row_of(self.split);
        Ok(key_split(
            self.split,
            self.full_control()?,
            self.keyboard(first_row..grid::SIDE, self.half_octaves, &HALF_KEYBOARD_COLORS)?,
        ))
    }

    pub fn scene(&self, preset: ScenePreset) -> Result<Scene, RangeError> {
        let (from_pad, to_pad) = match preset {
            ScenePreset::ControlKeyboard => (
                self.half_half()?,
                host_to_pad(PortId::HostBeatIn, Some(SPLIT_HOST_LOWEST)),
            ),
            ScenePreset::Control => (self.full_control()?, host_to_pad(PortId::HostBeatIn, None)),
            ScenePreset::Keyboard => (self.full_keyboard()?, PipelineNode::Discard),
            ScenePreset::ControlCandy => {
                (self.full_control()?, host_to_pad(PortId::HostCandyIn, None))
            }
            ScenePreset::ControlKeyboardCandy => {
                (self.half_half()?, host_to_pad(PortId::HostCandyIn, None))
            }
            ScenePreset::KeyboardCandy => {
                (self.full_keyboard()?, host_to_pad(PortId::HostCandyIn, None))
            }
        };
        Ok(Scene::new(preset.name(), from_pad, to_pad))
    }
}

fn echo_color(color: u8) -> PipelineNode {
    chain(
        transform(Transform::Velocity(VelocityOp::Fixed(color))),
        transform(Transform::Port(PortId::PadOut)),
    )
}

/// Host velocities become colors; releases pass untouched.
pub fn light_map() -> PipelineNode {
    let mut buckets = vec![filter(Predicate::Kind(KindClass::NoteOff))];
    for lo in (0..128u8).step_by(8) {
        buckets.push(chain(
            filter(Predicate::velocities_in(lo as u16, lo as u16 + 8)),
            transform(Transform::Velocity(VelocityOp::Fixed(grid::velocity_color(lo)))),
        ));
    }
    fan_out(buckets)
}

/// Host octaves 8..1 land on pad rows 0..7, semitones on columns.
pub fn place_map() -> PipelineNode {
    fan_out((0..grid::SIDE).map(|i| {
        let lo = C as u16 + i as u16 * OCTAVE as u16;
        chain(
            filter(Predicate::notes_in(lo, lo + 8)),
            transform(Transform::Transpose(88 - 28 * i as i16)),
        )
    }))
}

pub fn pc_to_pad() -> PipelineNode {
    chain(light_map(), place_map())
}

/// Lights the pad from one host input, optionally only from `lowest` up.
pub fn host_to_pad(input: PortId, lowest: Option<u8>) -> PipelineNode {
    let mut stages = vec![
        filter(Predicate::Port(input)),
        transform(Transform::Port(PortId::PadOut)),
    ];
    if let Some(lowest) = lowest {
        stages.push(filter(Predicate::notes_in(lowest as u16, 128)));
    }
    stages.push(pc_to_pad());
    chain_all(stages)
}

/// Builds every configured scene.
pub fn build_registry(config: &RouterConfig) -> Result<SceneRegistry, ConfigError> {
    let layout = Layout::new(&config.keyboard, &config.control_remaps)?;
    let mut registry = SceneRegistry::new();
    for (id, preset) in &config.scenes {
        registry = registry.with(*id, layout.scene(*preset)?);
    }
    tracing::debug!(scenes = registry.len(), "scene registry built");
    Ok(registry)
}

/// Registry plus switch mode, with the initial scene already selected.
pub fn build_router(config: &RouterConfig) -> Result<SceneRouter, ConfigError> {
    let router = SceneRouter::new(build_registry(config)?, config.scene_switch);
    if let Some(id) = config.initial_scene {
        router.select(id)?;
    }
    Ok(router)
}
