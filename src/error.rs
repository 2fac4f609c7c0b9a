use thiserror::Error;

use crate::events::PortId;
use crate::grid::KeyClass;
use crate::scene::SceneId;

/// A coordinate, event number or color outside its legal domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("{class:?} key has no position row={row} column={column}")]
    Coordinate { class: KeyClass, row: u8, column: u8 },
    #[error("{number} is not a {class:?} key event number")]
    Number { class: KeyClass, number: u8 },
    #[error("color component out of range: green={green} red={red}")]
    Color { green: u8, red: u8 },
    #[error("{0} is not a pad color value")]
    ColorValue(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("scale must start at the tonic, got {0}")]
    NonZeroTonic(u8),
    #[error("scale degree {degree} goes down ({value} < {previous})")]
    NotMonotonic { degree: usize, value: u8, previous: u8 },
    #[error("scale must close the octave at degree 7, got {0}")]
    OpenOctave(u8),
}

/// An unknown scene id was selected; the previous scene stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scene {id} is not registered")]
pub struct SceneNotFoundWarning {
    pub id: SceneId,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("config serialize: {0}")]
    Serialize(#[from] ron::Error),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error("initial scene: {0}")]
    InitialScene(#[from] SceneNotFoundWarning),
}

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("midi init: {0}")]
    Init(#[from] midir::InitError),
    #[error("midi port info: {0}")]
    PortInfo(#[from] midir::PortInfoError),
    #[error("no midi port matching {0:?}")]
    PortNotFound(String),
    #[error("midi connect to {port:?}: {reason}")]
    Connect { port: String, reason: String },
    #[error("no open output for {0:?}")]
    NotOpen(PortId),
    #[error("midi send: {0}")]
    Send(#[from] midir::SendError),
    #[error("virtual midi ports are not supported on this platform")]
    VirtualUnsupported,
}
