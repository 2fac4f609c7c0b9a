//! Pad LED colors.
//!
//! A key is lit by the value of the event that addresses it. Each key has a
//! green and a red LED with brightness 0 (off) to 3 (max).

use crate::error::RangeError;

/// Off. Raw zero is avoided because some renderers read it as "no update".
pub const BLACK: u8 = 4;
pub const RED: u8 = 3;
pub const ORANGE: u8 = 19;
pub const GREEN: u8 = 48;
pub const YELLOW: u8 = 51;

pub const MAX_BRIGHTNESS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PadColor {
    pub green: u8,
    pub red: u8,
}

impl PadColor {
    pub fn new(green: u8, red: u8) -> Result<Self, RangeError> {
        if green > MAX_BRIGHTNESS || red > MAX_BRIGHTNESS {
            return Err(RangeError::Color { green, red });
        }
        Ok(Self { green, red })
    }

    pub fn encode(self) -> u8 {
        if self.green + self.red == 0 {
            BLACK
        } else {
            16 * self.green + self.red
        }
    }

    pub fn decode(value: u8) -> Result<Self, RangeError> {
        match value {
            BLACK => return Ok(Self::default()),
            0 => return Err(RangeError::ColorValue(value)),
            _ => {}
        }
        Self::new(value / 16, value % 16).map_err(|_| RangeError::ColorValue(value))
    }
}

/// Light value for the given amount of green and red.
pub fn color(green: u8, red: u8) -> Result<u8, RangeError> {
    PadColor::new(green, red).map(PadColor::encode)
}

/// Darker variant of a color value, scaled to `thirds`/3 of its brightness.
///
/// Only meaningful for pure green, pure red or yellow; mixed hues such as
/// [`ORANGE`] do not scale component-wise and are the caller's problem.
pub fn darken(value: u8, thirds: u8) -> u8 {
    let scaled = value as u16 * thirds.min(3) as u16 / 3;
    if scaled == 0 { BLACK } else { scaled as u8 }
}

/// Color for a host velocity: 16 buckets of 8, bucket i lights (i/4, i%4).
pub fn velocity_color(velocity: u8) -> u8 {
    let bucket = (velocity & 0x7F) / 8;
    PadColor {
        green: bucket / 4,
        red: bucket % 4,
    }
    .encode()
}
