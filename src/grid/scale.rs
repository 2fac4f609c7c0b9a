use serde::{Deserialize, Serialize};

use crate::error::ScaleError;
use crate::pipeline::{self, PipelineNode, Predicate, Transform};

pub const OCTAVE: u8 = 12;
/// Octaves covered by [`octave_filter`], the longest span usable on the pad.
pub const OCTAVE_SPAN: u8 = 9;

// Note numbers of the lowest usable octave.
pub const A: u8 = 21;
pub const B: u8 = 23;
pub const C: u8 = 24;
pub const D: u8 = 26;
pub const E: u8 = 28;
pub const F: u8 = 29;
pub const G: u8 = 31;

/// Semitone interval from the tonic for each of the 8 scale degrees,
/// degree 7 being the octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleTable([u8; 8]);

impl ScaleTable {
    pub fn new(intervals: [u8; 8]) -> Result<Self, ScaleError> {
        if intervals[0] != 0 {
            return Err(ScaleError::NonZeroTonic(intervals[0]));
        }
        for degree in 1..intervals.len() {
            if intervals[degree] < intervals[degree - 1] {
                return Err(ScaleError::NotMonotonic {
                    degree,
                    value: intervals[degree],
                    previous: intervals[degree - 1],
                });
            }
        }
        if intervals[7] != OCTAVE {
            return Err(ScaleError::OpenOctave(intervals[7]));
        }
        Ok(Self(intervals))
    }

    pub fn intervals(&self) -> &[u8; 8] {
        &self.0
    }

    /// Per-degree offset that moves degree `i` of a chromatic row onto
    /// the scale: `table[i] - i`.
    pub fn transpose_table(&self) -> [i8; 8] {
        let mut offsets = [0; 8];
        for (i, interval) in self.0.iter().enumerate() {
            offsets[i] = *interval as i8 - i as i8;
        }
        offsets
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleName {
    Minor,
    HarmonicMinor,
    Major,
    Dorian,
    Phrygian,
}

impl ScaleName {
    pub fn intervals(self) -> [u8; 8] {
        match self {
            ScaleName::Minor => [0, 2, 3, 5, 7, 8, 10, 12],
            ScaleName::HarmonicMinor => [0, 2, 3, 5, 7, 8, 11, 12],
            ScaleName::Major => [0, 2, 4, 5, 7, 9, 11, 12],
            ScaleName::Dorian => [0, 2, 3, 5, 7, 9, 10, 12],
            ScaleName::Phrygian => [0, 1, 3, 5, 7, 8, 10, 12],
        }
    }

    pub fn table(self) -> ScaleTable {
        ScaleTable(self.intervals())
    }
}

/// Matches `tonic + degree + 12k` for every octave k the note space holds.
pub fn octave_filter(tonic: u8, degree: u8) -> Predicate {
    let notes = (0..OCTAVE_SPAN)
        .map(|k| tonic as u16 + degree as u16 + OCTAVE as u16 * k as u16)
        .filter(|n| *n <= 127)
        .map(|n| n as u8);
    Predicate::notes(notes)
}

/// One gated transposer per degree: notes on degree `i` of any octave are
/// shifted by `offset[i]`.
pub fn scale_pipeline(tonic: u8, scale: &ScaleTable) -> [PipelineNode; 8] {
    let offsets = scale.transpose_table();
    std::array::from_fn(|degree| {
        pipeline::chain(
            PipelineNode::Filter(octave_filter(tonic, degree as u8)),
            PipelineNode::Transform(Transform::Transpose(offsets[degree] as i16)),
        )
    })
}

/// All degrees side by side; notes off the scale's degrees are dropped.
pub fn make_scale(tonic: u8, scale: &ScaleTable) -> PipelineNode {
    pipeline::fan_out(scale_pipeline(tonic, scale))
}
