//! Filters and generators addressing physical keys.

use crate::error::RangeError;
use crate::grid::{self, SIDE};
use crate::pipeline::{PipelineNode, Predicate, Source, Transform, all_of};

pub fn only_square() -> Result<Predicate, RangeError> {
    let mut notes = Vec::with_capacity(64);
    for row in 0..SIDE {
        for column in 0..SIDE {
            notes.push(grid::square(row, column)?);
        }
    }
    Ok(Predicate::notes(notes))
}

pub fn only_right() -> Result<Predicate, RangeError> {
    Ok(Predicate::notes((0..SIDE).map(grid::right).collect::<Result<Vec<_>, _>>()?))
}

pub fn only_top() -> Result<Predicate, RangeError> {
    Ok(Predicate::controls((0..SIDE).map(grid::top).collect::<Result<Vec<_>, _>>()?))
}

/// Notes of one row, right key included.
pub fn row_filter(row: u8) -> Result<Predicate, RangeError> {
    let lo = grid::square(row, 0)? as u16;
    Ok(Predicate::notes_in(lo, grid::right(row)? as u16 + 1))
}

/// Notes of one row, right key excluded.
pub fn row_square_filter(row: u8) -> Result<Predicate, RangeError> {
    let lo = grid::square(row, 0)? as u16;
    Ok(Predicate::notes_in(lo, grid::right(row)? as u16))
}

pub fn column_filter(column: u8) -> Result<Predicate, RangeError> {
    Ok(Predicate::notes(
        (0..SIDE)
            .map(|row| grid::square(row, column))
            .collect::<Result<Vec<_>, _>>()?,
    ))
}

pub fn square_filter(row: u8, column: u8) -> Result<Predicate, RangeError> {
    Ok(Predicate::notes([grid::square(row, column)?]))
}

pub fn right_filter(row: u8) -> Result<Predicate, RangeError> {
    Ok(Predicate::notes([grid::right(row)?]))
}

pub fn top_filter(column: u8) -> Result<Predicate, RangeError> {
    Ok(Predicate::controls([grid::top(column)?]))
}

/// Top-row key pressed all the way (value 127).
pub fn top_pressed() -> Result<Predicate, RangeError> {
    Ok(all_of([only_top()?, Predicate::control_values([127])]))
}

pub fn square_key(row: u8, column: u8) -> Result<PipelineNode, RangeError> {
    Ok(PipelineNode::Transform(Transform::Key(grid::square(row, column)?)))
}

pub fn right_key(row: u8) -> Result<PipelineNode, RangeError> {
    Ok(PipelineNode::Transform(Transform::Key(grid::right(row)?)))
}

pub fn top_key(column: u8, value: u8) -> Result<PipelineNode, RangeError> {
    Ok(PipelineNode::Transform(Transform::ToControl {
        number: Source::Fixed(grid::top(column)?),
        value: Source::Fixed(value),
    }))
}
