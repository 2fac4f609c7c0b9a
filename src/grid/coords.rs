use crate::error::RangeError;

/// Vertical gap between rows on the pad's note space.
pub const STEP: u8 = 16;
/// Control number of the first top-row key.
pub const FIRST_CTRL: u8 = 104;
/// Column index of the right-hand buttons.
pub const RIGHT_COLUMN: u8 = 8;
/// Rows and columns of the square grid.
pub const SIDE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    Square,
    Right,
    Top,
}

/// A physical key on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Square { row: u8, column: u8 },
    Right { row: u8 },
    Top { column: u8 },
}

impl Key {
    pub fn class(&self) -> KeyClass {
        match self {
            Key::Square { .. } => KeyClass::Square,
            Key::Right { .. } => KeyClass::Right,
            Key::Top { .. } => KeyClass::Top,
        }
    }

    /// Note number (square, right) or control number (top) of this key.
    pub fn event_number(&self) -> Result<u8, RangeError> {
        match *self {
            Key::Square { row, column } if row < SIDE && column < SIDE => Ok(row * STEP + column),
            Key::Right { row } if row < SIDE => Ok(row * STEP + RIGHT_COLUMN),
            Key::Top { column } if column < SIDE => Ok(FIRST_CTRL + column),
            Key::Square { row, column } => Err(RangeError::Coordinate {
                class: KeyClass::Square,
                row,
                column,
            }),
            Key::Right { row } => Err(RangeError::Coordinate {
                class: KeyClass::Right,
                row,
                column: RIGHT_COLUMN,
            }),
            Key::Top { column } => Err(RangeError::Coordinate {
                class: KeyClass::Top,
                row: 0,
                column,
            }),
        }
    }

    /// Exact inverse of [`Key::event_number`] within one key class.
    pub fn from_event_number(class: KeyClass, number: u8) -> Result<Key, RangeError> {
        let err = RangeError::Number { class, number };
        match class {
            KeyClass::Square => {
                let (row, column) = (row_of(number), column_of(number));
                if row < SIDE && column < SIDE {
                    Ok(Key::Square { row, column })
                } else {
                    Err(err)
                }
            }
            KeyClass::Right => {
                let row = row_of(number);
                if row < SIDE && column_of(number) == RIGHT_COLUMN {
                    Ok(Key::Right { row })
                } else {
                    Err(err)
                }
            }
            KeyClass::Top => match number.checked_sub(FIRST_CTRL) {
                Some(column) if column < SIDE => Ok(Key::Top { column }),
                _ => Err(err),
            },
        }
    }
}

/// Row of a square or right key note.
pub fn row_of(number: u8) -> u8 {
    number / STEP
}

/// Column of a square or right key note (right keys are column 8).
pub fn column_of(number: u8) -> u8 {
    number % STEP
}

pub fn square(row: u8, column: u8) -> Result<u8, RangeError> {
    Key::Square { row, column }.event_number()
}

pub fn right(row: u8) -> Result<u8, RangeError> {
    Key::Right { row }.event_number()
}

pub fn top(column: u8) -> Result<u8, RangeError> {
    Key::Top { column }.event_number()
}

/// Every legal key of every class.
pub fn all_keys() -> impl Iterator<Item = Key> {
    let squares =
        (0..SIDE).flat_map(|row| (0..SIDE).map(move |column| Key::Square { row, column }));
    let rights = (0..SIDE).map(|row| Key::Right { row });
    let tops = (0..SIDE).map(|column| Key::Top { column });
    squares.chain(rights).chain(tops)
}
