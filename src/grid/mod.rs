mod color;
mod coords;
mod scale;

pub use color::{
    BLACK, GREEN, MAX_BRIGHTNESS, ORANGE, PadColor, RED, YELLOW, color, darken, velocity_color,
};
pub use coords::{
    FIRST_CTRL, Key, KeyClass, RIGHT_COLUMN, SIDE, STEP, all_keys, column_of, right, row_of,
    square, top,
};
pub use scale::{
    A, B, C, D, E, F, G, OCTAVE, OCTAVE_SPAN, ScaleName, ScaleTable, make_scale, octave_filter,
    scale_pipeline,
};
