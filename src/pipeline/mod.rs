mod keys;
mod node;
mod predicate;
mod transform;

pub use keys::{
    column_filter, only_right, only_square, only_top, right_filter, right_key, row_filter,
    row_square_filter, square_filter, square_key, top_filter, top_key, top_pressed,
};
pub use node::{PipelineNode, chain, chain_all, fan_out, filter, override_with, transform};
pub use predicate::{Field, KindClass, Predicate, all_of, negate};
pub use transform::{Source, Transform, VelocityOp};
