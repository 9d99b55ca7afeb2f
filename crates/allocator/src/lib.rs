pub mod weights;

pub use weights::{allocate, side_weight};
