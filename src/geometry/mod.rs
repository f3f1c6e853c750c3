pub mod grid_index;
pub mod scaler;

pub use grid_index::GridIndex;
pub use scaler::{CoordinateScaler, DegreeConvention, DegreeRadius};
