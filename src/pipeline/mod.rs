pub mod optimizer;

pub use optimizer::{optimize_all_radii, optimize_for_radius};
