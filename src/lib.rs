// src/lib.rs
pub mod candidate_generation;
pub mod clustering;
pub mod coverage;
pub mod evaluation;
pub mod geometry;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod selection;
pub mod utils;

pub use models::*;
pub use pipeline::{optimize_all_radii, optimize_for_radius};
pub use utils::optimizer_config::OptimizerConfig;
