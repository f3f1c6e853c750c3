pub mod density;
pub mod partition;

pub use density::{dbscan, DensityClustering};
pub use partition::{kmeans, Partition};
