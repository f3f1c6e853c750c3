// src/utils/constants.rs

/// Meters per degree of latitude used for radius conversion.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Coarser isotropic conversion (meters / 100_000) accepted as an alternative.
pub const METERS_PER_DEGREE_METRIC: f64 = 100_000.0;

/// Reference latitude when no demand points are available to average.
pub const FALLBACK_LATITUDE: f64 = 31.5;

pub const DEFAULT_TARGET_COUNT: usize = 150;
pub const DEFAULT_RADII_METERS: [f64; 5] = [100.0, 150.0, 200.0, 250.0, 300.0];
pub const DEFAULT_MIN_POINTS_PER_CLUSTER: usize = 5;
pub const DEFAULT_OCCUPANCY_PER_BUILDING: u64 = 7;

pub const DEFAULT_EPS_MULTIPLIERS: [f64; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
pub const DEFAULT_DENSITY_MIN_POINTS: [usize; 1] = [10];
/// Clusters larger than this skip the per-member best-point search.
pub const BEST_POINT_MAX_CLUSTER_SIZE: usize = 50;

pub const DEFAULT_PARTITION_K_VALUES: [usize; 2] = [750, 1500];
pub const DEFAULT_PARTITION_SEEDS: usize = 2;
pub const DEFAULT_PARTITION_INITS: usize = 10;
pub const DEFAULT_PARTITION_MAX_ITERATIONS: usize = 300;

pub const DEFAULT_MIN_SEPARATION_FACTOR: f64 = 2.0;
pub const DEFAULT_DEDUP_FACTOR: f64 = 0.1;

pub const DEFAULT_SELECTION_SEED: u64 = 42;
pub const DEFAULT_RANDOM_TRIALS: usize = 5;
pub const DEFAULT_LOCAL_SEARCH_PASSES: usize = 50;
pub const DEFAULT_LOOKAHEAD_WIDTH: usize = 10;
pub const DEFAULT_LOOKAHEAD_FUTURE_WINDOW: usize = 5;
pub const DEFAULT_LOOKAHEAD_BONUS: f64 = 0.1;
