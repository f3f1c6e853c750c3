pub mod candidate_generation;
pub mod dedup;
pub mod density_candidates;
pub mod partition_candidates;

pub use candidate_generation::{
    generate_candidate_pool, plan_generator_tasks, CandidatePool, GeneratorOutput, GeneratorTask,
};
pub use dedup::deduplicate_candidates;
