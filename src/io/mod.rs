pub mod problem_io;

pub use problem_io::{load_input, parse_input, result_file_name, write_result, ProblemInput};
