pub mod judge_result;

pub use judge_result::{apply_judge_result, consume_judge_results};
