//! Submission intake plumbing: job dispatch and the stuck judging detector.

mod dispatch;
pub mod stuck;

pub use dispatch::{PREPARE_FAILED_MESSAGE, dispatch_submission};
pub use stuck::run_stuck_judging_detector;
