pub mod log;
pub mod repo;

pub use log::{parse_log_output, GIT_DATE_FORMAT};
pub use repo::{CommitHistory, GitCli};
