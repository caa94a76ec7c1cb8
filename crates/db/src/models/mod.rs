pub mod image;
pub mod job;
pub mod job_result;
pub mod task;
