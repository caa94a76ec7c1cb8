pub mod images;
pub mod job_results;
pub mod job_tasks;
pub mod jobs;
