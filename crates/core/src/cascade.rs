//! Policy for removing a job's results when the job itself is deleted.

use crate::error::CoreError;

/// How far the job-deletion cascade walks the job's result index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeMode {
    /// Page through the index until it is empty, then delete the job.
    #[default]
    Exhaustive,
    /// Only process the first page. Results older than that page are left
    /// behind once the job record is gone.
    SinglePage,
}

impl CascadeMode {
    /// Parse from the `JOB_DELETE_CASCADE` configuration value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "exhaustive" => Ok(Self::Exhaustive),
            "single-page" => Ok(Self::SinglePage),
            other => Err(CoreError::Validation(format!(
                "Unknown cascade mode '{other}'. Must be one of: exhaustive, single-page"
            ))),
        }
    }

    /// Configuration value for this mode.
    pub fn name(self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::SinglePage => "single-page",
        }
    }
}
