use crate::model::UpdateStep;
use thiserror::Error;

/// Local validation failures. These are resolved before any remote call
/// is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("label key is required")]
    EmptyLabelKey,

    #[error("label value is required")]
    EmptyLabelValue,

    #[error("label key already exists: {0}")]
    DuplicateLabelKey(String),

    #[error("container name cannot be empty")]
    EmptyName,

    #[error("no changes made")]
    NoChanges,
}

/// Failures reported by the container management API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("container not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Terminal failure of a submit attempt.
///
/// A remote failure names the step that failed and whether a rename had
/// already taken effect, so callers can report partial success accurately
/// instead of implying total failure.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{} failed{}: {source}", .step.as_str(), partial_suffix(.renamed))]
    Remote {
        step: UpdateStep,
        /// True when a rename succeeded before this step failed.
        renamed: bool,
        source: ApiError,
    },
}

fn partial_suffix(renamed: &bool) -> &'static str {
    if *renamed {
        " (rename already applied)"
    } else {
        ""
    }
}

impl SubmitError {
    /// The remote step that failed, if this was a remote failure.
    pub fn failed_step(&self) -> Option<UpdateStep> {
        match self {
            SubmitError::Validation(_) => None,
            SubmitError::Remote { step, .. } => Some(*step),
        }
    }
}
