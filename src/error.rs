use thiserror::Error;

/// Errors caused by how the tool was invoked. `main` prints the usage text
/// alongside these and exits with a distinct status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("You need a valid canvas API key")]
    MissingApiKey,

    #[error("You must supply a canvas domain")]
    MissingDomain,

    #[error("No recent migration ID, and none specified to query status on")]
    NoAction,
}
