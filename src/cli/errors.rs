use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("{arg} must be greater than 0")]
    ZeroValue { arg: String },

    #[error(transparent)]
    Cubediff(#[from] cubediff::Error),
}
