/// Application-level errors
///
/// Every failure in the engine surfaces as a typed variant so the caller
/// can decide how to present it; the core never swallows an error and
/// returns an empty result in its place.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Catalog source error: {0}")]
    Source(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
