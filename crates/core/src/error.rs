use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("invalid path prefix: {0:?}")]
    InvalidPrefix(String),
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("unknown access check: {0}")]
    UnknownCheck(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("unknown site section: {0}")]
    UnknownSection(String),
    #[error("unknown content item: {0}")]
    UnknownContent(i64),
    #[error("user {actor} may not assign site sections")]
    AssignmentDenied { actor: String },
}
