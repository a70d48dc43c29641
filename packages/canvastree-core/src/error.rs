use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers. Structural misses inside the document
/// (unknown target ids, self-drops) are not errors; those operations report
/// `false` and leave the document unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("malformed replacement: {0}")]
    MalformedReplacement(String),
    #[error("action dispatch error: {0}")]
    Dispatch(String),
    #[error("inconsistent document: {0}")]
    Inconsistent(String),
}
