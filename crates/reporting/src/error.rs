use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportingError {
    /// A shop-wide sum left the representable decimal range.
    #[error("{0} is too large to represent")]
    Overflow(&'static str),
}

pub type ReportingResult<T> = Result<T, ReportingError>;
