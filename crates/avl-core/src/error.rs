use avl_geo::RangeError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    OutOfRange,
    Internal,
}

#[derive(Debug, Clone)]
pub struct AvlError {
    pub code: ErrorCode,
    pub message: String,
}

impl AvlError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }
}

impl From<RangeError> for AvlError {
    fn from(err: RangeError) -> Self {
        Self::new(ErrorCode::OutOfRange, err.to_string())
    }
}

impl fmt::Display for AvlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for AvlError {}

pub type AvlResult<T> = Result<T, AvlError>;
