use crate::error::LedgerError;
use serde::Serialize;

/// Transport-neutral error body: an HTTP-style status and a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl ErrorResponse {
    pub const NOT_FOUND: u16 = 404;
    pub const BAD_REQUEST: u16 = 400;
    pub const SERVER_ERROR: u16 = 500;
}

impl From<&LedgerError> for ErrorResponse {
    fn from(err: &LedgerError) -> Self {
        let status = match err {
            LedgerError::NotFound(_) => Self::NOT_FOUND,
            LedgerError::InvalidRequest(_) => Self::BAD_REQUEST,
            _ => Self::SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}
