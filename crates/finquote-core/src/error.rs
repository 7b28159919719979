use thiserror::Error;

use crate::http::HttpError;
use crate::instrument::InstrumentKind;

/// Field-level validation errors for tickers and payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("field '{field}' must be a finite number")]
    NonFiniteValue { field: &'static str },
}

/// Top-level error type for quote operations.
///
/// The core performs no retries and no local recovery; failures from the
/// quote service are propagated verbatim to the caller.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The requested ticker does not exist upstream.
    #[error("no instrument found for ticker '{ticker}'")]
    NotFound { ticker: String },

    /// Connectivity or protocol failure while talking to the quote service.
    #[error("transport failure: {0}")]
    Transport(#[from] HttpError),

    /// The quote service rejected the configured credentials.
    #[error("quote service rejected the request credentials (status {status})")]
    Unauthorized { status: u16 },

    /// Either the local request budget or the upstream quota is exhausted.
    #[error("quote request rate limit exhausted")]
    RateLimited,

    /// Any other non-success status from the quote service.
    #[error("quote service returned unexpected status {status}")]
    UpstreamStatus { status: u16 },

    /// A fetched or constructor-supplied payload is missing required fields
    /// or carries the wrong types.
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// Price ordering was attempted across instrument kinds.
    #[error("cannot order {left} against {right} by price")]
    KindMismatch {
        left: InstrumentKind,
        right: InstrumentKind,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl QuoteError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            reason: reason.into(),
        }
    }
}
