//! Client-side model for priced financial instruments.
//!
//! This crate contains:
//! - The `FinancialInstrument` capability contract and the concrete `Stock`
//! - Typed payload records and the `Ticker` identity newtype
//! - The `QuoteClient` collaborator over a pluggable HTTP transport
//! - Structured errors and a local request budget
//!
//! Instruments wrap a point-in-time snapshot and a shared client handle, and
//! can be refreshed in place asynchronously. Equality between instruments is
//! identity-based (ticker) while ordering is value-based (price); see
//! [`Stock`] for the full contract.

pub mod client;
pub mod error;
pub mod http;
pub mod instrument;
pub mod payload;
pub mod stock;
pub mod throttle;
pub mod ticker;

pub use client::{ClientConfig, QuoteClient};
pub use error::{QuoteError, ValidationError};
pub use http::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use instrument::{price_order, ApplySnapshot, BoxFuture, FinancialInstrument, InstrumentKind};
pub use payload::{SearchPayload, StockPayload, Updated};
pub use stock::Stock;
pub use throttle::RequestBudget;
pub use ticker::Ticker;
