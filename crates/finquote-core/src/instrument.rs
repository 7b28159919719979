use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{QuoteError, Ticker};

/// Boxed future used at trait seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Instrument kind tag used to reject cross-kind price ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Stock,
    Commodity,
    Crypto,
}

impl InstrumentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Commodity => "commodity",
            Self::Crypto => "crypto",
        }
    }
}

impl Display for InstrumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability contract shared by every priced instrument.
///
/// Concrete kinds wrap a point-in-time snapshot from the quote service and a
/// shared client handle. The contract is deliberately asymmetric: equality
/// between two instruments of one kind is identity-based (ticker only), while
/// ordering compares the current price. Two stocks with different tickers and
/// equal prices order as equal yet compare unequal under `==`.
pub trait FinancialInstrument: Send {
    fn kind(&self) -> InstrumentKind;

    /// Immutable identity key, fixed at construction.
    fn ticker(&self) -> &Ticker;

    /// Price from the most recently applied snapshot.
    fn price(&self) -> f64;

    /// Re-fetch this instrument's snapshot through the held client, apply it
    /// in place, and return the new price.
    ///
    /// Fetch failures (not-found, transport, malformed payload) propagate to
    /// the caller and leave the instrument's state untouched: the snapshot is
    /// applied only after the fetch has fully resolved.
    fn refresh(&mut self) -> BoxFuture<'_, Result<f64, QuoteError>>;
}

/// Snapshot-application half of the instrument contract.
///
/// Split from [`FinancialInstrument`] because every kind carries its own
/// payload shape; the refresh path of each kind funnels through its `apply`.
pub trait ApplySnapshot {
    type Payload;

    /// Overwrite the price-bearing fields from a freshly fetched payload.
    ///
    /// Identity fields (ticker, name, exchange) are never touched. Applying
    /// the same payload twice leaves the same observable state as applying it
    /// once.
    fn apply(&mut self, payload: &Self::Payload);
}

/// Order two instruments by current price.
///
/// Instruments of different kinds are not comparable; the mismatch surfaces
/// as [`QuoteError::KindMismatch`] rather than any coercion.
pub fn price_order(
    a: &dyn FinancialInstrument,
    b: &dyn FinancialInstrument,
) -> Result<Ordering, QuoteError> {
    if a.kind() != b.kind() {
        return Err(QuoteError::KindMismatch {
            left: a.kind(),
            right: b.kind(),
        });
    }
    Ok(a.price().total_cmp(&b.price()))
}
