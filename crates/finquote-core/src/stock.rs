use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::instrument::{ApplySnapshot, BoxFuture, FinancialInstrument, InstrumentKind};
use crate::payload::{StockPayload, Updated};
use crate::{QuoteClient, QuoteError, Ticker};

/// Payload exchange values that are not true stock exchanges.
const NON_EXCHANGE_CATEGORIES: [&str; 2] = ["COMMODITY", "CRYPTO"];

/// An equity snapshot from the quote service.
///
/// `ticker` and `name` are fixed at construction; `exchange` is `None` exactly
/// when the constructing payload carried one of the sentinel non-exchange
/// categories. `price` and `updated` always come from the same payload
/// application and are replaced together on every [`Stock::refresh`].
///
/// Comparison semantics are intentionally asymmetric and worth reading twice:
/// `==`/`!=` compare ticker identity only, while `<`/`>`/`<=`/`>=` compare the
/// current price only. Two stocks with different tickers and equal prices are
/// ordered as equal yet are not `==`. This supports sorting a portfolio by
/// price while deduplicating by ticker, at the cost of `PartialOrd` being
/// inconsistent with `PartialEq`; `Eq`, `Ord`, and `Hash` are deliberately not
/// implemented.
#[derive(Clone)]
pub struct Stock {
    client: Arc<QuoteClient>,
    ticker: Ticker,
    name: String,
    exchange: Option<String>,
    price: f64,
    updated: Updated,
}

impl Stock {
    /// Build a stock from a snapshot payload and a shared client handle.
    ///
    /// The client is only held for refresh calls; the stock never manages its
    /// lifecycle. Construction either fully succeeds or fails, so no
    /// half-initialized value ever escapes.
    pub fn new(client: Arc<QuoteClient>, payload: StockPayload) -> Result<Self, QuoteError> {
        payload.validate()?;
        let ticker = Ticker::parse(&payload.ticker)?;
        let exchange = payload
            .exchange
            .clone()
            .filter(|value| !NON_EXCHANGE_CATEGORIES.contains(&value.as_str()));

        // Placeholders only; apply below is the single write path for the
        // price-bearing fields, shared with refresh.
        let mut stock = Self {
            client,
            ticker,
            name: payload.name.clone(),
            exchange,
            price: 0.0,
            updated: Updated::Epoch(0.0),
        };
        stock.apply(&payload);
        Ok(stock)
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exchange code the stock trades on; `None` for commodity/crypto
    /// pseudo-listings.
    pub fn exchange(&self) -> Option<&str> {
        self.exchange.as_deref()
    }

    /// Price from the most recently applied snapshot.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Opaque last-updated stamp of the current snapshot.
    pub fn updated(&self) -> &Updated {
        &self.updated
    }

    /// Re-fetch this stock's snapshot and return the new price.
    ///
    /// The snapshot is applied only after the fetch fully resolves, so a
    /// failed, cancelled, or timed-out fetch leaves `price` and `updated` at
    /// their pre-call values and the error propagates unchanged.
    pub async fn refresh(&mut self) -> Result<f64, QuoteError> {
        let payload = self.client.fetch_stock(self.ticker.as_str()).await?;
        self.apply(&payload);
        Ok(self.price)
    }
}

impl ApplySnapshot for Stock {
    type Payload = StockPayload;

    fn apply(&mut self, payload: &StockPayload) {
        self.price = payload.price;
        self.updated = payload.updated.clone();
    }
}

impl FinancialInstrument for Stock {
    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Stock
    }

    fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn refresh(&mut self) -> BoxFuture<'_, Result<f64, QuoteError>> {
        Box::pin(Stock::refresh(self))
    }
}

/// Identity comparison: tickers only, never price, name, or exchange.
impl PartialEq for Stock {
    fn eq(&self, other: &Self) -> bool {
        self.ticker == other.ticker
    }
}

/// Value comparison: current prices only. Inconsistent with [`PartialEq`] by
/// design; see the type-level docs.
impl PartialOrd for Stock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.price.partial_cmp(&other.price)
    }
}

impl fmt::Debug for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stock")
            .field("ticker", &self.ticker)
            .field("name", &self.name)
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}
