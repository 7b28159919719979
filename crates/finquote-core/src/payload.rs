use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Opaque last-updated stamp passed through from the quote service.
///
/// The upstream contract only guarantees a JSON string or number here, so the
/// value is carried unmodified and never interpreted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Updated {
    Epoch(f64),
    Text(String),
}

impl Display for Updated {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epoch(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Point-in-time stock snapshot as returned by the quote service.
///
/// Required fields are enforced at JSON decode time; a missing or mistyped
/// field surfaces as a malformed-payload error at the boundary rather than a
/// silent default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPayload {
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub exchange: Option<String>,
    pub price: f64,
    pub updated: Updated,
}

impl StockPayload {
    /// Field-level checks beyond what serde's type expectations cover.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        Ok(())
    }
}

/// Response shape of the search/lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub query: String,
    pub results: Vec<StockPayload>,
}
