use crate::core::errors::ExchangeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical order side
///
/// The discriminants are part of the external contract: 0 is buy/bid and
/// 1 is sell/ask on every venue and in every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, ExchangeError> {
        match code {
            0 => Ok(Self::Buy),
            1 => Ok(Self::Sell),
            other => Err(ExchangeError::InvalidParameters(format!(
                "side must be 0 or 1, got {}",
                other
            ))),
        }
    }

    /// Book side name for this order side
    pub const fn book_side(self) -> &'static str {
        match self {
            Self::Buy => "bid",
            Self::Sell => "ask",
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        side.code()
    }
}

impl TryFrom<u8> for Side {
    type Error = ExchangeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A new limit order as submitted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub product: String,
    pub side: Side,
    pub size: Decimal,
    pub price: Decimal,
}

impl OrderRequest {
    pub fn new(product: impl Into<String>, side: Side, size: Decimal, price: Decimal) -> Self {
        Self {
            product: product.into(),
            side,
            size,
            price,
        }
    }

    /// Reject requests no venue would accept, before any I/O happens
    pub fn validate(&self) -> Result<(), ExchangeError> {
        if self.product.trim().is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "product is required".to_string(),
            ));
        }
        if self.size <= Decimal::ZERO {
            return Err(ExchangeError::InvalidParameters(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        if self.price <= Decimal::ZERO {
            return Err(ExchangeError::InvalidParameters(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

/// An order resting on a venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub product: String,
    pub side: Side,
    pub size: Decimal,
    pub price: Decimal,
}

/// Balance of one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub currency: String,
    pub amount: Decimal,
    pub hold: Decimal,
}

impl Account {
    pub fn available(&self) -> Decimal {
        self.amount - self.hold
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelConfirmation {
    pub order_id: String,
    pub product: String,
}

/// Funds leaving the venue
///
/// Which of `method` and `destination` are required depends on the venue;
/// adapters fail with `InvalidParameters` when one they need is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub currency: String,
    pub amount: Decimal,
    pub method: Option<String>,
    pub destination: Option<String>,
}

/// Funds arriving from another venue, identified by a venue-issued code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub source: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// Full depth snapshot as returned by a venue, levels in venue order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    /// Highest bid, independent of how the venue sorts its levels
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.iter().copied().max_by(|a, b| a.price.cmp(&b.price))
    }

    /// Lowest ask, independent of how the venue sorts its levels
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.iter().copied().min_by(|a, b| a.price.cmp(&b.price))
    }

    pub fn best(&self, side: Side) -> Option<PriceLevel> {
        match side {
            Side::Buy => self.best_bid(),
            Side::Sell => self.best_ask(),
        }
    }
}

/// Top-of-book level on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
}

impl fmt::Display for BookLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.side.book_side(), self.size, self.price)
    }
}
