use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Side of the book an order rests on. Buys are bids, sells are asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A price and an amount resting at (or averaged to) that price.
///
/// This is a snapshot value, not a live handle into the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub amount: f64,
}

impl PriceLevel {
    pub fn new(price: f64, amount: f64) -> Self {
        Self { price, amount }
    }
}

/// Best (or volume-weighted) level on each side of the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Front {
    pub buy: PriceLevel,
    pub sell: PriceLevel,
}

impl Front {
    /// Sell price minus buy price.
    pub fn spread(&self) -> f64 {
        self.sell.price - self.buy.price
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Anything that can rest in an [`Orderbook`](crate::Orderbook).
///
/// The book only ever reads these four fields and never mutates the order.
pub trait Order {
    /// Unique identifier; the book keys its order index on it.
    fn id(&self) -> &str;
    /// Raw limit price, before bucketing.
    fn price(&self) -> f64;
    /// Resting amount. Must be positive and finite.
    fn amount(&self) -> f64;
    fn side(&self) -> Side;
}

impl<T: Order + ?Sized> Order for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn price(&self) -> f64 {
        (**self).price()
    }

    fn amount(&self) -> f64 {
        (**self).amount()
    }

    fn side(&self) -> Side {
        (**self).side()
    }
}

/// Plain owned order, for callers without an order type of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub side: Side,
    pub price: f64,
    pub amount: f64,
}

impl OrderRecord {
    pub fn new(id: impl Into<String>, side: Side, price: f64, amount: f64) -> Self {
        Self {
            id: id.into(),
            side,
            price,
            amount,
        }
    }

    /// Shorthand for a [`Side::Buy`] record.
    pub fn buy(id: impl Into<String>, price: f64, amount: f64) -> Self {
        Self::new(id, Side::Buy, price, amount)
    }

    /// Shorthand for a [`Side::Sell`] record.
    pub fn sell(id: impl Into<String>, price: f64, amount: f64) -> Self {
        Self::new(id, Side::Sell, price, amount)
    }
}

impl Order for OrderRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn side(&self) -> Side {
        self.side
    }
}
