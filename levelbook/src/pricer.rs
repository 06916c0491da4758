//! Bucketing: which level price an order aggregates into.

use std::fmt;

use crate::types::{Order, Side};

/// Caller-supplied bucketing closure.
pub type PricerFn<O> = Box<dyn Fn(&O) -> f64 + Send + Sync>;

/// Maps an order to the price of the level it rests in.
///
/// Two orders with the same bucketed price share a level even when their
/// raw prices differ. A pricer is fixed for the lifetime of a book and must
/// return bit-identical prices for the same order, otherwise removals can no
/// longer find the level they contributed to.
pub enum Pricer<O> {
    /// Level price is the raw order price.
    Identity,
    /// Round to a multiple of the tick, biased against the order's side.
    Precision(f64),
    Custom(PricerFn<O>),
}

impl<O: Order> Pricer<O> {
    /// Tick-size bucketing. A tick that is not a positive finite number
    /// means no rounding.
    pub fn precision(tick: f64) -> Self {
        if tick > 0.0 && tick.is_finite() {
            Pricer::Precision(tick)
        } else {
            Pricer::Identity
        }
    }

    pub fn custom(f: impl Fn(&O) -> f64 + Send + Sync + 'static) -> Self {
        Pricer::Custom(Box::new(f))
    }

    /// Level price for `order`.
    pub fn price(&self, order: &O) -> f64 {
        match self {
            Pricer::Identity => order.price(),
            Pricer::Precision(tick) => round_to_tick(order.price(), order.side(), *tick),
            Pricer::Custom(f) => f(order),
        }
    }

    /// Tick size, if this pricer rounds.
    pub fn tick(&self) -> Option<f64> {
        match self {
            Pricer::Precision(tick) => Some(*tick),
            _ => None,
        }
    }
}

impl<O> Default for Pricer<O> {
    fn default() -> Self {
        Pricer::Identity
    }
}

impl<O> fmt::Debug for Pricer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pricer::Identity => f.write_str("Identity"),
            Pricer::Precision(tick) => f.debug_tuple("Precision").field(tick).finish(),
            Pricer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Round `price` onto the `tick` grid.
///
/// Buy prices move up to the next multiple and sell prices down to the
/// previous one, so the book quotes bids slightly high and asks slightly low
/// and anything priced off it carries a margin against slippage. Prices
/// already on the grid are returned unchanged.
///
/// The offset is the IEEE remainder of `price` by `tick` (`|r| <= tick / 2`,
/// computed exactly), so the result depends only on the inputs' bits.
pub fn round_to_tick(price: f64, side: Side, tick: f64) -> f64 {
    let rem = libm::remainder(price, tick);
    if rem == 0.0 {
        return price;
    }
    match side {
        Side::Buy => price - rem + tick,
        Side::Sell => price - rem,
    }
}
