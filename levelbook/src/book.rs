//! Price-aggregated order book.
//!
//! Individual orders are indexed by id and their amounts are folded into one
//! [`LevelIndex`] per side, keyed by the price a [`Pricer`] assigns them.
//! Queries never touch individual orders: the front of the book and the
//! volume-weighted price to fill an amount are read straight off the levels.
//!
//! ```text
//!   add(order) ──> orders[id] = order
//!        │
//!        └─> pricer(order) ──> buys / sells: level += amount
//!
//!   remove(id) ──> orders.remove(id)
//!        │
//!        └─> pricer(order) ──> buys / sells: level -= amount (or drop level)
//!
//!   best_side / front ──> walk levels best → worst, accumulate VWAP
//! ```
//!
//! The book is a plain single-writer structure: mutation takes `&mut self`
//! and there is no internal locking.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{BookConfig, DuplicatePolicy};
use crate::error::{BookError, Result};
use crate::iter::LevelIter;
use crate::levels::LevelIndex;
use crate::pricer::Pricer;
use crate::types::{Front, Order, OrderRecord, PriceLevel, Side};

// ---------------------------------------------------------------------------
// RemoveOutcome
// ---------------------------------------------------------------------------

/// What [`Orderbook::remove`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoveOutcome {
    /// No resting order had this id; nothing changed.
    NotFound,
    /// The order's amount was taken out of its level.
    Reduced { side: Side, price: f64, remaining: f64 },
    /// The order was the last in its level (or covered its whole amount)
    /// and the level was deleted.
    LevelRemoved { side: Side, price: f64 },
    /// The order was dropped from the id index but its level was missing.
    ///
    /// `nearest` is the closest level at or better than `price`, if any.
    /// The levels are left untouched, so they may still include the
    /// order's amount.
    Inconsistent {
        side: Side,
        price: f64,
        nearest: Option<f64>,
    },
}

impl RemoveOutcome {
    /// `true` if a resting order was found and dropped.
    pub fn is_removed(&self) -> bool {
        !matches!(self, RemoveOutcome::NotFound)
    }

    /// `true` if the order's level was missing when it was removed.
    pub fn is_inconsistent(&self) -> bool {
        matches!(self, RemoveOutcome::Inconsistent { .. })
    }
}

// ---------------------------------------------------------------------------
// Orderbook
// ---------------------------------------------------------------------------

/// Order book aggregating orders of type `O` into price levels.
#[derive(Debug)]
pub struct Orderbook<O = OrderRecord> {
    orders: HashMap<String, O>,
    buys: LevelIndex,
    sells: LevelIndex,
    pricer: Pricer<O>,
    duplicates: DuplicatePolicy,
}

impl<O: Order> Default for Orderbook<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Order> Orderbook<O> {
    /// Empty book keyed on raw order prices.
    pub fn new() -> Self {
        Self::with_pricer(Pricer::Identity)
    }

    /// Empty book using `pricer` to pick each order's level.
    pub fn with_pricer(pricer: Pricer<O>) -> Self {
        Self {
            orders: HashMap::new(),
            buys: LevelIndex::new(Side::Buy),
            sells: LevelIndex::new(Side::Sell),
            pricer,
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Empty book rounding level prices to `tick`, buys up and sells down.
    ///
    /// A tick `<= 0` keeps raw prices.
    pub fn with_precision(tick: f64) -> Self {
        Self::with_pricer(Pricer::precision(tick))
    }

    /// # Errors
    ///
    /// Returns `BookError::InvalidConfig` if the config does not validate.
    pub fn with_config(config: &BookConfig) -> Result<Self> {
        config.validate()?;
        let pricer = config.precision.map_or(Pricer::Identity, Pricer::precision);
        Ok(Self::with_pricer(pricer).with_duplicates(config.duplicates))
    }

    /// Set how [`add`](Self::add) treats an id that is already resting.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Effective configuration. A custom pricer reports no precision.
    pub fn config(&self) -> BookConfig {
        BookConfig {
            precision: self.pricer.tick(),
            duplicates: self.duplicates,
        }
    }

    /// Bucketing function used to pick each order's level.
    pub fn pricer(&self) -> &Pricer<O> {
        &self.pricer
    }

    /// Add a resting order and fold its amount into its level.
    ///
    /// # Errors
    ///
    /// The book is left unchanged and an error returned if the id is empty,
    /// the price is not finite, the amount is not a positive finite number,
    /// the pricer yields a non-finite level price, or the id is already
    /// resting under [`DuplicatePolicy::Reject`].
    pub fn add(&mut self, order: O) -> Result<()> {
        let id = order.id();
        if id.is_empty() {
            return Err(BookError::EmptyId);
        }
        let price = order.price();
        if !price.is_finite() {
            return Err(BookError::InvalidPrice {
                id: id.to_owned(),
                price,
            });
        }
        let amount = order.amount();
        if !(amount.is_finite() && amount > 0.0) {
            return Err(BookError::InvalidAmount {
                id: id.to_owned(),
                amount,
            });
        }
        let level_price = self.pricer.price(&order);
        if !level_price.is_finite() {
            return Err(BookError::InvalidBucket {
                id: id.to_owned(),
                price: level_price,
            });
        }

        if self.orders.contains_key(id) {
            match self.duplicates {
                DuplicatePolicy::Reject => return Err(BookError::DuplicateOrder(id.to_owned())),
                DuplicatePolicy::Replace => {
                    debug!(id, "replacing resting order");
                    self.remove(id);
                }
            }
        }

        let side = order.side();
        let levels = self.levels_mut(side);
        let merged = match levels.lookup_or_nearest(level_price) {
            Some((mut level, true)) => {
                level.join(amount);
                true
            }
            _ => false,
        };
        if !merged {
            levels.insert(level_price, amount);
            debug!(id, %side, price = level_price, amount, "level created");
        }

        self.orders.insert(id.to_owned(), order);
        Ok(())
    }

    /// Remove a resting order and take its amount out of its level.
    ///
    /// The level is deleted when this was its last order or when the order's
    /// amount covers what the level holds. Unknown ids are a no-op.
    ///
    /// If the order's level cannot be found the order is still dropped, a
    /// warning is logged and [`RemoveOutcome::Inconsistent`] is returned.
    pub fn remove(&mut self, id: &str) -> RemoveOutcome {
        let Some(order) = self.orders.remove(id) else {
            return RemoveOutcome::NotFound;
        };

        let side = order.side();
        let amount = order.amount();
        let price = self.pricer.price(&order);
        let levels = self.levels_mut(side);

        let found = match levels.lookup_or_nearest(price) {
            Some((mut level, true)) => Ok(level.leave(amount)),
            Some((level, false)) => Err(Some(level.price())),
            None => Err(None),
        };

        match found {
            Ok(Some(remaining)) => RemoveOutcome::Reduced {
                side,
                price,
                remaining,
            },
            Ok(None) => {
                levels.remove(price);
                debug!(id, %side, price, "level removed");
                RemoveOutcome::LevelRemoved { side, price }
            }
            Err(nearest) => {
                warn!(
                    id,
                    %side,
                    price,
                    ?nearest,
                    amount,
                    "no level for resting order, dropping it"
                );
                RemoveOutcome::Inconsistent {
                    side,
                    price,
                    nearest,
                }
            }
        }
    }

    /// Cursor over `side` from best to worst price.
    pub fn iter(&self, side: Side) -> LevelIter<'_> {
        self.levels(side).iter()
    }

    /// Best level on each side (`amount == 0`), or the volume-weighted
    /// price to fill `amount` on each side.
    pub fn front(&self, amount: f64) -> Front {
        Front {
            buy: self.best_side(Side::Buy, amount),
            sell: self.best_side(Side::Sell, amount),
        }
    }

    /// Volume-weighted price and amount available to fill `amount` on
    /// `side`, walking levels from best to worst.
    ///
    /// - An empty side gives `{0, 0}`.
    /// - A zero (or non-positive) `amount` gives the best level as is.
    /// - If the side holds less than `amount`, the result covers everything
    ///   on the side.
    pub fn best_side(&self, side: Side, amount: f64) -> PriceLevel {
        let mut levels = self.iter(side);
        let Some(best) = levels.next() else {
            return PriceLevel::default();
        };
        if !(amount > 0.0) {
            return best;
        }

        let mut remaining = amount;
        let mut total_amount = 0.0;
        let mut total_notional = 0.0;
        for level in std::iter::once(best).chain(levels) {
            let take = remaining.min(level.amount);
            total_amount += take;
            total_notional += level.price * take;
            remaining -= take;
            if remaining <= 0.0 {
                break;
            }
        }
        PriceLevel::new(total_notional / total_amount, total_amount)
    }

    /// Top `n` levels of `side`, best first.
    pub fn depth(&self, side: Side, n: usize) -> Vec<PriceLevel> {
        self.iter(side).take(n).collect()
    }

    /// Price-level index for `side`.
    pub fn levels(&self, side: Side) -> &LevelIndex {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }

    fn levels_mut(&mut self, side: Side) -> &mut LevelIndex {
        match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        }
    }

    /// Resting order by id.
    pub fn get(&self, id: &str) -> Option<&O> {
        self.orders.get(id)
    }

    /// `true` if an order with this id is resting.
    pub fn contains(&self, id: &str) -> bool {
        self.orders.contains_key(id)
    }

    /// Number of resting orders.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of price levels on `side`.
    pub fn level_count(&self, side: Side) -> usize {
        self.levels(side).len()
    }

    /// `true` if no orders rest on either side.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Drop all orders and levels. Configuration is kept.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.buys.clear();
        self.sells.clear();
    }
}
