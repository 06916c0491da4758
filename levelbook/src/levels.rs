//! Price-level index: one side of the book, aggregated by price.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::iter::LevelIter;
use crate::types::{PriceLevel, Side};

pub(crate) type Key = OrderedFloat<f64>;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Aggregate state of one price level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Level {
    pub(crate) amount: f64,
    /// Resting orders folded into `amount`.
    pub(crate) orders: usize,
}

// ---------------------------------------------------------------------------
// LevelIndex
// ---------------------------------------------------------------------------

/// One side of the book backed by a `BTreeMap` for O(log n)
/// insert/remove/lookup and sorted iteration.
///
/// Keys are always stored ascending. The side decides which end is "best":
///
/// - **Sell** (asks): lowest price first.
/// - **Buy** (bids): highest price first.
///
/// Every stored level has an amount greater than zero and at least one
/// contributing order.
#[derive(Clone, Debug)]
pub struct LevelIndex {
    levels: BTreeMap<Key, Level>,
    side: Side,
}

// ---------------------------------------------------------------------------
// LevelMut
// ---------------------------------------------------------------------------

/// Mutable handle to a single level inside a [`LevelIndex`].
///
/// Borrowed from [`LevelIndex::lookup_or_nearest`]; the index cannot be
/// touched until the handle is dropped.
#[derive(Debug)]
pub struct LevelMut<'a> {
    price: f64,
    level: &'a mut Level,
}

impl LevelMut<'_> {
    /// Key price of the level.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Aggregate resting amount.
    pub fn amount(&self) -> f64 {
        self.level.amount
    }

    /// Number of resting orders in this level.
    pub fn orders(&self) -> usize {
        self.level.orders
    }

    /// Overwrite the aggregate amount in place.
    ///
    /// Callers must remove the level through [`LevelIndex::remove`] instead
    /// of setting a non-positive amount.
    pub fn set_amount(&mut self, amount: f64) {
        debug_assert!(amount > 0.0, "level amount must stay positive");
        self.level.amount = amount;
    }

    /// Fold one more order of `amount` into the level.
    pub fn join(&mut self, amount: f64) {
        self.set_amount(self.level.amount + amount);
        self.level.orders += 1;
    }

    /// Take one order of `amount` out of the level and return what is left.
    ///
    /// Returns `None`, leaving the level untouched, when that order is the
    /// last one in the level or covers its whole amount; the caller then
    /// removes the level.
    pub fn leave(&mut self, amount: f64) -> Option<f64> {
        if self.level.orders <= 1 || self.level.amount <= amount {
            return None;
        }
        let remaining = self.level.amount - amount;
        self.set_amount(remaining);
        self.level.orders -= 1;
        Some(remaining)
    }

    /// Copy of the level as it stands now.
    pub fn snapshot(&self) -> PriceLevel {
        PriceLevel::new(self.price, self.level.amount)
    }
}

impl LevelIndex {
    /// Create a new empty index for `side`.
    pub fn new(side: Side) -> Self {
        Self {
            levels: BTreeMap::new(),
            side,
        }
    }

    /// Side this index orders for.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Find the level at exactly `price`, or the nearest level at or better
    /// than `price` for this side.
    ///
    /// The returned flag is `true` only for an exact match. Returns `None`
    /// if no level is at or better than `price`.
    pub fn lookup_or_nearest(&mut self, price: f64) -> Option<(LevelMut<'_>, bool)> {
        let key = OrderedFloat(price);
        if self.levels.contains_key(&key) {
            return self
                .levels
                .get_mut(&key)
                .map(|level| (LevelMut { price, level }, true));
        }

        let nearest = match self.side {
            // Ascending: the closest lower price is the nearest better ask.
            Side::Sell => self.levels.range_mut(..key).next_back(),
            // Higher prices are better bids.
            Side::Buy => self.levels.range_mut(key..).next(),
        };
        nearest.map(|(k, level)| (LevelMut { price: k.0, level }, false))
    }

    /// Exact-match lookup of the aggregate amount at `price`.
    pub fn get(&self, price: f64) -> Option<f64> {
        self.levels.get(&OrderedFloat(price)).map(|l| l.amount)
    }

    /// Number of resting orders at exactly `price`.
    pub fn orders_at(&self, price: f64) -> Option<usize> {
        self.levels.get(&OrderedFloat(price)).map(|l| l.orders)
    }

    /// Insert a new single-order level, replacing any level already at
    /// `price`.
    pub fn insert(&mut self, price: f64, amount: f64) {
        debug_assert!(amount > 0.0, "level amount must be positive");
        self.levels
            .insert(OrderedFloat(price), Level { amount, orders: 1 });
    }

    /// Remove the level at exactly `price`, returning its amount.
    pub fn remove(&mut self, price: f64) -> Option<f64> {
        self.levels.remove(&OrderedFloat(price)).map(|l| l.amount)
    }

    /// Best level for this side, or `None` if empty.
    pub fn best(&self) -> Option<PriceLevel> {
        let entry = match self.side {
            Side::Sell => self.levels.first_key_value(),
            Side::Buy => self.levels.last_key_value(),
        };
        entry.map(|(k, l)| PriceLevel::new(k.0, l.amount))
    }

    /// Directional iterator positioned before the best level.
    pub fn iter(&self) -> LevelIter<'_> {
        LevelIter::new(&self.levels, self.side)
    }

    /// Number of price levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// `true` if no level rests on this side.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Sum of all level amounts.
    pub fn total_amount(&self) -> f64 {
        self.levels.values().map(|l| l.amount).sum()
    }

    /// Remove all levels.
    pub fn clear(&mut self) {
        self.levels.clear();
    }
}
