//! Directional cursor over one side of the book.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use crate::levels::{Key, Level};
use crate::types::{PriceLevel, Side};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Position {
    /// Before the best level.
    Start,
    At(Key),
    /// After the worst level.
    End,
}

/// Cursor over a [`LevelIndex`](crate::LevelIndex) from best to worst price.
///
/// A fresh iterator sits before the best level, so the first call to
/// [`Iterator::next`] yields the best level. [`prev`](Self::prev) walks back
/// toward the best price, and [`seek_first`](Self::seek_first) /
/// [`seek_last`](Self::seek_last) jump to either end. Each step is an O(log n) lookup from the current
/// price, so the iterator can be moved in any direction and restarted with
/// [`reset`](Self::reset).
#[derive(Clone, Debug)]
pub struct LevelIter<'a> {
    levels: &'a BTreeMap<Key, Level>,
    side: Side,
    pos: Position,
}

impl<'a> LevelIter<'a> {
    pub(crate) fn new(levels: &'a BTreeMap<Key, Level>, side: Side) -> Self {
        Self {
            levels,
            side,
            pos: Position::Start,
        }
    }

    /// Side this iterator walks.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Move to the best level.
    pub fn seek_first(&mut self) -> Option<PriceLevel> {
        let entry = self.best();
        self.settle(entry, Position::End)
    }

    /// Move to the worst level.
    ///
    /// Unlike [`Iterator::last`] this keeps the cursor, so it can be walked
    /// back with [`prev`](Self::prev) afterwards.
    pub fn seek_last(&mut self) -> Option<PriceLevel> {
        let entry = self.worst();
        self.settle(entry, Position::Start)
    }

    /// Move one level toward the best price.
    ///
    /// From the end this lands on the worst level. Returns `None` once the
    /// cursor passes the best level.
    pub fn prev(&mut self) -> Option<PriceLevel> {
        let entry = match self.pos {
            Position::Start => return None,
            Position::At(key) => self.better_than(key),
            Position::End => self.worst(),
        };
        self.settle(entry, Position::Start)
    }

    /// Level under the cursor, if it is on one.
    pub fn current(&self) -> Option<PriceLevel> {
        match self.pos {
            Position::At(key) => self
                .levels
                .get(&key)
                .map(|level| PriceLevel::new(key.0, level.amount)),
            _ => None,
        }
    }

    /// Go back to before the best level.
    pub fn reset(&mut self) {
        self.pos = Position::Start;
    }

    fn settle(&mut self, entry: Option<(&Key, &Level)>, otherwise: Position) -> Option<PriceLevel> {
        match entry {
            Some((key, level)) => {
                self.pos = Position::At(*key);
                Some(PriceLevel::new(key.0, level.amount))
            }
            None => {
                self.pos = otherwise;
                None
            }
        }
    }

    fn best(&self) -> Option<(&'a Key, &'a Level)> {
        match self.side {
            Side::Sell => self.levels.first_key_value(),
            Side::Buy => self.levels.last_key_value(),
        }
    }

    fn worst(&self) -> Option<(&'a Key, &'a Level)> {
        match self.side {
            Side::Sell => self.levels.last_key_value(),
            Side::Buy => self.levels.first_key_value(),
        }
    }

    fn worse_than(&self, key: Key) -> Option<(&'a Key, &'a Level)> {
        match self.side {
            Side::Sell => self.levels.range((Excluded(key), Unbounded)).next(),
            Side::Buy => self.levels.range(..key).next_back(),
        }
    }

    fn better_than(&self, key: Key) -> Option<(&'a Key, &'a Level)> {
        match self.side {
            Side::Sell => self.levels.range(..key).next_back(),
            Side::Buy => self.levels.range((Excluded(key), Unbounded)).next(),
        }
    }
}

impl Iterator for LevelIter<'_> {
    type Item = PriceLevel;

    /// Move one level toward the worst price.
    fn next(&mut self) -> Option<PriceLevel> {
        let entry = match self.pos {
            Position::Start => self.best(),
            Position::At(key) => self.worse_than(key),
            Position::End => return None,
        };
        self.settle(entry, Position::End)
    }
}
