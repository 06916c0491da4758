//! In-memory order book that aggregates resting orders into price levels.
//!
//! Orders are anything implementing [`Order`]. Each side keeps an ordered
//! index of price → aggregate amount, so best-price and VWAP queries walk
//! levels rather than individual orders.
//!
//! ```
//! use levelbook::{OrderRecord, Orderbook, Side};
//!
//! let mut book = Orderbook::new();
//! book.add(OrderRecord::buy("1", 0.1, 100.0)).unwrap();
//! book.add(OrderRecord::buy("2", 0.2, 100.0)).unwrap();
//! book.add(OrderRecord::sell("3", 0.3, 100.0)).unwrap();
//!
//! let front = book.front(0.0);
//! assert_eq!(front.buy.price, 0.2);
//! assert_eq!(front.sell.price, 0.3);
//!
//! // Price to sell 200 into the bids.
//! let vwap = book.best_side(Side::Buy, 200.0);
//! assert!((vwap.price - 0.15).abs() < 1e-12);
//! ```

pub mod book;
pub mod config;
pub mod error;
pub mod iter;
pub mod levels;
pub mod pricer;
pub mod types;

pub use book::{Orderbook, RemoveOutcome};
pub use config::{BookConfig, DuplicatePolicy};
pub use error::{BookError, Result};
pub use iter::LevelIter;
pub use levels::{LevelIndex, LevelMut};
pub use pricer::{round_to_tick, Pricer, PricerFn};
pub use types::{Front, Order, OrderRecord, PriceLevel, Side};
