//! Integration tests driving the book through its public API.

use levelbook::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-12;

fn assert_level(actual: PriceLevel, price: f64, amount: f64) {
    assert!(
        (actual.price - price).abs() < EPS && (actual.amount - amount).abs() < EPS,
        "expected {{{price}, {amount}}}, got {actual:?}"
    );
}

fn simple_orders() -> Vec<OrderRecord> {
    vec![
        OrderRecord::buy("1", 0.1, 100.0),
        OrderRecord::buy("2", 0.2, 100.0),
        OrderRecord::sell("3", 0.4, 150.0),
        OrderRecord::sell("4", 0.3, 50.0),
        OrderRecord::sell("5", 0.3, 50.0),
    ]
}

// ---------------------------------------------------------------------------
// Two-sided scenario
// ---------------------------------------------------------------------------

#[test]
fn test_simple_book() {
    let mut book = Orderbook::new();
    for order in simple_orders() {
        book.add(order).unwrap();
    }

    let front = book.front(0.0);
    assert_eq!(
        front,
        Front {
            buy: PriceLevel::new(0.2, 100.0),
            sell: PriceLevel::new(0.3, 100.0),
        }
    );
    assert!((front.spread() - 0.1).abs() < 1e-16);

    let front = book.front(200.0);
    assert_level(front.buy, 0.15, 200.0);
    assert_level(front.sell, 0.35, 200.0);
    assert!((front.spread() - 0.2).abs() < 1e-15);

    let mut prev = f64::INFINITY;
    for level in book.iter(Side::Buy) {
        assert!(level.amount > 0.0);
        assert!(level.price < prev);
        prev = level.price;
    }
    let mut prev = f64::NEG_INFINITY;
    for level in book.iter(Side::Sell) {
        assert!(level.amount > 0.0);
        assert!(level.price > prev);
        prev = level.price;
    }

    for order in simple_orders() {
        assert!(book.remove(&order.id).is_removed());
    }
    assert_eq!(book.front(100.0), Front::default());
    assert!(book.is_empty());
    assert_eq!(book.level_count(Side::Buy), 0);
    assert_eq!(book.level_count(Side::Sell), 0);
}

#[test]
fn test_vwap_over_whole_side() {
    let mut book = Orderbook::new();
    for order in simple_orders() {
        book.add(order).unwrap();
    }
    // Sells hold 100 @ 0.3 + 150 @ 0.4 = 90 over 250.
    assert_level(book.best_side(Side::Sell, 1_000.0), 0.36, 250.0);
    assert_level(book.best_side(Side::Buy, 1_000.0), 0.15, 200.0);
}

// ---------------------------------------------------------------------------
// Precision bucketing
// ---------------------------------------------------------------------------

#[test]
fn test_precision_merges_nearby_prices() {
    let mut book = Orderbook::with_precision(0.5);
    book.add(OrderRecord::sell("a", 10.1, 1.0)).unwrap();
    book.add(OrderRecord::sell("b", 10.2, 2.0)).unwrap();
    book.add(OrderRecord::sell("c", 10.5, 4.0)).unwrap();

    // 10.1 and 10.2 round down to 10.0; 10.5 is on the grid.
    let levels: Vec<PriceLevel> = book.iter(Side::Sell).collect();
    assert_eq!(levels.len(), 2);
    assert_level(levels[0], 10.0, 3.0);
    assert_level(levels[1], 10.5, 4.0);

    book.remove("a");
    assert_level(book.best_side(Side::Sell, 0.0), 10.0, 2.0);
    book.remove("b");
    assert_level(book.best_side(Side::Sell, 0.0), 10.5, 4.0);
}

#[test]
fn test_precision_biases_buys_up_and_sells_down() {
    let mut book = Orderbook::with_precision(1.0);
    book.add(OrderRecord::buy("b", 99.3, 1.0)).unwrap();
    book.add(OrderRecord::sell("s", 100.3, 1.0)).unwrap();

    let front = book.front(0.0);
    assert_level(front.buy, 100.0, 1.0);
    assert_level(front.sell, 100.0, 1.0);
    assert_eq!(front.spread(), 0.0);

    // Removal recomputes the same bucket and finds the level.
    assert!(matches!(book.remove("b"), RemoveOutcome::LevelRemoved { .. }));
    assert!(matches!(book.remove("s"), RemoveOutcome::LevelRemoved { .. }));
}

#[test]
fn test_zero_precision_keeps_raw_prices() {
    let mut book = Orderbook::with_precision(0.0);
    book.add(OrderRecord::buy("1", 1.23, 1.0)).unwrap();
    book.add(OrderRecord::buy("2", 1.24, 1.0)).unwrap();
    assert_eq!(book.level_count(Side::Buy), 2);
}

#[test]
fn test_custom_pricer() {
    let mut book = Orderbook::with_pricer(Pricer::custom(|o: &OrderRecord| o.price.round()));
    book.add(OrderRecord::buy("1", 4.6, 1.0)).unwrap();
    book.add(OrderRecord::buy("2", 5.4, 1.0)).unwrap();
    assert_eq!(book.level_count(Side::Buy), 1);
    assert_eq!(book.levels(Side::Buy).get(5.0), Some(2.0));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_book_from_json_config() {
    let config: BookConfig =
        serde_json::from_str(r#"{"precision": 0.25, "duplicates": "replace"}"#).unwrap();
    let mut book = Orderbook::with_config(&config).unwrap();

    book.add(OrderRecord::sell("1", 1.1, 1.0)).unwrap();
    book.add(OrderRecord::sell("1", 1.3, 2.0)).unwrap();

    assert_eq!(book.order_count(), 1);
    assert_eq!(book.depth(Side::Sell, 10), vec![PriceLevel::new(1.25, 2.0)]);
}

// ---------------------------------------------------------------------------
// Custom order types
// ---------------------------------------------------------------------------

struct Quote {
    key: String,
    px: f64,
    qty: f64,
    bid: bool,
}

impl Order for Quote {
    fn id(&self) -> &str {
        &self.key
    }

    fn price(&self) -> f64 {
        self.px
    }

    fn amount(&self) -> f64 {
        self.qty
    }

    fn side(&self) -> Side {
        if self.bid { Side::Buy } else { Side::Sell }
    }
}

#[test]
fn test_foreign_order_type() {
    let mut book: Orderbook<Quote> = Orderbook::new();
    book.add(Quote {
        key: "q1".into(),
        px: 50.0,
        qty: 2.0,
        bid: true,
    })
    .unwrap();
    book.add(Quote {
        key: "q2".into(),
        px: 51.0,
        qty: 1.0,
        bid: false,
    })
    .unwrap();

    assert_eq!(book.get("q1").map(|q| q.qty), Some(2.0));
    assert_eq!(book.front(0.0).spread(), 1.0);
}

#[test]
fn test_boxed_trait_objects() {
    let mut book: Orderbook<Box<dyn Order + Send + Sync>> = Orderbook::new();
    book.add(Box::new(OrderRecord::buy("1", 9.0, 1.0))).unwrap();
    book.add(Box::new(Quote {
        key: "2".into(),
        px: 9.0,
        qty: 3.0,
        bid: true,
    }))
    .unwrap();
    assert_eq!(book.best_side(Side::Buy, 0.0), PriceLevel::new(9.0, 4.0));
}

// ---------------------------------------------------------------------------
// Randomised
// ---------------------------------------------------------------------------

#[test]
fn test_random_orders_sorted_by_side() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut book = Orderbook::new();
    let mut buys = Vec::new();
    let mut sells = Vec::new();

    for i in 0..100 {
        let price = 1.0 + rng.gen::<f64>() * 99.0;
        let order = if rng.gen_bool(0.5) {
            OrderRecord::buy(i.to_string(), price, 50.0)
        } else {
            OrderRecord::sell(i.to_string(), price, 50.0)
        };
        match order.side {
            Side::Buy => buys.push(order.clone()),
            Side::Sell => sells.push(order.clone()),
        }
        book.add(order).unwrap();
    }

    sells.sort_by(|a, b| a.price.total_cmp(&b.price));
    buys.sort_by(|a, b| b.price.total_cmp(&a.price));

    let mut it = book.iter(Side::Sell);
    for order in &sells {
        assert_eq!(it.next(), Some(PriceLevel::new(order.price, order.amount)));
    }
    assert_eq!(it.next(), None);

    let mut it = book.iter(Side::Buy);
    for order in &buys {
        assert_eq!(it.next(), Some(PriceLevel::new(order.price, order.amount)));
    }
    assert_eq!(it.next(), None);

    // Walking back from the worst level visits the same prices reversed.
    let mut it = book.iter(Side::Buy);
    let mut back = Vec::new();
    let mut level = it.seek_last();
    while let Some(l) = level {
        back.push(l.price);
        level = it.prev();
    }
    back.reverse();
    let forward: Vec<f64> = buys.iter().map(|o| o.price).collect();
    assert_eq!(back, forward);

    // Jumping to the worst sell from partway through the walk.
    let mut it = book.iter(Side::Sell);
    for order in sells.iter().take(10) {
        assert_eq!(it.next().map(|l| l.price), Some(order.price));
    }
    let worst = &sells[sells.len() - 1];
    let next_worst = &sells[sells.len() - 2];
    assert_eq!(it.seek_last(), Some(PriceLevel::new(worst.price, worst.amount)));
    assert_eq!(it.prev().map(|l| l.price), Some(next_worst.price));
}

#[test]
fn test_random_add_remove_leaves_no_residue() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut book = Orderbook::with_precision(0.5);
    let mut ids = Vec::new();

    for i in 0..500 {
        let price = 90.0 + rng.gen_range(0.0..20.0);
        let amount = rng.gen_range(1.0..10.0);
        let order = if rng.gen_bool(0.5) {
            OrderRecord::buy(i.to_string(), price, amount)
        } else {
            OrderRecord::sell(i.to_string(), price, amount)
        };
        book.add(order).unwrap();
        ids.push(i.to_string());

        if rng.gen_bool(0.3) {
            let victim = ids.swap_remove(rng.gen_range(0..ids.len()));
            assert!(!book.remove(&victim).is_inconsistent());
        }
    }

    for id in ids {
        assert!(!book.remove(&id).is_inconsistent());
    }
    assert!(book.is_empty());
    assert_eq!(book.iter(Side::Buy).count(), 0);
    assert_eq!(book.iter(Side::Sell).count(), 0);
}
