//! Property tests for book invariants under arbitrary add/remove sequences.

use levelbook::{Front, OrderRecord, Orderbook, PriceLevel, Side};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(Side, f64, f64),
    /// Remove the n-th live order (modulo the live count).
    Remove(usize),
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

/// Prices on a coarse grid so that orders collide into shared levels.
fn arb_price() -> impl Strategy<Value = f64> {
    (1u32..40).prop_map(|ticks| f64::from(ticks) * 0.25)
}

fn arb_amount() -> impl Strategy<Value = f64> {
    (1u32..1_000).prop_map(|lots| f64::from(lots) * 0.1)
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (arb_side(), arb_price(), arb_amount()).prop_map(|(s, p, a)| Op::Add(s, p, a)),
        2 => any::<usize>().prop_map(Op::Remove),
    ]
}

fn run(ops: &[Op], book: &mut Orderbook, live: &mut Vec<String>) {
    for (i, op) in ops.iter().enumerate() {
        match *op {
            Op::Add(side, price, amount) => {
                let id = format!("o{i}");
                book.add(OrderRecord::new(id.clone(), side, price, amount))
                    .unwrap();
                live.push(id);
            }
            Op::Remove(n) if !live.is_empty() => {
                let id = live.swap_remove(n % live.len());
                assert!(book.remove(&id).is_removed());
            }
            Op::Remove(_) => {}
        }
    }
}

fn prices(book: &Orderbook, side: Side) -> Vec<f64> {
    book.iter(side).map(|l| l.price).collect()
}

proptest! {
    #[test]
    fn prop_sides_stay_sorted(ops in prop::collection::vec(arb_op(), 0..200)) {
        let mut book = Orderbook::new();
        let mut live = Vec::new();
        run(&ops, &mut book, &mut live);

        let bids = prices(&book, Side::Buy);
        prop_assert!(bids.windows(2).all(|w| w[0] > w[1]), "bids not descending: {:?}", bids);
        let asks = prices(&book, Side::Sell);
        prop_assert!(asks.windows(2).all(|w| w[0] < w[1]), "asks not ascending: {:?}", asks);

        for side in [Side::Buy, Side::Sell] {
            prop_assert!(book.iter(side).all(|l| l.amount > 0.0));
        }
        prop_assert_eq!(book.order_count(), live.len());
    }

    #[test]
    fn prop_levels_match_live_orders(ops in prop::collection::vec(arb_op(), 0..200)) {
        let mut book = Orderbook::new();
        let mut live = Vec::new();
        run(&ops, &mut book, &mut live);

        for side in [Side::Buy, Side::Sell] {
            for level in book.iter(side) {
                let expected: f64 = live
                    .iter()
                    .filter_map(|id| book.get(id))
                    .filter(|o| o.side == side && o.price == level.price)
                    .map(|o| o.amount)
                    .sum();
                prop_assert!(
                    (level.amount - expected).abs() < 1e-6,
                    "level {:?} expected {}", level, expected
                );
            }
        }
    }

    #[test]
    fn prop_removing_everything_empties_book(ops in prop::collection::vec(arb_op(), 0..200)) {
        let mut book = Orderbook::with_precision(0.5);
        let mut live = Vec::new();
        run(&ops, &mut book, &mut live);

        for id in live.drain(..) {
            prop_assert!(!book.remove(&id).is_inconsistent());
        }
        prop_assert_eq!(book.level_count(Side::Buy), 0);
        prop_assert_eq!(book.level_count(Side::Sell), 0);
        prop_assert_eq!(book.front(1.0), Front::default());
    }

    #[test]
    fn prop_vwap_is_bounded_by_levels(
        ops in prop::collection::vec(arb_op(), 1..100),
        want in 0.1f64..500.0,
    ) {
        let mut book = Orderbook::new();
        let mut live = Vec::new();
        run(&ops, &mut book, &mut live);

        for side in [Side::Buy, Side::Sell] {
            let vwap = book.best_side(side, want);
            let levels: Vec<PriceLevel> = book.iter(side).collect();
            if levels.is_empty() {
                prop_assert_eq!(vwap, PriceLevel::default());
                continue;
            }
            let total: f64 = levels.iter().map(|l| l.amount).sum();
            prop_assert!((vwap.amount - want.min(total)).abs() < 1e-6);

            let best = levels[0].price;
            let worst = levels[levels.len() - 1].price;
            let (lo, hi) = if best < worst { (best, worst) } else { (worst, best) };
            prop_assert!(vwap.price >= lo - 1e-9 && vwap.price <= hi + 1e-9);
        }
    }
}
