//! Synthetic microbenchmark: add + front + remove against a populated book
//! Keeps 1000 resting orders per side and cycles one order through 1M times

use std::time::Instant;

use levelbook::{OrderRecord, Orderbook, Side};

const ITERATIONS: u64 = 1_000_000;
const RESTING: u64 = 1_000;

fn main() {
    let mut book = populate();

    // Warm up
    for i in 0..10_000 {
        cycle(&mut book, i);
    }

    let t0 = Instant::now();

    let mut sum: f64 = 0.0;
    for i in 0..ITERATIONS {
        sum += cycle(&mut book, i);
    }

    // Prevent DCE
    std::hint::black_box(sum);

    let elapsed = t0.elapsed();
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    let per_iter_ns = elapsed.as_nanos() as f64 / ITERATIONS as f64;
    let throughput = ITERATIONS as f64 / elapsed.as_secs_f64();

    println!("Rust orderbook benchmark");
    println!("  Resting orders: {}", format_with_commas(book.order_count() as u64));
    println!("  Iterations: {}", format_with_commas(ITERATIONS));
    println!("  Total time: {:.1} ms", elapsed_ms);
    println!("  Per iteration: {:.0} ns", per_iter_ns);
    println!("  Throughput: {} ops/sec", format_with_commas(throughput as u64));
    println!("  (sum={} to prevent DCE)", sum);
}

/// Book with `RESTING` orders per side spread over 200 ticks below and
/// above 100.
fn populate() -> Orderbook {
    let mut book = Orderbook::with_precision(0.01);
    for i in 0..RESTING {
        let offset = (i % 200) as f64 * 0.01;
        book.add(OrderRecord::buy(format!("b{i}"), 99.99 - offset, 1.0))
            .unwrap();
        book.add(OrderRecord::sell(format!("s{i}"), 100.01 + offset, 1.0))
            .unwrap();
    }
    book
}

/// Add an order, price a 25-unit fill on both sides, then take the order out.
fn cycle(book: &mut Orderbook, i: u64) -> f64 {
    let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
    let price = match side {
        Side::Buy => 99.95 - (i % 7) as f64 * 0.01,
        Side::Sell => 100.05 + (i % 7) as f64 * 0.01,
    };
    book.add(OrderRecord::new("bench", side, price, 2.5)).unwrap();
    let front = book.front(25.0);
    book.remove("bench");
    front.buy.price + front.sell.price
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
