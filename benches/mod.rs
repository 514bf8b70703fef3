//! Benchmarks for the hot paths: resting an order, matching against a
//! deep book, and cancelling an interior order. Mirrors the shape of
//! the teacher crate's benchmark suite, adapted to the single-threaded
//! `OrderBook` API.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use orderbook_core::{BookConfig, Order, OrderBook, OrderIdComparator, OrderSide};

fn book_with_resting_orders(levels: i32, per_level: i32) -> OrderBook {
    let mut book = OrderBook::new(BookConfig {
        tick_price: 1,
        comparator: OrderIdComparator::LexInteger,
        initial_size: (levels as usize) * 2,
        step_size: (levels as usize).max(1),
    });
    for level in 0..levels {
        for seat in 0..per_level {
            let id = format!("{level}-{seat}");
            book.add_order(Order::new(id, OrderSide::Bid, 1000 - level, 1))
                .unwrap();
        }
    }
    book
}

fn bench_add_no_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_no_match");
    for levels in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(levels), &levels, |b, &levels| {
            b.iter_batched(
                || book_with_resting_orders(levels, 1),
                |mut book| {
                    book.add_order(Order::new("new", OrderSide::Bid, 1000 - levels - 1, 1))
                        .unwrap();
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_match_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_sweep");
    for levels in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(levels), &levels, |b, &levels| {
            b.iter_batched(
                || book_with_resting_orders(levels, 1),
                |mut book| {
                    book.add_order(Order::new("sweeper", OrderSide::Ask, 1000 - levels, levels))
                        .unwrap();
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_cancel_interior(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel_interior");
    for levels in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(levels), &levels, |b, &levels| {
            b.iter_batched(
                || {
                    let book = book_with_resting_orders(levels, 1);
                    let target = orderbook_core::OrderId::from(format!("{}-0", levels / 2));
                    (book, target)
                },
                |(mut book, target)| {
                    book.delete_order(&target, OrderSide::Bid).unwrap();
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add_no_match, bench_match_sweep, bench_cancel_interior);
criterion_main!(benches);
