//! Order book performance benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench engine`.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use orderbook_engine::{replay_into_book, Generator, GeneratorConfig, Market, OrderBook, OrderId, Side};
use rust_decimal::Decimal;

fn resting_book(levels: i64, per_level: usize) -> (OrderBook, Vec<OrderId>) {
    let mut book = OrderBook::new(Market::new("ETH"));
    let mut ids = Vec::with_capacity(levels as usize * per_level);
    for price in 1..=levels {
        for _ in 0..per_level {
            let handle = book
                .place_limit(Side::Ask, Decimal::from(1_000 + price), Decimal::from(1))
                .unwrap();
            ids.push(handle.id);
        }
    }
    (book, ids)
}

fn bench_place_limit_throughput(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("orderbook");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("place_limit_1000", |b| {
        b.iter_batched(
            || OrderBook::new(Market::new("ETH")),
            |mut book| {
                for i in 0..N {
                    let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };
                    let price = Decimal::from(100 + (i % 50) as i64);
                    book.place_limit(side, price, Decimal::from(1)).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_market_sweep(c: &mut Criterion) {
    const LEVELS: i64 = 100;
    const PER_LEVEL: usize = 10;
    let mut group = c.benchmark_group("orderbook");
    group.throughput(Throughput::Elements(LEVELS as u64 * PER_LEVEL as u64));
    group.bench_function("market_sweep_100_levels", |b| {
        b.iter_batched(
            || resting_book(LEVELS, PER_LEVEL).0,
            |mut book| {
                let size = book.total_volume(Side::Ask);
                book.place_market(Side::Bid, size).unwrap();
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    const CANCELS: usize = 100;
    let mut group = c.benchmark_group("orderbook");
    group.throughput(Throughput::Elements(CANCELS as u64));
    group.bench_function("cancel_100_after_500_resting", |b| {
        b.iter_batched(
            || {
                let (book, ids) = resting_book(50, 10);
                let ids: Vec<OrderId> = ids.into_iter().step_by(5).take(CANCELS).collect();
                (book, ids)
            },
            |(mut book, ids)| {
                for id in ids {
                    book.cancel(id).unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_replay(c: &mut Criterion) {
    const N: usize = 1000;
    let mut group = c.benchmark_group("orderbook");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("replay_1000_mixed", |b| {
        b.iter_batched(
            || {
                let commands = Generator::new(GeneratorConfig {
                    seed: 42,
                    num_commands: N,
                    ..Default::default()
                })
                .all_commands();
                (OrderBook::new(Market::new("ETH")), commands)
            },
            |(mut book, commands)| {
                replay_into_book(&mut book, commands).unwrap();
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_place_limit_throughput,
    bench_market_sweep,
    bench_cancel,
    bench_replay
);
criterion_main!(benches);
