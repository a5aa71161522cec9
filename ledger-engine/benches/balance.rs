//! Balance reconstruction benchmarks
//!
//! Every mutating operation looks up the balance first, so `balance_at`
//! dominates throughput. These benchmarks measure:
//! - Point-in-time lookups against timelines of increasing length
//! - Payment throughput (lookup + debit + scheduled cashback)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ledger_engine::Ledger;

fn ledger_with_history(entries: u64) -> Ledger {
    let mut ledger = Ledger::new();
    ledger.create_account(0, "acc1").expect("create");
    for at in 1..=entries {
        ledger.deposit(at, "acc1", 10).expect("deposit");
    }
    ledger
}

fn bench_balance_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance_at");
    for entries in [10u64, 100, 1_000, 10_000] {
        let ledger = ledger_with_history(entries);
        group.bench_with_input(BenchmarkId::from_parameter(entries), &entries, |b, &entries| {
            b.iter(|| ledger.balance_at(black_box("acc1"), black_box(entries / 2)))
        });
    }
    group.finish();
}

fn bench_pay(c: &mut Criterion) {
    c.bench_function("pay", |b| {
        let mut ledger = ledger_with_history(1_000);
        let mut at = 1_000u64;
        b.iter(|| {
            at += 1;
            ledger.deposit(at, "acc1", 100).expect("deposit");
            black_box(ledger.pay(at, "acc1", 100).expect("pay"))
        })
    });
}

criterion_group!(benches, bench_balance_at, bench_pay);
criterion_main!(benches);
