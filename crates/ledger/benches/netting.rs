use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shopbook_accounts::{AccountStore, NewAccount};
use shopbook_ledger::{LedgerEntry, OverpayPolicy, RequestKind, TransactionRequest, apply};

fn seeded_store(n: usize) -> AccountStore {
    let mut store = AccountStore::new();
    for i in 0..n {
        store
            .create(NewAccount::new(format!("customer-{i}"), format!("017{i:08}")))
            .expect("unique seed account");
    }
    store
}

/// Apply a cycle of all four request kinds against the last account of
/// an account set of growing size.
fn bench_apply(c: &mut Criterion) {
    let day = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    let mut group = c.benchmark_group("ledger_apply");

    for size in [10usize, 100, 1_000] {
        let store = seeded_store(size);
        let target = store.list()[size - 1].id_typed();
        let requests: Vec<TransactionRequest> = RequestKind::ALL
            .iter()
            .map(|kind| {
                TransactionRequest::with_decimal(target, *kind, Decimal::new(12_345, 2), day)
                    .expect("positive amount")
            })
            .collect();

        group.throughput(Throughput::Elements(requests.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut accounts = store.list().to_vec();
                let mut ledger: Vec<LedgerEntry> = Vec::new();
                for req in &requests {
                    let applied = apply(&accounts, &ledger, req, OverpayPolicy::Faithful)
                        .expect("known account");
                    accounts = applied.accounts;
                    ledger = applied.ledger;
                }
                black_box(ledger.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
