use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use savings_core::{
    ledger::{average_monthly_net, LedgerEntry, TrailingWindow},
    wishlist::{wishlist_forecast, WishlistItem},
};

fn build_entries(count: usize, today: NaiveDate) -> Vec<LedgerEntry> {
    (0..count)
        .filter_map(|idx| {
            let occurred_on = today.checked_sub_days(Days::new((idx % 120) as u64))?;
            let amount = Decimal::from(50 + (idx % 100) as i64);
            let entry = if idx % 3 == 0 {
                LedgerEntry::income(amount * Decimal::from(4), occurred_on)
            } else {
                LedgerEntry::expense(amount, occurred_on)
            };
            entry.ok()
        })
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date");
    let entries = build_entries(black_box(10_000), today);
    let window = TrailingWindow::new(3).expect("window");

    c.bench_function("average_monthly_net_10k", |b| {
        b.iter(|| average_monthly_net(black_box(&entries), 3).expect("average"))
    });

    c.bench_function("trailing_window_10k", |b| {
        b.iter(|| {
            window
                .average_in_window(black_box(&entries), today)
                .expect("average")
        })
    });
}

fn bench_wishlist(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date");
    let items: Vec<WishlistItem> = (1..=500)
        .filter_map(|id| WishlistItem::new(id, format!("item-{id}"), Decimal::from(id * 25)).ok())
        .collect();

    c.bench_function("wishlist_forecast_500", |b| {
        b.iter(|| wishlist_forecast(black_box(&items), Decimal::from(1250), today).expect("forecast"))
    });
}

criterion_group!(benches, bench_aggregation, bench_wishlist);
criterion_main!(benches);
