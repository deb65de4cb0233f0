use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};

use vrstore_cart::Cart;
use vrstore_core::{Money, ProductId};

fn filled_cart(lines: u32) -> Cart {
    let mut cart = Cart::new();
    let now = Utc::now();
    for n in 0..lines {
        cart.add_item(
            ProductId::new(format!("p{n}")),
            format!("product {n}"),
            Money::from_cents(999 + u64::from(n)),
            now,
        )
        .expect("valid line");
    }
    cart
}

fn bench_cart_ops(c: &mut Criterion) {
    let now = Utc::now();

    c.bench_function("add_existing_line", |b| {
        let mut cart = filled_cart(50);
        b.iter(|| {
            cart.add_item(ProductId::new("p25"), "product 25", Money::from_cents(999), now)
                .expect("valid line")
        });
    });

    c.bench_function("total_over_100_lines", |b| {
        let cart = filled_cart(100);
        b.iter(|| cart.total());
    });

    c.bench_function("export_snapshot_100_lines", |b| {
        let cart = filled_cart(100);
        b.iter(|| cart.export_snapshot(now));
    });
}

criterion_group!(benches, bench_cart_ops);
criterion_main!(benches);
