//! Offline editing and unreliable delivery example for the WOOT engine.
//!
//! This example showcases:
//! - Operations arriving out of causal order and waiting in the pending pool
//! - Duplicate delivery being absorbed
//! - Three-way convergence after a full exchange
//!
//! Run with: cargo run --example offline_sync

use crdt_woot::{Operation, WootString};
use tracing_subscriber::EnvFilter;

fn main() {
    // Run with RUST_LOG=crdt_woot=debug to see the sequence dumps
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Offline Sync Demonstration ===\n");

    out_of_order_demo();
    println!();

    duplicate_delivery_demo();
    println!();

    three_site_demo();
}

/// A flaky transport reverses the operation stream; the pending pool holds
/// everything until the anchors arrive.
fn out_of_order_demo() {
    println!("--- Out-of-order Delivery ---");

    let mut writer = WootString::new(1);
    let mut reader = WootString::new(2);

    let mut ops = Vec::new();
    for (i, ch) in "woot".chars().enumerate() {
        ops.push(writer.generate_insert(i, ch).unwrap());
    }
    println!("Writer produced: '{}'", writer.value());

    // Deliver the entire history backwards
    ops.reverse();
    for (n, op) in ops.into_iter().enumerate() {
        reader.receive(op);
        let progressed = reader.drain().unwrap();
        println!(
            "After delivery {}: content='{}', pending={}, progressed={}",
            n + 1,
            reader.value(),
            reader.pending_count(),
            progressed
        );
    }

    assert_eq!(reader.value(), "woot");
    assert_eq!(reader.pending_count(), 0);
    println!("✓ Reader converged despite reversed delivery");
}

/// At-least-once transports may deliver the same operation many times.
fn duplicate_delivery_demo() {
    println!("--- Duplicate Delivery ---");

    let mut writer = WootString::new(1);
    let mut reader = WootString::new(2);

    let insert = writer.generate_insert(0, 'x').unwrap();
    let delete = writer.generate_delete(0).unwrap();

    for round in 1..=3 {
        reader.receive(insert.clone());
        reader.receive(delete.clone());
        reader.drain().unwrap();
        println!(
            "Round {}: content='{}', total chars={}",
            round,
            reader.value(),
            reader.total_char_count()
        );
    }

    assert_eq!(reader.total_char_count(), 3); // sentinels + one tombstone
    println!("✓ Redelivery left a single tombstone");
}

/// Three sites edit the same spot concurrently; every site ends up with the
/// same text whatever order the operations reach it in.
fn three_site_demo() {
    println!("--- Three-site Convergence ---");

    let mut sites = [WootString::new(1), WootString::new(2), WootString::new(3)];
    let labels = ['a', 'b', 'c'];

    let ops: Vec<Operation> = sites
        .iter_mut()
        .zip(labels)
        .map(|(site, ch)| site.generate_insert(0, ch).unwrap())
        .collect();

    for site in sites.iter_mut() {
        for op in &ops {
            site.receive(op.clone());
        }
        site.drain().unwrap();
    }

    for site in &sites {
        println!("Site {} sees '{}'", site.site(), site.value());
    }

    assert!(sites.iter().all(|s| s.value() == sites[0].value()));
    sites[0].dump_chars();
    println!("✓ All three sites converged to '{}'", sites[0].value());
}
