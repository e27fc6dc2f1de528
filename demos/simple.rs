//! Realistic collaborative editing example using the WOOT engine.
//!
//! This example simulates two users (Alice and Bob) collaboratively editing
//! a document. It demonstrates:
//! - Local edits producing operations to ship
//! - Network synchronization with the pending pool
//! - Conflict resolution for concurrent edits at the same position
//! - Convergence after exchange
//!
//! Run with: cargo run --example simple

use std::io::Write;
use std::thread;
use std::time::Duration;

use crdt_woot::{Operation, WootString};

struct CollaborativeSession {
    alice: WootString,
    bob: WootString,
    /// Operations Alice has shipped but Bob has not yet received
    from_alice: Vec<Operation>,
    /// Operations Bob has shipped but Alice has not yet received
    from_bob: Vec<Operation>,
    network_delay: Duration,
}

impl CollaborativeSession {
    fn new() -> Self {
        Self {
            alice: WootString::new(1), // Alice = site 1
            bob: WootString::new(2),   // Bob = site 2
            from_alice: Vec::new(),
            from_bob: Vec::new(),
            network_delay: Duration::from_millis(50),
        }
    }

    fn alice_types(&mut self, text: &str, at: usize) {
        print!("Alice types: ");
        for (i, ch) in text.chars().enumerate() {
            print!("{}", ch);
            std::io::stdout().flush().unwrap();
            let op = self.alice.generate_insert(at + i, ch).unwrap();
            self.from_alice.push(op);
            thread::sleep(Duration::from_millis(20));
        }
        println!();
    }

    fn bob_types(&mut self, text: &str, at: usize) {
        print!("Bob types:   ");
        for (i, ch) in text.chars().enumerate() {
            print!("{}", ch);
            std::io::stdout().flush().unwrap();
            let op = self.bob.generate_insert(at + i, ch).unwrap();
            self.from_bob.push(op);
            thread::sleep(Duration::from_millis(20));
        }
        println!();
    }

    fn sync_changes(&mut self) {
        // Simulate network synchronization
        thread::sleep(self.network_delay);

        for op in self.from_alice.drain(..) {
            self.bob.receive(op);
        }
        self.bob.drain().unwrap();

        for op in self.from_bob.drain(..) {
            self.alice.receive(op);
        }
        self.alice.drain().unwrap();
    }
}

fn main() {
    println!("=== Collaborative WOOT Editing Session ===\n");

    let mut session = CollaborativeSession::new();

    // Alice starts the document
    session.alice_types("Hello ", 0);
    println!("Alice sees: '{}'", session.alice.value());
    println!("Bob sees:   '{}'\n", session.bob.value());

    session.sync_changes();
    println!("--- after sync ---");
    println!("Alice sees: '{}'", session.alice.value());
    println!("Bob sees:   '{}'\n", session.bob.value());

    // Both edit concurrently: Alice appends, Bob inserts at the front
    session.alice_types("world", 6);
    session.bob_types(">> ", 0);
    println!("Alice sees: '{}'", session.alice.value());
    println!("Bob sees:   '{}'\n", session.bob.value());

    session.sync_changes();
    println!("--- after sync ---");
    println!("Alice sees: '{}'", session.alice.value());
    println!("Bob sees:   '{}'\n", session.bob.value());

    assert_eq!(session.alice.value(), session.bob.value());
    println!("✓ Both sites converged to '{}'", session.alice.value());

    // Bob deletes the markers he added
    for _ in 0..3 {
        let op = session.bob.generate_delete(0).unwrap();
        session.from_bob.push(op);
    }
    session.sync_changes();

    println!("\n--- after Bob's deletions sync ---");
    println!("Alice sees: '{}'", session.alice.value());
    println!("Bob sees:   '{}'", session.bob.value());
    assert_eq!(session.alice.value(), session.bob.value());

    println!(
        "\nTombstones kept at Alice's site: {}",
        session.alice.total_char_count() - session.alice.visible_char_count() - 2
    );
    println!("✓ Session complete");
}
