//! Edge case integration tests for the WOOT engine.
//!
//! These tests verify robustness under boundary conditions including invalid
//! positions, forged operations, unicode payloads, large documents, and
//! extreme site identifiers.

use crdt_woot::{BEGIN_ID, CharId, END_ID, Operation, WChar, WootError, WootString};

#[test]
fn test_insert_positions_at_limits() {
    let mut doc = WootString::new(1);

    // Only the sentinel gap exists in an empty document
    assert!(doc.generate_insert(0, 'a').is_ok());
    assert_eq!(
        doc.generate_insert(2, 'x'),
        Err(WootError::PositionOutOfRange { pos: 2, limit: 2 })
    );

    // Appending at the last gap is valid
    assert!(doc.generate_insert(1, 'b').is_ok());
    assert_eq!(doc.value(), "ab");
}

#[test]
fn test_delete_positions_at_limits() {
    let mut doc = WootString::new(1);
    assert_eq!(
        doc.generate_delete(0),
        Err(WootError::PositionOutOfRange { pos: 0, limit: 0 })
    );

    doc.generate_insert(0, 'a').unwrap();
    assert_eq!(
        doc.generate_delete(1),
        Err(WootError::PositionOutOfRange { pos: 1, limit: 1 })
    );
    assert!(doc.generate_delete(0).is_ok());
    assert_eq!(doc.value(), "");

    // The tombstone does not count as a deletable position
    assert_eq!(
        doc.generate_delete(0),
        Err(WootError::PositionOutOfRange { pos: 0, limit: 0 })
    );
}

#[test]
fn test_forged_sentinel_delete_is_refused() {
    let mut doc = WootString::new(1);
    doc.generate_insert(0, 'a').unwrap();

    // Sites never generate deletes for sentinels, but a hostile or buggy
    // peer might; the sentinels stay visible either way
    doc.receive(Operation::Delete { id: BEGIN_ID });
    doc.receive(Operation::Delete { id: END_ID });
    doc.drain().unwrap();

    let chars = doc.chars();
    assert!(chars[0].visible);
    assert!(chars[chars.len() - 1].visible);
    assert_eq!(doc.value(), "a");
}

#[test]
fn test_insert_with_unknown_anchors_stays_pending() {
    let mut doc = WootString::new(1);

    let orphan = WChar::new(
        CharId::new(7, 2),
        'x',
        CharId::new(7, 0),
        CharId::new(7, 1),
    );
    doc.receive(Operation::Insert { wchar: orphan });

    assert!(!doc.drain().unwrap());
    assert_eq!(doc.pending_count(), 1);
    assert_eq!(doc.value(), "");

    // Local editing keeps working while the orphan waits
    doc.generate_insert(0, 'a').unwrap();
    assert_eq!(doc.value(), "a");
    assert_eq!(doc.pending_count(), 1);
}

#[test]
fn test_delete_for_unseen_char_waits_for_its_insert() {
    let mut origin = WootString::new(1);
    let insert = origin.generate_insert(0, 'a').unwrap();
    let delete = origin.generate_delete(0).unwrap();

    let mut doc = WootString::new(2);
    doc.receive(delete);
    assert!(!doc.drain().unwrap());
    assert_eq!(doc.pending_count(), 1);

    doc.receive(insert);
    assert!(doc.drain().unwrap());
    assert_eq!(doc.value(), "");
    assert_eq!(doc.pending_count(), 0);
    assert_eq!(doc.chars(), origin.chars());
}

#[test]
fn test_unicode_payloads() {
    let mut a = WootString::new(1);
    let mut b = WootString::new(2);

    let text = "🦀∂中€😀";
    let mut ops = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        ops.push(a.generate_insert(i, ch).unwrap());
    }

    for op in ops {
        b.receive(op);
    }
    b.drain().unwrap();

    assert_eq!(a.value(), text);
    assert_eq!(b.value(), text);
    assert_eq!(a.value().chars().count(), 5);
}

#[test]
fn test_large_document_appends_and_deletes() {
    let mut doc = WootString::new(1);
    let size = 1000;

    for i in 0..size {
        let ch = char::from_u32(65 + (i % 26) as u32).unwrap();
        doc.generate_insert(i, ch).unwrap();
    }
    assert_eq!(doc.visible_char_count(), size);
    assert_eq!(doc.value().len(), size);

    // Delete the first half from the front
    for _ in 0..size / 2 {
        doc.generate_delete(0).unwrap();
    }
    assert_eq!(doc.visible_char_count(), size / 2);
    assert_eq!(doc.total_char_count(), size + 2);
}

#[test]
fn test_extreme_site_ids() {
    let mut high = WootString::new(u64::MAX);
    let mut low = WootString::new(1);

    let op_high = high.generate_insert(0, 'H').unwrap();
    let op_low = low.generate_insert(0, 'L').unwrap();

    high.receive(op_low);
    high.drain().unwrap();
    low.receive(op_high);
    low.drain().unwrap();

    // The lower site identifier orders first
    assert_eq!(high.value(), "LH");
    assert_eq!(low.value(), "LH");
}

#[test]
fn test_interleaved_words_do_not_scramble() {
    let mut a = WootString::new(1);
    let mut b = WootString::new(2);

    let mut ops_a = Vec::new();
    for (i, ch) in "abc".chars().enumerate() {
        ops_a.push(a.generate_insert(i, ch).unwrap());
    }
    let mut ops_b = Vec::new();
    for (i, ch) in "xyz".chars().enumerate() {
        ops_b.push(b.generate_insert(i, ch).unwrap());
    }

    for op in ops_b {
        a.receive(op);
    }
    a.drain().unwrap();
    for op in ops_a {
        b.receive(op);
    }
    b.drain().unwrap();

    assert_eq!(a.value(), b.value());

    // Each site's own run stays in order in the merged result
    let value = a.value();
    let pos = |c: char| value.find(c).unwrap();
    assert!(pos('a') < pos('b') && pos('b') < pos('c'));
    assert!(pos('x') < pos('y') && pos('y') < pos('z'));
}

#[test]
fn test_wire_round_trip_preserves_operations() {
    let mut a = WootString::new(1);
    let insert = a.generate_insert(0, 'a').unwrap();
    let delete = a.generate_delete(0).unwrap();

    let mut b = WootString::new(2);
    for op in [insert, delete] {
        let json = serde_json::to_string(&op).unwrap();
        let parsed: Operation = serde_json::from_str(&json).unwrap();
        b.receive(parsed);
    }
    b.drain().unwrap();

    assert_eq!(a.chars(), b.chars());
    assert_eq!(b.value(), "");
}
