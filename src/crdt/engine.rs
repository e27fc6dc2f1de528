//! The replicated string façade.
//!
//! This module contains the main WootString struct: local operation
//! generation, the insert integration procedure, tombstone deletion, and the
//! pending pool that defers remote operations until their preconditions
//! hold.
//!
//! # Design
//!
//! - Characters carry globally unique `(site, clock)` identifiers whose
//!   lexicographic order breaks ties between concurrent inserts
//! - Insert integration recursively narrows the anchor range until the new
//!   character has an unambiguous slot
//! - Deletion is tombstone-based so anchors stay resolvable forever
//! - Remote operations wait in a per-replica pool until both anchors (or
//!   the delete target) have arrived
//! - One logical actor per replica: all mutation goes through `&mut self`

use tracing::debug;

use crate::crdt::error::WootError;
use crate::crdt::op::Operation;
use crate::crdt::sequence::Sequence;
use crate::crdt::types::{CharId, SiteClock, SiteId};
use crate::crdt::wchar::WChar;

/// A replicated string at one site.
///
/// Local edits go through [`generate_insert`](WootString::generate_insert)
/// and [`generate_delete`](WootString::generate_delete), which apply the
/// edit locally and return the operation to ship. Remote operations enter
/// through [`receive`](WootString::receive) and take effect on
/// [`drain`](WootString::drain). Two replicas that have absorbed the same
/// set of operations hold element-wise identical sequences, whatever the
/// delivery order.
pub struct WootString {
    /// The site this replica generates characters for
    site: SiteId,
    /// Mints identifiers for local inserts
    clock: SiteClock,
    /// The ordered character sequence, tombstones included
    sequence: Sequence,
    /// Received operations whose preconditions are not yet satisfied
    pool: Vec<Operation>,
}

impl WootString {
    /// Creates an empty replicated string for the given site.
    ///
    /// Site `0` is reserved for the sentinels; replicas must be created
    /// with non-zero site identifiers.
    pub fn new(site: SiteId) -> Self {
        WootString {
            site,
            clock: SiteClock::new(site),
            sequence: Sequence::new(),
            pool: Vec::new(),
        }
    }

    /// The site identifier of this replica.
    pub fn site(&self) -> SiteId {
        self.site
    }

    /// How many identifiers this replica has minted.
    pub fn current_clock(&self) -> u64 {
        self.clock.current()
    }

    /// The current visible string.
    pub fn value(&self) -> String {
        self.sequence.visible_value()
    }

    /// Total character count including tombstones and sentinels.
    pub fn total_char_count(&self) -> usize {
        self.sequence.len()
    }

    /// Number of visible user characters.
    pub fn visible_char_count(&self) -> usize {
        self.sequence.visible_len() - 2
    }

    /// Number of received operations still waiting for their preconditions.
    pub fn pending_count(&self) -> usize {
        self.pool.len()
    }

    /// Every WChar in sequence order, tombstones and sentinels included.
    pub fn chars(&self) -> Vec<WChar> {
        self.sequence.iter().cloned().collect()
    }

    /// Read access to the underlying sequence.
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Inserts `value` at visible position `pos` and returns the operation
    /// to ship.
    ///
    /// Positions count the gaps between visible characters, begin-sentinel
    /// gap included: `pos = 0` inserts before the first user character and
    /// `pos = visible_char_count()` appends. On error no identifier is
    /// minted and the clock does not advance.
    pub fn generate_insert(&mut self, pos: usize, value: char) -> Result<Operation, WootError> {
        let limit = self.sequence.visible_len() - 1;
        if pos >= limit {
            return Err(WootError::PositionOutOfRange { pos, limit });
        }

        let cp = self
            .sequence
            .ith_visible(pos)
            .map(|c| c.id)
            .ok_or(WootError::PositionOutOfRange { pos, limit })?;
        let cn = self
            .sequence
            .ith_visible(pos + 1)
            .map(|c| c.id)
            .ok_or(WootError::PositionOutOfRange { pos, limit })?;

        let wchar = WChar::new(self.clock.tick(), value, cp, cn);
        self.integrate_insert(wchar.clone(), cp, cn)?;
        Ok(Operation::Insert { wchar })
    }

    /// Deletes the visible character at position `pos` and returns the
    /// operation to ship.
    ///
    /// Positions count user characters: `pos = 0` targets the first visible
    /// character after the begin sentinel. The character stays in the
    /// sequence as a tombstone.
    pub fn generate_delete(&mut self, pos: usize) -> Result<Operation, WootError> {
        let limit = self.visible_char_count();
        if pos >= limit {
            return Err(WootError::PositionOutOfRange { pos, limit });
        }

        let id = self
            .sequence
            .ith_visible(pos + 1)
            .map(|c| c.id)
            .ok_or(WootError::PositionOutOfRange { pos, limit })?;
        self.integrate_delete(&id);
        Ok(Operation::Delete { id })
    }

    /// Accepts a remote operation into the pending pool.
    ///
    /// Operations that are already reflected in the sequence (an insert
    /// whose character is present, a delete whose target is already a
    /// tombstone) are dropped here; late duplicates that slip past this
    /// check are still no-ops at execution time.
    pub fn receive(&mut self, op: Operation) {
        let already_reflected = match &op {
            Operation::Insert { wchar } => self.sequence.contains(&wchar.id),
            Operation::Delete { id } => {
                matches!(self.sequence.find(id), Some(c) if !c.visible)
            }
        };
        if already_reflected {
            debug!(site = self.site, target = %op.target(), "dropping duplicate operation");
            return;
        }
        self.pool.push(op);
    }

    /// Executes every currently executable pooled operation, repeating
    /// until a full pass makes no progress. Returns whether any operation
    /// executed, so the host can schedule follow-up work.
    pub fn drain(&mut self) -> Result<bool, WootError> {
        let mut progressed_overall = false;
        loop {
            let mut progressed = false;
            let mut i = 0;
            while i < self.pool.len() {
                if self.executable(&self.pool[i]) {
                    let op = self.pool.remove(i);
                    self.execute(op)?;
                    progressed = true;
                } else {
                    i += 1;
                }
            }
            if !progressed {
                return Ok(progressed_overall);
            }
            progressed_overall = true;
        }
    }

    /// Whether `op`'s precondition holds against the current sequence:
    /// both anchors present for an insert (tombstones qualify), the target
    /// present for a delete.
    fn executable(&self, op: &Operation) -> bool {
        match op {
            Operation::Insert { wchar } => match wchar.anchors() {
                Some((prev, next)) => {
                    self.sequence.contains(&prev) && self.sequence.contains(&next)
                }
                None => false,
            },
            Operation::Delete { id } => self.sequence.contains(id),
        }
    }

    fn execute(&mut self, op: Operation) -> Result<(), WootError> {
        match op {
            Operation::Insert { wchar } => {
                if self.sequence.contains(&wchar.id) {
                    return Ok(());
                }
                let (prev, next) = wchar.anchors().ok_or(WootError::AnchorMissing(wchar.id))?;
                self.integrate_insert(wchar, prev, next)
            }
            Operation::Delete { id } => {
                self.integrate_delete(&id);
                Ok(())
            }
        }
    }

    /// Places `c` between `cp` and `cn`, consistently with every concurrent
    /// insert into the same region.
    ///
    /// When the range between the anchors is non-empty, the competitors
    /// whose own original anchors bracket the same region are collected,
    /// fenced by `cp` and `cn`, and scanned in sequence order while their
    /// identifiers precede `c`'s; the scan picks the narrower range to
    /// descend into. Each step strictly narrows the range, bottoming out on
    /// an empty one where `c` is spliced in. The identifier order makes
    /// every site take the same decisions, whatever state its sequence went
    /// through on the way.
    fn integrate_insert(&mut self, c: WChar, cp: CharId, cn: CharId) -> Result<(), WootError> {
        let (mut cp, mut cn) = (cp, cn);
        loop {
            let cp_pos = self.sequence.position(&cp).ok_or(WootError::AnchorMissing(cp))?;
            let cn_pos = self.sequence.position(&cn).ok_or(WootError::AnchorMissing(cn))?;
            let between = self.sequence.subseq(&cp, &cn)?;

            if between.is_empty() {
                self.sequence.insert_at(c, cn_pos);
                return Ok(());
            }

            let mut fence = vec![cp];
            for s in between {
                let Some((s_prev, s_next)) = s.anchors() else {
                    continue;
                };
                let s_prev_pos = self
                    .sequence
                    .position(&s_prev)
                    .ok_or(WootError::AnchorMissing(s_prev))?;
                let s_next_pos = self
                    .sequence
                    .position(&s_next)
                    .ok_or(WootError::AnchorMissing(s_next))?;
                if s_prev_pos <= cp_pos && cn_pos <= s_next_pos {
                    fence.push(s.id);
                }
            }
            fence.push(cn);

            let mut i = 1;
            while i < fence.len() - 1 && fence[i] < c.id {
                i += 1;
            }
            cp = fence[i - 1];
            cn = fence[i];
        }
    }

    /// Flips the target invisible, leaving the tombstone in place so future
    /// inserts anchored on it can still be integrated. Re-deleting a
    /// tombstone is a no-op.
    fn integrate_delete(&mut self, id: &CharId) {
        self.sequence.hide(id);
    }

    /// Logs every character including sentinels and tombstones at debug
    /// level.
    pub fn dump_chars(&self) {
        debug!(site = self.site, "--- sequence dump ---");
        for c in self.sequence.iter() {
            let status = if c.is_sentinel() {
                "SENTINEL"
            } else if c.visible {
                "VISIBLE"
            } else {
                "TOMBSTONE"
            };
            debug!(
                site = self.site,
                id = %c.id,
                value = ?c.value,
                status = status,
            );
        }
        debug!(site = self.site, content = %self.value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crdt::wchar::{BEGIN_ID, END_ID};

    #[test]
    fn test_creation() {
        let doc = WootString::new(1);
        assert_eq!(doc.site(), 1);
        assert_eq!(doc.current_clock(), 0);
        assert_eq!(doc.total_char_count(), 2); // sentinels only
        assert_eq!(doc.visible_char_count(), 0);
        assert_eq!(doc.value(), "");
        assert_eq!(doc.pending_count(), 0);
    }

    #[test]
    fn test_local_inserts() {
        let mut doc = WootString::new(1);

        let op_a = doc.generate_insert(0, 'a').unwrap();
        assert_eq!(doc.value(), "a");
        assert_eq!(op_a.target(), CharId::new(1, 0));

        let op_b = doc.generate_insert(1, 'b').unwrap();
        assert_eq!(doc.value(), "ab");
        assert_eq!(op_b.target(), CharId::new(1, 1));

        // The second insert anchored on 'a' and the end sentinel
        let Operation::Insert { wchar } = op_b else {
            panic!("expected insert");
        };
        assert_eq!(wchar.prev_id, Some(CharId::new(1, 0)));
        assert_eq!(wchar.next_id, Some(END_ID));
    }

    #[test]
    fn test_insert_at_front_and_middle() {
        let mut doc = WootString::new(1);
        doc.generate_insert(0, 'b').unwrap();
        doc.generate_insert(0, 'a').unwrap();
        doc.generate_insert(2, 'c').unwrap();
        assert_eq!(doc.value(), "abc");
    }

    #[test]
    fn test_local_delete() {
        let mut doc = WootString::new(1);
        doc.generate_insert(0, 'a').unwrap();
        doc.generate_insert(1, 'b').unwrap();

        let op = doc.generate_delete(0).unwrap();
        assert_eq!(doc.value(), "b");
        assert_eq!(op.target(), CharId::new(1, 0));

        // The tombstone stays
        assert_eq!(doc.total_char_count(), 4);
        assert_eq!(doc.visible_char_count(), 1);
    }

    #[test]
    fn test_position_errors_do_not_advance_clock() {
        let mut doc = WootString::new(1);

        assert_eq!(
            doc.generate_insert(1, 'x'),
            Err(WootError::PositionOutOfRange { pos: 1, limit: 1 })
        );
        assert_eq!(
            doc.generate_delete(0),
            Err(WootError::PositionOutOfRange { pos: 0, limit: 0 })
        );
        assert_eq!(doc.current_clock(), 0);
        assert_eq!(doc.value(), "");
    }

    #[test]
    fn test_concurrent_inserts_converge() {
        let mut a = WootString::new(1);
        let mut b = WootString::new(2);

        let op_a = a.generate_insert(0, 'a').unwrap();
        let op_b = b.generate_insert(0, 'b').unwrap();

        b.receive(op_a);
        assert!(b.drain().unwrap());
        a.receive(op_b);
        assert!(a.drain().unwrap());

        // Identifier order places site 1's character first
        assert_eq!(a.value(), "ab");
        assert_eq!(b.value(), "ab");
        assert_eq!(a.chars(), b.chars());
    }

    #[test]
    fn test_out_of_order_delivery_waits_in_pool() {
        let mut a = WootString::new(1);
        let mut b = WootString::new(2);

        let op_first = a.generate_insert(0, 'a').unwrap();
        let op_second = a.generate_insert(1, 'b').unwrap();

        // 'b' arrives first; its anchor (1,0) is not present yet
        b.receive(op_second);
        assert!(!b.drain().unwrap());
        assert_eq!(b.pending_count(), 1);
        assert_eq!(b.value(), "");

        b.receive(op_first);
        assert!(b.drain().unwrap());
        assert_eq!(b.pending_count(), 0);
        assert_eq!(b.value(), "ab");
    }

    #[test]
    fn test_duplicate_insert_is_dropped() {
        let mut a = WootString::new(1);
        let mut b = WootString::new(2);

        let op = a.generate_insert(0, 'a').unwrap();

        b.receive(op.clone());
        b.drain().unwrap();
        b.receive(op.clone());
        b.receive(op);
        b.drain().unwrap();

        assert_eq!(b.value(), "a");
        assert_eq!(b.total_char_count(), 3);
        assert_eq!(b.pending_count(), 0);
    }

    #[test]
    fn test_remote_delete_is_idempotent() {
        let mut a = WootString::new(1);
        let mut b = WootString::new(2);

        let insert = a.generate_insert(0, 'a').unwrap();
        let delete = a.generate_delete(0).unwrap();

        b.receive(insert);
        b.receive(delete.clone());
        b.drain().unwrap();
        assert_eq!(b.value(), "");

        // Redelivery of the delete is absorbed
        b.receive(delete);
        assert!(!b.drain().unwrap());
        assert_eq!(b.value(), "");
    }

    #[test]
    fn test_drain_reaches_fixed_point() {
        let mut doc = WootString::new(1);
        assert!(!doc.drain().unwrap());

        // An insert anchored on characters that never arrive stays pooled
        let orphan = WChar::new(CharId::new(2, 5), 'x', CharId::new(2, 3), CharId::new(2, 4));
        doc.receive(Operation::Insert { wchar: orphan });
        assert!(!doc.drain().unwrap());
        assert_eq!(doc.pending_count(), 1);
    }

    #[test]
    fn test_delete_then_concurrent_insert_after_target() {
        let mut a = WootString::new(1);
        let mut b = WootString::new(2);

        let insert_a = a.generate_insert(0, 'a').unwrap();
        b.receive(insert_a);
        b.drain().unwrap();

        // A deletes 'a' while B concurrently inserts after it
        let delete_a = a.generate_delete(0).unwrap();
        let insert_x = b.generate_insert(1, 'X').unwrap();

        b.receive(delete_a);
        b.drain().unwrap();
        a.receive(insert_x);
        a.drain().unwrap();

        assert_eq!(a.value(), "X");
        assert_eq!(b.value(), "X");
        assert_eq!(a.chars(), b.chars());

        // The tombstone still anchors the new character
        let chars = a.chars();
        assert_eq!(chars[1].id, CharId::new(1, 0));
        assert!(!chars[1].visible);
        assert_eq!(chars[2].prev_id, Some(CharId::new(1, 0)));
    }

    #[test]
    fn test_sentinel_anchors_are_fixed() {
        let mut doc = WootString::new(1);
        let op = doc.generate_insert(0, 'a').unwrap();
        let Operation::Insert { wchar } = op else {
            panic!("expected insert");
        };
        assert_eq!(wchar.prev_id, Some(BEGIN_ID));
        assert_eq!(wchar.next_id, Some(END_ID));
    }
}
