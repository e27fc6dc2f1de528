//! The ordered sequence of WChars materialised at one site.
//!
//! The sequence is always bracketed by the begin/end sentinels and contains
//! every character ever integrated, tombstones included. Order is decided by
//! the integration procedure, not by identifier order, so the backing store
//! is a positional array rather than an id-sorted map.

use crate::crdt::error::WootError;
use crate::crdt::types::CharId;
use crate::crdt::wchar::WChar;

/// The ordered list of WChars at one site, sentinels at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    chars: Vec<WChar>,
}

impl Sequence {
    /// Creates an empty sequence holding only the two sentinels.
    pub fn new() -> Self {
        Sequence {
            chars: vec![WChar::begin(), WChar::end()],
        }
    }

    /// Total character count, tombstones and sentinels included.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// The WChar at sequence index `i`.
    pub fn at(&self, i: usize) -> Option<&WChar> {
        self.chars.get(i)
    }

    /// The unique WChar carrying `id`, if present.
    pub fn find(&self, id: &CharId) -> Option<&WChar> {
        self.chars.iter().find(|c| c.id == *id)
    }

    /// The sequence index of the WChar carrying `id`, if present.
    pub fn position(&self, id: &CharId) -> Option<usize> {
        self.chars.iter().position(|c| c.id == *id)
    }

    /// Whether a WChar with `id` is present, tombstones included.
    pub fn contains(&self, id: &CharId) -> bool {
        self.chars.iter().any(|c| c.id == *id)
    }

    /// Splices `wchar` in at sequence index `i`, shifting the tail right.
    pub fn insert_at(&mut self, wchar: WChar, i: usize) {
        self.chars.insert(i, wchar);
    }

    /// The contiguous slice strictly between `from` and `to` in sequence
    /// order. Fails with [`WootError::BadRange`] if `to` does not occur
    /// after `from`.
    pub fn subseq(&self, from: &CharId, to: &CharId) -> Result<&[WChar], WootError> {
        let a = self.position(from).ok_or(WootError::AnchorMissing(*from))?;
        let b = self.position(to).ok_or(WootError::AnchorMissing(*to))?;
        if b <= a {
            return Err(WootError::BadRange {
                from: *from,
                to: *to,
            });
        }
        Ok(&self.chars[a + 1..b])
    }

    /// The visible string: every visible non-sentinel value in order.
    pub fn visible_value(&self) -> String {
        self.chars
            .iter()
            .filter(|c| c.is_visible_value())
            .filter_map(|c| c.value)
            .collect()
    }

    /// The `i`-th visible WChar, counting sentinels: `ith_visible(0)` is the
    /// begin sentinel, and the last visible user character before the end
    /// sentinel is `ith_visible(visible_len() - 2)`.
    pub fn ith_visible(&self, i: usize) -> Option<&WChar> {
        self.chars.iter().filter(|c| c.visible).nth(i)
    }

    /// Number of visible WChars, sentinels included.
    pub fn visible_len(&self) -> usize {
        self.chars.iter().filter(|c| c.visible).count()
    }

    /// Flips the character carrying `id` invisible. Returns whether the
    /// flag changed; absent targets, sentinels, and existing tombstones all
    /// report `false`.
    pub fn hide(&mut self, id: &CharId) -> bool {
        match self.chars.iter_mut().find(|c| c.id == *id) {
            Some(c) => c.hide(),
            None => false,
        }
    }

    /// Iterates every WChar in sequence order, tombstones and sentinels
    /// included.
    pub fn iter(&self) -> impl Iterator<Item = &WChar> {
        self.chars.iter()
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}
