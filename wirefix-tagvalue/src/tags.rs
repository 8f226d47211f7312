/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Tag position index.
//!
//! Records, per encoded or decoded field occurrence, the byte offset and
//! length of its value region together with its tag number, in encounter
//! order. The encoder replays the index for delimiter substitution; the
//! decoder builds its navigable view on top of it. Entries are append-only
//! during one message cycle and discarded only on explicit reset.

use smallvec::SmallVec;

/// One field occurrence: tag plus the value region it was written to or
/// read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPos {
    /// The field's tag number.
    pub tag: u32,
    /// Byte offset of the value region.
    pub start: usize,
    /// Byte length of the value region.
    pub len: usize,
}

impl TagPos {
    /// Creates a new entry.
    #[inline]
    #[must_use]
    pub const fn new(tag: u32, start: usize, len: usize) -> Self {
        Self { tag, start, len }
    }

    /// Offset of the delimiter byte immediately following the value.
    ///
    /// Delimiter back-patching touches exactly this byte and never the
    /// recorded region itself.
    #[inline]
    #[must_use]
    pub const fn delimiter_offset(&self) -> usize {
        self.start + self.len
    }
}

/// Append-only sequence of [`TagPos`] entries for one message cycle.
#[derive(Debug, Default)]
pub struct TagIndex {
    entries: SmallVec<[TagPos; 64]>,
}

impl TagIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry in encounter order.
    #[inline]
    pub fn store(&mut self, tag: u32, start: usize, len: usize) {
        self.entries.push(TagPos::new(tag, start, len));
    }

    /// Number of recorded entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TagPos> {
        self.entries.get(index)
    }

    /// Returns the most recently recorded entry.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&TagPos> {
        self.entries.last()
    }

    /// Iterates entries in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &TagPos> {
        self.entries.iter()
    }

    /// Takes the recorded entries out, leaving the index empty.
    #[must_use]
    pub fn take(&mut self) -> Vec<TagPos> {
        std::mem::take(&mut self.entries).into_vec()
    }

    /// Discards all entries between messages.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_in_encounter_order() {
        let mut index = TagIndex::new();
        index.store(35, 3, 1);
        index.store(49, 8, 6);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0), Some(&TagPos::new(35, 3, 1)));
        assert_eq!(index.last(), Some(&TagPos::new(49, 8, 6)));
    }

    #[test]
    fn test_delimiter_offset() {
        let entry = TagPos::new(44, 3, 7);
        assert_eq!(entry.delimiter_offset(), 10);
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut index = TagIndex::new();
        index.store(8, 2, 7);
        let entries = index.take();
        assert_eq!(entries.len(), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut index = TagIndex::new();
        index.store(8, 2, 7);
        index.reset();
        assert!(index.is_empty());
    }
}
