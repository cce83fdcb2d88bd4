use serde::Serialize;
use std::ops::Range;

/// Index of an [`AtomDesc`](super::atom::AtomDesc) in its render data.
pub type AtomIndex = usize;
/// Index of a [`BondDescr`](super::bond::BondDescr) in its render data.
pub type BondIndex = usize;
/// Index of a [`BondEnd`](super::bond::BondEnd) in its render data.
pub type BondEndIndex = usize;
/// Index of a [`Ring`](super::ring::Ring) in its render data.
pub type RingIndex = usize;

/// A contiguous span `[begin, begin + count)` of one of the flat item arrays owned by
/// [`MoleculeRenderData`](super::render_data::MoleculeRenderData).
///
/// Descriptors refer to the items they own through ranges rather than owning them, so a
/// render pass never allocates per atom and a whole structure can be cleared in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ItemRange {
    pub begin: usize,
    pub count: usize,
}

impl ItemRange {
    pub const EMPTY: ItemRange = ItemRange { begin: 0, count: 0 };

    pub fn new(begin: usize, count: usize) -> Self {
        Self { begin, count }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.begin + self.count
    }

    pub fn indices(&self) -> Range<usize> {
        self.begin..self.end()
    }

    /// Extends the range by the item just appended at `index`.
    ///
    /// Items of one owner must be appended back to back; the first item anchors the range.
    pub fn push(&mut self, index: usize) {
        if self.count == 0 {
            self.begin = index;
        } else {
            debug_assert_eq!(
                index,
                self.end(),
                "items of one owner must be appended contiguously"
            );
        }
        self.count += 1;
    }

    /// The slice of `items` this range covers.
    ///
    /// # Panics
    ///
    /// Panics if the range reaches past the end of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.indices()]
    }
}
