//! Ordered entry sequence backing the cache.
//!
//! A doubly-linked list stored in a `Vec` arena: links are slot indices
//! instead of owning pointers, which keeps the structure in safe Rust while
//! still giving O(1) append, pop-oldest, and arbitrary removal by handle.
//! Head is the oldest entry, tail the newest. Freed slots are chained into a
//! free list and recycled by later appends.

use crate::entry::Entry;

/// Sentinel value for null links in the doubly-linked list.
pub(crate) const NIL: usize = usize::MAX;

/// One arena slot. `entry` is `None` while the slot sits on the free list;
/// a free slot reuses `next` as the free-list link.
#[derive(Debug)]
struct Slot<V> {
    entry: Option<Entry<V>>,
    prev: usize,
    next: usize,
}

/// Insertion-ordered sequence of cache entries with O(1) structural
/// primitives.
///
/// The sequence owns every live entry exclusively. It knows nothing about
/// keys; the cache layered on top keeps its key index in lockstep with every
/// structural change made here.
#[derive(Debug)]
pub(crate) struct EntryList<V> {
    slots: Vec<Slot<V>>,
    head: usize,
    tail: usize,
    free_head: usize,
    len: usize,
}

impl<V> EntryList<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: NIL,
            tail: NIL,
            free_head: NIL,
            len: 0,
        }
    }

    /// Number of live entries, O(1).
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append an entry after the current tail and return its slot handle.
    pub(crate) fn push_tail(&mut self, entry: Entry<V>) -> usize {
        let slot = self.alloc(entry);
        self.slots[slot].prev = self.tail;
        self.slots[slot].next = NIL;

        if self.tail == NIL {
            self.head = slot;
        } else {
            let tail = self.tail;
            self.slots[tail].next = slot;
        }
        self.tail = slot;
        self.len += 1;
        slot
    }

    /// Detach and return the oldest entry, or `None` if the list is empty.
    pub(crate) fn pop_head(&mut self) -> Option<Entry<V>> {
        if self.head == NIL {
            return None;
        }
        self.remove(self.head)
    }

    /// Detach an arbitrary entry by its slot handle.
    ///
    /// Returns `None` if the handle refers to a free or out-of-range slot.
    /// Handles held in the cache index are always valid, so `None` here
    /// signals index corruption to the caller.
    pub(crate) fn remove(&mut self, slot: usize) -> Option<Entry<V>> {
        let entry = self.slots.get_mut(slot)?.entry.take()?;

        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }

        // Chain the slot into the free list for reuse.
        self.slots[slot].prev = NIL;
        self.slots[slot].next = self.free_head;
        self.free_head = slot;

        self.len -= 1;
        Some(entry)
    }

    /// Drop every entry and reset the arena.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.head = NIL;
        self.tail = NIL;
        self.free_head = NIL;
        self.len = 0;
    }

    /// Iterate entries from oldest (head) to newest (tail).
    pub(crate) fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cur: self.head,
        }
    }

    /// Take a slot from the free list, or grow the arena.
    fn alloc(&mut self, entry: Entry<V>) -> usize {
        if self.free_head != NIL {
            let slot = self.free_head;
            self.free_head = self.slots[slot].next;
            self.slots[slot].entry = Some(entry);
            slot
        } else {
            self.slots.push(Slot {
                entry: Some(entry),
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        }
    }
}

/// Direct slot access for handles known to be live (the cache index only
/// ever holds live handles).
///
/// # Panics
/// Panics if the slot is free or out of range, like slice indexing.
impl<V> std::ops::Index<usize> for EntryList<V> {
    type Output = Entry<V>;

    fn index(&self, slot: usize) -> &Entry<V> {
        self.slots[slot].entry.as_ref().expect("indexed a free slot")
    }
}

impl<V> std::ops::IndexMut<usize> for EntryList<V> {
    fn index_mut(&mut self, slot: usize) -> &mut Entry<V> {
        self.slots[slot].entry.as_mut().expect("indexed a free slot")
    }
}

/// Head-to-tail iterator over live entries.
pub(crate) struct Iter<'a, V> {
    list: &'a EntryList<V>,
    cur: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur == NIL {
            return None;
        }
        let slot = &self.list.slots[self.cur];
        self.cur = slot.next;
        slot.entry.as_ref()
    }
}
