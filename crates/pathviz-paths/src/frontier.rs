use std::collections::BinaryHeap;

/// Sentinel g-score meaning "not reached yet" (+infinity).
pub(crate) const UNREACHABLE: u32 = u32::MAX;

/// Sentinel parent index for cells without a predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Per-cell search bookkeeping
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub(crate) g: u32,
    pub(crate) f: u32,
    pub(crate) parent: usize,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            f: UNREACHABLE,
            parent: NO_PARENT,
        }
    }
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// Frontier entry, ordered by `f` and then by insertion sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Entry {
    pub(crate) f: u32,
    pub(crate) seq: u64,
    pub(crate) idx: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first, and among
        // equal f the earliest insertion.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The open set: a min-priority queue on `(f, seq)` plus a membership table
/// mirroring its contents.
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    members: Vec<bool>,
    next_seq: u64,
}

impl Frontier {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            members: vec![false; len],
            next_seq: 0,
        }
    }

    /// Insert `idx` with priority `f`, stamping it with the next sequence
    /// number.
    pub(crate) fn push(&mut self, idx: usize, f: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { f, seq, idx });
        self.members[idx] = true;
    }

    pub(crate) fn pop(&mut self) -> Option<Entry> {
        let e = self.heap.pop()?;
        self.members[e.idx] = false;
        Some(e)
    }

    #[inline]
    pub(crate) fn contains(&self, idx: usize) -> bool {
        self.members[idx]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_f_first() {
        let mut fr = Frontier::new(4);
        fr.push(0, 7);
        fr.push(1, 3);
        fr.push(2, 5);
        let order: Vec<usize> = std::iter::from_fn(|| fr.pop()).map(|e| e.idx).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn equal_f_pops_in_insertion_order() {
        let mut fr = Frontier::new(8);
        for idx in [5, 2, 7, 0, 3] {
            fr.push(idx, 4);
        }
        let order: Vec<usize> = std::iter::from_fn(|| fr.pop()).map(|e| e.idx).collect();
        assert_eq!(order, vec![5, 2, 7, 0, 3]);
    }

    #[test]
    fn membership_tracks_contents() {
        let mut fr = Frontier::new(3);
        fr.push(2, 1);
        assert!(fr.contains(2));
        assert!(!fr.contains(0));
        assert_eq!(fr.len(), 1);
        let e = fr.pop().unwrap();
        assert_eq!((e.idx, e.seq), (2, 0));
        assert!(!fr.contains(2));
        assert!(fr.pop().is_none());
    }
}
