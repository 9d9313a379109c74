use std::cmp::Ordering;

use crate::models::GridCoord;

/// Frontier entry. Ordered by priority, then remaining estimate, then insertion
/// sequence, so equal-priority pops are reproducible.
#[derive(Clone, Copy, Debug)]
pub struct QueueNode {
    pub cell: GridCoord,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub seq: u64,
}

impl PartialEq for QueueNode {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}
impl Eq for QueueNode {}
impl PartialOrd for QueueNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
impl Ord for QueueNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is max-heap; invert ordering for min-heap behavior
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn node(f: f64, h: f64, seq: u64) -> QueueNode {
        QueueNode { cell: GridCoord::new(seq as i32, 0), f, g: f - h, h, seq }
    }

    #[test]
    fn pops_lowest_priority_then_earliest() {
        let mut heap = BinaryHeap::new();
        heap.push(node(3.0, 0.0, 0));
        heap.push(node(1.0, 0.0, 1));
        heap.push(node(2.0, 1.0, 2));
        heap.push(node(2.0, 0.5, 3));
        heap.push(node(1.0, 0.0, 4));
        let order: Vec<u64> = std::iter::from_fn(|| heap.pop()).map(|n| n.seq).collect();
        assert_eq!(order, vec![1, 4, 3, 2, 0]);
    }
}
