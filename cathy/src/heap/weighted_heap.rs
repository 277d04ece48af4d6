// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Array-backed weighted heap.

use rand::Rng;

use crate::error::Error;
use crate::heap::node::Node;
use crate::heap::node::left_child;
use crate::heap::node::parent;
use crate::heap::node::right_child;

/// Frequency counter that draws items with probability proportional to
/// how often they were added.
///
/// See [`crate::heap`] for an overview of the layout and its guarantees.
#[derive(Debug, Clone)]
pub struct WeightedHeap<T> {
    nodes: Vec<Node<T>>,
    total: u64,
}

impl<T> Default for WeightedHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WeightedHeap<T> {
    /// Creates an empty heap. Sampling an empty heap yields `None`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            total: 0,
        }
    }

    /// Returns the number of distinct items.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the sum of all item counts.
    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Returns an iterator over `(item, count)` pairs in slot order.
    ///
    /// Slot order depends on insertion order and is not part of the contract.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> + '_ {
        self.nodes.iter().map(|node| (node.item(), node.count()))
    }

    /// Exports the frequency mapping into any collection of `(item, count)`.
    ///
    /// ```
    /// # use std::collections::HashMap;
    /// # use cathy::heap::WeightedHeap;
    /// let mut heap = WeightedHeap::new();
    /// heap.add("x");
    /// heap.add("x");
    /// let counts: HashMap<_, _> = heap.counts();
    /// assert_eq!(counts["x"], 2);
    /// ```
    pub fn counts<C>(&self) -> C
    where
        T: Clone,
        C: FromIterator<(T, u64)>,
    {
        self.iter().map(|(item, count)| (item.clone(), count)).collect()
    }

    /// Draws an item with probability `count(item) / total_weight()`.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        if self.total == 0 {
            return None;
        }
        let point = rng.random_range(0..self.total);
        self.item_at_weight(point)
    }

    /// Returns the item owning `point` within the cumulative weight range.
    ///
    /// Every item owns exactly `count` consecutive points of `[0, total_weight())`,
    /// so a uniform `point` selects items in proportion to their counts.
    /// Returns `None` if `point` is outside that range.
    pub fn item_at_weight(&self, point: u64) -> Option<&T> {
        if point >= self.total {
            return None;
        }
        let nodes = self.nodes.as_slice();
        let mut position = 0;
        let mut point = point;
        loop {
            let node = &nodes[position];
            if point < node.left_weight(nodes) {
                let child = left_child(position);
                if child >= nodes.len() {
                    return Some(node.item());
                }
                position = child;
                continue;
            }
            let self_and_left = node.self_and_left_weight(nodes);
            if point < self_and_left {
                return Some(node.item());
            }
            let child = right_child(position);
            if child >= nodes.len() {
                return Some(node.item());
            }
            point -= self_and_left;
            position = child;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        debug_assert_eq!(self.nodes[a].position(), a);
        debug_assert_eq!(self.nodes[b].position(), b);
        self.nodes.swap(a, b);
        self.nodes[a].relocate(a);
        self.nodes[b].relocate(b);
    }

    /// Climbs while the parent's count is smaller; returns the final slot.
    fn sift_up(&mut self, mut position: usize) -> usize {
        while let Some(up) = parent(position) {
            if self.nodes[up].count() >= self.nodes[position].count() {
                break;
            }
            log::trace!("sift up: swapping slots {position} and {up}");
            self.swap(position, up);
            position = up;
        }
        position
    }

    fn invalidate_ancestors(&self, position: usize) {
        let mut current = parent(position);
        while let Some(up) = current {
            self.nodes[up].clear();
            current = parent(up);
        }
    }
}

impl<T: PartialEq> WeightedHeap<T> {
    /// Records one more occurrence of `item`.
    ///
    /// # Panics
    ///
    /// Panics if the total weight would exceed `u64::MAX`. No single count can
    /// overflow first, since every count is bounded by the total.
    pub fn add(&mut self, item: T) {
        self.total = self
            .total
            .checked_add(1)
            .expect("total weight overflows u64");
        match self.position_of(&item) {
            Some(position) => {
                self.nodes[position].increment();
                let settled = self.sift_up(position);
                // Slots passed on the way up were cleared by the swaps.
                self.invalidate_ancestors(settled);
            }
            None => {
                // A count of 1 never exceeds an existing parent's count.
                let position = self.nodes.len();
                self.nodes.push(Node::new(item, 1, position));
                self.invalidate_ancestors(position);
            }
        }
    }

    /// Returns how many times `item` has been recorded, 0 if never.
    pub fn count(&self, item: &T) -> u64 {
        self.position_of(item)
            .map_or(0, |position| self.nodes[position].count())
    }

    /// Builds a heap from a frequency mapping.
    ///
    /// The reported [`counts`](Self::counts) of the result equal the input
    /// regardless of its iteration order.
    ///
    /// # Errors
    ///
    /// Fails if a count is zero, if an item appears twice, or if the counts
    /// sum past `u64::MAX`.
    pub fn from_counts<I>(counts: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        Self::try_from_counts(counts)
            .inspect_err(|err| log::debug!("rejected frequency mapping: {err}"))
    }

    fn try_from_counts<I>(counts: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let mut heap = Self::new();
        for (index, (item, count)) in counts.into_iter().enumerate() {
            if count == 0 {
                return Err(Error::invalid_count(count).with_context("index", index));
            }
            if heap.position_of(&item).is_some() {
                return Err(Error::duplicate_item().with_context("index", index));
            }
            heap.total = heap.total.checked_add(count).ok_or_else(|| {
                Error::invalid_argument("total weight overflows u64").with_context("index", index)
            })?;
            let position = heap.nodes.len();
            heap.nodes.push(Node::new(item, count, position));
            heap.sift_up(position);
        }
        Ok(heap)
    }

    // Heavy items climb toward the front, so the scan is usually short.
    fn position_of(&self, item: &T) -> Option<usize> {
        self.nodes.iter().position(|node| node.item() == item)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fmt::Debug;

    use proptest::prelude::*;

    use super::*;

    fn uncached_weight<T>(nodes: &[Node<T>], position: usize) -> u64 {
        match nodes.get(position) {
            None => 0,
            Some(node) => {
                node.count()
                    + uncached_weight(nodes, left_child(position))
                    + uncached_weight(nodes, right_child(position))
            }
        }
    }

    fn assert_invariants<T: Debug>(heap: &WeightedHeap<T>) {
        let nodes = heap.nodes.as_slice();
        for (position, node) in nodes.iter().enumerate() {
            assert_eq!(node.position(), position, "stale position for {node:?}");
            assert!(node.count() > 0);
            if let Some(up) = parent(position) {
                assert!(
                    nodes[up].count() >= node.count(),
                    "heap order broken at slot {position}"
                );
            }
            assert_eq!(
                node.subtree_weight(nodes),
                uncached_weight(nodes, position),
                "stale subtree weight at slot {position}"
            );
            assert_eq!(
                node.self_and_left_weight(nodes),
                node.left_weight(nodes) + node.count()
            );
        }
        let sum: u64 = nodes.iter().map(Node::count).sum();
        assert_eq!(heap.total, sum);
        if let Some(root) = nodes.first() {
            assert_eq!(root.subtree_weight(nodes), heap.total);
        }
    }

    #[test]
    fn test_increment_below_warm_caches() {
        let mut heap = WeightedHeap::new();
        for item in 0..15 {
            heap.add(item);
        }
        // warm every cache before the updates below
        assert_invariants(&heap);
        heap.add(2);
        heap.add(14);
        assert_invariants(&heap);
        heap.add(14);
        heap.add(14);
        assert_invariants(&heap);
        assert_eq!(*heap.nodes[0].item(), 14);
    }

    #[test]
    fn test_insert_below_warm_caches() {
        let mut heap = WeightedHeap::new();
        for item in 0..6 {
            heap.add(item);
            heap.add(item);
        }
        assert_invariants(&heap);
        heap.add(100);
        assert_invariants(&heap);
        assert_eq!(heap.item_at_weight(12), Some(&100));
    }

    #[test]
    fn test_from_counts_sifts_heavy_items_up() {
        let heap = WeightedHeap::from_counts([('a', 1), ('b', 2), ('c', 3), ('d', 9)]).unwrap();
        assert_invariants(&heap);
        assert_eq!(*heap.nodes[0].item(), 'd');
        assert_eq!(heap.total_weight(), 15);
    }

    #[test]
    #[should_panic(expected = "total weight overflows u64")]
    fn test_add_past_full_total_panics() {
        let mut heap = WeightedHeap::from_counts([("a", u64::MAX)]).unwrap();
        heap.add("b");
    }

    #[test]
    fn test_add_up_to_full_total() {
        let mut heap = WeightedHeap::from_counts([("a", u64::MAX - 1)]).unwrap();
        heap.add("b");
        assert_eq!(heap.total_weight(), u64::MAX);
        assert_eq!(heap.count(&"b"), 1);
    }

    #[test]
    fn test_missing_left_child_falls_back_to_node() {
        let mut heap = WeightedHeap::from_counts([('a', 3), ('b', 2)]).unwrap();
        assert_invariants(&heap);
        // drop the left child behind the root's warm caches
        heap.nodes.pop();
        assert_eq!(heap.nodes[0].left_weight(&heap.nodes), 2);
        assert_eq!(heap.item_at_weight(0), Some(&'a'));
        assert_eq!(heap.item_at_weight(1), Some(&'a'));
    }

    #[test]
    fn test_missing_right_child_falls_back_to_node() {
        let mut heap = WeightedHeap::from_counts([('a', 3), ('b', 2), ('c', 1)]).unwrap();
        assert_invariants(&heap);
        // drop the right child behind the root's warm caches
        heap.nodes.pop();
        assert_eq!(heap.nodes[0].right_weight(&heap.nodes), 1);
        assert_eq!(heap.item_at_weight(5), Some(&'a'));
        assert_eq!(heap.item_at_weight(0), Some(&'b'));
    }

    fn distinct_counts() -> impl Strategy<Value = (Vec<(u16, u64)>, Vec<(u16, u64)>)> {
        prop::collection::btree_map(0u16..500, 1u64..50, 0..40).prop_flat_map(|map| {
            let entries: Vec<_> = map.into_iter().collect();
            (Just(entries.clone()), Just(entries).prop_shuffle())
        })
    }

    proptest! {
        #[test]
        fn adds_keep_heap_order_and_weights(
            items in prop::collection::vec(0u8..12, 0..200),
            probes in prop::collection::vec(any::<u64>(), 1..8),
        ) {
            let mut heap = WeightedHeap::new();
            for item in items {
                heap.add(item);
                // read through the caches between updates
                for probe in &probes {
                    let point = probe % heap.total_weight();
                    prop_assert!(heap.item_at_weight(point).is_some());
                }
                assert_invariants(&heap);
            }
        }

        #[test]
        fn add_bumps_exactly_one_count(items in prop::collection::vec(0u8..8, 1..100)) {
            let mut heap = WeightedHeap::new();
            for item in items {
                let before: HashMap<u8, u64> = heap.counts();
                heap.add(item);
                let mut after: HashMap<u8, u64> = heap.counts();
                prop_assert_eq!(after.remove(&item), Some(before.get(&item).copied().unwrap_or(0) + 1));
                for (other, count) in after {
                    prop_assert_eq!(before.get(&other).copied(), Some(count));
                }
            }
        }

        #[test]
        fn from_counts_ignores_iteration_order((entries, shuffled) in distinct_counts()) {
            let heap = WeightedHeap::from_counts(entries.clone()).unwrap();
            let other = WeightedHeap::from_counts(shuffled).unwrap();
            assert_invariants(&heap);
            assert_invariants(&other);

            let expected: HashMap<u16, u64> = entries.into_iter().collect();
            prop_assert_eq!(&heap.counts::<HashMap<_, _>>(), &expected);
            prop_assert_eq!(&other.counts::<HashMap<_, _>>(), &expected);
            prop_assert_eq!(heap.total_weight(), expected.values().sum::<u64>());
        }

        #[test]
        fn every_point_lands_on_its_owner((entries, _) in distinct_counts()) {
            let heap = WeightedHeap::from_counts(entries.clone()).unwrap();
            let mut hits: HashMap<u16, u64> = HashMap::new();
            for point in 0..heap.total_weight() {
                let item = heap.item_at_weight(point).unwrap();
                *hits.entry(*item).or_default() += 1;
            }
            let expected: HashMap<u16, u64> = entries.into_iter().collect();
            prop_assert_eq!(hits, expected);
            prop_assert_eq!(heap.item_at_weight(heap.total_weight()), None);
        }
    }
}
