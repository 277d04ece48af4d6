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

//! A single slot of the implicit tree and its memoized subtree weights.
//!
//! The four cached weights are a function of the node's *position*, not of
//! its item: after a swap, the node reads its children from the new slot.

use std::cell::Cell;

/// Returns the parent slot of `position`, or `None` for the root.
#[inline]
pub(super) fn parent(position: usize) -> Option<usize> {
    position.checked_sub(1).map(|p| p / 2)
}

#[inline]
pub(super) fn left_child(position: usize) -> usize {
    2 * position + 1
}

#[inline]
pub(super) fn right_child(position: usize) -> usize {
    2 * position + 2
}

/// An item, its frequency, its slot in the owning array, and lazily
/// computed weights of the subtree rooted at that slot.
#[derive(Debug, Clone)]
pub(super) struct Node<T> {
    item: T,
    count: u64,
    position: usize,
    left_weight: Cell<Option<u64>>,
    right_weight: Cell<Option<u64>>,
    self_and_left_weight: Cell<Option<u64>>,
    subtree_weight: Cell<Option<u64>>,
}

impl<T> Node<T> {
    pub fn new(item: T, count: u64, position: usize) -> Self {
        debug_assert!(count > 0, "node counts are strictly positive");
        Self {
            item,
            count,
            position,
            left_weight: Cell::new(None),
            right_weight: Cell::new(None),
            self_and_left_weight: Cell::new(None),
            subtree_weight: Cell::new(None),
        }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Records one more occurrence and drops this node's cached weights.
    ///
    /// Ancestors are stale too afterwards; invalidating them is the
    /// owner's job, since only the owner knows where the node settles.
    pub fn increment(&mut self) {
        self.count += 1;
        self.clear();
    }

    /// Moves the node to `position` and drops its cached weights.
    ///
    /// Ancestors of an exchanged parent/child pair keep their caches: the
    /// set of items below the pair's parent slot is unchanged.
    pub fn relocate(&mut self, position: usize) {
        self.position = position;
        self.clear();
    }

    /// Drops all cached weights.
    pub fn clear(&self) {
        self.left_weight.set(None);
        self.right_weight.set(None);
        self.self_and_left_weight.set(None);
        self.subtree_weight.set(None);
    }

    /// Total count under the left child, 0 if there is none.
    pub fn left_weight(&self, nodes: &[Node<T>]) -> u64 {
        memoize(&self.left_weight, || {
            child_weight(nodes, left_child(self.position))
        })
    }

    /// Total count under the right child, 0 if there is none.
    pub fn right_weight(&self, nodes: &[Node<T>]) -> u64 {
        memoize(&self.right_weight, || {
            child_weight(nodes, right_child(self.position))
        })
    }

    pub fn self_and_left_weight(&self, nodes: &[Node<T>]) -> u64 {
        memoize(&self.self_and_left_weight, || {
            self.left_weight(nodes) + self.count
        })
    }

    pub fn subtree_weight(&self, nodes: &[Node<T>]) -> u64 {
        memoize(&self.subtree_weight, || {
            self.self_and_left_weight(nodes) + self.right_weight(nodes)
        })
    }
}

fn memoize(cache: &Cell<Option<u64>>, compute: impl FnOnce() -> u64) -> u64 {
    if let Some(value) = cache.get() {
        return value;
    }
    let value = compute();
    cache.set(Some(value));
    value
}

fn child_weight<T>(nodes: &[Node<T>], position: usize) -> u64 {
    nodes
        .get(position)
        .map_or(0, |child| child.subtree_weight(nodes))
}
