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

//! Weighted heap for sampling items in proportion to their observed frequency.
//!
//! # Overview
//!
//! [`WeightedHeap`] keeps one node per distinct item in a vector that encodes a
//! complete binary tree by position: the node in slot `i` has children in slots
//! `2i + 1` and `2i + 2`. Nodes are kept in max-heap order by count, so frequent
//! items sit near the root and the linear scan that locates an existing item is
//! usually short.
//!
//! Each node memoizes four weights of the subtree rooted at its slot: the
//! weight under its left child, under its right child, its own count plus the
//! left weight, and the whole subtree. Sampling draws a point in
//! `[0, total_weight())` and descends from the root by comparing the point to
//! those partial sums, so an item with count `c` is returned with probability
//! exactly `c / total_weight()`.
//!
//! Both updates and draws take time logarithmic in the number of distinct items,
//! plus the linear lookup on update.
//!
//! # Cache invalidation
//!
//! A count increase makes every ancestor's cached weights stale. Exchanging a
//! parent and child only changes the two exchanged slots: the set of items
//! under their shared parent slot, and therefore its weight, is unchanged.
//!
//! # Examples
//!
//! ```
//! # use cathy::heap::WeightedHeap;
//! # use rand::SeedableRng;
//! # use rand::rngs::StdRng;
//! let mut heap = WeightedHeap::new();
//! for _ in 0..4 {
//!     heap.add("foo");
//! }
//! heap.add("bar");
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let item = heap.pick(&mut rng).unwrap();
//! assert!(*item == "foo" || *item == "bar");
//! assert_eq!(heap.count(&"foo"), 4);
//! ```
//!
//! # Frequency mappings
//!
//! ```
//! # use std::collections::BTreeMap;
//! # use cathy::heap::WeightedHeap;
//! let counts = BTreeMap::from([("a", 1), ("b", 2), ("c", 3)]);
//! let heap = WeightedHeap::from_counts(counts.clone()).unwrap();
//! assert_eq!(heap.counts::<BTreeMap<_, _>>(), counts);
//! assert_eq!(heap.total_weight(), 6);
//! ```

mod node;

mod weighted_heap;
pub use self::weighted_heap::WeightedHeap;
