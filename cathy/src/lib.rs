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

//! An updatable weighted probability distribution.
//!
//! cathy keeps track of how often things are added to it, and picks one of those
//! things at random with probability proportional to its frequency. Both updates
//! and draws run in logarithmic time in the number of distinct items.
//!
//! * [`heap`] provides [`heap::WeightedHeap`], the distribution itself.
//! * [`chatter`] is a small bigram text generator built on top of it.

pub mod chatter;
pub mod error;
pub mod heap;
