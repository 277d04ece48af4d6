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

//! A toy chat bot built from two kinds of [`WeightedHeap`].
//!
//! The bot learns how likely each word is to begin a sentence, and how likely
//! each word is to follow the two words before it. Responses are generated by
//! walking those distributions until an end-of-sentence token is drawn.
//!
//! ```
//! # use cathy::chatter::Chatter;
//! # use rand::SeedableRng;
//! # use rand::rngs::StdRng;
//! let mut chatter = Chatter::new();
//! chatter.ponder("hello there");
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! assert_eq!(chatter.respond(&mut rng).as_deref(), Some("hello there"));
//! ```

use std::collections::HashMap;

use rand::Rng;

use crate::heap::WeightedHeap;

/// Default cap on the number of words in one response.
pub const DEFAULT_MAX_WORDS: usize = 256;

/// A position in a sentence: its boundaries or a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Before the first word.
    Start,
    /// A whitespace-delimited word.
    Word(String),
    /// After the last word.
    End,
}

/// Start-word and trigram distributions learned from conversation.
#[derive(Debug, Clone)]
pub struct Chatter {
    starters: WeightedHeap<Token>,
    followers: HashMap<(Token, Token), WeightedHeap<Token>>,
    max_words: usize,
}

impl Default for Chatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Chatter {
    /// Creates a bot that knows nothing and caps responses at [`DEFAULT_MAX_WORDS`].
    pub fn new() -> Self {
        Self::with_max_words(DEFAULT_MAX_WORDS)
    }

    /// Creates a bot whose responses hold at most `max_words` words.
    ///
    /// # Panics
    ///
    /// Panics if `max_words` is zero.
    pub fn with_max_words(max_words: usize) -> Self {
        assert!(max_words > 0, "max_words must be positive");
        Self {
            starters: WeightedHeap::new(),
            followers: HashMap::new(),
            max_words,
        }
    }

    /// Returns true if nothing has been learned yet.
    pub fn is_empty(&self) -> bool {
        self.starters.is_empty()
    }

    /// Returns the distribution of sentence-initial tokens.
    pub fn starters(&self) -> &WeightedHeap<Token> {
        &self.starters
    }

    /// Returns the distribution of tokens seen after `first` then `second`.
    pub fn followers(&self, first: &Token, second: &Token) -> Option<&WeightedHeap<Token>> {
        self.followers.get(&(first.clone(), second.clone()))
    }

    /// Learns from one message. Blank messages are ignored.
    pub fn ponder(&mut self, text: &str) {
        let mut tokens = vec![Token::Start];
        tokens.extend(text.split_whitespace().map(|word| Token::Word(word.to_string())));
        if tokens.len() == 1 {
            return;
        }
        tokens.push(Token::End);

        self.starters.add(tokens[1].clone());
        for window in tokens.windows(3) {
            self.followers
                .entry((window[0].clone(), window[1].clone()))
                .or_default()
                .add(window[2].clone());
        }
    }

    /// Generates a sentence, or `None` if nothing has been learned yet.
    pub fn respond<R: Rng>(&self, rng: &mut R) -> Option<String> {
        let mut previous = Token::Start;
        let mut current = self.starters.pick(rng)?.clone();
        let mut words = Vec::new();
        loop {
            let word = match &current {
                Token::Word(word) => word.clone(),
                Token::Start | Token::End => break,
            };
            if words.len() == self.max_words {
                log::debug!("response truncated at {} words", self.max_words);
                break;
            }
            words.push(word);
            let key = (previous, current);
            let Some(next) = self.followers.get(&key).and_then(|heap| heap.pick(rng)) else {
                break;
            };
            previous = key.1;
            current = next.clone();
        }
        Some(words.join(" "))
    }
}

/// Returns true if `text` ends the conversation: nothing at all, or a goodbye.
///
/// Case and non-word characters are ignored, so `"Bye!"` counts. Word
/// characters are ASCII only (`[A-Za-z0-9_]`); everything else is dropped.
pub fn is_farewell(text: &str) -> bool {
    let normalized: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    matches!(normalized.as_str(), "" | "bye" | "goodbye" | "quit")
}
