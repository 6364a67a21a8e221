// Copyright 2026 The norsk-drill Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Picking the next practice item.
//!
//! Items shown recently are skipped while anything else is available. When
//! every item in the pool is recent, the draw falls back to the whole pool:
//! a small pool repeats rather than blocking the learner.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::rng::TinyRng;
use crate::types::category::Category;
use crate::types::question::Question;
use crate::types::recency::RecencyWindow;

#[derive(Debug, PartialEq)]
pub enum SelectError {
    /// There is nothing to practise in this category.
    EmptyPool { category: Category },
}

impl Display for SelectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::EmptyPool { category } => {
                write!(f, "no words available in {category}")
            }
        }
    }
}

impl Error for SelectError {}

/// The chosen item and the window to hand back to the caller.
#[derive(Debug)]
pub struct Selection<'a> {
    pub chosen: &'a Question,
    pub recency: RecencyWindow,
}

/// How many identifiers the window keeps for a pool of `pool_len` items.
///
/// Never more than `window_size`. Never more than `pool_len - 1` either,
/// so at least one item is always outside the window and a pool of two
/// alternates. A pool of one keeps its single item.
pub fn effective_capacity(window_size: usize, pool_len: usize) -> usize {
    window_size.min(pool_len.saturating_sub(1).max(1))
}

/// Choose the next question from `pool`, avoiding the ids in `recency`.
pub fn select_next<'a>(
    category: Category,
    pool: &'a [Question],
    recency: &RecencyWindow,
    window_size: usize,
    rng: &mut TinyRng,
) -> Result<Selection<'a>, SelectError> {
    if pool.is_empty() {
        return Err(SelectError::EmptyPool { category });
    }
    let candidates: Vec<&Question> = pool.iter().filter(|q| !recency.contains(q.id)).collect();
    let chosen: &'a Question = match rng.choose(&candidates) {
        Some(question) => *question,
        None => {
            log::debug!("All {} {category} are recent; drawing from the full pool", pool.len());
            match rng.choose(pool) {
                Some(question) => question,
                None => return Err(SelectError::EmptyPool { category }),
            }
        }
    };
    let mut recency = recency.clone();
    recency.push(chosen.id, effective_capacity(window_size, pool.len()));
    Ok(Selection { chosen, recency })
}
