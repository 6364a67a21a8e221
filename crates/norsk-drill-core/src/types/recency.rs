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

use std::collections::VecDeque;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::types::question::QuestionId;

/// The identifiers most recently shown to one learner, oldest first.
///
/// The window is owned by the caller and travels with each request. It holds
/// no capacity of its own: the selector decides how much history to keep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecencyWindow {
    ids: VecDeque<QuestionId>,
}

impl RecencyWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: QuestionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.ids.iter().copied()
    }

    /// Record `id` as the most recent entry and evict from the front until
    /// at most `capacity` entries remain. An earlier occurrence of `id` is
    /// removed first, so the window never holds duplicates.
    pub fn push(&mut self, id: QuestionId, capacity: usize) {
        self.ids.retain(|existing| *existing != id);
        self.ids.push_back(id);
        self.truncate(capacity);
    }

    /// Evict the oldest entries until at most `capacity` remain.
    pub fn truncate(&mut self, capacity: usize) {
        while self.ids.len() > capacity {
            self.ids.pop_front();
        }
    }

    /// Parse the comma-separated form used in URLs. Entries that are not
    /// integers are skipped.
    pub fn parse_lenient(s: &str) -> Self {
        let ids = s
            .split(',')
            .filter_map(|part| part.trim().parse::<QuestionId>().ok())
            .collect();
        Self { ids }
    }
}

impl FromIterator<QuestionId> for RecencyWindow {
    fn from_iter<I: IntoIterator<Item = QuestionId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Comma-separated, oldest first. The inverse of `parse_lenient`.
impl Display for RecencyWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.ids.iter().map(|id| id.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(window: &RecencyWindow) -> Vec<QuestionId> {
        window.iter().collect()
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut window = RecencyWindow::new();
        for id in 1..=5 {
            window.push(id, 3);
        }
        assert_eq!(ids(&window), vec![3, 4, 5]);
    }

    #[test]
    fn test_push_moves_existing_to_back() {
        let mut window: RecencyWindow = [1, 2, 3].into_iter().collect();
        window.push(1, 3);
        assert_eq!(ids(&window), vec![2, 3, 1]);
    }

    #[test]
    fn test_capacity_zero() {
        let mut window = RecencyWindow::new();
        window.push(1, 0);
        assert!(window.is_empty());
    }

    #[test]
    fn test_parse_and_display() {
        let window = RecencyWindow::parse_lenient("4, 8,x,,15");
        assert_eq!(ids(&window), vec![4, 8, 15]);
        assert_eq!(window.to_string(), "4,8,15");
        assert!(RecencyWindow::parse_lenient("").is_empty());
    }

    #[test]
    fn test_serde_is_a_plain_list() {
        let window: RecencyWindow = [1, 2].into_iter().collect();
        assert_eq!(serde_json::to_string(&window).unwrap(), "[1,2]");
    }
}
