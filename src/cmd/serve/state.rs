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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use norsk_drill_core::Category;
use norsk_drill_core::Question;
use norsk_drill_core::RecencyWindow;
use norsk_drill_core::TinyRng;
use norsk_drill_core::select_next;

use crate::cmd::serve::error::ServerError;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;

/// Shared by every handler. The recency window is not here: each learner's
/// window travels with their requests.
#[derive(Clone)]
pub struct ServerState {
    pub db: Arc<Mutex<Database>>,
    pub rng: Arc<Mutex<TinyRng>>,
    pub window_size: usize,
    pub admin_localhost_only: bool,
}

/// Parse the `{category}` path segment.
pub fn parse_category(segment: &str) -> Result<Category, ServerError> {
    segment
        .parse()
        .map_err(|_| ServerError::not_found(format!("unknown category: '{segment}'")))
}

/// The question picked for a learner and their updated window.
pub struct Draw {
    pub question: Question,
    pub recency: RecencyWindow,
}

impl ServerState {
    pub fn db(&self) -> Fallible<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| ErrorReport::new("database lock poisoned"))
    }

    fn rng(&self) -> Fallible<MutexGuard<'_, TinyRng>> {
        self.rng
            .lock()
            .map_err(|_| ErrorReport::new("RNG lock poisoned"))
    }

    /// Pick the next question in a category, avoiding the ids in `recency`.
    pub fn draw(
        &self,
        category: Category,
        tag: Option<&str>,
        recency: &RecencyWindow,
    ) -> Result<Draw, ServerError> {
        let words = self.db()?.words(category, tag)?;
        let pool: Vec<Question> = words
            .iter()
            .filter_map(|word| match word.question() {
                Ok(question) => Some(question),
                Err(e) => {
                    log::warn!("Skipping word {}: {}", word.id, e.message());
                    None
                }
            })
            .collect();
        let mut rng = self.rng()?;
        let selection = select_next(category, &pool, recency, self.window_size, &mut rng)?;
        log::debug!(
            "Drew {} '{}', window [{}]",
            category,
            selection.chosen.prompt,
            selection.recency
        );
        Ok(Draw {
            question: selection.chosen.clone(),
            recency: selection.recency,
        })
    }
}
