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

//! JSON endpoints for clients that render their own practice UI.

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use norsk_drill_core::Category;
use norsk_drill_core::FormKind;
use norsk_drill_core::Question;
use norsk_drill_core::QuestionId;
use norsk_drill_core::RecencyWindow;
use norsk_drill_core::Scorecard;
use norsk_drill_core::Submission;
use norsk_drill_core::Word;
use norsk_drill_core::score;
use serde::Deserialize;
use serde::Serialize;

use crate::cmd::serve::error::ApiError;
use crate::cmd::serve::error::ServerError;
use crate::cmd::serve::practice::PracticeQuery;
use crate::cmd::serve::search::search_words;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::parse_category;
use crate::error::ErrorReport;

/// A question without its answers.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub category: Category,
    pub prompt: String,
    /// The form slots to fill in, in order.
    pub forms: Vec<FormKind>,
    pub group: Option<String>,
    pub group_description: Option<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            category: question.category,
            prompt: question.prompt.clone(),
            forms: question.forms.iter().map(|form| form.kind).collect(),
            group: question.group.clone(),
            group_description: question.group_description.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RandomResponse {
    pub question: QuestionView,
    /// Send back as `recent=` on the next request, comma-separated.
    pub recent: RecencyWindow,
}

pub async fn random_handler(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Query(query): Query<PracticeQuery>,
) -> Result<Json<RandomResponse>, ApiError> {
    let category = parse_category(&category)?;
    let recency = RecencyWindow::parse_lenient(query.recent.as_deref().unwrap_or(""));
    let draw = state.draw(category, query.tag.as_deref(), &recency)?;
    Ok(Json(RandomResponse {
        question: QuestionView::from(&draw.question),
        recent: draw.recency,
    }))
}

pub async fn check_handler(
    State(state): State<ServerState>,
    Path((category, id)): Path<(String, QuestionId)>,
    Json(submission): Json<Submission>,
) -> Result<Json<Scorecard>, ApiError> {
    let category = parse_category(&category)?;
    let word = state
        .db()?
        .get_word(id)?
        .filter(|word| word.category == category)
        .ok_or_else(|| ServerError::not_found(format!("no {} with id {id}", category.slug())))?;
    let question = word.question().map_err(ErrorReport::from)?;
    Ok(Json(score(&question, &submission)))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Word>,
}

pub async fn search_handler(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = query.q.unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err(ServerError::bad_request("search query is empty").into());
    }
    let db = state.db()?;
    let results = search_words(&db, &query)?;
    drop(db);
    Ok(Json(SearchResponse { query, results }))
}
