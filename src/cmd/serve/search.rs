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

use axum::extract::Query;
use axum::extract::State;
use axum::response::Html;
use maud::Markup;
use maud::html;
use norsk_drill_core::Word;

use crate::cmd::serve::api::SearchQuery;
use crate::cmd::serve::error::PageError;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;
use crate::db::Database;
use crate::error::Fallible;

/// Words whose lemma, forms or translations contain `query`.
pub fn search_words(db: &Database, query: &str) -> Fallible<Vec<Word>> {
    let words = db.all_words()?;
    Ok(words.into_iter().filter(|word| word.matches(query)).collect())
}

pub async fn search_page_handler(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, PageError> {
    let query = query.q.unwrap_or_default().trim().to_string();
    let results = if query.is_empty() {
        None
    } else {
        let db = state.db()?;
        Some(search_words(&db, &query)?)
    };
    let body = html! {
        h1 { "Search" }
        form method="get" action="/search" {
            input type="search" name="q" value=(query) autofocus;
            input type="submit" value="Search";
        }
        @if let Some(results) = results {
            @if results.is_empty() {
                p { "No words match '" (query) "'." }
            } @else {
                (results_table(&results))
            }
        }
    };
    Ok(Html(page_template(body).into_string()))
}

fn results_table(words: &[Word]) -> Markup {
    html! {
        table.results {
            thead {
                tr {
                    th { "Category" }
                    th { "Word" }
                    th { "Forms" }
                    th { "Translations" }
                }
            }
            tbody {
                @for word in words {
                    tr {
                        td { (word.category.title()) }
                        td { (word.headword()) }
                        td {
                            @for (kind, value) in word.forms.iter() {
                                span.form title=(kind.label()) { (value) } " "
                            }
                        }
                        td { (word.translations.join(", ")) }
                    }
                }
            }
        }
    }
}
