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

use axum::extract::State;
use axum::response::Html;
use maud::PreEscaped;
use maud::html;

use crate::cmd::serve::error::PageError;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;
use crate::markdown::markdown_to_html;

pub async fn grammar_handler(State(state): State<ServerState>) -> Result<Html<String>, PageError> {
    let lessons = state.db()?.lessons()?;
    let body = html! {
        h1 { "Grammar" }
        @if lessons.is_empty() {
            p { "No lessons yet. Add some from the admin panel." }
        }
        @for lesson in lessons.iter() {
            article.lesson id={ "lesson-" (lesson.id) } {
                h2 { (lesson.title) }
                @if lesson.level.is_some() || lesson.tags.is_some() {
                    p.meta {
                        @if let Some(level) = &lesson.level {
                            span.level { (level) }
                        }
                        @if let Some(tags) = &lesson.tags {
                            " "
                            span.tags { (tags) }
                        }
                    }
                }
                div.content { (PreEscaped(markdown_to_html(&lesson.content))) }
            }
        }
    };
    Ok(Html(page_template(body).into_string()))
}
