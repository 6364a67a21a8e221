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

use std::collections::HashMap;

use axum::Form;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::response::Html;
use maud::Markup;
use maud::PreEscaped;
use maud::html;
use norsk_drill_core::Category;
use norsk_drill_core::FormKind;
use norsk_drill_core::Question;
use norsk_drill_core::QuestionId;
use norsk_drill_core::RecencyWindow;
use norsk_drill_core::Scorecard;
use norsk_drill_core::SlotResult;
use norsk_drill_core::Submission;
use norsk_drill_core::score;
use serde::Deserialize;

use crate::cmd::serve::error::PageError;
use crate::cmd::serve::error::ServerError;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::parse_category;
use crate::cmd::serve::template::page_template;
use crate::error::ErrorReport;
use crate::markdown::markdown_to_html_inline;
use crate::utils::url_with_query;

#[derive(Deserialize)]
pub struct PracticeQuery {
    pub tag: Option<String>,
    pub recent: Option<String>,
}

/// Name of the input holding the answer for a form slot.
fn form_field(kind: FormKind) -> String {
    format!("form_{}", kind.key())
}

fn practice_url(category: Category, tag: &str, recency: &RecencyWindow) -> String {
    url_with_query(
        &format!("/practice/{}", category.slug()),
        &[("tag", tag), ("recent", &recency.to_string())],
    )
}

pub async fn practice_handler(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Query(query): Query<PracticeQuery>,
) -> Result<Html<String>, PageError> {
    let category = parse_category(&category)?;
    let tag = query.tag.unwrap_or_default();
    let recency = RecencyWindow::parse_lenient(query.recent.as_deref().unwrap_or(""));
    let draw = state.draw(category, Some(tag.as_str()), &recency)?;
    let body = render_question(&draw.question, &tag, &draw.recency);
    Ok(Html(page_template(body).into_string()))
}

fn render_group(question: &Question) -> Markup {
    html! {
        @if let Some(group) = &question.group {
            div.group {
                span.group-name { (group) }
                @if let Some(description) = &question.group_description {
                    " "
                    span.group-description {
                        (PreEscaped(markdown_to_html_inline(description)))
                    }
                }
            }
        }
    }
}

fn render_question(question: &Question, tag: &str, recency: &RecencyWindow) -> Markup {
    let category = question.category;
    html! {
        div.practice {
            h1 { (category.title()) }
            @if !tag.is_empty() {
                p.tag { "Tag: " (tag) }
            }
            div.prompt { (question.prompt) }
            (render_group(question))
            form method="post" action={ "/practice/" (category.slug()) } {
                input type="hidden" name="id" value=(question.id);
                input type="hidden" name="recent" value=(recency.to_string());
                input type="hidden" name="tag" value=(tag);
                label {
                    "Translation"
                    input type="text" name="translation" autocomplete="off" autofocus;
                }
                @for form in question.forms.iter() {
                    label {
                        (form.kind.label())
                        input type="text" name=(form_field(form.kind)) autocomplete="off";
                    }
                }
                input type="submit" value="Check";
            }
        }
    }
}

/// Pull the learner's answers out of the posted form.
fn submission_from_form(question: &Question, form: &HashMap<String, String>) -> Submission {
    let mut submission = Submission {
        translation: form.get("translation").cloned().unwrap_or_default(),
        ..Submission::default()
    };
    for expected in question.forms.iter() {
        if let Some(answer) = form.get(&form_field(expected.kind)) {
            submission.forms.insert(expected.kind, answer.clone());
        }
    }
    submission
}

pub async fn check_handler(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Html<String>, PageError> {
    let category = parse_category(&category)?;
    let id: QuestionId = form
        .get("id")
        .and_then(|id| id.trim().parse().ok())
        .ok_or_else(|| ServerError::bad_request("missing word id"))?;
    let tag = form.get("tag").cloned().unwrap_or_default();
    let recency = RecencyWindow::parse_lenient(form.get("recent").map(String::as_str).unwrap_or(""));
    let word = state
        .db()?
        .get_word(id)?
        .filter(|word| word.category == category)
        .ok_or_else(|| ServerError::not_found(format!("no {} with id {id}", category.slug())))?;
    let question = word.question().map_err(ErrorReport::from)?;
    let submission = submission_from_form(&question, &form);
    let scorecard = score(&question, &submission);
    log::debug!(
        "Checked {} '{}': {}",
        category,
        question.prompt,
        if scorecard.all_correct { "correct" } else { "incorrect" }
    );
    let next = practice_url(category, &tag, &recency);
    let body = render_feedback(&question, &scorecard, &next);
    Ok(Html(page_template(body).into_string()))
}

fn render_slot(label: &str, slot: &SlotResult) -> Markup {
    let class = if slot.verdict.correct { "correct" } else { "incorrect" };
    html! {
        tr class=(class) {
            td { (label) }
            td { (slot.answer) }
            td { @if slot.verdict.correct { "✓" } @else { "✗" } }
            td { (slot.expected.join(", ")) }
        }
    }
}

fn render_feedback(question: &Question, scorecard: &Scorecard, next: &str) -> Markup {
    html! {
        div.feedback {
            h1 { (question.prompt) }
            @if scorecard.all_correct {
                p.verdict.correct { "Correct!" }
            } @else {
                p.verdict.incorrect { "Not quite." }
            }
            (render_group(question))
            table {
                thead {
                    tr {
                        th { "Slot" }
                        th { "Your answer" }
                        th {}
                        th { "Accepted" }
                    }
                }
                tbody {
                    (render_slot("Translation", &scorecard.translation))
                    @for slot in scorecard.forms.iter() {
                        (render_slot(slot.form.map(FormKind::label).unwrap_or(""), slot))
                    }
                }
            }
            a.next href=(next) autofocus { "Next" }
        }
    }
}

#[cfg(test)]
mod tests {
    use norsk_drill_core::ExpectedForm;

    use super::*;

    fn gaa() -> Question {
        let mut question = Question::new(
            4,
            Category::Verb,
            "gå",
            vec!["to walk".to_string()],
        )
        .unwrap();
        question.forms = vec![ExpectedForm {
            kind: FormKind::Presens,
            accepted: vec!["går".to_string()],
        }];
        question
    }

    #[test]
    fn test_submission_from_form() {
        let mut form = HashMap::new();
        form.insert("translation".to_string(), "To walk".to_string());
        form.insert("form_presens".to_string(), "går".to_string());
        form.insert("form_neuter".to_string(), "ignored".to_string());
        let submission = submission_from_form(&gaa(), &form);
        assert_eq!(submission.translation, "To walk");
        assert_eq!(submission.forms.len(), 1);
        assert_eq!(
            submission.forms.get(&FormKind::Presens).map(String::as_str),
            Some("går")
        );
    }

    #[test]
    fn test_practice_url_carries_window() {
        let recency: RecencyWindow = [3, 7].into_iter().collect();
        assert_eq!(
            practice_url(Category::Noun, "", &recency),
            "/practice/nouns?recent=3%2C7"
        );
        assert_eq!(
            practice_url(Category::Verb, "A1", &RecencyWindow::new()),
            "/practice/verbs?tag=A1"
        );
    }

    #[test]
    fn test_question_form_has_slot_per_form() {
        let html = render_question(&gaa(), "", &RecencyWindow::new()).into_string();
        assert!(html.contains("name=\"translation\""));
        assert!(html.contains("name=\"form_presens\""));
        assert!(!html.contains("name=\"form_preteritum\""));
    }
}
