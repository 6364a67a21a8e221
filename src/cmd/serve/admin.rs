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

//! The admin panel: bulk import, add, edit and delete words and lessons.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::Form;
use axum::extract::ConnectInfo;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use maud::Markup;
use maud::html;
use norsk_drill_core::Category;
use norsk_drill_core::FormKind;
use norsk_drill_core::NewWord;
use norsk_drill_core::QuestionId;
use norsk_drill_core::Timestamp;
use norsk_drill_core::Word;
use norsk_drill_core::split_translations;
use serde::Deserialize;

use crate::cmd::import::ImportFormat;
use crate::cmd::import::import_words;
use crate::cmd::serve::error::PageError;
use crate::cmd::serve::error::ServerError;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::state::parse_category;
use crate::cmd::serve::template::page_template;
use crate::db::InsertOutcome;
use crate::markdown::first_line;
use crate::utils::url_with_query;

/// Whether a peer may use the admin panel.
pub fn admin_allowed(localhost_only: bool, peer: &SocketAddr) -> bool {
    !localhost_only || peer.ip().is_loopback()
}

pub async fn admin_guard(
    State(state): State<ServerState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if admin_allowed(state.admin_localhost_only, &peer) {
        next.run(request).await
    } else {
        log::warn!("Refused admin request from {peer}");
        PageError(ServerError::forbidden("The admin panel is only available from localhost."))
            .into_response()
    }
}

#[derive(Deserialize)]
pub struct AdminQuery {
    pub message: Option<String>,
}

fn redirect_with_message(path: &str, message: &str) -> Redirect {
    Redirect::to(&url_with_query(path, &[("message", message)]))
}

fn admin_path(category: Category) -> String {
    format!("/admin/{}", category.slug())
}

fn flash(message: &Option<String>) -> Markup {
    html! {
        @if let Some(message) = message {
            p.message { (message) }
        }
    }
}

pub async fn admin_index_handler(
    State(state): State<ServerState>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, PageError> {
    let db = state.db()?;
    let mut counts = Vec::new();
    for category in Category::ALL {
        counts.push((category, db.count(category)?));
    }
    let lessons = db.lessons()?;
    drop(db);
    let body = html! {
        h1 { "Admin" }
        (flash(&query.message))
        table.counts {
            @for (category, count) in counts.iter() {
                tr {
                    td { a href=(admin_path(*category)) { (category.title()) } }
                    td { (count) }
                }
            }
        }
        h2 { "Grammar lessons" }
        @if !lessons.is_empty() {
            table.lessons {
                @for lesson in lessons.iter() {
                    tr {
                        td { (lesson.title) }
                        td { (first_line(&lesson.content)) }
                        td {
                            form method="post" action={ "/admin/grammar/" (lesson.id) "/delete" } {
                                input type="submit" value="Delete";
                            }
                        }
                    }
                }
            }
        }
        form.lesson method="post" action="/admin/grammar/add" {
            label { "Title" input type="text" name="title"; }
            label { "Level" input type="text" name="level"; }
            label { "Tags" input type="text" name="tags"; }
            label { "Content (Markdown)" textarea name="content" rows="8" {} }
            input type="submit" value="Add lesson";
        }
    };
    Ok(Html(page_template(body).into_string()))
}

/// The add and edit form. Field names match [`word_from_form`].
fn word_form(category: Category, word: Option<&Word>, action: &str, submit: &str) -> Markup {
    let text = |value: Option<&str>| value.unwrap_or("").to_string();
    let lemma = text(word.map(|w| w.lemma.as_str()));
    let translations = word.map(|w| w.translations.join(", ")).unwrap_or_default();
    let optional = [
        ("group", "Group", text(word.and_then(|w| w.group.as_deref()))),
        (
            "group_description",
            "Group description",
            text(word.and_then(|w| w.group_description.as_deref())),
        ),
        ("tags", "Tags", text(word.and_then(|w| w.tags.as_deref()))),
        ("level", "Level", text(word.and_then(|w| w.level.as_deref()))),
        ("notes", "Notes", text(word.and_then(|w| w.notes.as_deref()))),
    ];
    html! {
        form.word method="post" action=(action) {
            label {
                (category.lemma_label())
                input type="text" name="lemma" value=(lemma);
            }
            @for kind in category.forms() {
                label {
                    (kind.label())
                    input type="text" name={ "form_" (kind.key()) }
                        value=(text(word.and_then(|w| w.form(*kind))));
                }
            }
            label {
                "Translations"
                input type="text" name="translations" value=(translations);
            }
            @for (name, caption, value) in optional.iter() {
                label {
                    (caption)
                    input type="text" name=(name) value=(value);
                }
            }
            input type="submit" value=(submit);
        }
    }
}

/// Build a word from the add/edit form. Blank optional fields become `None`.
pub fn word_from_form(category: Category, form: &HashMap<String, String>) -> NewWord {
    let field = |name: &str| -> Option<String> {
        form.get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let translations = field("translations")
        .map(|t| split_translations(&t))
        .unwrap_or_default();
    let mut word = NewWord::new(category, field("lemma").unwrap_or_default(), translations);
    for kind in category.forms() {
        if let Some(value) = field(&format!("form_{}", kind.key())) {
            let value = match kind {
                FormKind::Article => value.to_lowercase(),
                _ => value,
            };
            word.forms.insert(*kind, value);
        }
    }
    word.group = field("group");
    word.group_description = field("group_description");
    word.tags = field("tags");
    word.level = field("level");
    word.notes = field("notes");
    word
}

pub async fn admin_category_handler(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Query(query): Query<AdminQuery>,
) -> Result<Html<String>, PageError> {
    let category = parse_category(&category)?;
    let words = state.db()?.words(category, None)?;
    let path = admin_path(category);
    let body = html! {
        h1 { (category.title()) " (" (words.len()) ")" }
        (flash(&query.message))
        h2 { "Import CSV" }
        form method="post" action={ (path) "/import-csv" } {
            textarea name="data" rows="6" placeholder="Paste CSV with a header row" {}
            input type="submit" value="Import";
        }
        h2 { "Import text" }
        form method="post" action={ (path) "/import-text" } {
            textarea name="data" rows="6" placeholder="One 'norsk – english' entry per line" {}
            input type="submit" value="Import";
        }
        h2 { "Add" }
        (word_form(category, None, &format!("{path}/add"), "Add"))
        h2 { "Words" }
        table.words {
            @for word in words.iter() {
                tr {
                    td { (word.headword()) }
                    td { (word.translations.join(", ")) }
                    td { (word.group.as_deref().unwrap_or("")) }
                    td { (word.added_at.day()) }
                    td { a href={ (path) "/" (word.id) "/edit" } { "Edit" } }
                    td {
                        form method="post" action={ (path) "/" (word.id) "/delete" } {
                            input type="submit" value="Delete";
                        }
                    }
                }
            }
        }
    };
    Ok(Html(page_template(body).into_string()))
}

#[derive(Deserialize)]
pub struct ImportForm {
    #[serde(default)]
    pub data: String,
}

fn import_message(
    state: &ServerState,
    category: Category,
    format: ImportFormat,
    data: &str,
) -> Result<String, PageError> {
    if data.trim().is_empty() {
        return Ok("Nothing to import.".to_string());
    }
    let db = state.db()?;
    let message = match import_words(&db, category, format, data) {
        Ok((summary, parsed)) => {
            let mut message = format!(
                "Added {}, skipped {} duplicates, rejected {} lines.",
                summary.added,
                summary.duplicates,
                parsed.rejected.len()
            );
            for rejected in parsed.rejected.iter().take(5) {
                message.push_str(&format!(" Line {}: {}.", rejected.line, rejected.reason));
            }
            message
        }
        Err(e) => format!("Import failed: {e}"),
    };
    Ok(message)
}

pub async fn import_csv_handler(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Form(form): Form<ImportForm>,
) -> Result<Redirect, PageError> {
    let category = parse_category(&category)?;
    let message = import_message(&state, category, ImportFormat::Csv, &form.data)?;
    Ok(redirect_with_message(&admin_path(category), &message))
}

pub async fn import_text_handler(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Form(form): Form<ImportForm>,
) -> Result<Redirect, PageError> {
    let category = parse_category(&category)?;
    let message = import_message(&state, category, ImportFormat::Text, &form.data)?;
    Ok(redirect_with_message(&admin_path(category), &message))
}

pub async fn add_word_handler(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, PageError> {
    let category = parse_category(&category)?;
    let word = word_from_form(category, &form);
    let message = match word.check() {
        Err(e) => format!("Not added: {}", e.message()),
        Ok(()) => match state.db()?.insert_word(&word, Timestamp::now())? {
            InsertOutcome::Added(_) => format!("Added '{}'.", word.lemma),
            InsertOutcome::Duplicate(_) => format!("'{}' is already there.", word.lemma),
        },
    };
    Ok(redirect_with_message(&admin_path(category), &message))
}

fn find_word(state: &ServerState, category: Category, id: QuestionId) -> Result<Word, PageError> {
    let word = state
        .db()?
        .get_word(id)?
        .filter(|word| word.category == category)
        .ok_or_else(|| ServerError::not_found(format!("no {} with id {id}", category.slug())))?;
    Ok(word)
}

pub async fn edit_word_page_handler(
    State(state): State<ServerState>,
    Path((category, id)): Path<(String, QuestionId)>,
) -> Result<Html<String>, PageError> {
    let category = parse_category(&category)?;
    let word = find_word(&state, category, id)?;
    let action = format!("{}/{id}/edit", admin_path(category));
    let body = html! {
        h1 { "Edit " (word.headword()) }
        (word_form(category, Some(&word), &action, "Save"))
        a href=(admin_path(category)) { "Cancel" }
    };
    Ok(Html(page_template(body).into_string()))
}

pub async fn edit_word_handler(
    State(state): State<ServerState>,
    Path((category, id)): Path<(String, QuestionId)>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, PageError> {
    let category = parse_category(&category)?;
    find_word(&state, category, id)?;
    let word = word_from_form(category, &form);
    let message = match word.check() {
        Err(e) => format!("Not saved: {}", e.message()),
        Ok(()) => {
            state.db()?.update_word(id, &word)?;
            format!("Saved '{}'.", word.lemma)
        }
    };
    Ok(redirect_with_message(&admin_path(category), &message))
}

pub async fn delete_word_handler(
    State(state): State<ServerState>,
    Path((category, id)): Path<(String, QuestionId)>,
) -> Result<Redirect, PageError> {
    let category = parse_category(&category)?;
    let word = find_word(&state, category, id)?;
    state.db()?.delete_word(id)?;
    let message = format!("Deleted '{}'.", word.headword());
    Ok(redirect_with_message(&admin_path(category), &message))
}

#[derive(Deserialize)]
pub struct LessonForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub level: String,
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s) }
}

pub async fn add_lesson_handler(
    State(state): State<ServerState>,
    Form(form): Form<LessonForm>,
) -> Result<Redirect, PageError> {
    let message = match (non_blank(&form.title), non_blank(&form.content)) {
        (Some(title), Some(content)) => {
            state.db()?.insert_lesson(
                title,
                content,
                non_blank(&form.tags),
                non_blank(&form.level),
            )?;
            format!("Added lesson '{title}'.")
        }
        _ => "A lesson needs a title and content.".to_string(),
    };
    Ok(redirect_with_message("/admin", &message))
}

pub async fn delete_lesson_handler(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, PageError> {
    if !state.db()?.delete_lesson(id)? {
        return Err(ServerError::not_found(format!("no lesson with id {id}")).into());
    }
    Ok(redirect_with_message("/admin", "Lesson deleted."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::Fallible;

    #[test]
    fn test_admin_allowed() {
        let local: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let local6: SocketAddr = "[::1]:5000".parse().unwrap();
        let remote: SocketAddr = "192.168.1.20:5000".parse().unwrap();
        assert!(admin_allowed(true, &local));
        assert!(admin_allowed(true, &local6));
        assert!(!admin_allowed(true, &remote));
        assert!(admin_allowed(false, &remote));
    }

    #[test]
    fn test_word_from_form() {
        let mut form = HashMap::new();
        form.insert("lemma".to_string(), " gå ".to_string());
        form.insert("translations".to_string(), "to walk, to go".to_string());
        form.insert("form_presens".to_string(), "går".to_string());
        form.insert("form_preteritum".to_string(), " ".to_string());
        form.insert("group".to_string(), "".to_string());
        let word = word_from_form(Category::Verb, &form);
        assert_eq!(word.lemma, "gå");
        assert_eq!(word.translations, vec!["to walk".to_string(), "to go".to_string()]);
        assert_eq!(word.forms.len(), 1);
        assert_eq!(word.forms.get(&FormKind::Presens).map(String::as_str), Some("går"));
        assert_eq!(word.group, None);
        assert!(word.check().is_ok());
    }

    #[test]
    fn test_word_from_form_ignores_other_category_forms() {
        let mut form = HashMap::new();
        form.insert("lemma".to_string(), "stor".to_string());
        form.insert("translations".to_string(), "big".to_string());
        form.insert("form_presens".to_string(), "nope".to_string());
        let word = word_from_form(Category::Adjective, &form);
        assert!(word.forms.is_empty());
    }

    #[test]
    fn test_word_from_form_lowercases_article() -> Fallible<()> {
        let mut form = HashMap::new();
        form.insert("lemma".to_string(), "hus".to_string());
        form.insert("translations".to_string(), "house".to_string());
        form.insert("form_article".to_string(), "Et".to_string());
        let word = word_from_form(Category::Noun, &form);
        assert_eq!(word.forms.get(&FormKind::Article).map(String::as_str), Some("et"));
        assert!(word.check().is_ok());
        let db = Database::in_memory()?;
        let outcome = db.insert_word(&word, Timestamp::now())?;
        assert!(matches!(outcome, InsertOutcome::Added(_)));
        Ok(())
    }
}
