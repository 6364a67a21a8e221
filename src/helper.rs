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

use std::path::PathBuf;

use norsk_drill_core::Category;
use norsk_drill_core::FormKind;
use norsk_drill_core::NewWord;
use norsk_drill_core::Timestamp;
use tempfile::tempdir;

use crate::db::Database;
use crate::error::Fallible;

/// Create a temporary directory that outlives the test.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir = tempdir()?.keep();
    Ok(dir.canonicalize()?)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Three nouns, two verbs, one adjective, no phrases.
pub fn sample_words() -> Vec<NewWord> {
    vec![
        NewWord::new(Category::Noun, "hus", strings(&["house", "home"]))
            .with_form(FormKind::Article, "et")
            .with_form(FormKind::Definite, "huset"),
        NewWord::new(Category::Noun, "bil", strings(&["car"]))
            .with_form(FormKind::Article, "en"),
        NewWord::new(Category::Noun, "jente", strings(&["girl"]))
            .with_form(FormKind::Article, "ei"),
        NewWord::new(Category::Verb, "gå", strings(&["to walk", "to go (on foot)"]))
            .with_form(FormKind::Presens, "går")
            .with_form(FormKind::Preteritum, "gikk")
            .with_form(FormKind::Perfect, "har gått"),
        NewWord::new(Category::Verb, "være", strings(&["to be"]))
            .with_form(FormKind::Presens, "er"),
        NewWord::new(Category::Adjective, "stor", strings(&["big", "large"]))
            .with_form(FormKind::Neuter, "stort")
            .with_form(FormKind::Plural, "store"),
    ]
}

/// A database file in a fresh temporary directory, filled with
/// [`sample_words`]. Returns the path so a server can open it too.
pub fn create_sample_database() -> Fallible<PathBuf> {
    let dir = create_tmp_directory()?;
    let path = dir.join("norsk_drill.db");
    let db = Database::new(&path)?;
    db.import(sample_words(), Timestamp::now())?;
    Ok(path)
}
