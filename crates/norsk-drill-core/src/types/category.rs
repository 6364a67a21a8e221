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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::types::form::FormKind;

/// The part of speech a word belongs to. Each category is practised on its
/// own.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Noun,
    Verb,
    Adjective,
    Phrase,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Noun,
        Category::Verb,
        Category::Adjective,
        Category::Phrase,
    ];

    /// The plural slug used in URLs, file names and the database.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Noun => "nouns",
            Category::Verb => "verbs",
            Category::Adjective => "adjectives",
            Category::Phrase => "phrases",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Category::Noun => "Nouns",
            Category::Verb => "Verbs",
            Category::Adjective => "Adjectives",
            Category::Phrase => "Phrases",
        }
    }

    /// Every form slot a word of this category can carry.
    pub fn forms(self) -> &'static [FormKind] {
        match self {
            Category::Noun => &[FormKind::Article, FormKind::Definite, FormKind::Plural],
            Category::Verb => &[
                FormKind::Presens,
                FormKind::Preteritum,
                FormKind::Perfect,
            ],
            Category::Adjective => &[
                FormKind::Neuter,
                FormKind::Plural,
                FormKind::Comparative,
                FormKind::Superlative,
            ],
            Category::Phrase => &[],
        }
    }

    /// The form slots the learner is asked to fill in during practice.
    pub fn drilled_forms(self) -> &'static [FormKind] {
        match self {
            Category::Noun => &[FormKind::Article],
            Category::Verb => &[
                FormKind::Presens,
                FormKind::Preteritum,
                FormKind::Perfect,
            ],
            Category::Adjective => &[FormKind::Neuter, FormKind::Plural],
            Category::Phrase => &[],
        }
    }

    /// What the dictionary form of a word is called in this category.
    pub fn lemma_label(self) -> &'static str {
        match self {
            Category::Noun => "word",
            Category::Verb => "infinitive",
            Category::Adjective => "base",
            Category::Phrase => "norwegian",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Category {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nouns" | "noun" => Ok(Category::Noun),
            "verbs" | "verb" => Ok(Category::Verb),
            "adjectives" | "adjective" => Ok(Category::Adjective),
            "phrases" | "phrase" => Ok(Category::Phrase),
            _ => Err(ErrorReport::new(format!("unknown category: '{s}'"))),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> String {
        category.slug().to_string()
    }
}
