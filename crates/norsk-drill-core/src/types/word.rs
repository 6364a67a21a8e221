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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::category::Category;
use crate::types::form::ARTICLES;
use crate::types::form::FormKind;
use crate::types::question::ExpectedForm;
use crate::types::question::Question;
use crate::types::question::QuestionId;
use crate::types::timestamp::Timestamp;

/// A word as entered by the user, before it has been stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewWord {
    pub category: Category,
    /// Dictionary form: the noun without its article, the verb infinitive,
    /// the adjective base form, or the whole phrase.
    pub lemma: String,
    pub forms: BTreeMap<FormKind, String>,
    pub translations: Vec<String>,
    pub group: Option<String>,
    pub group_description: Option<String>,
    pub tags: Option<String>,
    pub level: Option<String>,
    pub notes: Option<String>,
}

impl NewWord {
    pub fn new(category: Category, lemma: impl Into<String>, translations: Vec<String>) -> Self {
        Self {
            category,
            lemma: lemma.into(),
            forms: BTreeMap::new(),
            translations,
            group: None,
            group_description: None,
            tags: None,
            level: None,
            notes: None,
        }
    }

    pub fn with_form(mut self, kind: FormKind, value: impl Into<String>) -> Self {
        self.forms.insert(kind, value.into());
        self
    }

    /// Check the invariants a stored word must satisfy.
    pub fn check(&self) -> Fallible<()> {
        if self.lemma.trim().is_empty() {
            return fail(format!("{} is empty", self.category.lemma_label()));
        }
        if self.translations.iter().all(|t| t.trim().is_empty()) {
            return fail(format!("'{}' has no translations", self.lemma));
        }
        for kind in self.forms.keys() {
            if !self.category.forms().contains(kind) {
                return fail(format!(
                    "{} cannot have a {} form",
                    self.category.slug(),
                    kind
                ));
            }
        }
        if self.category == Category::Noun {
            match self.forms.get(&FormKind::Article) {
                Some(article) if ARTICLES.contains(&article.as_str()) => {}
                Some(article) => return fail(format!("invalid article: '{article}'")),
                None => return fail(format!("noun '{}' has no article", self.lemma)),
            }
        }
        Ok(())
    }

    /// The key two words must share to count as duplicates. Nouns are keyed
    /// on article and word, everything else on the lemma alone.
    pub fn duplicate_key(&self) -> (Category, Option<&str>, &str) {
        let article = match self.category {
            Category::Noun => self.forms.get(&FormKind::Article).map(String::as_str),
            _ => None,
        };
        (self.category, article, self.lemma.as_str())
    }
}

/// A stored word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: QuestionId,
    pub added_at: Timestamp,
    pub category: Category,
    pub lemma: String,
    pub forms: BTreeMap<FormKind, String>,
    pub translations: Vec<String>,
    pub group: Option<String>,
    pub group_description: Option<String>,
    pub tags: Option<String>,
    pub level: Option<String>,
    pub notes: Option<String>,
}

impl Word {
    pub fn from_new(id: QuestionId, added_at: Timestamp, word: NewWord) -> Self {
        let NewWord {
            category,
            lemma,
            forms,
            translations,
            group,
            group_description,
            tags,
            level,
            notes,
        } = word;
        Self {
            id,
            added_at,
            category,
            lemma,
            forms,
            translations,
            group,
            group_description,
            tags,
            level,
            notes,
        }
    }

    pub fn form(&self, kind: FormKind) -> Option<&str> {
        self.forms.get(&kind).map(String::as_str)
    }

    /// The word as a learner would look it up, e.g. `en hus`.
    pub fn headword(&self) -> String {
        match self.form(FormKind::Article) {
            Some(article) => format!("{article} {}", self.lemma),
            None => self.lemma.clone(),
        }
    }

    /// Whether the comma-separated tag list contains `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim().to_lowercase();
        match &self.tags {
            Some(tags) => tags.split(',').any(|t| t.trim().to_lowercase() == tag),
            None => false,
        }
    }

    /// Case-insensitive substring search over the lemma, every form, and
    /// every translation.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        std::iter::once(self.lemma.as_str())
            .chain(self.forms.values().map(String::as_str))
            .chain(self.translations.iter().map(String::as_str))
            .any(|s| s.to_lowercase().contains(&query))
    }

    /// Build the practice question for this word.
    pub fn question(&self) -> Fallible<Question> {
        let forms: Vec<ExpectedForm> = self
            .category
            .drilled_forms()
            .iter()
            .filter_map(|kind| {
                self.form(*kind).map(|value| ExpectedForm {
                    kind: *kind,
                    accepted: vec![value.to_string()],
                })
            })
            .collect();
        let mut question = Question::new(
            self.id,
            self.category,
            self.lemma.clone(),
            self.translations.clone(),
        )?;
        question.forms = forms;
        question.group = self.group.clone();
        question.group_description = self.group_description.clone();
        Ok(question)
    }

    pub fn into_new(self) -> NewWord {
        NewWord {
            category: self.category,
            lemma: self.lemma,
            forms: self.forms,
            translations: self.translations,
            group: self.group,
            group_description: self.group_description,
            tags: self.tags,
            level: self.level,
            notes: self.notes,
        }
    }
}
