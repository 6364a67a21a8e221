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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::category::Category;
use crate::types::form::FormKind;

/// Identifies a question. Questions are built from stored words, so this is
/// the word's row id.
pub type QuestionId = i64;

/// One practice prompt and the answers that count as correct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: Category,
    /// What the learner is shown.
    pub prompt: String,
    /// Accepted translations. Never empty.
    pub accepted: Vec<String>,
    /// Grammatical forms the learner must also supply.
    pub forms: Vec<ExpectedForm>,
    pub group: Option<String>,
    pub group_description: Option<String>,
}

/// A grammatical form slot the learner has to fill in, with the answers
/// accepted for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectedForm {
    pub kind: FormKind,
    pub accepted: Vec<String>,
}

impl Question {
    /// Construct a question. Fails if there is no accepted answer, since
    /// then nothing the learner types could ever be right.
    pub fn new(
        id: QuestionId,
        category: Category,
        prompt: impl Into<String>,
        accepted: Vec<String>,
    ) -> Fallible<Self> {
        if accepted.is_empty() {
            return fail(format!("question {id} has no accepted answers"));
        }
        Ok(Self {
            id,
            category,
            prompt: prompt.into(),
            accepted,
            forms: Vec::new(),
            group: None,
            group_description: None,
        })
    }
}
