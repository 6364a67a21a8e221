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

use crate::types::form::FormKind;
use crate::types::question::Question;
use crate::types::question::QuestionId;
use crate::validate::Verdict;
use crate::validate::validate;

/// Everything the learner typed for one question.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub forms: BTreeMap<FormKind, String>,
}

/// Per-slot result. `form` is `None` for the translation slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotResult {
    pub form: Option<FormKind>,
    pub answer: String,
    pub verdict: Verdict,
    pub expected: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub question_id: QuestionId,
    pub translation: SlotResult,
    pub forms: Vec<SlotResult>,
    pub all_correct: bool,
}

/// Score every slot the question asks for. A slot left blank is wrong.
pub fn score(question: &Question, submission: &Submission) -> Scorecard {
    let translation = SlotResult {
        form: None,
        answer: submission.translation.clone(),
        verdict: validate(&submission.translation, &question.accepted),
        expected: question.accepted.clone(),
    };
    let forms: Vec<SlotResult> = question
        .forms
        .iter()
        .map(|expected| {
            let answer: &str = submission
                .forms
                .get(&expected.kind)
                .map(String::as_str)
                .unwrap_or("");
            SlotResult {
                form: Some(expected.kind),
                answer: answer.to_string(),
                verdict: validate(answer, &expected.accepted),
                expected: expected.accepted.clone(),
            }
        })
        .collect();
    let all_correct = translation.verdict.correct && forms.iter().all(|f| f.verdict.correct);
    Scorecard {
        question_id: question.id,
        translation,
        forms,
        all_correct,
    }
}
