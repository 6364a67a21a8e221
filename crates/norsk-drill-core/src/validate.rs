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

//! Deciding whether a typed answer is correct.
//!
//! Both the answer and every accepted form go through [`normalize`]:
//! parenthetical annotations are removed, whitespace is trimmed and
//! collapsed, and the text is lowercased with full Unicode case mapping so
//! that `Æ`, `Ø` and `Å` fold like any ASCII letter.

use serde::Deserialize;
use serde::Serialize;

/// The outcome of checking one answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    /// The accepted form that matched, exactly as stored.
    pub matched: Option<String>,
}

impl Verdict {
    fn incorrect() -> Self {
        Self {
            correct: false,
            matched: None,
        }
    }
}

/// Check `submission` against a set of accepted forms.
///
/// A submission that normalizes to the empty string is always incorrect,
/// even if some accepted form also normalizes to the empty string.
pub fn validate<S: AsRef<str>>(submission: &str, accepted: &[S]) -> Verdict {
    let submission = normalize(submission);
    if submission.is_empty() {
        return Verdict::incorrect();
    }
    accepted
        .iter()
        .find(|form| normalize(form.as_ref()) == submission)
        .map(|form| Verdict {
            correct: true,
            matched: Some(form.as_ref().to_string()),
        })
        .unwrap_or_else(Verdict::incorrect)
}

/// Normalize text for comparison: drop parenthetical segments, trim, collapse
/// internal whitespace runs to a single space and lowercase. So `"to  go"`
/// matches `"to go"`. Idempotent.
pub fn normalize(s: &str) -> String {
    let stripped = strip_parentheticals(s);
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Remove every `( ... )` segment. Nested segments go as a whole, an
/// unclosed `(` swallows the rest of the string, and a stray `)` is
/// dropped.
fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth: usize = 0;
    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                // Keep words on either side of the segment apart.
                out.push(' ');
            }
            ')' => {
                depth = depth.saturating_sub(1);
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
