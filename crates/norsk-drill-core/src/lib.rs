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

//! norsk-drill-core: Core library for the norsk-drill vocabulary trainer.
//!
//! This library has no I/O and provides:
//! - Answer validation with normalization (parentheticals, whitespace, case)
//! - Practice item selection that avoids recently shown items
//! - Scoring of a whole submission (translation plus grammatical forms)
//! - Parsing of CSV and line-oriented text imports

pub mod error;
pub mod import;
pub mod rng;
pub mod score;
pub mod select;
pub mod types;
pub mod validate;

// Re-exports for convenience
pub use error::{ErrorReport, Fallible, fail};
pub use import::{ParsedImport, RejectedLine, parse_csv, parse_text, split_translations};
pub use rng::TinyRng;
pub use score::{Scorecard, SlotResult, Submission, score};
pub use select::{SelectError, Selection, select_next};
pub use types::category::Category;
pub use types::form::FormKind;
pub use types::question::{ExpectedForm, Question, QuestionId};
pub use types::recency::RecencyWindow;
pub use types::timestamp::Timestamp;
pub use types::word::{NewWord, Word};
pub use validate::{Verdict, normalize, validate};
