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

//! Bulk import formats.
//!
//! Two formats are supported. CSV files have a header row naming the
//! columns, e.g. for verbs:
//!
//! ```text
//! infinitive,presens,preteritum,perfect,translation,group
//! være,er,var,vært,"to be|to exist",irregular
//! ```
//!
//! The text format has one word per line, Norwegian on the left of an en
//! dash and translations on the right:
//!
//! ```text
//! en hus – house, home
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::category::Category;
use crate::types::form::FormKind;
use crate::types::word::NewWord;

/// The words that parsed, and the lines that didn't.
#[derive(Debug, Default, Serialize)]
pub struct ParsedImport {
    pub words: Vec<NewWord>,
    pub rejected: Vec<RejectedLine>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct RejectedLine {
    /// 1-based line number in the input.
    pub line: usize,
    pub reason: String,
}

impl ParsedImport {
    fn reject(&mut self, line: usize, reason: impl Into<String>) {
        self.rejected.push(RejectedLine {
            line,
            reason: reason.into(),
        });
    }

    fn accept(&mut self, line: usize, word: NewWord) {
        match word.check() {
            Ok(()) => self.words.push(word),
            Err(e) => self.reject(line, e.message()),
        }
    }
}

/// Split a translation cell. A `|` anywhere means `|` is the separator,
/// otherwise commas separate.
pub fn split_translations(s: &str) -> Vec<String> {
    let sep = if s.contains('|') { '|' } else { ',' };
    s.split(sep)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// A CSV record and the line it started on.
type Record = (usize, Vec<String>);

/// Parse CSV text into words of the given category.
///
/// Fails if the text has no header or a quoted field is never closed.
/// Individual bad rows are reported in `rejected` instead.
pub fn parse_csv(category: Category, text: &str) -> Fallible<ParsedImport> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = read_records(text)?.into_iter();
    let header: Vec<String> = match records.next() {
        Some((_, header)) => header
            .into_iter()
            .map(|h| h.trim().to_lowercase())
            .collect(),
        None => return fail("CSV input is empty"),
    };
    let columns: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let lemma_column = category.lemma_label();
    if !columns.contains_key(lemma_column) && !columns.contains_key("lemma") {
        return fail(format!(
            "CSV header has no '{lemma_column}' column for {category}"
        ));
    }

    let mut parsed = ParsedImport::default();
    for (line, record) in records {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cell = |names: &[&str]| -> Option<String> {
            names
                .iter()
                .filter_map(|name| columns.get(name))
                .filter_map(|i| record.get(*i))
                .map(|value| value.trim())
                .find(|value| !value.is_empty())
                .map(str::to_string)
        };
        let Some(lemma) = cell(&[lemma_column, "lemma"]) else {
            parsed.reject(line, format!("missing {lemma_column}"));
            continue;
        };
        let translations = cell(&["translations", "translation"])
            .map(|t| split_translations(&t))
            .unwrap_or_default();
        let mut word = NewWord::new(category, lemma, translations);
        for kind in category.forms() {
            let value = match kind {
                FormKind::Perfect => cell(&["perfect", "perfect_participle"]),
                other => cell(&[other.key()]),
            };
            if let Some(value) = value {
                let value = match kind {
                    FormKind::Article => value.to_lowercase(),
                    _ => value,
                };
                word.forms.insert(*kind, value);
            }
        }
        word.group = match category {
            Category::Phrase => cell(&["category", "group"]),
            _ => cell(&["group"]),
        };
        word.group_description = cell(&["group_description"]);
        word.tags = cell(&["tags"]);
        word.level = cell(&["level"]);
        word.notes = cell(&["notes"]);
        parsed.accept(line, word);
    }
    Ok(parsed)
}

/// Split CSV text into records. Handles quoted fields containing commas,
/// newlines and doubled quotes, and both `\n` and `\r\n` line endings.
fn read_records(text: &str) -> Fallible<Vec<Record>> {
    let mut records: Vec<Record> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line: usize = 1;
    let mut record_line: usize = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut record)));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return fail(format!(
            "unterminated quoted field starting on line {record_line}"
        ));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push((record_line, record));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

/// Parse the line-oriented text format. Blank lines are skipped; every other
/// line either becomes a word or is rejected.
pub fn parse_text(category: Category, text: &str) -> ParsedImport {
    let mut parsed = ParsedImport::default();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let Some((left, right)) = split_entry(raw) else {
            parsed.reject(line, "expected '<norwegian> – <translations>'");
            continue;
        };
        let translations = split_translations(right);
        match text_word(category, left, translations) {
            Ok(word) => parsed.accept(line, word),
            Err(reason) => parsed.reject(line, reason),
        }
    }
    parsed
}

/// Split a line at the en dash, or at a spaced hyphen. A bare hyphen is not
/// a separator since Norwegian compounds use it.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (left, right) = line
        .split_once('–')
        .or_else(|| line.split_once(" - "))?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        None
    } else {
        Some((left, right))
    }
}

fn text_word(category: Category, left: &str, translations: Vec<String>) -> Result<NewWord, String> {
    match category {
        Category::Noun => {
            let mut parts = left.splitn(2, char::is_whitespace);
            let article = parts.next().unwrap_or("").to_lowercase();
            let noun = parts.next().map(str::trim).unwrap_or("");
            if noun.is_empty() {
                return Err("expected '<article> <word>'".to_string());
            }
            Ok(NewWord::new(category, noun, translations).with_form(FormKind::Article, article))
        }
        Category::Verb | Category::Adjective => {
            let mut parts = left.split(',').map(str::trim);
            let lemma = parts.next().unwrap_or("");
            let mut word = NewWord::new(category, lemma, translations);
            for (kind, value) in category.forms().iter().zip(parts) {
                if !value.is_empty() {
                    word.forms.insert(*kind, value.to_string());
                }
            }
            Ok(word)
        }
        Category::Phrase => Ok(NewWord::new(category, left, translations)),
    }
}
