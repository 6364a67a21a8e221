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
use std::path::Path;

use norsk_drill_core::Category;
use norsk_drill_core::FormKind;
use norsk_drill_core::NewWord;
use norsk_drill_core::QuestionId;
use norsk_drill_core::Timestamp;
use norsk_drill_core::Word;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use serde::Serialize;

use crate::error::Fallible;

const SCHEMA: &str = "
create table if not exists words (
    id integer primary key autoincrement,
    category text not null,
    lemma text not null,
    forms text not null,
    translations text not null,
    grp text,
    group_description text,
    tags text,
    level text,
    notes text,
    added_at text not null
);
create index if not exists words_category_lemma on words (category, lemma);
create table if not exists grammar_lessons (
    id integer primary key autoincrement,
    title text not null,
    content text not null,
    tags text,
    level text
);
";

const WORD_COLUMNS: &str = "id, category, lemma, forms, translations, grp, group_description, tags, level, notes, added_at";

pub struct Database {
    conn: Connection,
}

/// What happened to a word handed to [`Database::insert_word`].
#[derive(Debug, PartialEq)]
pub enum InsertOutcome {
    Added(QuestionId),
    /// An equivalent word already exists; nothing was written.
    Duplicate(QuestionId),
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarLesson {
    pub id: i64,
    pub title: String,
    /// Markdown.
    pub content: String,
    pub tags: Option<String>,
    pub level: Option<String>,
}

/// A `words` row before its text columns have been decoded.
struct RawWord {
    id: QuestionId,
    category: String,
    lemma: String,
    forms: String,
    translations: String,
    group: Option<String>,
    group_description: Option<String>,
    tags: Option<String>,
    level: Option<String>,
    notes: Option<String>,
    added_at: String,
}

impl RawWord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            category: row.get(1)?,
            lemma: row.get(2)?,
            forms: row.get(3)?,
            translations: row.get(4)?,
            group: row.get(5)?,
            group_description: row.get(6)?,
            tags: row.get(7)?,
            level: row.get(8)?,
            notes: row.get(9)?,
            added_at: row.get(10)?,
        })
    }

    fn decode(self) -> Fallible<Word> {
        let category: Category = self.category.parse()?;
        let forms: BTreeMap<FormKind, String> = serde_json::from_str(&self.forms)?;
        let translations: Vec<String> = serde_json::from_str(&self.translations)?;
        let added_at = Timestamp::try_from(self.added_at)?;
        Ok(Word {
            id: self.id,
            added_at,
            category,
            lemma: self.lemma,
            forms,
            translations,
            group: self.group,
            group_description: self.group_description,
            tags: self.tags,
            level: self.level,
            notes: self.notes,
        })
    }
}

impl Database {
    pub fn new(path: &Path) -> Fallible<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn query_words(&self, sql: &str, params: impl rusqlite::Params) -> Fallible<Vec<Word>> {
        let mut stmt = self.conn.prepare(sql)?;
        let raws = stmt
            .query_map(params, RawWord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawWord::decode).collect()
    }

    /// Find a stored word that `word` would duplicate.
    pub fn find_duplicate(&self, word: &NewWord) -> Fallible<Option<QuestionId>> {
        let sql = format!("select {WORD_COLUMNS} from words where category = ? and lemma = ?");
        let candidates = self.query_words(&sql, params![word.category.slug(), word.lemma])?;
        let key = word.duplicate_key();
        Ok(candidates
            .into_iter()
            .find(|existing| existing.clone().into_new().duplicate_key() == key)
            .map(|existing| existing.id))
    }

    /// Insert a word unless an equivalent one already exists.
    pub fn insert_word(&self, word: &NewWord, added_at: Timestamp) -> Fallible<InsertOutcome> {
        word.check()?;
        if let Some(id) = self.find_duplicate(word)? {
            log::debug!("Skipping duplicate {} '{}'", word.category, word.lemma);
            return Ok(InsertOutcome::Duplicate(id));
        }
        let sql = "insert into words (category, lemma, forms, translations, grp, group_description, tags, level, notes, added_at) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
        self.conn.execute(
            sql,
            params![
                word.category.slug(),
                word.lemma.trim(),
                serde_json::to_string(&word.forms)?,
                serde_json::to_string(&word.translations)?,
                word.group,
                word.group_description,
                word.tags,
                word.level,
                word.notes,
                added_at.to_string(),
            ],
        )?;
        Ok(InsertOutcome::Added(self.conn.last_insert_rowid()))
    }

    /// Insert many words in one transaction.
    pub fn import(&self, words: Vec<NewWord>, added_at: Timestamp) -> Fallible<ImportSummary> {
        let tx = self.conn.unchecked_transaction()?;
        let mut summary = ImportSummary::default();
        for word in words.iter() {
            match self.insert_word(word, added_at)? {
                InsertOutcome::Added(_) => summary.added += 1,
                InsertOutcome::Duplicate(_) => summary.duplicates += 1,
            }
        }
        tx.commit()?;
        log::info!(
            "Imported {} words ({} duplicates skipped)",
            summary.added,
            summary.duplicates
        );
        Ok(summary)
    }

    pub fn get_word(&self, id: QuestionId) -> Fallible<Option<Word>> {
        let sql = format!("select {WORD_COLUMNS} from words where id = ?");
        let raw = self
            .conn
            .query_row(&sql, params![id], RawWord::from_row)
            .optional()?;
        raw.map(RawWord::decode).transpose()
    }

    /// All words in a category, optionally only those carrying `tag`.
    pub fn words(&self, category: Category, tag: Option<&str>) -> Fallible<Vec<Word>> {
        let sql = format!("select {WORD_COLUMNS} from words where category = ? order by id");
        let words = self.query_words(&sql, params![category.slug()])?;
        Ok(match tag {
            Some(tag) if !tag.trim().is_empty() => {
                words.into_iter().filter(|w| w.has_tag(tag)).collect()
            }
            _ => words,
        })
    }

    pub fn all_words(&self) -> Fallible<Vec<Word>> {
        let sql = format!("select {WORD_COLUMNS} from words order by category, lemma");
        self.query_words(&sql, [])
    }

    /// Replace a word's contents. Returns false if there is no such word.
    pub fn update_word(&self, id: QuestionId, word: &NewWord) -> Fallible<bool> {
        word.check()?;
        let sql = "update words set category = ?, lemma = ?, forms = ?, translations = ?, grp = ?, group_description = ?, tags = ?, level = ?, notes = ? where id = ?";
        let changed = self.conn.execute(
            sql,
            params![
                word.category.slug(),
                word.lemma.trim(),
                serde_json::to_string(&word.forms)?,
                serde_json::to_string(&word.translations)?,
                word.group,
                word.group_description,
                word.tags,
                word.level,
                word.notes,
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_word(&self, id: QuestionId) -> Fallible<bool> {
        let changed = self
            .conn
            .execute("delete from words where id = ?", params![id])?;
        Ok(changed > 0)
    }

    pub fn count(&self, category: Category) -> Fallible<usize> {
        let count: i64 = self.conn.query_row(
            "select count(*) from words where category = ?",
            params![category.slug()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn insert_lesson(
        &self,
        title: &str,
        content: &str,
        tags: Option<&str>,
        level: Option<&str>,
    ) -> Fallible<i64> {
        self.conn.execute(
            "insert into grammar_lessons (title, content, tags, level) values (?, ?, ?, ?)",
            params![title, content, tags, level],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn lessons(&self) -> Fallible<Vec<GrammarLesson>> {
        let mut stmt = self
            .conn
            .prepare("select id, title, content, tags, level from grammar_lessons order by id")?;
        let lessons = stmt
            .query_map([], |row| {
                Ok(GrammarLesson {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    tags: row.get(3)?,
                    level: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lessons)
    }

    pub fn delete_lesson(&self, id: i64) -> Fallible<bool> {
        let changed = self
            .conn
            .execute("delete from grammar_lessons where id = ?", params![id])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::sample_words;

    fn now() -> Timestamp {
        Timestamp::now()
    }

    #[test]
    fn test_insert_and_get() -> Fallible<()> {
        let db = Database::in_memory()?;
        let word = sample_words().remove(0);
        let InsertOutcome::Added(id) = db.insert_word(&word, now())? else {
            panic!("expected the word to be added");
        };
        let stored = db.get_word(id)?.expect("word exists");
        assert_eq!(stored.lemma, "hus");
        assert_eq!(stored.translations, word.translations);
        assert_eq!(stored.form(FormKind::Definite), Some("huset"));
        assert_eq!(stored.into_new(), word);
        Ok(())
    }

    #[test]
    fn test_get_missing() -> Fallible<()> {
        let db = Database::in_memory()?;
        assert_eq!(db.get_word(42)?, None);
        Ok(())
    }

    #[test]
    fn test_duplicate_noun_is_skipped() -> Fallible<()> {
        let db = Database::in_memory()?;
        let word = sample_words().remove(0);
        let first = db.insert_word(&word, now())?;
        let second = db.insert_word(&word, now())?;
        let InsertOutcome::Added(id) = first else {
            panic!("expected the word to be added");
        };
        assert_eq!(second, InsertOutcome::Duplicate(id));
        assert_eq!(db.count(Category::Noun)?, 1);
        Ok(())
    }

    #[test]
    fn test_same_word_other_article_is_not_duplicate() -> Fallible<()> {
        let db = Database::in_memory()?;
        let en = NewWord::new(Category::Noun, "bok", vec!["book".to_string()])
            .with_form(FormKind::Article, "en");
        let ei = NewWord::new(Category::Noun, "bok", vec!["book".to_string()])
            .with_form(FormKind::Article, "ei");
        assert!(matches!(db.insert_word(&en, now())?, InsertOutcome::Added(_)));
        assert!(matches!(db.insert_word(&ei, now())?, InsertOutcome::Added(_)));
        Ok(())
    }

    #[test]
    fn test_invalid_word_is_refused() -> Fallible<()> {
        let db = Database::in_memory()?;
        let word = NewWord::new(Category::Verb, "gå", Vec::new());
        assert!(db.insert_word(&word, now()).is_err());
        assert_eq!(db.count(Category::Verb)?, 0);
        Ok(())
    }

    #[test]
    fn test_import_counts() -> Fallible<()> {
        let db = Database::in_memory()?;
        let summary = db.import(sample_words(), now())?;
        assert_eq!(
            summary,
            ImportSummary {
                added: 6,
                duplicates: 0
            }
        );
        let again = db.import(sample_words(), now())?;
        assert_eq!(again.added, 0);
        assert_eq!(again.duplicates, 6);
        assert_eq!(db.count(Category::Noun)?, 3);
        assert_eq!(db.count(Category::Verb)?, 2);
        assert_eq!(db.count(Category::Phrase)?, 0);
        Ok(())
    }

    #[test]
    fn test_words_by_tag() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut tagged = sample_words().remove(1);
        tagged.tags = Some("transport, A1".to_string());
        db.import(vec![sample_words().remove(0), tagged], now())?;
        assert_eq!(db.words(Category::Noun, None)?.len(), 2);
        let transport = db.words(Category::Noun, Some("Transport"))?;
        assert_eq!(transport.len(), 1);
        assert_eq!(transport[0].lemma, "bil");
        assert_eq!(db.words(Category::Noun, Some(" "))?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_update_and_delete() -> Fallible<()> {
        let db = Database::in_memory()?;
        let word = sample_words().remove(3);
        let InsertOutcome::Added(id) = db.insert_word(&word, now())? else {
            panic!("expected the word to be added");
        };
        let mut edited = word.clone();
        edited.translations = vec!["to go".to_string()];
        edited.group = Some("irregular".to_string());
        assert!(db.update_word(id, &edited)?);
        let stored = db.get_word(id)?.expect("word exists");
        assert_eq!(stored.translations, vec!["to go".to_string()]);
        assert_eq!(stored.group.as_deref(), Some("irregular"));
        assert!(db.delete_word(id)?);
        assert!(!db.delete_word(id)?);
        assert!(!db.update_word(id, &edited)?);
        assert_eq!(db.get_word(id)?, None);
        Ok(())
    }

    #[test]
    fn test_lessons() -> Fallible<()> {
        let db = Database::in_memory()?;
        let id = db.insert_lesson("Word order", "Verb second: *V2*.", Some("syntax"), None)?;
        let lessons = db.lessons()?;
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].title, "Word order");
        assert_eq!(lessons[0].tags.as_deref(), Some("syntax"));
        assert!(db.delete_lesson(id)?);
        assert!(db.lessons()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_file_database_persists() -> Fallible<()> {
        let dir = crate::helper::create_tmp_directory()?;
        let path = dir.join("words.db");
        {
            let db = Database::new(&path)?;
            db.import(sample_words(), now())?;
        }
        let db = Database::new(&path)?;
        assert_eq!(db.all_words()?.len(), 6);
        Ok(())
    }
}
