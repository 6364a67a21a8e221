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
use std::fs::read_to_string;
use std::path::Path;

use clap::ValueEnum;
use norsk_drill_core::Category;
use norsk_drill_core::ParsedImport;
use norsk_drill_core::Timestamp;
use norsk_drill_core::parse_csv;
use norsk_drill_core::parse_text;
use walkdir::WalkDir;

use crate::db::Database;
use crate::db::ImportSummary;
use crate::error::Fallible;
use crate::error::fail;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum ImportFormat {
    /// A header row naming the columns, one word per row.
    Csv,
    /// One `norsk – english` entry per line.
    Text,
}

impl Display for ImportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportFormat::Csv => write!(f, "csv"),
            ImportFormat::Text => write!(f, "text"),
        }
    }
}

/// Parse `text` in the given format.
pub fn parse_words(category: Category, format: ImportFormat, text: &str) -> Fallible<ParsedImport> {
    match format {
        ImportFormat::Csv => Ok(parse_csv(category, text)?),
        ImportFormat::Text => Ok(parse_text(category, text)),
    }
}

/// Parse and store words, logging every rejected line.
pub fn import_words(
    db: &Database,
    category: Category,
    format: ImportFormat,
    text: &str,
) -> Fallible<(ImportSummary, ParsedImport)> {
    let mut parsed = parse_words(category, format, text)?;
    for rejected in parsed.rejected.iter() {
        log::warn!("Line {}: {}", rejected.line, rejected.reason);
    }
    let words = std::mem::take(&mut parsed.words);
    let summary = db.import(words, Timestamp::now())?;
    Ok((summary, parsed))
}

pub fn import_file(
    database: &Path,
    category: Category,
    file: &Path,
    format: ImportFormat,
) -> Fallible<()> {
    if !file.exists() {
        return fail(format!("file {} does not exist.", file.display()));
    }
    let text = read_to_string(file)?;
    let db = Database::new(database)?;
    let (summary, parsed) = import_words(&db, category, format, &text)?;
    println!(
        "{}: added {}, skipped {} duplicates, rejected {} lines.",
        file.display(),
        summary.added,
        summary.duplicates,
        parsed.rejected.len()
    );
    Ok(())
}

/// The category a data file holds, going by its name: `nouns.csv` and so on.
fn category_of(path: &Path) -> Option<Category> {
    let extension = path.extension()?.to_str()?;
    if !extension.eq_ignore_ascii_case("csv") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Category::ALL
        .into_iter()
        .find(|category| category.slug().eq_ignore_ascii_case(stem))
}

/// Import every category CSV file found under `directory`.
pub fn import_directory(database: &Path, directory: &Path) -> Fallible<ImportSummary> {
    if !directory.is_dir() {
        return fail(format!("directory {} does not exist.", directory.display()));
    }
    let db = Database::new(database)?;
    let mut total = ImportSummary::default();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(category) = category_of(path) else {
            log::debug!("Skipping {}", path.display());
            continue;
        };
        log::info!("Importing {} from {}", category, path.display());
        let text = read_to_string(path)?;
        let (summary, parsed) = import_words(&db, category, ImportFormat::Csv, &text)?;
        println!(
            "{}: added {}, skipped {} duplicates, rejected {} lines.",
            path.display(),
            summary.added,
            summary.duplicates,
            parsed.rejected.len()
        );
        total.added += summary.added;
        total.duplicates += summary.duplicates;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::fs::write;

    use super::*;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_category_of() {
        assert_eq!(category_of(Path::new("data/nouns.csv")), Some(Category::Noun));
        assert_eq!(category_of(Path::new("VERBS.CSV")), Some(Category::Verb));
        assert_eq!(category_of(Path::new("nouns.txt")), None);
        assert_eq!(category_of(Path::new("notes.csv")), None);
    }

    #[test]
    fn test_import_file_text() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let file = dir.join("words.txt");
        write(&file, "et hus – house, home\nen bil – car\nnonsense\n")?;
        let database = dir.join("test.db");
        import_file(&database, Category::Noun, &file, ImportFormat::Text)?;
        let db = Database::new(&database)?;
        assert_eq!(db.count(Category::Noun)?, 2);
        Ok(())
    }

    #[test]
    fn test_import_missing_file() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let result = import_file(
            &dir.join("test.db"),
            Category::Noun,
            &dir.join("missing.csv"),
            ImportFormat::Csv,
        );
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_import_directory() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let data = dir.join("data");
        create_dir_all(data.join("b1"))?;
        write(
            data.join("nouns.csv"),
            "article,word,translations\net,hus,\"house, home\"\nen,bil,car\n",
        )?;
        write(
            data.join("b1").join("verbs.csv"),
            "infinitive,presens,preteritum,perfect,translation\nvære,er,var,har vært,to be\n",
        )?;
        write(data.join("readme.csv"), "a,b\n1,2\n")?;
        let database = dir.join("test.db");
        let summary = import_directory(&database, &data)?;
        assert_eq!(summary.added, 3);
        let db = Database::new(&database)?;
        assert_eq!(db.count(Category::Noun)?, 2);
        assert_eq!(db.count(Category::Verb)?, 1);
        // Running it again adds nothing.
        let again = import_directory(&database, &data)?;
        assert_eq!(again.added, 0);
        assert_eq!(again.duplicates, 3);
        Ok(())
    }
}
