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
use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;

use clap::ValueEnum;
use norsk_drill_core::Category;
use serde::Serialize;

use crate::db::Database;
use crate::error::Fallible;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    Text,
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Stats {
    /// Word count per category slug.
    pub words: BTreeMap<&'static str, usize>,
    pub total_words: usize,
    pub lessons: usize,
}

impl Stats {
    pub fn collect(db: &Database) -> Fallible<Self> {
        let mut words = BTreeMap::new();
        for category in Category::ALL {
            words.insert(category.slug(), db.count(category)?);
        }
        let total_words = words.values().sum();
        let lessons = db.lessons()?.len();
        Ok(Self {
            words,
            total_words,
            lessons,
        })
    }
}

pub fn print_stats(database: &Path, format: StatsFormat) -> Fallible<()> {
    let db = Database::new(database)?;
    let stats = Stats::collect(&db)?;
    match format {
        StatsFormat::Text => {
            for category in Category::ALL {
                let count = stats.words.get(category.slug()).copied().unwrap_or(0);
                println!("{:<12}{count}", category.title());
            }
            println!("{:<12}{}", "Total", stats.total_words);
            println!("{:<12}{}", "Lessons", stats.lessons);
        }
        StatsFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
