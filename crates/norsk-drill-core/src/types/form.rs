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

/// Articles a Norwegian noun can take.
pub const ARTICLES: [&str; 3] = ["en", "ei", "et"];

/// A grammatical form slot of a word, e.g. the preteritum of a verb.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormKind {
    Article,
    Definite,
    Plural,
    Presens,
    Preteritum,
    Perfect,
    Neuter,
    Comparative,
    Superlative,
}

impl FormKind {
    /// The field name used in forms, CSV headers, and JSON.
    pub fn key(self) -> &'static str {
        match self {
            FormKind::Article => "article",
            FormKind::Definite => "definite",
            FormKind::Plural => "plural",
            FormKind::Presens => "presens",
            FormKind::Preteritum => "preteritum",
            FormKind::Perfect => "perfect",
            FormKind::Neuter => "neuter",
            FormKind::Comparative => "comparative",
            FormKind::Superlative => "superlative",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormKind::Article => "Article",
            FormKind::Definite => "Definite",
            FormKind::Plural => "Plural",
            FormKind::Presens => "Presens",
            FormKind::Preteritum => "Preteritum",
            FormKind::Perfect => "Perfect participle",
            FormKind::Neuter => "Neuter",
            FormKind::Comparative => "Comparative",
            FormKind::Superlative => "Superlative",
        }
    }
}

impl Display for FormKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for FormKind {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(FormKind::Article),
            "definite" => Ok(FormKind::Definite),
            "plural" => Ok(FormKind::Plural),
            "presens" => Ok(FormKind::Presens),
            "preteritum" => Ok(FormKind::Preteritum),
            "perfect" | "perfect_participle" => Ok(FormKind::Perfect),
            "neuter" => Ok(FormKind::Neuter),
            "comparative" => Ok(FormKind::Comparative),
            "superlative" => Ok(FormKind::Superlative),
            _ => Err(ErrorReport::new(format!("unknown form: '{s}'"))),
        }
    }
}

impl TryFrom<String> for FormKind {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormKind> for String {
    fn from(kind: FormKind) -> String {
        kind.key().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_participle_alias() {
        assert_eq!(
            "perfect_participle".parse::<FormKind>(),
            Ok(FormKind::Perfect)
        );
        assert_eq!("perfect".parse::<FormKind>(), Ok(FormKind::Perfect));
    }

    #[test]
    fn test_unknown() {
        assert!("imperativ".parse::<FormKind>().is_err());
    }
}
