use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CatalogError, TrainerError};

static TEXTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/texts");

const BUILTIN_CATALOG: &str = "builtin.json";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Swedish,
    English,
}

impl Language {
    /// The other supported language, used by the language toggle.
    pub fn toggled(self) -> Self {
        match self {
            Language::Swedish => Language::English,
            Language::English => Language::Swedish,
        }
    }
}

/// A single practice text with per-language titles and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeText {
    pub author: String,
    pub language: Language,
    #[serde(default)]
    pub title: BTreeMap<Language, String>,
    #[serde(default)]
    pub content: BTreeMap<Language, String>,
}

impl PracticeText {
    pub fn new(author: impl Into<String>, language: Language) -> Self {
        Self {
            author: author.into(),
            language,
            title: BTreeMap::new(),
            content: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, language: Language, title: impl Into<String>) -> Self {
        self.title.insert(language, title.into());
        self
    }

    pub fn with_content(mut self, language: Language, content: impl Into<String>) -> Self {
        self.content.insert(language, content.into());
        self
    }

    /// Title in `language`, falling back to the text's own language and then
    /// to any title at all.
    pub fn title(&self, language: Language) -> &str {
        pick(&self.title, language, self.language)
    }

    /// Content in `language`, with the same fallback order as [`Self::title`].
    pub fn content(&self, language: Language) -> &str {
        pick(&self.content, language, self.language)
    }

    pub fn word_count(&self, language: Language) -> usize {
        self.content(language).split_whitespace().count()
    }

    pub fn char_count(&self, language: Language) -> usize {
        self.content(language).chars().count()
    }

    /// Loader contract: non-empty author, a title, and content in at least
    /// one language.
    pub fn is_valid(&self) -> bool {
        !self.author.trim().is_empty()
            && self.title.values().any(|t| !t.trim().is_empty())
            && self.content.values().any(|c| !c.is_empty())
    }
}

fn pick(map: &BTreeMap<Language, String>, wanted: Language, native: Language) -> &str {
    map.get(&wanted)
        .filter(|s| !s.is_empty())
        .or_else(|| map.get(&native).filter(|s| !s.is_empty()))
        .or_else(|| map.values().find(|s| !s.is_empty()))
        .map(String::as_str)
        .unwrap_or("")
}

/// Ordered, immutable collection of practice texts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    texts: Vec<PracticeText>,
}

impl Catalog {
    /// Builds a catalog, dropping records that break the loader contract.
    pub fn new(texts: Vec<PracticeText>) -> Self {
        let texts = texts
            .into_iter()
            .enumerate()
            .filter_map(|(idx, text)| {
                if text.is_valid() {
                    Some(text)
                } else {
                    warn!(record = idx, author = %text.author, "skipping invalid practice text");
                    None
                }
            })
            .collect::<Vec<_>>();
        debug!(count = texts.len(), "catalog ready");
        Self { texts }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let texts: Vec<PracticeText> = serde_json::from_str(json)?;
        Ok(Self::new(texts))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading catalog");
        Self::from_json_str(&data)
    }

    /// The catalog shipped inside the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let json = TEXTS_DIR
            .get_file(BUILTIN_CATALOG)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| CatalogError::Embedded(BUILTIN_CATALOG.to_string()))?;
        Self::from_json_str(json)
    }

    pub fn get(&self, index: usize) -> Result<&PracticeText, TrainerError> {
        self.texts
            .get(index)
            .ok_or(TrainerError::IndexOutOfRange {
                index,
                len: self.texts.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PracticeText> {
        self.texts.iter()
    }
}
