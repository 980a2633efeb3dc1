//! Read-only puzzle corpus: schema, loading and ingestion-time validation.
//!
//! Malformed items are rejected here so the rating engine and the selector can
//! assume every item has four choices with exactly one `best`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_ITEM_DIFFICULTY, MIN_ITEM_DIFFICULTY};
use crate::trainer::filter::Dimension;
use crate::trainer::grade::QualityGrade;

pub const CHOICES_PER_ITEM: usize = 4;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse corpus: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("item {item_id}: {reason}")]
    InvalidItem { item_id: u32, reason: String },
    #[error("corpus contains no valid items")]
    EmptyCorpus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub format: String,
    #[serde(default)]
    pub stakes: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    pub street: String,
    pub position: String,
    pub opponent: String,
    pub scenario: String,
}

impl Attributes {
    pub fn get(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Format => Some(self.format.as_str()),
            Dimension::Stakes => self.stakes.as_deref(),
            Dimension::Stage => self.stage.as_deref(),
            Dimension::Street => Some(self.street.as_str()),
            Dimension::Position => Some(self.position.as_str()),
            Dimension::Opponent => Some(self.opponent.as_str()),
            Dimension::Scenario => Some(self.scenario.as_str()),
        }
    }

    fn normalize(&mut self) {
        fn norm(value: &mut String) {
            *value = value.trim().to_ascii_lowercase();
        }
        norm(&mut self.format);
        norm(&mut self.street);
        norm(&mut self.position);
        norm(&mut self.opponent);
        norm(&mut self.scenario);
        for optional in [&mut self.stakes, &mut self.stage] {
            if let Some(value) = optional.as_mut() {
                norm(value);
            }
            if optional.as_deref() == Some("") {
                *optional = None;
            }
        }
    }
}

/// Display-only description of the table situation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    pub position: String,
    pub stack_size: String,
    pub blinds: String,
    pub action: String,
    pub hand: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub text: String,
    pub quality: QualityGrade,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    pub title: String,
    pub difficulty_rating: i32,
    pub attributes: Attributes,
    #[serde(default)]
    pub scenario: Scenario,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(choice_id))
    }

    pub fn best_choice(&self) -> Option<&Choice> {
        self.choices.iter().find(|c| c.quality.is_best())
    }
}

/// Checks the corpus invariants for a single item.
pub fn validate_item(item: &Item) -> Result<(), CorpusError> {
    let invalid = |reason: String| CorpusError::InvalidItem {
        item_id: item.id,
        reason,
    };

    if item.title.trim().is_empty() {
        return Err(invalid("title is empty".to_string()));
    }
    if !(MIN_ITEM_DIFFICULTY..=MAX_ITEM_DIFFICULTY).contains(&item.difficulty_rating) {
        return Err(invalid(format!(
            "difficultyRating {} outside [{MIN_ITEM_DIFFICULTY}, {MAX_ITEM_DIFFICULTY}]",
            item.difficulty_rating
        )));
    }

    let attrs = &item.attributes;
    for (name, value) in [
        ("format", &attrs.format),
        ("street", &attrs.street),
        ("position", &attrs.position),
        ("opponent", &attrs.opponent),
        ("scenario", &attrs.scenario),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(format!("attribute {name} is empty")));
        }
    }

    if item.choices.len() != CHOICES_PER_ITEM {
        return Err(invalid(format!(
            "expected {CHOICES_PER_ITEM} choices, found {}",
            item.choices.len()
        )));
    }

    let mut seen = HashSet::with_capacity(CHOICES_PER_ITEM);
    for choice in &item.choices {
        let key = choice.id.trim().to_ascii_uppercase();
        if key.is_empty() {
            return Err(invalid("choice with empty id".to_string()));
        }
        if !seen.insert(key) {
            return Err(invalid(format!("duplicate choice id {}", choice.id)));
        }
        if choice.text.trim().is_empty() {
            return Err(invalid(format!("choice {} has no text", choice.id)));
        }
    }

    let best_count = item.choices.iter().filter(|c| c.quality.is_best()).count();
    if best_count != 1 {
        return Err(invalid(format!(
            "expected exactly one best choice, found {best_count}"
        )));
    }

    Ok(())
}

/// Normalizes attribute values, then validates. Used for both the bundled
/// corpus and drafts submitted for review.
pub fn prepare_item(mut item: Item) -> Result<Item, CorpusError> {
    item.attributes.normalize();
    validate_item(&item)?;
    Ok(item)
}

/// An item dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    pub item_id: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    items: Vec<Item>,
    index: HashMap<u32, usize>,
}

impl Corpus {
    /// Keeps valid items in input order. Invalid items and repeated ids are
    /// dropped and reported, never fatal.
    pub fn from_items(items: Vec<Item>) -> (Self, Vec<Rejection>) {
        let mut accepted = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());
        let mut rejections = Vec::new();

        for item in items {
            let item_id = item.id;
            let item = match prepare_item(item) {
                Ok(item) => item,
                Err(err) => {
                    let reason = match err {
                        CorpusError::InvalidItem { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    tracing::warn!(item_id, reason = %reason, "Rejected corpus item");
                    rejections.push(Rejection { item_id, reason });
                    continue;
                }
            };

            if index.contains_key(&item.id) {
                tracing::warn!(item_id = item.id, "Rejected duplicate corpus item id");
                rejections.push(Rejection {
                    item_id: item.id,
                    reason: "duplicate id".to_string(),
                });
                continue;
            }

            index.insert(item.id, accepted.len());
            accepted.push(item);
        }

        (
            Self {
                items: accepted,
                index,
            },
            rejections,
        )
    }

    pub fn from_json(raw: &str) -> Result<(Self, Vec<Rejection>), CorpusError> {
        let items: Vec<Item> = serde_json::from_str(raw)?;
        let (corpus, rejections) = Self::from_items(items);
        if corpus.is_empty() {
            return Err(CorpusError::EmptyCorpus);
        }
        Ok((corpus, rejections))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<(Self, Vec<Rejection>), CorpusError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let (corpus, rejections) = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            items = corpus.len(),
            rejected = rejections.len(),
            "Corpus loaded"
        );
        Ok((corpus, rejections))
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        self.index.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
