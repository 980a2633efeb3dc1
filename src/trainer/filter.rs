//! Attribute filters chosen by the player in their settings.
//!
//! AND across dimensions, OR within one dimension's allow-list.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::Item;

/// Literal accepted in allow-lists as "no restriction".
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Format,
    Stakes,
    Stage,
    Street,
    Position,
    Opponent,
    Scenario,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Format,
        Dimension::Stakes,
        Dimension::Stage,
        Dimension::Street,
        Dimension::Position,
        Dimension::Opponent,
        Dimension::Scenario,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Format => "format",
            Dimension::Stakes => "stakes",
            Dimension::Stage => "stage",
            Dimension::Street => "street",
            Dimension::Position => "position",
            Dimension::Opponent => "opponent",
            Dimension::Scenario => "scenario",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either no restriction, or a non-empty set of allowed values.
///
/// On the wire this is `null` / absent or a JSON array. Empty arrays and
/// arrays containing `"all"` collapse to [`DimensionFilter::Any`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum DimensionFilter {
    #[default]
    Any,
    OneOf(BTreeSet<String>),
}

impl DimensionFilter {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = BTreeSet::new();
        for value in values {
            let value = value.as_ref().trim().to_ascii_lowercase();
            if value == ALL_SENTINEL {
                return DimensionFilter::Any;
            }
            if !value.is_empty() {
                allowed.insert(value);
            }
        }

        if allowed.is_empty() {
            DimensionFilter::Any
        } else {
            DimensionFilter::OneOf(allowed)
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, DimensionFilter::Any)
    }

    /// A missing attribute only passes an unrestricted dimension.
    pub fn admits(&self, value: Option<&str>) -> bool {
        match self {
            DimensionFilter::Any => true,
            DimensionFilter::OneOf(allowed) => value.is_some_and(|v| allowed.contains(v)),
        }
    }
}

impl From<Option<Vec<String>>> for DimensionFilter {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            None => DimensionFilter::Any,
            Some(values) => DimensionFilter::one_of(values),
        }
    }
}

impl From<DimensionFilter> for Option<Vec<String>> {
    fn from(value: DimensionFilter) -> Self {
        match value {
            DimensionFilter::Any => None,
            DimensionFilter::OneOf(allowed) => Some(allowed.into_iter().collect()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    pub format: DimensionFilter,
    pub stakes: DimensionFilter,
    pub stage: DimensionFilter,
    pub street: DimensionFilter,
    pub position: DimensionFilter,
    pub opponent: DimensionFilter,
    pub scenario: DimensionFilter,
}

impl FilterSpec {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn dimension(&self, dimension: Dimension) -> &DimensionFilter {
        match dimension {
            Dimension::Format => &self.format,
            Dimension::Stakes => &self.stakes,
            Dimension::Stage => &self.stage,
            Dimension::Street => &self.street,
            Dimension::Position => &self.position,
            Dimension::Opponent => &self.opponent,
            Dimension::Scenario => &self.scenario,
        }
    }

    pub fn with(mut self, dimension: Dimension, filter: DimensionFilter) -> Self {
        let slot = match dimension {
            Dimension::Format => &mut self.format,
            Dimension::Stakes => &mut self.stakes,
            Dimension::Stage => &mut self.stage,
            Dimension::Street => &mut self.street,
            Dimension::Position => &mut self.position,
            Dimension::Opponent => &mut self.opponent,
            Dimension::Scenario => &mut self.scenario,
        };
        *slot = filter;
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.dimension(*d).is_any())
    }

    pub fn matches(&self, item: &Item) -> bool {
        Dimension::ALL
            .iter()
            .all(|d| self.dimension(*d).admits(item.attributes.get(*d)))
    }
}

pub fn filter_by_attributes<'a>(items: &'a [Item], spec: &FilterSpec) -> Vec<&'a Item> {
    items.iter().filter(|item| spec.matches(item)).collect()
}
