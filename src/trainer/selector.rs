//! Next-puzzle selection: filter, then walk a fixed fallback ladder.
//!
//! 1. on-level and unseen
//! 2. any unseen
//! 3. anything that passes the filters (repeats allowed)
//! 4. nothing passes the filters: [`Selection::NoMatch`]

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;

use crate::corpus::Item;
use crate::trainer::config::SelectorConfig;
use crate::trainer::filter::{filter_by_attributes, FilterSpec};

/// Source of uniform choices; injected so tests can use a seeded generator.
pub trait UniformPick {
    /// Returns an index in `0..len`. Never called with `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<R: Rng> UniformPick for R {
    fn pick_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionStage {
    OnLevel,
    Unseen,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Picked {
        item: &'a Item,
        stage: SelectionStage,
    },
    NoMatch,
}

impl<'a> Selection<'a> {
    pub fn item(&self) -> Option<&'a Item> {
        match self {
            Selection::Picked { item, .. } => Some(item),
            Selection::NoMatch => None,
        }
    }
}

/// Inclusive difficulty bounds around a player rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyWindow {
    pub min: i32,
    pub max: i32,
}

impl DifficultyWindow {
    pub fn around(player_rating: i32, config: &SelectorConfig) -> Self {
        Self {
            min: player_rating.saturating_sub(config.lower_slack),
            max: player_rating.saturating_add(config.upper_slack),
        }
    }

    pub fn contains(&self, difficulty: i32) -> bool {
        (self.min..=self.max).contains(&difficulty)
    }
}

fn pick<'a, P: UniformPick + ?Sized>(candidates: &[&'a Item], rng: &mut P) -> &'a Item {
    candidates[rng.pick_index(candidates.len())]
}

pub fn select_next<'a, P: UniformPick + ?Sized>(
    items: &'a [Item],
    spec: &FilterSpec,
    player_rating: i32,
    completed: &BTreeSet<u32>,
    config: &SelectorConfig,
    rng: &mut P,
) -> Selection<'a> {
    let filtered = filter_by_attributes(items, spec);
    if filtered.is_empty() {
        tracing::debug!("No corpus item satisfies the filter spec");
        return Selection::NoMatch;
    }

    let window = DifficultyWindow::around(player_rating, config);
    let unseen: Vec<&Item> = filtered
        .iter()
        .copied()
        .filter(|item| !completed.contains(&item.id))
        .collect();

    let on_level: Vec<&Item> = unseen
        .iter()
        .copied()
        .filter(|item| window.contains(item.difficulty_rating))
        .collect();

    let (candidates, stage) = if !on_level.is_empty() {
        (on_level, SelectionStage::OnLevel)
    } else if !unseen.is_empty() {
        (unseen, SelectionStage::Unseen)
    } else {
        (filtered, SelectionStage::Repeat)
    };

    tracing::debug!(
        ?stage,
        candidates = candidates.len(),
        window_min = window.min,
        window_max = window.max,
        "Selecting next item"
    );

    Selection::Picked {
        item: pick(&candidates, rng),
        stage,
    }
}
