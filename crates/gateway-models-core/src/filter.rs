use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ModelDescriptor;
use crate::provider::derive_provider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

/// User-controlled browsing filters. `view_mode` does not affect filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search_text: String,
    /// Empty means "all providers".
    pub selected_provider: String,
    pub free_only: bool,
    pub view_mode: ViewMode,
}

impl FilterState {
    pub fn has_filters(&self) -> bool {
        !self.search_text.is_empty() || !self.selected_provider.is_empty() || self.free_only
    }

    /// True if `model` passes all three predicates.
    pub fn matches(&self, model: &ModelDescriptor) -> bool {
        let needle = self.search_text.to_lowercase();
        self.matches_with(model, &needle)
    }

    fn matches_with(&self, model: &ModelDescriptor, needle: &str) -> bool {
        let search_ok = needle.is_empty() || model.matches_search(needle);
        let provider_ok = self.selected_provider.is_empty()
            || derive_provider(&model.id) == self.selected_provider;
        let free_ok = !self.free_only || model.is_free();
        search_ok && provider_ok && free_ok
    }
}

/// Models passing every active filter, in input order.
pub fn filter_catalog<'a>(
    models: &'a [ModelDescriptor],
    state: &FilterState,
) -> Vec<&'a ModelDescriptor> {
    let needle = state.search_text.to_lowercase();
    models
        .iter()
        .filter(|m| state.matches_with(m, &needle))
        .collect()
}

/// Distinct provider slugs, sorted ascending.
pub fn unique_providers(models: &[ModelDescriptor]) -> Vec<String> {
    provider_counts(models).into_iter().map(|(p, _)| p).collect()
}

/// Number of models per provider slug, sorted by slug.
pub fn provider_counts(models: &[ModelDescriptor]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for m in models {
        *counts.entry(derive_provider(&m.id)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(p, n)| (p.to_string(), n))
        .collect()
}
