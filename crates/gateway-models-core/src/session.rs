use serde::Serialize;

use crate::filter::{filter_catalog, unique_providers, FilterState, ViewMode};
use crate::model::ModelDescriptor;

/// Fetched models plus the status of the most recent fetch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogState {
    pub models: Vec<ModelDescriptor>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Everything that can change a [`Session`].
#[derive(Debug, Clone)]
pub enum Action {
    FetchStarted,
    FetchSucceeded(Vec<ModelDescriptor>),
    FetchFailed(String),
    SetSearch(String),
    SetProvider(String),
    SetFreeOnly(bool),
    ToggleFreeOnly,
    SetViewMode(ViewMode),
    ClearFilters,
}

/// What the presentation layer should draw.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ViewState<'a> {
    Loading,
    Error { message: String },
    Empty { has_filters: bool },
    Models { models: Vec<&'a ModelDescriptor> },
}

/// One browsing session. All mutation goes through [`Session::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    catalog: CatalogState,
    filter: FilterState,
}

impl Session {
    pub fn new(filter: FilterState) -> Self {
        Self {
            catalog: CatalogState::default(),
            filter,
        }
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::FetchStarted => {
                self.catalog.loading = true;
                self.catalog.error = None;
            }
            Action::FetchSucceeded(models) => {
                self.catalog.models = models;
                self.catalog.loading = false;
                self.catalog.error = None;
            }
            Action::FetchFailed(message) => {
                self.catalog.loading = false;
                self.catalog.error = Some(message);
            }
            Action::SetSearch(text) => self.filter.search_text = text,
            Action::SetProvider(provider) => self.filter.selected_provider = provider,
            Action::SetFreeOnly(on) => self.filter.free_only = on,
            Action::ToggleFreeOnly => self.filter.free_only = !self.filter.free_only,
            Action::SetViewMode(mode) => self.filter.view_mode = mode,
            Action::ClearFilters => {
                self.filter = FilterState {
                    view_mode: self.filter.view_mode,
                    ..FilterState::default()
                };
            }
        }
    }

    pub fn providers(&self) -> Vec<String> {
        unique_providers(&self.catalog.models)
    }

    pub fn visible(&self) -> Vec<&ModelDescriptor> {
        filter_catalog(&self.catalog.models, &self.filter)
    }

    /// Loading wins over error, error over empty.
    pub fn view_state(&self) -> ViewState<'_> {
        if self.catalog.loading {
            return ViewState::Loading;
        }
        if let Some(ref message) = self.catalog.error {
            return ViewState::Error {
                message: message.clone(),
            };
        }
        let models = self.visible();
        if models.is_empty() {
            ViewState::Empty {
                has_filters: self.filter.has_filters(),
            }
        } else {
            ViewState::Models { models }
        }
    }

    /// Next provider in `["", p0, p1, ...]`, wrapping. `back` walks the other way.
    pub fn cycle_provider(&self, back: bool) -> String {
        let mut options = vec![String::new()];
        options.extend(self.providers());
        let pos = options
            .iter()
            .position(|p| *p == self.filter.selected_provider)
            .unwrap_or(0);
        let next = if back {
            (pos + options.len() - 1) % options.len()
        } else {
            (pos + 1) % options.len()
        };
        options.swap_remove(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn models() -> Vec<ModelDescriptor> {
        serde_json::from_value(json!([
            {"id": "openai/gpt-4", "name": "GPT-4"},
            {"id": "meta/llama-3", "name": "Llama 3"}
        ]))
        .unwrap()
    }

    #[test]
    fn starts_idle() {
        let s = Session::default();
        assert!(!s.catalog().loading);
        assert!(s.catalog().error.is_none());
        assert!(matches!(s.view_state(), ViewState::Empty { has_filters: false }));
    }

    #[test]
    fn fetch_lifecycle() {
        let mut s = Session::default();
        s.dispatch(Action::FetchStarted);
        assert!(matches!(s.view_state(), ViewState::Loading));

        s.dispatch(Action::FetchFailed("HTTP 503: Service Unavailable".into()));
        match s.view_state() {
            ViewState::Error { message } => assert!(message.contains("503")),
            other => panic!("expected error, got {other:?}"),
        }

        s.dispatch(Action::FetchStarted);
        assert!(s.catalog().error.is_none());
        s.dispatch(Action::FetchSucceeded(models()));
        match s.view_state() {
            ViewState::Models { models } => assert_eq!(models.len(), 2),
            other => panic!("expected models, got {other:?}"),
        }
    }

    #[test]
    fn empty_distinguishes_filters() {
        let mut s = Session::default();
        s.dispatch(Action::FetchSucceeded(models()));
        s.dispatch(Action::SetSearch("nothing-matches".into()));
        assert!(matches!(s.view_state(), ViewState::Empty { has_filters: true }));
    }

    #[test]
    fn clear_filters_keeps_view_mode() {
        let mut s = Session::default();
        s.dispatch(Action::SetViewMode(ViewMode::List));
        s.dispatch(Action::SetSearch("gpt".into()));
        s.dispatch(Action::ToggleFreeOnly);
        s.dispatch(Action::ClearFilters);
        assert!(!s.filter().has_filters());
        assert_eq!(s.filter().view_mode, ViewMode::List);
    }

    #[test]
    fn provider_cycle_wraps_through_all() {
        let mut s = Session::default();
        s.dispatch(Action::FetchSucceeded(models()));
        assert_eq!(s.cycle_provider(false), "meta");
        s.dispatch(Action::SetProvider("meta".into()));
        assert_eq!(s.cycle_provider(false), "openai");
        s.dispatch(Action::SetProvider("openai".into()));
        assert_eq!(s.cycle_provider(false), "");
        assert_eq!(s.cycle_provider(true), "meta");
        s.dispatch(Action::SetProvider(String::new()));
        assert_eq!(s.cycle_provider(true), "openai");
    }
}
