#[cfg(feature = "network")]
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod model;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::CatalogError;
pub use filter::{filter_catalog, unique_providers, FilterState, ViewMode};
pub use model::{Modality, ModelDescriptor};
pub use session::{Action, CatalogState, Session, ViewState};
