use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::Revalidating;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::model::{parse_catalog, ModelDescriptor};
use crate::session::{Action, Session};

/// Client for the gateway's model listing.
///
/// [`GatewayClient::fetch_catalog`] is the single fetch primitive. The two
/// call sites on top of it differ only in failure policy:
/// [`GatewayClient::initial_load`] degrades silently to `None`, while
/// [`GatewayClient::reload`] records the failure in the session so it can be
/// shown with a retry.
pub struct GatewayClient {
    http: Client,
    endpoint: String,
    initial: Mutex<Revalidating>,
}

impl GatewayClient {
    pub fn new(endpoint: impl Into<String>, revalidate: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("gateway-models/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            initial: Mutex::new(Revalidating::new(revalidate)),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.revalidate_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One GET against the models endpoint. A missing or null `data` field
    /// is an empty catalog.
    pub async fn fetch_catalog(&self) -> Result<Vec<ModelDescriptor>> {
        debug!(endpoint = %self.endpoint, "fetching model catalog");
        let resp = self.http.get(&self.endpoint).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let body = resp.bytes().await?;
        let models = parse_catalog(&body)?;
        debug!(count = models.len(), "model catalog fetched");
        Ok(models)
    }

    /// Startup fetch. Reuses the last result inside the revalidation window;
    /// any failure becomes `None`.
    pub async fn initial_load(&self) -> Option<Vec<ModelDescriptor>> {
        let mut cache = self.initial.lock().await;
        if let Some(models) = cache.fresh(Instant::now()) {
            debug!(count = models.len(), "reusing catalog inside revalidation window");
            return Some(models.to_vec());
        }
        match self.fetch_catalog().await {
            Ok(models) => {
                cache.store(Instant::now(), models.clone());
                Some(models)
            }
            Err(e) => {
                debug!(error = %e, "initial load failed");
                None
            }
        }
    }

    /// Interactive fetch. Always hits the network; failures land in
    /// `session` as a visible error.
    pub async fn reload(&self, session: &mut Session) {
        session.dispatch(Action::FetchStarted);
        match self.fetch_catalog().await {
            Ok(models) => session.dispatch(Action::FetchSucceeded(models)),
            Err(e) => session.dispatch(Action::FetchFailed(e.to_string())),
        }
    }

    /// Populate a fresh session: initial load first, falling back to
    /// [`GatewayClient::reload`]. The session stays `Loading` across the
    /// fallback.
    pub async fn open(&self, session: &mut Session) {
        session.dispatch(Action::FetchStarted);
        match self.initial_load().await {
            Some(models) => session.dispatch(Action::FetchSucceeded(models)),
            None => {
                debug!("falling back to interactive reload");
                self.reload(session).await;
            }
        }
    }
}
