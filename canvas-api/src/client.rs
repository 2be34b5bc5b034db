use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, OnceCell};
use tower::{Service, ServiceExt};
use tracing::{debug, info};
use url::Url;

use crate::config::Config;
use crate::response::check_status;
use crate::services::canvas_service::{self, BoxCanvasService, CanvasRequest};
use crate::util::api_url;

/// A client for one user's view of the Canvas REST API.
///
/// Creating a client does no I/O. The authenticated HTTP session is built on the first request and
/// reused for every request after that.
#[derive(Debug)]
pub struct Client {
    config: Config,
    session: OnceCell<Mutex<BoxCanvasService>>,
}

impl Client {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn session(&self) -> Result<&Mutex<BoxCanvasService>> {
        self.session
            .get_or_try_init(|| async {
                info!(base_url = %self.config.base_url(), "opening Canvas session");
                anyhow::Ok(Mutex::new(canvas_service::service(&self.config)?))
            })
            .await
    }

    pub(crate) fn api_url(&self, path: &str) -> Result<Url> {
        api_url(self.config.base_url(), path)
    }

    /// Sends a request without looking at the response status.
    #[tracing::instrument(level = "debug", skip(self, request), fields(url = %request.url()))]
    pub(crate) async fn send(&self, request: CanvasRequest) -> Result<Response> {
        let mut service = self.session().await?.lock().await;
        let response = service.ready().await?.call(request).await?;
        debug!(status = %response.status(), "Canvas responded");
        Ok(response)
    }

    pub(crate) async fn get(&self, url: Url) -> Result<Response> {
        let response = self.send(CanvasRequest::get(url)).await?;
        check_status(response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.get(url.clone()).await?;
        response
            .json()
            .await
            .with_context(|| format!("could not decode response from {url}"))
    }

    /// Like [`Client::get_json`], but a 404 means "there is nothing there" rather than an error.
    pub(crate) async fn get_json_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let response = self.send(CanvasRequest::get(url.clone())).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%url, "not found");
            return Ok(None);
        }

        let response = check_status(response).await?;
        let value = response
            .json()
            .await
            .with_context(|| format!("could not decode response from {url}"))?;
        Ok(Some(value))
    }
}
