use anyhow::{Context, Result, bail};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use tower::util::BoxService;
use tower::{ServiceBuilder, ServiceExt};
use url::Url;

use crate::config::Config;

/// Specialized HTTP client for talking to Canvas as one user. Responsible for attaching the bearer
/// credential and executing requests one at a time, but nothing at a higher level, including
/// pagination and abstracting specific requests for resources.
pub fn service(config: &Config) -> Result<BoxCanvasService> {
    let http_client = http_client(config)?;

    Ok(ServiceBuilder::new()
        .concurrency_limit(1)
        .map_request(move |request: CanvasRequest| request.request_builder(&http_client))
        .map_err(|err: reqwest::Error| anyhow::Error::new(err).context("Canvas request failed"))
        .service_fn(|request_builder: RequestBuilder| request_builder.send())
        .boxed())
}

pub type BoxCanvasService = BoxService<CanvasRequest, Response, anyhow::Error>;

#[derive(Debug, Clone)]
pub struct CanvasRequest {
    method: Method,
    url: Url,
}

impl CanvasRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn request_builder(&self, http_client: &HttpClient) -> RequestBuilder {
        http_client.request(self.method.clone(), self.url.clone())
    }
}

pub(crate) fn http_client(config: &Config) -> Result<HttpClient> {
    if config.token().is_blank() {
        bail!("no Canvas access token configured; set CANVAS_TOKEN");
    }

    let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.token().as_str()))
        .context("Canvas access token is not a valid header value")?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = HttpClient::builder()
        .default_headers(headers)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(config.timeout())
        .build()?;

    Ok(client)
}
