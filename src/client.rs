use std::borrow::Cow;

use crate::body::{BodyLimit, BodyOutcome, collect_body};
use crate::config::FetchConfig;
use crate::{FetchError, Result};

#[derive(Debug, Clone)]
pub struct PageClient {
    http: reqwest::Client,
    max_content: BodyLimit,
}

impl PageClient {
    /// Takes the shared connection pool. Build one `reqwest::Client` at
    /// process start and clone it into every `PageClient`.
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            max_content: BodyLimit::Bytes(crate::config::DEFAULT_MAX_CONTENT_BYTES),
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_max_content(mut self, limit: BodyLimit) -> Self {
        self.max_content = limit;
        self
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            max_content: config.body_limit(),
        })
    }

    /// Issues a GET and drains the body through the bounded collector. The
    /// status is recorded, not checked: a non-2xx body is collected the same
    /// way. Only transport errors before a response exists surface as `Err`.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let content_length = response.content_length();
        let body = collect_body(response.bytes_stream(), content_length, self.max_content).await;

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

#[derive(Debug)]
pub struct FetchedPage {
    pub url: String,
    pub status: reqwest::StatusCode,
    pub body: BodyOutcome,
}

impl FetchedPage {
    pub fn text(&self) -> Cow<'_, str> {
        self.body.text_lossy()
    }

    pub fn len(&self) -> usize {
        self.body.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.bytes().is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.body.is_truncated()
    }
}

pub fn build_http_client(config: &FetchConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .map_err(FetchError::Http)
}
