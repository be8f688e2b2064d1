// src/core/net.rs

// Blocking HTTP with a shared client. Non-success statuses become Error::Api.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    provider: &'static str,
}

impl HttpClient {
    /// `provider` names the remote side in error messages ("moralis", "opensea").
    pub fn new(provider: &'static str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, provider })
    }

    /// GET `url` with extra `headers`, parse the body as JSON.
    pub fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<Value> {
        let resp = self.send(self.client.get(url), url, headers)?;
        Ok(resp.json()?)
    }

    pub fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        let resp = self.send(self.client.get(url), url, headers)?;
        Ok(resp.text()?)
    }

    /// PUT a JSON body; the response body is discarded.
    pub fn put_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        headers: &[(&str, &str)],
    ) -> Result<()> {
        self.send(self.client.put(url).json(body), url, headers)?;
        Ok(())
    }

    fn send(&self, mut req: RequestBuilder, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        for (k, v) in headers {
            req = req.header(*k, *v);
        }
        debug!(provider = self.provider, %url, "request");
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::Api {
                provider: self.provider,
                status: status.as_u16(),
                url: s!(url),
                body: clip_body(&body),
            });
        }
        Ok(resp)
    }
}

/// Keep error messages readable when a provider answers with a full HTML page.
fn clip_body(body: &str) -> String {
    const MAX: usize = 300;
    if body.chars().count() <= MAX {
        s!(body)
    } else {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    }
}
