// src/sink/http.rs
use super::{Item, TableSink, value_text};
use crate::config::consts::TABLE_KEY;
use crate::core::HttpClient;
use crate::error::{Error, Result};

/// Table behind a REST endpoint: `PUT {endpoint}/{key}` with the item as body.
pub struct HttpTableSink {
    http: HttpClient,
    endpoint: String,
    key: String,
}

impl HttpTableSink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint: String = endpoint.into();
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            return Err(Error::Config(s!("table endpoint is empty")));
        }
        Ok(Self { http: HttpClient::new("table")?, endpoint, key: s!(TABLE_KEY) })
    }

    pub fn item_url(&self, item: &Item) -> Result<String> {
        let key = item
            .get(&self.key)
            .map(value_text)
            .ok_or_else(|| Error::Sink(format!("item has no '{}'", self.key)))?;
        Ok(format!("{}/{key}", self.endpoint))
    }
}

impl TableSink for HttpTableSink {
    fn key_fields(&self) -> Vec<String> {
        vec![self.key.clone()]
    }

    fn put_item(&mut self, item: &Item) -> Result<()> {
        let url = self.item_url(item)?;
        self.http.put_json(&url, item, &[])
    }
}
