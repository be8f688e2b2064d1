// src/fetch/opensea.rs
use std::thread::sleep;
use std::time::Duration;

use serde_json::Value;

use super::{MarketplaceSource, lift_fields};
use crate::config::consts::{METADATA_FIELDS, OPENSEA_METADATA_BASE, REQUEST_PAUSE_MS};
use crate::core::HttpClient;
use crate::data::{Cell, DataSet};
use crate::error::Result;
use crate::progress::Progress;

pub const API_KEY_ENV: &str = "OPENSEA_API_KEY";

/// Token metadata OpenSea serves for items it only knows off-chain
/// (lazily minted storefront tokens).
pub struct OpenSeaClient {
    http: HttpClient,
    api_key: Option<String>,
    pause: Duration,
}

impl OpenSeaClient {
    /// An empty key counts as absent.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("opensea")?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
        })
    }
}

impl MarketplaceSource for OpenSeaClient {
    fn get_tokens_metadata(
        &self,
        contract: &str,
        ids: &[String],
        progress: &mut dyn Progress,
    ) -> Result<DataSet> {
        let mut headers = cols!["token_address", "token_id", "metadata"];
        headers.extend(METADATA_FIELDS.iter().map(|f| s!(*f)));
        let mut out = DataSet::new(headers);

        let headers: Vec<(&str, &str)> = match &self.api_key {
            Some(k) => vec![("X-API-KEY", k.as_str())],
            None => Vec::new(),
        };

        progress.begin(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if i > 0 { sleep(self.pause); }
            let url = format!("{OPENSEA_METADATA_BASE}/{contract}/{id}");
            let v = self.http.get_json(&url, &headers)?;
            out.push_row(marketplace_row(&v, contract, id));
            progress.item_done(id);
        }
        progress.finish();
        Ok(out)
    }
}

/// The whole response is the metadata document; keep it verbatim in `metadata`.
fn marketplace_row(v: &Value, contract: &str, id: &str) -> Vec<Cell> {
    let text = v.to_string();
    let mut row = vec![Some(s!(contract)), Some(s!(id))];
    row.push(if v.is_null() { None } else { Some(text.clone()) });
    row.extend(lift_fields(Some(text.as_str()), &METADATA_FIELDS));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_key_is_no_key() {
        assert!(OpenSeaClient::new(Some(s!("  "))).unwrap().api_key.is_none());
        assert_eq!(OpenSeaClient::new(Some(s!("k"))).unwrap().api_key.as_deref(), Some("k"));
    }

    #[test]
    fn marketplace_row_keeps_document_and_fields() {
        let v = json!({
            "name": "Affe mit Waffe #500",
            "description": "Story",
            "image": "https://img/500.png",
            "external_link": null,
            "attributes": []
        });
        let row = marketplace_row(&v, "0xabc", "500");
        assert_eq!(row.len(), 3 + METADATA_FIELDS.len());
        assert_eq!(row[1].as_deref(), Some("500"));
        assert!(row[2].as_deref().unwrap().contains("attributes"));
        assert_eq!(row[3].as_deref(), Some("Affe mit Waffe #500"));
        assert_eq!(row[6], None);
        assert_eq!(row[7], None);
    }
}
