// src/fetch/moralis.rs
use std::thread::sleep;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{Direction, MetadataSource, lift_fields};
use crate::config::consts::{MORALIS_BASE, MORALIS_CHAIN, REQUEST_PAUSE_MS};
use crate::core::HttpClient;
use crate::data::{DataSet, json_to_cell};
use crate::error::Result;
use crate::progress::Progress;

pub const API_KEY_ENV: &str = "MORALIS_API_KEY";

pub struct MoralisClient {
    http: HttpClient,
    api_key: String,
    pause: Duration,
}

impl MoralisClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new("moralis")?,
            api_key: api_key.into(),
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
        })
    }

    fn get(&self, url: &str) -> Result<Value> {
        self.http.get_json(url, &[("X-API-Key", self.api_key.as_str())])
    }
}

impl MetadataSource for MoralisClient {
    fn get_transfers(&self, wallet: &str, direction: Direction) -> Result<DataSet> {
        let mut objects: Vec<Map<String, Value>> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!(
                "{MORALIS_BASE}/{wallet}/nft/transfers?chain={MORALIS_CHAIN}&format=decimal&direction={}",
                direction.as_str()
            );
            if let Some(c) = &cursor {
                url.push_str("&cursor=");
                url.push_str(c);
            }

            let page = self.get(&url)?;
            let batch = page_results(&page);
            debug!(count = batch.len(), "transfer page");
            objects.extend(batch);

            cursor = page
                .get("cursor")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(String::from);
            if cursor.is_none() { break; }
            sleep(self.pause);
        }

        info!("Fetched {} transfers for {wallet}", objects.len());
        Ok(DataSet::from_objects(objects.iter()))
    }

    fn get_token_metadata(
        &self,
        contract: &str,
        ids: &[String],
        fields: &[&str],
        progress: &mut dyn Progress,
    ) -> Result<DataSet> {
        let mut headers = cols!["token_address", "token_id", "owner_of", "metadata"];
        headers.extend(fields.iter().map(|f| s!(*f)));
        let mut out = DataSet::new(headers);

        progress.begin(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if i > 0 { sleep(self.pause); }
            let url = format!("{MORALIS_BASE}/nft/{contract}/{id}?chain={MORALIS_CHAIN}&format=decimal");
            let v = self.get(&url)?;
            out.push_row(metadata_row(&v, contract, id, fields));
            progress.item_done(id);
        }
        progress.finish();
        Ok(out)
    }

    fn resync_metadata(&self, contract: &str, id: &str) -> Result<String> {
        let url = format!(
            "{MORALIS_BASE}/nft/{contract}/{id}/metadata/resync?chain={MORALIS_CHAIN}&flag=uri&mode=async"
        );
        let v = self.get(&url)?;
        Ok(match v.get("status").and_then(Value::as_str) {
            Some(status) => s!(status),
            None => v.to_string(),
        })
    }
}

fn page_results(page: &Value) -> Vec<Map<String, Value>> {
    page.get("result")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|o| o.as_object().cloned()).collect())
        .unwrap_or_default()
}

/// Moralis puts the token URI document in `metadata` as a JSON string; its top-level
/// `name` is the contract's, so display fields come from the document only.
fn metadata_row(v: &Value, contract: &str, id: &str, fields: &[&str]) -> Vec<crate::data::Cell> {
    let metadata = v.get("metadata").and_then(json_to_cell);
    let mut row = vec![
        v.get("token_address").and_then(json_to_cell).or_else(|| Some(s!(contract))),
        v.get("token_id").and_then(json_to_cell).or_else(|| Some(s!(id))),
        v.get("owner_of").and_then(json_to_cell),
    ];
    row.push(metadata.clone());
    row.extend(lift_fields(metadata.as_deref(), fields));
    row
}
