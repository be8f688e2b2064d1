// src/fetch/scrape.rs
use std::thread::sleep;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::PropertyScraper;
use crate::config::consts::{OPENSEA_ASSET_BASE, SCRAPE_PAUSE_MS};
use crate::core::HttpClient;
use crate::core::html::PropertySelectors;
use crate::data::DataSet;
use crate::error::{Error, Result};
use crate::progress::Progress;

/// Reads the property panels off OpenSea asset pages. Some attributes
/// (SPECIAL ABILITY, Damage, ...) exist only there.
pub struct OpenSeaScraper {
    pause: Duration,
    session: Option<Session>,
}

struct Session {
    http: HttpClient,
    selectors: PropertySelectors,
}

impl OpenSeaScraper {
    pub fn new() -> Self {
        Self {
            pause: Duration::from_millis(SCRAPE_PAUSE_MS),
            session: None,
        }
    }
}

impl Default for OpenSeaScraper {
    fn default() -> Self { Self::new() }
}

impl PropertyScraper for OpenSeaScraper {
    fn start(&mut self) -> Result<()> {
        if self.session.is_none() {
            self.session = Some(Session {
                http: HttpClient::new("opensea-web")?,
                selectors: PropertySelectors::new()?,
            });
            info!("Scrape session started");
        }
        Ok(())
    }

    fn get_properties(
        &mut self,
        contract: &str,
        ids: &[String],
        progress: &mut dyn Progress,
    ) -> Result<DataSet> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| Error::Config(s!("scraper used before start()")))?;

        let mut objects: Vec<Map<String, Value>> = Vec::with_capacity(ids.len());
        progress.begin(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if i > 0 { sleep(self.pause); }
            let url = format!("{OPENSEA_ASSET_BASE}/{contract}/{id}");
            let page = session.http.get_text(&url, &[])?;
            let props = session.selectors.extract(&page);
            debug!(token_id = %id, found = props.len(), "properties");
            objects.push(properties_object(id, props));
            progress.item_done(id);
        }
        progress.finish();

        Ok(DataSet::from_objects(objects.iter()))
    }

    fn stop(&mut self) {
        if self.session.take().is_some() {
            info!("Scrape session stopped");
        }
    }
}

/// `token_id` first, then properties in page order. A property repeated on
/// the page keeps its first value.
fn properties_object(id: &str, props: Vec<(String, String)>) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert(s!("token_id"), Value::String(s!(id)));
    for (name, value) in props {
        if name == "token_id" || obj.contains_key(&name) { continue; }
        obj.insert(name, Value::String(value));
    }
    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    #[test]
    fn properties_without_start_is_an_error() {
        let mut sc = OpenSeaScraper::new();
        let err = sc.get_properties("0xabc", &[s!("1")], &mut NullProgress);
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn properties_object_keeps_first_value() {
        let obj = properties_object(
            "9",
            vec![(s!("HAT"), s!("Top Hat")), (s!("HAT"), s!("Bowler")), (s!("PET"), s!("3 of 5"))],
        );
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["token_id", "HAT", "PET"]);
        assert_eq!(obj["HAT"], "Top Hat");
    }
}
