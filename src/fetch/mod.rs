// src/fetch/mod.rs
//
// Data providers. Every fetcher returns a DataSet with a `token_id` column
// (transfers also carry `token_address`, `from_address`, `to_address`).
//
// - MetadataSource:    on-chain transfers and token metadata (Moralis).
// - MarketplaceSource: token metadata the marketplace keeps off-chain (OpenSea).
// - PropertyScraper:   attributes only shown on the marketplace asset page.

pub mod moralis;
pub mod opensea;
pub mod scrape;

use crate::data::DataSet;
use crate::error::Result;
use crate::progress::Progress;

pub use moralis::MoralisClient;
pub use opensea::OpenSeaClient;
pub use scrape::OpenSeaScraper;

/// Which side of a transfer the wallet is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    To,
    From,
    Both,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::To => "to",
            Direction::From => "from",
            Direction::Both => "both",
        }
    }
}

pub trait MetadataSource {
    /// All NFT transfers involving `wallet`, across every contract.
    fn get_transfers(&self, wallet: &str, direction: Direction) -> Result<DataSet>;

    /// One row per id: `token_address`, `token_id`, `owner_of`, the raw
    /// `metadata` JSON text (null when the provider has none), then `fields`
    /// lifted out of that JSON.
    fn get_token_metadata(
        &self,
        contract: &str,
        ids: &[String],
        fields: &[&str],
        progress: &mut dyn Progress,
    ) -> Result<DataSet>;

    /// Ask the provider to re-read the token URI. Returns its acknowledgement.
    fn resync_metadata(&self, contract: &str, id: &str) -> Result<String>;
}

pub trait MarketplaceSource {
    /// Same row shape as `MetadataSource::get_token_metadata` for the standard
    /// metadata fields.
    fn get_tokens_metadata(
        &self,
        contract: &str,
        ids: &[String],
        progress: &mut dyn Progress,
    ) -> Result<DataSet>;
}

/// Session-bracketed page scraper: `start`, any number of
/// `get_properties`, then `stop`.
pub trait PropertyScraper {
    fn start(&mut self) -> Result<()>;

    /// One row per id: `token_id` plus one column per property name found.
    fn get_properties(
        &mut self,
        contract: &str,
        ids: &[String],
        progress: &mut dyn Progress,
    ) -> Result<DataSet>;

    fn stop(&mut self);
}

/// Pull `fields` out of a metadata JSON document. Unparseable text, a non-object,
/// or a missing/null field all give null cells.
pub(crate) fn lift_fields(metadata: Option<&str>, fields: &[&str]) -> Vec<crate::data::Cell> {
    let obj = metadata
        .and_then(|m| serde_json::from_str::<serde_json::Value>(m).ok())
        .and_then(|v| match v {
            serde_json::Value::Object(o) => Some(o),
            _ => None,
        });
    fields
        .iter()
        .map(|f| {
            obj.as_ref()
                .and_then(|o| o.get(*f))
                .and_then(crate::data::json_to_cell)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lift_fields_tolerates_bad_metadata() {
        let fields = ["name", "image"];
        assert_eq!(
            lift_fields(Some(r#"{"name":"Affe mit Waffe #3","image":null}"#), &fields),
            vec![Some(s!("Affe mit Waffe #3")), None]
        );
        assert_eq!(lift_fields(Some("not json"), &fields), vec![None, None]);
        assert_eq!(lift_fields(Some("[1,2]"), &fields), vec![None, None]);
        assert_eq!(lift_fields(None, &fields), vec![None, None]);
    }

    #[test]
    fn direction_query_values() {
        assert_eq!(Direction::Both.as_str(), "both");
        assert_eq!(Direction::To.as_str(), "to");
    }
}
