// src/pipeline/stages.rs
//
// The pure table transforms of the pipeline. No I/O in here.

use std::collections::HashSet;

use crate::config::consts::ADDITIONAL_URLS_COLUMN;
use crate::core::sanitize::{is_affe_name, same_address};
use crate::data::DataSet;
use crate::error::Result;
use crate::file::last_url_segment;
use crate::outcome::StageOutcome;

pub const KEY: &str = "token_id";

/// Transfers on `contract` sent by `creator` (addresses compare case-insensitively).
pub fn filter_transfers(ds: &DataSet, contract: &str, creator: &str) -> Result<DataSet> {
    if ds.is_empty() {
        return Ok(ds.clone());
    }
    ds.require("token_address")?;
    ds.require("from_address")?;
    Ok(ds.filter(|r| {
        r.get("token_address").is_some_and(|a| same_address(a, contract))
            && r.get("from_address").is_some_and(|a| same_address(a, creator))
    }))
}

/// Distinct token ids of rows on `contract`, first-seen order.
pub fn ids_on_contract(ds: &DataSet, contract: &str) -> Result<Vec<String>> {
    if ds.is_empty() {
        return Ok(Vec::new());
    }
    ds.require("token_address")?;
    ds.filter(|r| r.get("token_address").is_some_and(|a| same_address(a, contract)))
        .distinct(KEY)
}

/// Token ids named by the manual marketplace URL list (last path segment).
pub fn ids_from_urls(urls: &DataSet) -> Result<Vec<String>> {
    let col = urls.require(ADDITIONAL_URLS_COLUMN)?;
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for row in &urls.rows {
        let Some(id) = row[col].as_deref().and_then(last_url_segment) else { continue };
        if seen.insert(s!(id)) {
            ids.push(s!(id));
        }
    }
    Ok(ids)
}

/// `candidates` minus the ids already in `known`, order kept.
pub fn unknown_ids(candidates: &[String], known: &DataSet) -> Vec<String> {
    let known: HashSet<String> = known.distinct(KEY).unwrap_or_default().into_iter().collect();
    candidates.iter().filter(|id| !known.contains(*id)).cloned().collect()
}

/// Drop rows with metadata whose name doesn't look like an Affe. Rows without
/// metadata stay so they can still be filled in by the scrape.
pub fn refine(ds: &DataSet) -> DataSet {
    ds.filter(|r| match r.get("metadata") {
        None => true,
        Some(_) => r.get("name").is_some_and(is_affe_name),
    })
}

/// Outer join of the scraped extras with the refined token data on `token_id`.
/// Empty extras (no columns at all) join as an empty keyed table.
pub fn combine(extras: &DataSet, refined: &DataSet) -> Result<StageOutcome<DataSet>> {
    let keyed = |ds: &DataSet| {
        if ds.headers.is_empty() { DataSet::new(cols![KEY]) } else { ds.clone() }
    };
    keyed(extras).outer_join(&keyed(refined), KEY)
}

pub fn reorder<S: AsRef<str>>(ds: &DataSet, order: &[S]) -> StageOutcome<DataSet> {
    ds.move_to_front(order)
}
