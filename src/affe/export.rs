// src/affe/export.rs
//
// Two JSON views of an Affe:
// - flat:        one level of key/value pairs, for the hosted table.
// - marketplace: OpenSea metadata standard (name/description/image/attributes).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tracing::{info, warn};

use super::Snapshot;
use super::model::Affe;
use crate::config::consts::{
    EMOTION_MAX, FLAT_AGGREGATE_FILE, FRIENDLY_NAME_COLUMN, NFT_AGGREGATE_FILE,
};
use crate::config::options::{DataDirs, ExportOptions, FlatDefaults};
use crate::error::Result;
use crate::file::{ensure_directory, write_json};

pub const ELIGIBLE_FOR_UTILITY: &str = "Eligible for Utility";
pub const TRUSTS_IN_HUMANITY: &str = "Trusts in Humanity";

/// Flat view. Later groups overwrite earlier keys of the same name in place.
pub fn flat(affe: &Affe, defaults: &FlatDefaults) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert(s!("id"), json!(affe.id));
    m.insert(s!("name"), json!(affe.name_strict));
    m.insert(s!("description"), json!(affe.story));
    for (k, v) in affe.attributes_common.iter() {
        m.insert(s!(k), json!(v));
    }
    for (k, v) in affe.attributes_rare_textual.iter() {
        m.insert(s!(k), json!(v));
    }
    for (k, v) in affe.emotions_common.iter() {
        m.insert(s!(k), json!(v));
    }
    for (k, v) in affe.attributes_rare_numerical.iter() {
        m.insert(s!(k), json!(v));
    }
    m.insert(s!("image"), json!(affe.image_url));
    m.insert(s!("external_url"), json!(affe.website));
    m.insert(s!("animation_url"), json!(affe.animation_url));
    m.insert(s!("legacy_id"), json!(affe.legacy_id));

    // the friendly name already lives in `name` once hygiene has run
    m.shift_remove(FRIENDLY_NAME_COLUMN);

    m.insert(s!(ELIGIBLE_FOR_UTILITY), json!(defaults.eligible_for_utility));
    m.insert(s!(TRUSTS_IN_HUMANITY), json!(defaults.trusts_in_humanity));
    m
}

pub fn marketplace(affe: &Affe) -> Value {
    let mut attributes: Vec<Value> = Vec::new();
    for (k, v) in affe.attributes_common.iter() {
        attributes.push(json!({ "trait_type": k, "value": v }));
    }
    for (k, v) in affe.attributes_rare_textual.iter() {
        attributes.push(json!({ "trait_type": k, "value": v }));
    }
    for (k, v) in affe.emotions_common.iter() {
        attributes.push(numeric_trait(k, json!(v)));
    }
    for (k, v) in affe.attributes_rare_numerical.iter() {
        attributes.push(numeric_trait(k, json!(v)));
    }

    json!({
        "name": affe.name_strict,
        "description": affe.story,
        "image": affe.image_url,
        "external_url": affe.website,
        "attributes": attributes,
    })
}

fn numeric_trait(name: &str, value: Value) -> Value {
    json!({
        "display_type": "number",
        "trait_type": name,
        "value": value,
        "max_value": EMOTION_MAX,
    })
}

/// Files written by `Snapshot::write`.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub files_written: Vec<PathBuf>,
    /// Ids shared by more than one Affe; the last one's `<id>.json` is kept.
    pub duplicate_ids: Vec<u32>,
}

impl Snapshot {
    pub fn flat_records(&self, defaults: &FlatDefaults) -> Vec<Map<String, Value>> {
        self.affen.iter().map(|a| flat(a, defaults)).collect()
    }

    /// Marketplace views; `hygiene` reshapes a copy of each Affe first.
    pub fn marketplace_records(&self, hygiene: bool) -> Vec<Value> {
        self.affen
            .iter()
            .map(|a| {
                if hygiene {
                    let mut a = a.clone();
                    a.perform_721_hygiene();
                    marketplace(&a)
                } else {
                    marketplace(a)
                }
            })
            .collect()
    }

    /// Write `<id>.json` per Affe plus an aggregate array for both views under
    /// `output/flat_json/` and `output/nft_json/`.
    pub fn write(&self, dirs: &DataDirs, opts: &ExportOptions) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();

        let flat_dir = dirs.flat_json();
        let flat_views = self.flat_records(&opts.flat_defaults);
        write_views(&flat_dir, &self.affen, &flat_views, FLAT_AGGREGATE_FILE, opts.pretty, &mut summary)?;

        let nft_dir = dirs.nft_json();
        let nft_views = self.marketplace_records(opts.hygiene);
        write_views(&nft_dir, &self.affen, &nft_views, NFT_AGGREGATE_FILE, opts.pretty, &mut summary)?;

        info!(
            "Exported {} Affen to {} and {}",
            self.affen.len(),
            flat_dir.display(),
            nft_dir.display()
        );
        Ok(summary)
    }
}

fn write_views<T: serde::Serialize>(
    dir: &Path,
    affen: &[Affe],
    views: &[T],
    aggregate: &str,
    pretty: bool,
    summary: &mut ExportSummary,
) -> Result<()> {
    ensure_directory(dir)?;
    let mut seen = HashSet::with_capacity(affen.len());
    for (affe, view) in affen.iter().zip(views) {
        if !seen.insert(affe.id) {
            warn!("Affe #{} appears more than once; {}/{}.json is overwritten", affe.id, dir.display(), affe.id);
            if !summary.duplicate_ids.contains(&affe.id) {
                summary.duplicate_ids.push(affe.id);
            }
        }
        let path = dir.join(format!("{}.json", affe.id));
        write_json(&path, view, pretty)?;
        summary.files_written.push(path);
    }
    let path = dir.join(aggregate);
    write_json(&path, views, pretty)?;
    summary.files_written.push(path);
    Ok(())
}
