// src/sink/mod.rs

pub mod corrections;
pub mod http;

use std::thread::sleep;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{error, info};

use crate::config::consts::FLAT_AGGREGATE_FILE;
use crate::config::options::{DataDirs, SinkOptions};
use crate::error::{Error, Result};
use crate::file::read_json;
use crate::progress::Progress;

pub use corrections::{Correction, apply_all, default_corrections, fill_blank_corrections, load_corrections};
pub use http::HttpTableSink;

/// One flat record as stored in the table.
pub type Item = Map<String, Value>;

/// A hosted table that stores items by key.
pub trait TableSink {
    fn key_fields(&self) -> Vec<String>;
    fn put_item(&mut self, item: &Item) -> Result<()>;
}

/// Flat records from the last export with corrections applied, in this order:
/// built-in renames, `manual_files/corrections.json`, then blank filling.
pub fn prepare_items(dirs: &DataDirs, opts: &SinkOptions) -> Result<Vec<Item>> {
    let path = dirs.flat_json().join(FLAT_AGGREGATE_FILE);
    if !path.exists() {
        return Err(Error::Config(format!(
            "{} not found; run the export first",
            path.display()
        )));
    }
    let items: Vec<Item> = read_json(&path)?;

    let mut corrections = default_corrections();
    corrections.extend(load_corrections(&dirs.corrections())?);
    if opts.fill_blanks {
        corrections.extend(fill_blank_corrections());
    }
    Ok(apply_all(items, &corrections))
}

/// Every item must carry every key field (present and not null).
pub fn check_keys(items: &[Item], keys: &[String]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        for key in keys {
            if matches!(item.get(key), None | Some(Value::Null)) {
                return Err(Error::MissingKey { index, key: key.clone() });
            }
        }
    }
    Ok(())
}

/// Write `items` one at a time, pausing between writes. Nothing is written if
/// any item lacks a key. A failed write stops the load; items already written
/// stay written. Returns the number of items put.
pub fn load_items(
    sink: &mut dyn TableSink,
    items: &[Item],
    pause: Duration,
    progress: &mut dyn Progress,
) -> Result<usize> {
    let keys = sink.key_fields();
    check_keys(items, &keys)?;

    progress.begin(items.len());
    for (i, item) in items.iter().enumerate() {
        if i > 0 { sleep(pause); }
        let label = key_label(item, &keys);
        if let Err(e) = sink.put_item(item) {
            error!("Couldn't load item {label}: {e}");
            progress.finish();
            return Err(e);
        }
        info!("Put item {label}");
        progress.item_done(&label);
    }
    progress.finish();
    Ok(items.len())
}

fn key_label(item: &Item, keys: &[String]) -> String {
    keys.iter()
        .filter_map(|k| item.get(k))
        .map(value_text)
        .collect::<Vec<_>>()
        .join("/")
}

/// Key value as URL/label text: strings unquoted, everything else as JSON.
pub(crate) fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use serde_json::json;

    #[derive(Default)]
    struct MemorySink {
        put: Vec<Item>,
        fail_on: Option<u64>,
    }

    impl TableSink for MemorySink {
        fn key_fields(&self) -> Vec<String> { vec![s!("id")] }
        fn put_item(&mut self, item: &Item) -> Result<()> {
            if item["id"].as_u64() == self.fail_on {
                return Err(Error::Sink(s!("throttled")));
            }
            self.put.push(item.clone());
            Ok(())
        }
    }

    fn items(ids: &[u64]) -> Vec<Item> {
        ids.iter()
            .map(|id| json!({"id": id, "name": "x"}).as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn missing_key_rejects_whole_batch() {
        let mut batch = items(&[1, 2]);
        batch.push(json!({"name": "no id"}).as_object().unwrap().clone());
        let mut sink = MemorySink::default();
        let err = load_items(&mut sink, &batch, Duration::ZERO, &mut NullProgress);
        assert!(matches!(err, Err(Error::MissingKey { index: 2, .. })));
        assert!(sink.put.is_empty());
    }

    #[test]
    fn failed_put_keeps_earlier_writes() {
        let mut sink = MemorySink { fail_on: Some(3), ..Default::default() };
        let err = load_items(&mut sink, &items(&[1, 2, 3, 4]), Duration::ZERO, &mut NullProgress);
        assert!(matches!(err, Err(Error::Sink(_))));
        assert_eq!(sink.put.len(), 2);
    }

    #[test]
    fn loads_everything_in_order() {
        let mut sink = MemorySink::default();
        let n = load_items(&mut sink, &items(&[5, 1]), Duration::ZERO, &mut NullProgress).unwrap();
        assert_eq!(n, 2);
        assert_eq!(sink.put[0]["id"], 5);
    }
}
