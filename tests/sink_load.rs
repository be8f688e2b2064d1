// tests/sink_load.rs
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use affe_data::affe::{Affe, Snapshot};
use affe_data::config::options::{DataDirs, ExportOptions, SinkOptions};
use affe_data::progress::NullProgress;
use affe_data::sink::{Item, TableSink, load_items, prepare_items};
use affe_data::{Error, Result};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("affe_sink_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

#[derive(Default)]
struct MemoryTable {
    rows: Vec<Item>,
}

impl TableSink for MemoryTable {
    fn key_fields(&self) -> Vec<String> {
        vec!["id".to_string()]
    }
    fn put_item(&mut self, item: &Item) -> Result<()> {
        self.rows.push(item.clone());
        Ok(())
    }
}

fn exported(dirs: &DataDirs) {
    let mut a = Affe::new(97);
    a.name_strict = "Affe mit Waffe #97".into();
    a.attributes_common.insert("CHIMP", "Bongo".to_string());
    a.attributes_rare_textual.insert("SPECIAL ATTRIBUTE", "Laser".to_string());
    a.attributes_rare_textual.insert("JEWELLERY", "<empty>".to_string());
    a.emotions_common.insert("Joy", 4);

    let mut b = Affe::new(0);
    b.name_strict = "Affe mit Waffe #0".into();

    Snapshot::new(vec![a, b]).write(dirs, &ExportOptions::default()).unwrap();
}

#[test]
fn corrections_then_load() {
    let dirs = DataDirs::new(tmp_dir("load"));
    exported(&dirs);
    fs::create_dir_all(dirs.manual()).unwrap();
    fs::write(
        dirs.corrections(),
        r#"[
            {"op": "set_field", "id": 97, "field": "Anticipation", "value": 2},
            {"op": "exclude", "id": 0}
        ]"#,
    )
    .unwrap();

    let opts = SinkOptions { pause: Duration::ZERO, fill_blanks: true };
    let items = prepare_items(&dirs, &opts).unwrap();
    assert_eq!(items.len(), 1);

    let affe = &items[0];
    assert_eq!(affe["SPECIAL ABILITY"], "Laser");
    assert!(affe.get("SPECIAL ATTRIBUTE").is_none());
    // renamed first, then the blank marker is filled
    assert_eq!(affe["JEWELRY"], "<>");
    assert_eq!(affe["Anticipation"], 2);
    assert_eq!(affe["Joy"], 4);
    assert_eq!(affe["Fear"], -1);
    assert_eq!(affe["HAT"], "<>");
    // every other blank text field gets the marker too
    assert_eq!(affe["description"], "<>");
    assert_eq!(affe["name"], "Affe mit Waffe #97");

    let mut table = MemoryTable::default();
    let n = load_items(&mut table, &items, opts.pause, &mut NullProgress).unwrap();
    assert_eq!(n, 1);
    assert_eq!(table.rows[0]["id"], 97);
}

#[test]
fn load_needs_an_export() {
    let dirs = DataDirs::new(tmp_dir("no_export"));
    let err = prepare_items(&dirs, &SinkOptions::default()).err().unwrap();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn item_without_key_blocks_the_batch() {
    let mut items: Vec<Item> = Vec::new();
    for v in [serde_json::json!({"id": 1}), serde_json::json!({"name": "keyless"})] {
        items.push(v.as_object().unwrap().clone());
    }
    let mut table = MemoryTable::default();
    let err = load_items(&mut table, &items, Duration::ZERO, &mut NullProgress).err().unwrap();
    assert!(matches!(err, Error::MissingKey { index: 1, ref key } if key == "id"));
    assert!(table.rows.is_empty());
}
