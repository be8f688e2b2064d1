// src/sink/corrections.rs
//
// Hand edits applied to flat records before they are loaded. A list of these
// can live in manual_files/corrections.json, e.g.
//
//   [
//     { "op": "rename_field", "from": "SPECIAL ATTRIBUTE", "to": "SPECIAL ABILITY" },
//     { "op": "set_field", "id": 47, "field": "Anticipation", "value": 2 },
//     { "op": "replace_blank_text", "value": "<>" },
//     { "op": "exclude", "id": 0 }
//   ]

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::Item;
use crate::config::consts::EMOTIONS;
use crate::error::Result;
use crate::file::read_json;

pub const BLANK_NUMBER: i64 = -1;
pub const BLANK_TEXT: &str = "<>";

/// Text values replaced by `ReplaceBlankText`.
const BLANK_MARKERS: [&str; 2] = ["", "<empty>"];

/// Text traits that get `BLANK_TEXT` when filling blanks.
pub const TEXT_TRAITS: &[&str] = &[
    "SPECIAL ABILITY", "TRINKET", "PIPE", "PET", "SUNGLASSES", "APEBALL", "TITLE",
    "FLOWER", "MONOCLE", "HAT", "FRIEND", "ABILITY", "DRINK", "CIGAR", "FOOD",
    "SEASON", "HOME", "BOWTIE", "JEWELRY", "FIREWORKS", "Perfume", "Special Trait",
    "Curiosity", "Invention", "Book", "Costume", "World View", "Hobby", "Furniture",
    "Piece Of Art", "Vehicle", "Art Movement", "Body Feature", "GROUP", "PANTS", "FLAG",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Correction {
    /// Move `from` to `to` on every item that has it.
    RenameField { from: String, to: String },
    /// Set one field on the item with this id.
    SetField { id: u64, field: String, value: Value },
    /// Replace `""` and `"<empty>"` in every field of every item.
    ReplaceBlankText { value: Value },
    /// Give `fields` a value wherever they are missing or null.
    FillBlanks { fields: Vec<String>, value: Value },
    /// Drop the item with this id.
    Exclude { id: u64 },
}

impl Correction {
    pub fn apply(&self, items: &mut Vec<Item>) {
        match self {
            Correction::RenameField { from, to } => {
                for item in items.iter_mut() {
                    if let Some(v) = item.shift_remove(from) {
                        item.insert(to.clone(), v);
                    }
                }
            }
            Correction::SetField { id, field, value } => {
                for item in items.iter_mut().filter(|i| item_id(i) == Some(*id)) {
                    item.insert(field.clone(), value.clone());
                }
            }
            Correction::ReplaceBlankText { value } => {
                for v in items.iter_mut().flat_map(|i| i.values_mut()) {
                    if is_blank_text(v) {
                        *v = value.clone();
                    }
                }
            }
            Correction::FillBlanks { fields, value } => {
                for item in items.iter_mut() {
                    for f in fields {
                        if matches!(item.get(f), None | Some(Value::Null)) {
                            item.insert(f.clone(), value.clone());
                        }
                    }
                }
            }
            Correction::Exclude { id } => items.retain(|i| item_id(i) != Some(*id)),
        }
    }
}

fn item_id(item: &Item) -> Option<u64> {
    match item.get("id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_blank_text(v: &Value) -> bool {
    matches!(v, Value::String(s) if BLANK_MARKERS.contains(&s.as_str()))
}

/// Field renames the hosted table expects.
pub fn default_corrections() -> Vec<Correction> {
    vec![
        Correction::RenameField { from: s!("JEWELLERY"), to: s!("JEWELRY") },
        Correction::RenameField { from: s!("SPECIAL ATTRIBUTE"), to: s!("SPECIAL ABILITY") },
    ]
}

/// Blank text anywhere -> "<>", then missing emotions -> -1 and missing
/// text traits -> "<>".
pub fn fill_blank_corrections() -> Vec<Correction> {
    vec![
        Correction::ReplaceBlankText { value: Value::from(BLANK_TEXT) },
        Correction::FillBlanks {
            fields: EMOTIONS.iter().map(|e| s!(*e)).collect(),
            value: Value::from(BLANK_NUMBER),
        },
        Correction::FillBlanks {
            fields: TEXT_TRAITS.iter().map(|t| s!(*t)).collect(),
            value: Value::from(BLANK_TEXT),
        },
    ]
}

/// Corrections from a JSON file; a missing file is an empty list.
pub fn load_corrections(path: &Path) -> Result<Vec<Correction>> {
    if !path.exists() {
        debug!(path = %path.display(), "no corrections file");
        return Ok(Vec::new());
    }
    let list: Vec<Correction> = read_json(path)?;
    info!("Loaded {} corrections from {}", list.len(), path.display());
    Ok(list)
}

pub fn apply_all(mut items: Vec<Item>, corrections: &[Correction]) -> Vec<Item> {
    for c in corrections {
        c.apply(&mut items);
    }
    items
}
