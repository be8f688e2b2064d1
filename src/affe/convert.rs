// src/affe/convert.rs
//
// Final table row -> Affe. Columns are classified by fixed name tables:
// common attributes, emotions, then everything else is a rare trait unless
// it is a provenance column or a spreadsheet "Unnamed" artifact.

use tracing::debug;

use super::Snapshot;
use super::model::Affe;
use crate::config::consts::{
    COMMON_ATTRIBUTES, EMOTION_MAX, EMOTIONS, FRIENDLY_NAME_COLUMN, IGNORED_COLUMNS,
};
use crate::data::{DataSet, Record};
use crate::error::{Error, Result};
use crate::outcome::StageOutcome;

/// Collection number from a storefront name: the text after the last `#`.
pub fn parse_id(name: &str) -> Result<u32> {
    let (_, tail) = name
        .rsplit_once('#')
        .ok_or_else(|| Error::MalformedName(s!(name)))?;
    tail.trim()
        .parse()
        .map_err(|_| Error::MalformedName(s!(name)))
}

/// `"3 of 5"` -> 3. Anything else is `None`.
pub fn parse_x_of_y(value: &str) -> Option<i64> {
    let (x, y) = value.trim().split_once(" of ")?;
    let x: i64 = x.trim().parse().ok()?;
    y.trim().parse::<i64>().ok()?;
    Some(x)
}

fn is_ignored(column: &str) -> bool {
    IGNORED_COLUMNS.contains(&column) || column.to_ascii_lowercase().contains("unnamed")
}

/// Convert one row, logging any non-fatal problems.
pub fn convert(record: &Record<'_>) -> Result<Affe> {
    convert_record(record).map(StageOutcome::logged)
}

/// Convert one row. Problems that only cost a trait come back as warnings.
pub fn convert_record(record: &Record<'_>) -> Result<StageOutcome<Affe>> {
    let name = record.get("name").unwrap_or_default();
    let id = parse_id(name)?;
    let text = |col: &str| s!(record.get(col).unwrap_or_default());

    let mut affe = Affe::new(id);
    let mut warnings = Vec::new();

    affe.name_strict = s!(name);
    affe.name_friendly = text(FRIENDLY_NAME_COLUMN);
    affe.story = text("description");
    affe.image_url = text("image");
    affe.website = text("external_link");
    affe.animation_url = text("animation_url");
    affe.legacy_id = text("token_id");

    for col in COMMON_ATTRIBUTES {
        if !record.has_column(col) {
            warnings.push(format!("Affe #{id}: expected common attribute column '{col}'"));
        }
        affe.attributes_common.insert(col, text(col));
    }

    for col in EMOTIONS {
        match record.get(col) {
            None => {}
            Some(v) => match parse_x_of_y(v).map(u32::try_from) {
                Some(Ok(score)) if score <= EMOTION_MAX => affe.emotions_common.insert(col, score),
                Some(_) => warnings.push(format!(
                    "Affe #{id}: emotion '{col}' has value {v:?}, outside 0..={EMOTION_MAX}; skipped"
                )),
                None => warnings.push(format!(
                    "Affe #{id}: emotion '{col}' has value {v:?}, expected 'X of Y'; skipped"
                )),
            },
        }
    }

    for (col, value) in record.iter() {
        if COMMON_ATTRIBUTES.contains(&col) || EMOTIONS.contains(&col) || is_ignored(col) {
            continue;
        }
        let Some(v) = value else { continue };
        match parse_x_of_y(v) {
            Some(n) => affe.attributes_rare_numerical.insert(col, n),
            None => affe.attributes_rare_textual.insert(col, s!(v)),
        }
    }

    Ok(StageOutcome::new(affe, warnings))
}

/// Convert every row of the final table. Rows without a name (tokens that
/// never resolved to collection metadata) are skipped with a warning.
pub fn convert_all(ds: &DataSet) -> Result<StageOutcome<Snapshot>> {
    ds.require("name")?;
    let mut warnings = Vec::new();
    let mut affen = Vec::with_capacity(ds.len());

    for (i, record) in ds.records().enumerate() {
        if record.get("name").is_none() {
            let token = record.get("token_id").unwrap_or("?");
            warnings.push(format!("Row {i} (token {token}) has no name; not an Affe, skipped"));
            continue;
        }
        let affe = convert_record(&record)?.collect_into(&mut warnings);
        affen.push(affe);
    }
    debug!(count = affen.len(), "converted");

    Ok(StageOutcome::new(Snapshot::new(affen), warnings))
}
