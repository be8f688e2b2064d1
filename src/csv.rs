// src/csv.rs
use std::io::{Read, Write};
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::data::{Cell, DataSet};
use crate::error::Result;
use crate::file::ensure_parent;

/* ---------------- Reading ---------------- */

/// Read a headered CSV file. Empty fields come back as null cells,
/// short rows are padded with nulls.
pub fn read_dataset(path: &Path) -> Result<DataSet> {
    let file = std::fs::File::open(path)?;
    read_from(file)
}

pub fn read_from<R: Read>(rdr: R) -> Result<DataSet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(rdr);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| s!(h)).collect();
    let mut ds = DataSet::new(headers);

    let mut record = StringRecord::new();
    while rdr.read_record(&mut record)? {
        ds.push_row(record.iter().map(to_cell).collect());
    }
    Ok(ds)
}

fn to_cell(field: &str) -> Cell {
    if field.is_empty() { None } else { Some(s!(field)) }
}

/* ---------------- Writing ---------------- */

/// Write `ds` with a header line, creating parent directories as needed.
/// Null cells are written as empty fields.
pub fn write_dataset(path: &Path, ds: &DataSet) -> Result<()> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path)?; // truncate/overwrite
    write_to(file, ds)
}

pub fn write_to<W: Write>(w: W, ds: &DataSet) -> Result<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(w);
    if !ds.headers.is_empty() {
        wtr.write_record(&ds.headers)?;
    }
    for row in &ds.rows {
        wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render `ds` as CSV text.
pub fn to_csv_string(ds: &DataSet) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_to(&mut buf, ds)?;
    Ok(match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_survive_a_trip_through_csv() {
        let ds = DataSet::with_rows(
            cols!["token_id", "name", "metadata"],
            vec![
                row!["1", "Affe mit Waffe #1", _],
                row!["2", "Comma, quoted \"name\"", "{\"a\":1}"],
            ],
        );
        let text = to_csv_string(&ds).unwrap();
        assert!(text.starts_with("token_id,name,metadata\n"));
        assert!(text.contains("1,Affe mit Waffe #1,\n"));

        let back = read_from(text.as_bytes()).unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn short_rows_are_padded() {
        let text = "a,b,c\n1,2\n";
        let ds = read_from(text.as_bytes()).unwrap();
        assert_eq!(ds.rows[0], row!["1", "2", _]);
    }
}
