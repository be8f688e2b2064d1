// src/data.rs
//
// Tabular token records.
//
// - DataSet: ordered column names plus rows of nullable string cells. Every
//            provider response, checkpoint file and the final table is one.
// - Record:  borrowed view of one row as an ordered column -> cell mapping.
//
// Operations never mutate in place; each returns a new DataSet.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::outcome::StageOutcome;

/// `None` is a null cell (absent data), written to CSV as an empty field.
pub type Cell = Option<String>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl DataSet {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub fn with_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut ds = Self::new(headers);
        for r in rows {
            ds.push_row(r);
        }
        ds
    }

    #[inline] pub fn len(&self) -> usize { self.rows.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    #[inline] pub fn width(&self) -> usize { self.headers.len() }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn require(&self, name: &str) -> Result<usize> {
        self.column(name).ok_or_else(|| Error::MissingColumn(s!(name)))
    }

    /// Append a row, padding with nulls (or truncating) to the header width.
    /// Empty strings are stored as nulls, the same as an empty CSV field.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.width(), None);
        for cell in row.iter_mut() {
            if cell.as_deref() == Some("") {
                *cell = None;
            }
        }
        self.rows.push(row);
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record { headers: &self.headers, cells })
    }

    pub fn record(&self, i: usize) -> Option<Record<'_>> {
        self.rows.get(i).map(|cells| Record { headers: &self.headers, cells })
    }

    /// Keep rows for which `keep` is true, in their original order.
    pub fn filter(&self, keep: impl Fn(&Record<'_>) -> bool) -> DataSet {
        let rows = self
            .records()
            .filter(|r| keep(r))
            .map(|r| r.cells.to_vec())
            .collect();
        DataSet { headers: self.headers.clone(), rows }
    }

    /// Distinct non-null values of a column, in first-seen order.
    pub fn distinct(&self, name: &str) -> Result<Vec<String>> {
        let col = self.require(name)?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            if let Some(v) = &row[col] {
                if seen.insert(v.as_str()) {
                    out.push(v.clone());
                }
            }
        }
        Ok(out)
    }

    /// Stack `other` below `self`. Columns are the union, `self`'s first;
    /// cells for columns a side doesn't have are null.
    pub fn concat(&self, other: &DataSet) -> DataSet {
        let mut headers = self.headers.clone();
        for h in &other.headers {
            if !headers.contains(h) {
                headers.push(h.clone());
            }
        }
        let mut out = DataSet::new(headers);
        for ds in [self, other] {
            let map: Vec<usize> = ds
                .headers
                .iter()
                .map(|h| out.column(h).unwrap_or_default())
                .collect();
            for row in &ds.rows {
                let mut cells = vec![None; out.width()];
                for (i, cell) in row.iter().enumerate() {
                    cells[map[i]] = cell.clone();
                }
                out.rows.push(cells);
            }
        }
        out
    }

    /// Keep only the columns at `order`, in that order.
    pub fn project(&self, order: &[usize]) -> DataSet {
        let headers = order.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| order.iter().map(|&i| r[i].clone()).collect())
            .collect();
        DataSet { headers, rows }
    }

    /// Move `names` to the front, in the given order. Names that are not
    /// columns are skipped and reported; all other columns follow unchanged.
    pub fn move_to_front<S: AsRef<str>>(&self, names: &[S]) -> StageOutcome<DataSet> {
        let mut front: Vec<usize> = Vec::with_capacity(names.len());
        let mut warnings = Vec::new();

        for name in names {
            let name = name.as_ref();
            match self.column(name) {
                Some(i) if !front.contains(&i) => front.push(i),
                Some(_) => {}
                None => warnings.push(format!(
                    "While re-ordering columns, expected to find a column named '{name}', \
                     but it was not present in the data."
                )),
            }
        }
        let rest = (0..self.width()).filter(|i| !front.contains(i));
        let order: Vec<usize> = front.iter().copied().chain(rest).collect();

        StageOutcome::new(self.project(&order), warnings)
    }

    /// Outer join on `key`: one output row per distinct key across both sides,
    /// in first-appearance order (left side first).
    ///
    /// - The key column comes first, then left columns, then right columns.
    /// - Non-key columns present on both sides get `_x` / `_y` suffixes.
    /// - A key missing on one side leaves that side's columns null.
    /// - Rows with a null key are dropped; a repeated key keeps its first row.
    pub fn outer_join(&self, right: &DataSet, key: &str) -> Result<StageOutcome<DataSet>> {
        let lk = self.require(key)?;
        let rk = right.require(key)?;
        let mut warnings = Vec::new();

        let left_cols: Vec<usize> = (0..self.width()).filter(|&i| i != lk).collect();
        let right_cols: Vec<usize> = (0..right.width()).filter(|&i| i != rk).collect();

        let left_names: HashSet<&str> = left_cols.iter().map(|&i| self.headers[i].as_str()).collect();
        let right_names: HashSet<&str> = right_cols.iter().map(|&i| right.headers[i].as_str()).collect();

        let mut headers = vec![s!(key)];
        for &i in &left_cols {
            let h = &self.headers[i];
            headers.push(if right_names.contains(h.as_str()) { format!("{h}_x") } else { h.clone() });
        }
        for &i in &right_cols {
            let h = &right.headers[i];
            headers.push(if left_names.contains(h.as_str()) { format!("{h}_y") } else { h.clone() });
        }

        let mut order: Vec<String> = Vec::new();
        let left_ix = index_by_key(self, lk, "left", &mut order, &mut warnings);
        let right_ix = index_by_key(right, rk, "right", &mut order, &mut warnings);

        let mut out = DataSet::new(headers);
        for k in order {
            let mut cells: Vec<Cell> = Vec::with_capacity(out.width());
            cells.push(Some(k.clone()));
            match left_ix.get(&k) {
                Some(&r) => cells.extend(left_cols.iter().map(|&i| self.rows[r][i].clone())),
                None => cells.extend(left_cols.iter().map(|_| None)),
            }
            match right_ix.get(&k) {
                Some(&r) => cells.extend(right_cols.iter().map(|&i| right.rows[r][i].clone())),
                None => cells.extend(right_cols.iter().map(|_| None)),
            }
            out.rows.push(cells);
        }

        Ok(StageOutcome::new(out, warnings))
    }

    /// Build a table from JSON objects. Columns are the union of keys in
    /// first-seen order. Strings are kept as-is, null and `""` become null
    /// cells, anything else is stored as its JSON text.
    pub fn from_objects<'a>(objects: impl IntoIterator<Item = &'a Map<String, Value>>) -> DataSet {
        let objects: Vec<&Map<String, Value>> = objects.into_iter().collect();
        let mut headers: Vec<String> = Vec::new();
        for obj in &objects {
            for k in obj.keys() {
                if !headers.contains(k) {
                    headers.push(k.clone());
                }
            }
        }
        let mut out = DataSet::new(headers);
        for obj in objects {
            let row = out
                .headers
                .iter()
                .map(|h| obj.get(h).and_then(json_to_cell))
                .collect();
            out.push_row(row);
        }
        out
    }

    /// Fixed-width text rendering of the first `rows` x `cols` cells, with
    /// every cell clipped to `width` characters. Nulls render as `NaN`.
    pub fn preview(&self, rows: usize, cols: usize, width: usize) -> String {
        let ncols = self.width().min(cols);
        let nrows = self.len().min(rows);
        let clip = |s: &str| -> String {
            if s.chars().count() <= width {
                s.to_string()
            } else {
                let keep = width.saturating_sub(3);
                let head: String = s.chars().take(keep).collect();
                format!("{head}...")
            }
        };

        let mut grid: Vec<Vec<String>> = Vec::with_capacity(nrows + 1);
        let mut header = vec![s!()];
        header.extend(self.headers[..ncols].iter().map(|h| clip(h.as_str())));
        grid.push(header);
        for (i, row) in self.rows.iter().take(nrows).enumerate() {
            let mut line = vec![i.to_string()];
            line.extend(row[..ncols].iter().map(|c| clip(c.as_deref().unwrap_or("NaN"))));
            grid.push(line);
        }

        let widths: Vec<usize> = (0..=ncols)
            .map(|c| grid.iter().map(|l| l[c].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for line in &grid {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:>w$}", w = *w))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out.push_str(&format!("\n[{} rows x {} columns]\n", self.len(), self.width()));
        out
    }
}

fn index_by_key(
    ds: &DataSet,
    key_col: usize,
    side: &str,
    order: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> HashMap<String, usize> {
    let mut ix: HashMap<String, usize> = HashMap::with_capacity(ds.len());
    for (r, row) in ds.rows.iter().enumerate() {
        let Some(k) = &row[key_col] else {
            warnings.push(format!("Dropping {side} row {r}: empty join key"));
            continue;
        };
        if ix.contains_key(k) {
            warnings.push(format!("Duplicate key '{k}' in {side} input; keeping the first row"));
            continue;
        }
        if !order.contains(k) {
            order.push(k.clone());
        }
        ix.insert(k.clone(), r);
    }
    ix
}

pub fn json_to_cell(v: &Value) -> Cell {
    match v {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One row of a DataSet viewed as an ordered mapping column -> cell.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Record<'a> {
    /// Value of `name`; `None` when the column is absent or the cell is null.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let (headers, cells) = (self.headers, self.cells);
        let i = headers.iter().position(|h| h == name)?;
        cells.get(i)?.as_deref()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        let (headers, cells) = (self.headers, self.cells);
        headers
            .iter()
            .enumerate()
            .map(move |(i, h)| (h.as_str(), cells.get(i).and_then(|c| c.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> DataSet {
        DataSet::with_rows(
            cols!["token_id", "HAT", "name"],
            vec![row!["1", "Top Hat", _], row!["2", _, _]],
        )
    }

    fn right() -> DataSet {
        DataSet::with_rows(
            cols!["token_id", "name", "metadata"],
            vec![row!["2", "Affe mit Waffe #2", "{}"], row!["3", "Affe #3", _]],
        )
    }

    #[test]
    fn outer_join_counts_distinct_keys_and_nulls_missing_side() {
        let joined = left().outer_join(&right(), "token_id").unwrap();
        let ds = joined.data;
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.headers, cols!["token_id", "HAT", "name_x", "name_y", "metadata"]);

        let one = ds.record(0).unwrap();
        assert_eq!(one.get("token_id"), Some("1"));
        assert_eq!(one.get("name_y"), None);
        assert_eq!(one.get("metadata"), None);

        let three = ds.record(2).unwrap();
        assert_eq!(three.get("HAT"), None);
        assert_eq!(three.get("name_y"), Some("Affe #3"));
        assert!(joined.warnings.is_empty());
    }

    #[test]
    fn outer_join_keeps_first_of_duplicate_keys() {
        let mut l = left();
        l.push_row(row!["1", "Bowler", _]);
        let joined = l.outer_join(&right(), "token_id").unwrap();
        assert_eq!(joined.data.len(), 3);
        assert_eq!(joined.data.record(0).unwrap().get("HAT"), Some("Top Hat"));
        assert_eq!(joined.warnings.len(), 1);
    }

    #[test]
    fn outer_join_requires_key_column() {
        let no_key = DataSet::new(cols!["name"]);
        assert!(matches!(
            no_key.outer_join(&right(), "token_id"),
            Err(Error::MissingColumn(c)) if c == "token_id"
        ));
    }

    #[test]
    fn move_to_front_skips_missing_and_warns() {
        let ds = DataSet::with_rows(cols!["x", "C", "A", "y"], vec![row!["1", "2", "3", "4"]]);
        let out = ds.move_to_front(&["A", "B", "C"]);
        assert_eq!(out.data.headers, cols!["A", "C", "x", "y"]);
        assert_eq!(out.data.rows[0], row!["3", "2", "1", "4"]);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("'B'"));
    }

    #[test]
    fn concat_unions_columns() {
        let out = left().concat(&right());
        assert_eq!(out.headers, cols!["token_id", "HAT", "name", "metadata"]);
        assert_eq!(out.len(), 4);
        assert_eq!(out.record(3).unwrap().get("name"), Some("Affe #3"));
        assert_eq!(out.record(0).unwrap().get("metadata"), None);
    }

    #[test]
    fn distinct_skips_nulls_and_keeps_order() {
        let ds = DataSet::with_rows(
            cols!["token_id"],
            vec![row!["5"], row![_], row!["2"], row!["5"]],
        );
        assert_eq!(ds.distinct("token_id").unwrap(), vec![s!("5"), s!("2")]);
    }

    #[test]
    fn from_objects_stringifies_scalars() {
        let v: Value = serde_json::json!([
            {"token_id": "7", "amount": 1, "metadata": null},
            {"token_id": "8", "verified": true}
        ]);
        let objs: Vec<&Map<String, Value>> =
            v.as_array().unwrap().iter().filter_map(|o| o.as_object()).collect();
        let ds = DataSet::from_objects(objs);
        assert_eq!(ds.headers, cols!["token_id", "amount", "metadata", "verified"]);
        assert_eq!(ds.rows[0], row!["7", "1", _, _]);
        assert_eq!(ds.rows[1], row!["8", _, _, "true"]);
    }

    #[test]
    fn empty_strings_are_null_like_in_csv() {
        let v: Value = serde_json::json!({"token_id": "7", "HAT": "", "PET": null});
        let ds = DataSet::from_objects(v.as_object());
        assert_eq!(ds.rows[0], row!["7", _, _]);

        let mut ds = DataSet::new(cols!["token_id", "HAT"]);
        ds.push_row(vec![Some(s!("8")), Some(s!())]);
        assert_eq!(ds.record(0).unwrap().get("HAT"), None);

        let mut buf = Vec::new();
        crate::csv::write_to(&mut buf, &ds).unwrap();
        assert_eq!(crate::csv::read_from(buf.as_slice()).unwrap(), ds);
    }

    #[test]
    fn preview_clips_rows_cols_and_cells() {
        let ds = DataSet::with_rows(
            cols!["a", "b", "c"],
            vec![
                row!["short", "a very long value indeed", "hidden"],
                row![_, "x", "hidden"],
                row!["cut", "y", "hidden"],
            ],
        );
        let text = ds.preview(2, 2, 10);
        assert!(text.contains("a very ..."));
        assert!(text.contains("NaN"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("cut"));
        assert!(text.contains("[3 rows x 3 columns]"));
    }
}
