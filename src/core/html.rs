// src/core/html.rs

// Property panels of a marketplace asset page.
//
// Textual properties render as `.Property--type` / `.Property--value` pairs,
// numeric ones as `.NumericTrait--type` / `.NumericTrait--value` ("3 of 5").

use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;
use crate::error::{Error, Result};

pub struct PropertySelectors {
    pairs: Vec<(Selector, Selector)>,
}

impl PropertySelectors {
    pub fn new() -> Result<Self> {
        let pairs = [
            (".Property--type", ".Property--value"),
            (".NumericTrait--type", ".NumericTrait--value"),
        ]
        .into_iter()
        .map(|(t, v)| Ok((parse(t)?, parse(v)?)))
        .collect::<Result<Vec<_>>>()?;
        Ok(Self { pairs })
    }

    /// `(trait, value)` pairs in page order, textual first then numeric.
    /// Types and values are paired positionally; extras on either side are dropped.
    pub fn extract(&self, html: &str) -> Vec<(String, String)> {
        let doc = Html::parse_document(html);
        let mut out = Vec::new();
        for (ty, val) in &self.pairs {
            let types = doc.select(ty).map(text_of);
            let values = doc.select(val).map(text_of);
            out.extend(
                types
                    .zip(values)
                    .filter(|(t, _)| !t.is_empty()),
            );
        }
        out
    }
}

fn parse(sel: &str) -> Result<Selector> {
    Selector::parse(sel).map_err(|e| Error::Config(format!("bad selector {sel:?}: {e}")))
}

fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}
