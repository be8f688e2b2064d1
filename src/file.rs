// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::error::Result;

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(crate::Error::Config(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Make sure the directory a file is about to be written to exists.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Serialize `value` to `path` (created/truncated). `pretty` indents by two spaces.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    out.flush()?;
    Ok(())
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Last non-empty `/`-separated segment of a URL, ignoring query and fragment.
/// `https://opensea.io/assets/0x495f.../4242?tab=x` → `4242`
pub fn last_url_segment(url: &str) -> Option<&str> {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end]
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_segment() {
        assert_eq!(last_url_segment("https://opensea.io/assets/0xabc/123"), Some("123"));
        assert_eq!(last_url_segment("https://opensea.io/assets/0xabc/123/"), Some("123"));
        assert_eq!(last_url_segment("https://opensea.io/assets/0xabc/9?tab=1"), Some("9"));
        assert_eq!(last_url_segment(""), None);
    }
}
