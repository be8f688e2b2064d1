// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;
use crate::error::Result;
use crate::file::ensure_directory;

/// The directory tree under `DATA_PATH`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDirs {
    root: PathBuf,
}

impl DataDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the working directories if they don't exist yet.
    pub fn ensure(&self) -> Result<()> {
        ensure_directory(&self.intermediate())?;
        ensure_directory(&self.manual())?;
        ensure_directory(&self.output())?;
        Ok(())
    }

    pub fn root(&self) -> &Path { &self.root }
    pub fn intermediate(&self) -> PathBuf { self.root.join(INTERMEDIATE_DIR) }
    pub fn manual(&self) -> PathBuf { self.root.join(MANUAL_DIR) }
    pub fn output(&self) -> PathBuf { self.root.join(OUTPUT_DIR) }

    pub fn final_table(&self) -> PathBuf { self.output().join(FINAL_FILE) }
    pub fn additional_urls(&self) -> PathBuf { self.manual().join(ADDITIONAL_URLS_FILE) }
    pub fn corrections(&self) -> PathBuf { self.manual().join(CORRECTIONS_FILE) }
    pub fn flat_json(&self) -> PathBuf { self.output().join(FLAT_JSON_DIR) }
    pub fn nft_json(&self) -> PathBuf { self.output().join(NFT_JSON_DIR) }
    pub fn museum_tokens(&self) -> PathBuf { self.output().join(MUSEUM_TOKENS_DIR) }
    pub fn museum_transfers(&self) -> PathBuf {
        self.root.join(MUSEUM_TRANSFERS_DIR).join(MUSEUM_TRANSFERS_FILE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewOptions {
    pub rows: usize,
    pub cols: usize,
    pub width: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self { rows: PREVIEW_ROWS, cols: PREVIEW_COLS, width: PREVIEW_WIDTH }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOptions {
    pub contract: String,
    pub creator: String,
    /// Keep only transfers on `contract` sent by `creator`.
    pub refine_transfers: bool,
    pub column_order: Vec<String>,
    pub resync_pause: Duration,
    /// `None` disables the console preview.
    pub preview: Option<PreviewOptions>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            contract: s!(AFFE_CONTRACT),
            creator: s!(CREATOR_WALLET),
            refine_transfers: true,
            column_order: COLUMN_ORDER.iter().map(|c| s!(*c)).collect(),
            resync_pause: Duration::from_millis(RESYNC_PAUSE_MS),
            preview: Some(PreviewOptions::default()),
        }
    }
}

/// Values the flat export always emits for the two utility flags.
/// They are not computed from any data yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatDefaults {
    pub eligible_for_utility: bool,
    pub trusts_in_humanity: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Apply the ERC-721 naming clean-up to the marketplace view.
    pub hygiene: bool,
    pub pretty: bool,
    pub flat_defaults: FlatDefaults,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            hygiene: true,
            pretty: true,
            flat_defaults: FlatDefaults::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkOptions {
    pub pause: Duration,
    /// Fill blank emotions with -1 and blank text traits with "<>".
    pub fill_blanks: bool,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            pause: Duration::from_millis(SINK_PAUSE_MS),
            fill_blanks: false,
        }
    }
}
