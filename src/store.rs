// src/store.rs
//
// Checkpoints: every pipeline stage persists its output as a CSV file and,
// on a cached run, the next stage reads it back instead of recomputing.

use std::path::PathBuf;

use tracing::debug;

use crate::config::options::DataDirs;
use crate::csv::{read_dataset, write_dataset};
use crate::data::DataSet;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Transfers,
    RawMetadata,
    ManualAdditions,
    Refined,
    ScrapeExtras,
    Combined,
    Final,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Transfers,
        Stage::RawMetadata,
        Stage::ManualAdditions,
        Stage::Refined,
        Stage::ScrapeExtras,
        Stage::Combined,
        Stage::Final,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Transfers => "transfers",
            Stage::RawMetadata => "raw-metadata",
            Stage::ManualAdditions => "manual-additions",
            Stage::Refined => "refined",
            Stage::ScrapeExtras => "scrape-extras",
            Stage::Combined => "combined",
            Stage::Final => "final",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Stage::Transfers => "xlii_transactions.csv",
            Stage::RawMetadata => "nfts.csv",
            Stage::ManualAdditions => "nfts_manual_os_additions.csv",
            Stage::Refined => "nfts_refined.csv",
            Stage::ScrapeExtras => "nfts_extra_data.csv",
            Stage::Combined => "combined_data.csv",
            Stage::Final => crate::config::consts::FINAL_FILE,
        }
    }

    pub fn path(self, dirs: &DataDirs) -> PathBuf {
        match self {
            Stage::Final => dirs.final_table(),
            other => dirs.intermediate().join(other.file_name()),
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Stage outputs of the current run, plus access to the ones persisted by
/// earlier runs.
pub struct PipelineState {
    dirs: DataDirs,
    slots: [Option<DataSet>; 7],
}

impl PipelineState {
    pub fn new(dirs: DataDirs) -> Self {
        Self { dirs, slots: Default::default() }
    }

    pub fn dirs(&self) -> &DataDirs { &self.dirs }

    /// Output of `stage` from this run, if it has run.
    pub fn get(&self, stage: Stage) -> Option<&DataSet> {
        self.slots[stage.slot()].as_ref()
    }

    /// Read the persisted output of `stage` and keep it as this run's value.
    pub fn load_checkpoint(&mut self, stage: Stage) -> Result<&DataSet> {
        let path = stage.path(&self.dirs);
        if !path.exists() {
            return Err(Error::MissingStageInput(stage.name()));
        }
        debug!(stage = stage.name(), path = %path.display(), "loading checkpoint");
        let ds = read_dataset(&path)?;
        Ok(self.slots[stage.slot()].insert(ds))
    }

    /// Persist `data` as the output of `stage` and keep it in memory.
    pub fn save_checkpoint(&mut self, stage: Stage, data: DataSet) -> Result<&DataSet> {
        let path = stage.path(&self.dirs);
        write_dataset(&path, &data)?;
        debug!(stage = stage.name(), rows = data.len(), path = %path.display(), "checkpoint saved");
        Ok(self.slots[stage.slot()].insert(data))
    }

    /// This run's output of `stage`, or the persisted one when `use_cached`.
    pub fn input(&mut self, stage: Stage, use_cached: bool) -> Result<DataSet> {
        if use_cached {
            return self.load_checkpoint(stage).cloned();
        }
        self.get(stage)
            .cloned()
            .ok_or(Error::MissingStageInput(stage.name()))
    }
}
