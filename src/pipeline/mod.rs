// src/pipeline/mod.rs
//
// The build: nine stages, each reading its predecessor's output (in memory, or
// from its checkpoint on a cached run) and persisting its own.
//
//  1 transfers         creator wallet transfers, optionally refined
//  2 resync            ask the metadata provider to re-read token URIs
//  3 raw-metadata      token metadata for every id on the contract
//  4 manual-additions  tokens only the marketplace knows about
//  5 refined           drop tokens that aren't Affen
//  6 scrape-extras     properties only shown on the asset page
//  7 combined          outer join of 6 and 5
//  8 final             key columns moved to the front -> output/affe.csv
//  9 preview           console table
//
// A cached run skips the network stages (1-4, 6) and re-processes what the
// last full run left on disk.

pub mod stages;

use std::thread::sleep;

use tracing::{info, warn};

use crate::affe::{Snapshot, convert_all};
use crate::config::consts::METADATA_FIELDS;
use crate::config::options::{DataDirs, PipelineOptions};
use crate::csv::read_dataset;
use crate::error::Result;
use crate::fetch::{Direction, MarketplaceSource, MetadataSource, PropertyScraper};
use crate::outcome::StageOutcome;
use crate::progress::{NullProgress, Progress};
use crate::store::{PipelineState, Stage};

pub struct Pipeline<'a> {
    metadata: &'a dyn MetadataSource,
    marketplace: &'a dyn MarketplaceSource,
    scraper: &'a mut dyn PropertyScraper,
    opts: PipelineOptions,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        dirs: DataDirs,
        metadata: &'a dyn MetadataSource,
        marketplace: &'a dyn MarketplaceSource,
        scraper: &'a mut dyn PropertyScraper,
        opts: PipelineOptions,
    ) -> Self {
        Self { metadata, marketplace, scraper, opts, state: PipelineState::new(dirs) }
    }

    pub fn build(&mut self, resync_metadata: bool, use_cached: bool) -> Result<StageOutcome<Snapshot>> {
        self.build_with_progress(resync_metadata, use_cached, &mut NullProgress)
    }

    /// Run every stage, then convert the final table. Stops at the first
    /// failing stage; everything persisted until then stays on disk.
    pub fn build_with_progress(
        &mut self,
        resync_metadata: bool,
        use_cached: bool,
        progress: &mut dyn Progress,
    ) -> Result<StageOutcome<Snapshot>> {
        self.state.dirs().ensure()?;
        let mut warnings = Vec::new();

        if !use_cached {
            self.transfers(progress)?;
            if resync_metadata {
                self.resync(progress)?;
            }
            self.raw_metadata(progress)?;
            self.manual_additions(progress, &mut warnings)?;
        } else if resync_metadata {
            info!("Cached run: metadata resync skipped");
        }

        self.refine(use_cached, progress)?;
        if !use_cached {
            self.scrape_extras(progress)?;
        }
        self.combine(use_cached, progress, &mut warnings)?;
        self.reorder(use_cached, progress, &mut warnings)?;
        self.preview(use_cached, progress)?;

        let final_table = self.state.input(Stage::Final, false)?;
        let snapshot = log_into(convert_all(&final_table)?, &mut warnings);
        info!("Built {} Affen; full table in {}", snapshot.len(), Stage::Final.path(self.state.dirs()).display());

        Ok(StageOutcome::new(snapshot, warnings))
    }

    /* ---------------- Stages ---------------- */

    pub fn transfers(&mut self, progress: &mut dyn Progress) -> Result<()> {
        banner(progress, "GETTING NFT TRANSFER TRANSACTIONS");
        let mut ds = self.metadata.get_transfers(&self.opts.creator, Direction::Both)?;
        if self.opts.refine_transfers {
            ds = stages::filter_transfers(&ds, &self.opts.contract, &self.opts.creator)?;
        }
        info!("{} transfers kept", ds.len());
        self.state.save_checkpoint(Stage::Transfers, ds)?;
        Ok(())
    }

    pub fn resync(&mut self, progress: &mut dyn Progress) -> Result<()> {
        banner(progress, "REQUESTING METADATA RESYNC");
        let transfers = self.state.input(Stage::Transfers, false)?;
        let ids = stages::ids_on_contract(&transfers, &self.opts.contract)?;

        progress.begin(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if i > 0 { sleep(self.opts.resync_pause); }
            let ack = self.metadata.resync_metadata(&self.opts.contract, id)?;
            info!("Resync requested for token {id}: {ack}");
            progress.item_done(id);
        }
        progress.finish();
        Ok(())
    }

    pub fn raw_metadata(&mut self, progress: &mut dyn Progress) -> Result<()> {
        banner(progress, "GETTING NFT METADATA FROM ON-CHAIN TOKEN URIs");
        let transfers = self.state.input(Stage::Transfers, false)?;
        let ids = stages::ids_on_contract(&transfers, &self.opts.contract)?;
        let ds = self
            .metadata
            .get_token_metadata(&self.opts.contract, &ids, &METADATA_FIELDS, progress)?;
        self.state.save_checkpoint(Stage::RawMetadata, ds)?;
        Ok(())
    }

    /// Tokens created on the storefront but never transferred have no on-chain
    /// record; they come from a hand-kept list of marketplace URLs.
    pub fn manual_additions(&mut self, progress: &mut dyn Progress, warnings: &mut Vec<String>) -> Result<()> {
        banner(progress, "GETTING NFT METADATA FROM OFF-CHAIN TOKEN URIs");
        let nfts = self.state.input(Stage::RawMetadata, false)?;
        if nfts.is_empty() {
            warn_into(warnings, s!("Expected token metadata from the previous stage, but it is empty"));
        }

        let urls_path = self.state.dirs().additional_urls();
        let combined = if urls_path.exists() {
            let urls = read_dataset(&urls_path)?;
            let ids = stages::unknown_ids(&stages::ids_from_urls(&urls)?, &nfts);
            info!("{} additional tokens listed in {}", ids.len(), urls_path.display());
            if ids.is_empty() {
                nfts
            } else {
                let extra = self.marketplace.get_tokens_metadata(&self.opts.contract, &ids, progress)?;
                nfts.concat(&extra)
            }
        } else {
            info!("No {} found; nothing to add", urls_path.display());
            nfts
        };

        self.state.save_checkpoint(Stage::ManualAdditions, combined)?;
        Ok(())
    }

    pub fn refine(&mut self, use_cached: bool, progress: &mut dyn Progress) -> Result<()> {
        banner(progress, "REFINING NFT METADATA");
        let input = self.state.input(Stage::ManualAdditions, use_cached)?;
        let refined = stages::refine(&input);
        info!("{} of {} tokens kept", refined.len(), input.len());
        self.state.save_checkpoint(Stage::Refined, refined)?;
        Ok(())
    }

    pub fn scrape_extras(&mut self, progress: &mut dyn Progress) -> Result<()> {
        banner(progress, "GETTING ADDITIONAL NFT METADATA FROM OPENSEA");
        let refined = self.state.input(Stage::Refined, false)?;
        let ids = stages::ids_on_contract(&refined, &self.opts.contract)?;

        self.scraper.start()?;
        let scraped = self.scraper.get_properties(&self.opts.contract, &ids, progress);
        self.scraper.stop();

        self.state.save_checkpoint(Stage::ScrapeExtras, scraped?)?;
        Ok(())
    }

    pub fn combine(&mut self, use_cached: bool, progress: &mut dyn Progress, warnings: &mut Vec<String>) -> Result<()> {
        banner(progress, "COMBINING METADATA");
        let extras = self.state.input(Stage::ScrapeExtras, use_cached)?;
        let refined = self.state.input(Stage::Refined, use_cached)?;
        let combined = stages::combine(&extras, &refined)?;
        let ds = log_into(combined, warnings);
        self.state.save_checkpoint(Stage::Combined, ds)?;
        Ok(())
    }

    pub fn reorder(&mut self, use_cached: bool, progress: &mut dyn Progress, warnings: &mut Vec<String>) -> Result<()> {
        banner(progress, "REORDERING METADATA");
        let combined = self.state.input(Stage::Combined, use_cached)?;
        let ds = log_into(stages::reorder(&combined, &self.opts.column_order), warnings);
        self.state.save_checkpoint(Stage::Final, ds)?;
        Ok(())
    }

    pub fn preview(&mut self, use_cached: bool, progress: &mut dyn Progress) -> Result<()> {
        let Some(p) = self.opts.preview.clone() else { return Ok(()) };
        banner(progress, "AFFE DATA PREVIEW");
        let final_table = self.state.input(Stage::Final, use_cached)?;
        println!("{}", final_table.preview(p.rows, p.cols, p.width));
        Ok(())
    }
}

fn banner(progress: &mut dyn Progress, title: &str) {
    info!("---------- {title} ----------");
    progress.stage(title);
}

fn warn_into(warnings: &mut Vec<String>, w: String) {
    warn!("{w}");
    warnings.push(w);
}

fn log_into<T>(outcome: StageOutcome<T>, warnings: &mut Vec<String>) -> T {
    for w in outcome.warnings {
        warn_into(warnings, w);
    }
    outcome.data
}
