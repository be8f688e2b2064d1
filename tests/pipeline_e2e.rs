// tests/pipeline_e2e.rs
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use affe_data::config::consts::{AFFE_CONTRACT, CREATOR_WALLET};
use affe_data::config::options::{DataDirs, PipelineOptions};
use affe_data::csv::read_dataset;
use affe_data::data::{Cell, DataSet};
use affe_data::fetch::{Direction, MarketplaceSource, MetadataSource, PropertyScraper};
use affe_data::pipeline::Pipeline;
use affe_data::progress::Progress;
use affe_data::store::Stage;
use affe_data::{Error, Result};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("affe_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn cells(v: &[Option<&str>]) -> Vec<Cell> {
    v.iter().map(|c| c.map(String::from)).collect()
}

/* ---------------- Fakes ---------------- */

#[derive(Default)]
struct FakeChain {
    resynced: RefCell<Vec<String>>,
}

impl MetadataSource for FakeChain {
    fn get_transfers(&self, wallet: &str, direction: Direction) -> Result<DataSet> {
        assert_eq!(wallet, CREATOR_WALLET);
        assert_eq!(direction, Direction::Both);
        let upper = AFFE_CONTRACT.to_uppercase().replace("0X", "0x");
        Ok(DataSet::with_rows(
            strs(&["token_address", "token_id", "from_address", "to_address"]),
            vec![
                cells(&[Some(AFFE_CONTRACT), Some("1"), Some(CREATOR_WALLET), Some("0xa")]),
                cells(&[Some(upper.as_str()), Some("2"), Some(CREATOR_WALLET), Some("0xb")]),
                cells(&[Some(AFFE_CONTRACT), Some("3"), Some(CREATOR_WALLET), Some("0xc")]),
                cells(&[Some("0xsomewhere"), Some("4"), Some(CREATOR_WALLET), Some("0xd")]),
                cells(&[Some(AFFE_CONTRACT), Some("5"), Some("0xbuyer"), Some(CREATOR_WALLET)]),
            ],
        ))
    }

    fn get_token_metadata(
        &self,
        contract: &str,
        ids: &[String],
        fields: &[&str],
        progress: &mut dyn Progress,
    ) -> Result<DataSet> {
        let mut headers = strs(&["token_address", "token_id", "owner_of", "metadata"]);
        headers.extend(fields.iter().map(|f| f.to_string()));
        let mut ds = DataSet::new(headers);
        progress.begin(ids.len());
        for id in ids {
            let (meta, name) = match id.as_str() {
                "1" => (Some("{\"name\":\"Affe mit Waffe #1\"}"), Some("Affe mit Waffe #1")),
                "2" => (Some("{\"name\":\"Not a monkey\"}"), Some("Not a monkey")),
                _ => (None, None),
            };
            let mut row = cells(&[Some(contract), Some(id.as_str()), Some("0xowner"), meta, name]);
            row.resize(ds.width(), None);
            ds.push_row(row);
            progress.item_done(id);
        }
        progress.finish();
        Ok(ds)
    }

    fn resync_metadata(&self, _contract: &str, id: &str) -> Result<String> {
        self.resynced.borrow_mut().push(id.to_string());
        Ok("Metadata resync request was received".to_string())
    }
}

struct FakeMarket;

impl MarketplaceSource for FakeMarket {
    fn get_tokens_metadata(&self, contract: &str, ids: &[String], _: &mut dyn Progress) -> Result<DataSet> {
        assert_eq!(ids, &["77".to_string()]);
        Ok(DataSet::with_rows(
            strs(&["token_address", "token_id", "metadata", "name", "description"]),
            vec![cells(&[
                Some(contract),
                Some("77"),
                Some("{\"name\":\"Affe mit Waffe #77\"}"),
                Some("Affe mit Waffe #77"),
                Some("Never sold"),
            ])],
        ))
    }
}

#[derive(Default)]
struct FakeScraper {
    started: bool,
    stopped: bool,
    asked: Vec<String>,
}

impl PropertyScraper for FakeScraper {
    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn get_properties(&mut self, _contract: &str, ids: &[String], _: &mut dyn Progress) -> Result<DataSet> {
        assert!(self.started && !self.stopped);
        self.asked = ids.to_vec();
        let mut ds = DataSet::new(strs(&["token_id", "CHIMP", "AK47", "Anticipation", "PET", "HAT"]));
        for id in ids {
            ds.push_row(match id.as_str() {
                "1" => cells(&[Some("1"), Some("Klaus"), Some("Gold"), Some("2 of 5"), Some("3 of 5"), Some("Top Hat")]),
                "77" => cells(&[Some("77"), Some("Susi"), None, None, None, None]),
                other => cells(&[Some(other)]),
            });
        }
        Ok(ds)
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Any call fails: proves a cached run stays offline.
struct Offline;

impl MetadataSource for Offline {
    fn get_transfers(&self, _: &str, _: Direction) -> Result<DataSet> {
        Err(Error::Config("offline".into()))
    }
    fn get_token_metadata(&self, _: &str, _: &[String], _: &[&str], _: &mut dyn Progress) -> Result<DataSet> {
        Err(Error::Config("offline".into()))
    }
    fn resync_metadata(&self, _: &str, _: &str) -> Result<String> {
        Err(Error::Config("offline".into()))
    }
}

impl MarketplaceSource for Offline {
    fn get_tokens_metadata(&self, _: &str, _: &[String], _: &mut dyn Progress) -> Result<DataSet> {
        Err(Error::Config("offline".into()))
    }
}

impl PropertyScraper for Offline {
    fn start(&mut self) -> Result<()> {
        Err(Error::Config("offline".into()))
    }
    fn get_properties(&mut self, _: &str, _: &[String], _: &mut dyn Progress) -> Result<DataSet> {
        Err(Error::Config("offline".into()))
    }
    fn stop(&mut self) {}
}

fn options() -> PipelineOptions {
    PipelineOptions {
        resync_pause: Duration::ZERO,
        preview: None,
        ..Default::default()
    }
}

fn write_manual_urls(dirs: &DataDirs) {
    fs::create_dir_all(dirs.manual()).unwrap();
    fs::write(
        dirs.additional_urls(),
        "opensea_url\n\
         https://opensea.io/assets/ethereum/0x495f947276749ce646f68ac8c248420045cb7b5e/77\n\
         https://opensea.io/assets/ethereum/0x495f947276749ce646f68ac8c248420045cb7b5e/1\n",
    )
    .unwrap();
}

/* ---------------- Tests ---------------- */

#[test]
fn full_build_writes_every_checkpoint_and_converts() {
    let dirs = DataDirs::new(tmp_dir("full"));
    write_manual_urls(&dirs);

    let chain = FakeChain::default();
    let market = FakeMarket;
    let mut scraper = FakeScraper::default();

    let outcome = {
        let mut pipeline = Pipeline::new(dirs.clone(), &chain, &market, &mut scraper, options());
        pipeline.build(true, false).unwrap()
    };

    // resync covers every distinct id on the contract sent by the creator
    assert_eq!(*chain.resynced.borrow(), strs(&["1", "2", "3"]));

    // token 2 is not an Affe, token 3 has no metadata yet and is kept for the scrape
    assert!(scraper.started && scraper.stopped);
    assert_eq!(scraper.asked, strs(&["1", "3", "77"]));

    for stage in Stage::ALL {
        assert!(stage.path(&dirs).exists(), "missing checkpoint {}", stage.name());
    }

    let final_table = read_dataset(&dirs.final_table()).unwrap();
    assert_eq!(final_table.len(), 3);
    assert_eq!(&final_table.headers[..4], &strs(&["name", "CHIMP", "AK47", "Anticipation"])[..]);

    let snapshot = outcome.data;
    let ids: Vec<u32> = snapshot.affen.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 77]);

    let klaus = &snapshot.affen[0];
    assert_eq!(klaus.name_friendly, "Klaus");
    assert_eq!(klaus.emotions_common.get("Anticipation"), Some(&2));
    assert_eq!(klaus.attributes_rare_numerical.get("PET"), Some(&3));
    assert_eq!(klaus.attributes_rare_textual.get("HAT").map(String::as_str), Some("Top Hat"));
    assert_eq!(snapshot.affen[1].story, "Never sold");

    // reorder skips columns that never showed up, and token 3 can't be converted
    assert!(outcome.warnings.iter().any(|w| w.contains("'SPECIAL ABILITY'")));
    assert!(outcome.warnings.iter().any(|w| w.contains("token 3")));
}

#[test]
fn cached_build_reprocesses_checkpoints_offline() {
    let dirs = DataDirs::new(tmp_dir("cached"));
    write_manual_urls(&dirs);
    {
        let chain = FakeChain::default();
        let mut scraper = FakeScraper::default();
        let mut pipeline = Pipeline::new(dirs.clone(), &chain, &FakeMarket, &mut scraper, options());
        pipeline.build(false, false).unwrap();
    }

    let offline = Offline;
    let mut offline_scraper = Offline;
    let mut pipeline = Pipeline::new(dirs.clone(), &offline, &offline, &mut offline_scraper, options());
    let outcome = pipeline.build(true, true).unwrap();
    assert_eq!(outcome.data.affen.len(), 2);
}

#[test]
fn cached_build_without_checkpoints_names_missing_stage() {
    let dirs = DataDirs::new(tmp_dir("cold_cache"));
    let offline = Offline;
    let mut scraper = Offline;
    let mut pipeline = Pipeline::new(dirs, &offline, &offline, &mut scraper, options());
    let err = pipeline.build(false, true).err().unwrap();
    assert!(matches!(err, Error::MissingStageInput("manual-additions")));
}

#[test]
fn manual_additions_checkpoint_written_without_url_file() {
    let dirs = DataDirs::new(tmp_dir("no_urls"));
    let chain = FakeChain::default();
    let mut scraper = FakeScraper::default();
    let mut pipeline = Pipeline::new(dirs.clone(), &chain, &FakeMarket, &mut scraper, options());
    let outcome = pipeline.build(false, false).unwrap();

    let additions = read_dataset(&Stage::ManualAdditions.path(&dirs)).unwrap();
    assert_eq!(additions.len(), 3);
    assert_eq!(outcome.data.affen.len(), 1);
}

#[test]
fn unrefined_transfers_keep_other_senders() {
    let dirs = DataDirs::new(tmp_dir("unrefined"));
    let chain = FakeChain::default();
    let mut scraper = FakeScraper::default();
    let opts = PipelineOptions { refine_transfers: false, ..options() };
    let mut pipeline = Pipeline::new(dirs.clone(), &chain, &FakeMarket, &mut scraper, opts);
    pipeline.build(false, false).unwrap();

    let transfers = read_dataset(&Stage::Transfers.path(&dirs)).unwrap();
    assert_eq!(transfers.len(), 5);
    // token 5 was only ever sent *to* the creator but is on the contract
    let metadata = read_dataset(&Stage::RawMetadata.path(&dirs)).unwrap();
    assert_eq!(metadata.distinct("token_id").unwrap(), strs(&["1", "2", "3", "5"]));
}
