// src/museum.rs
//
// Side tools around the DAO museum wallet.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::config::consts::MUSEUM_WALLET;
use crate::config::options::DataDirs;
use crate::core::sanitize::same_address;
use crate::csv::{read_dataset, write_dataset};
use crate::data::DataSet;
use crate::error::{Error, Result};
use crate::fetch::{Direction, MetadataSource};

/// Every NFT transfer into the museum wallet, written to
/// `museum_transfers/transfers_to_museum.csv`.
pub fn transfers_to_museum(source: &dyn MetadataSource, dirs: &DataDirs) -> Result<(PathBuf, DataSet)> {
    let ds = source.get_transfers(MUSEUM_WALLET, Direction::To)?;
    let path = dirs.museum_transfers();
    write_dataset(&path, &ds)?;
    info!("{} transfers to the museum written to {}", ds.len(), path.display());
    Ok((path, ds))
}

/// Rows of the final table currently owned by `wallet`.
pub fn owned_by(final_table: &DataSet, wallet: &str) -> Result<DataSet> {
    final_table.require("owner_of")?;
    Ok(final_table.filter(|r| r.get("owner_of").is_some_and(|o| same_address(o, wallet))))
}

/// Tokens of `output/affe.csv` held by the museum, written to
/// `output/museum_tokens/<date>_tokens_in_museum.csv`.
pub fn tokens_in_museum(dirs: &DataDirs, date: NaiveDate) -> Result<(PathBuf, DataSet)> {
    let src = dirs.final_table();
    if !src.exists() {
        return Err(Error::Config(format!("{} not found; run the build first", src.display())));
    }
    let ds = owned_by(&read_dataset(&src)?, MUSEUM_WALLET)?;
    let path = dirs
        .museum_tokens()
        .join(format!("{}_tokens_in_museum.csv", date.format("%Y-%m-%d")));
    write_dataset(&path, &ds)?;
    info!("{} tokens in the museum written to {}", ds.len(), path.display());
    Ok((path, ds))
}
