// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::affe::{Snapshot, convert_all};
use crate::config::consts::{DATA_PATH_ENV, SINK_PAUSE_MS, TABLE_ENDPOINT_ENV};
use crate::config::options::{DataDirs, ExportOptions, PipelineOptions, SinkOptions};
use crate::csv::read_dataset;
use crate::error::{Error, Result};
use crate::fetch::{MoralisClient, OpenSeaClient, OpenSeaScraper, moralis, opensea};
use crate::outcome::StageOutcome;
use crate::pipeline::Pipeline;
use crate::progress::Progress;
use crate::sink::{HttpTableSink, load_items, prepare_items};

#[derive(Parser, Debug)]
#[command(name = "affe_data", version, about = "Collect, combine and export Affe mit Waffe data")]
pub struct Cli {
    /// Base data directory (intermediate_files/, manual_files/, output/ live here).
    #[arg(long, env = DATA_PATH_ENV)]
    pub data_path: PathBuf,

    #[arg(long, env = moralis::API_KEY_ENV, hide_env_values = true)]
    pub moralis_api_key: Option<String>,

    #[arg(long, env = opensea::API_KEY_ENV, hide_env_values = true)]
    pub opensea_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, refine, combine and reorder everything into output/affe.csv.
    Build {
        /// Ask Moralis to re-read every token URI first.
        #[arg(long)]
        resync: bool,
        /// Re-process the checkpoints of the last run instead of fetching.
        #[arg(long)]
        use_cached: bool,
        /// Keep every transfer of the creator wallet, on any contract.
        #[arg(long)]
        no_refine_transfers: bool,
        #[arg(long)]
        no_preview: bool,
        /// Also write the JSON exports.
        #[arg(long)]
        export: bool,
    },
    /// Convert output/affe.csv into output/flat_json/ and output/nft_json/.
    Export {
        /// Keep storefront names in the marketplace view.
        #[arg(long)]
        no_hygiene: bool,
        #[arg(long)]
        compact: bool,
    },
    /// Put the flat records into the hosted table.
    Load {
        #[arg(long, env = TABLE_ENDPOINT_ENV)]
        endpoint: String,
        #[arg(long, default_value_t = SINK_PAUSE_MS)]
        pause_ms: u64,
        /// Emotions -1 and text traits "<>" where blank.
        #[arg(long)]
        fill_blanks: bool,
        /// Prepare and validate, but don't write.
        #[arg(long)]
        dry_run: bool,
    },
    /// Save every transfer into the museum wallet.
    MuseumTransfers,
    /// List the tokens of output/affe.csv the museum holds today.
    MuseumTokens,
}

/// Per-token progress on stderr.
#[derive(Default)]
struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn item_done(&mut self, token_id: &str) {
        self.done += 1;
        eprintln!("  [{}/{}] {token_id}", self.done, self.total);
    }

    fn finish(&mut self) {
        if self.total > 0 && self.done < self.total {
            eprintln!("  stopped after {}/{}", self.done, self.total);
        }
    }
}

pub fn run() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    execute(cli)
}

pub fn execute(cli: Cli) -> Result<()> {
    let dirs = DataDirs::new(&cli.data_path);
    crate::log::init(dirs.root())?;
    info!("affe_data v{} on {}", env!("CARGO_PKG_VERSION"), dirs.root().display());

    let mut progress = ConsoleProgress::default();

    match cli.command {
        Command::Build { resync, use_cached, no_refine_transfers, no_preview, export } => {
            let moralis = match (&cli.moralis_api_key, use_cached) {
                (Some(key), _) => MoralisClient::new(key.clone())?,
                // never called on a cached run
                (None, true) => MoralisClient::new("")?,
                (None, false) => {
                    return Err(Error::Config(format!("{} is not set", moralis::API_KEY_ENV)));
                }
            };
            let opensea = OpenSeaClient::new(cli.opensea_api_key.clone())?;
            let mut scraper = OpenSeaScraper::new();

            let mut opts = PipelineOptions::default();
            opts.refine_transfers = !no_refine_transfers;
            if no_preview { opts.preview = None; }

            let mut pipeline = Pipeline::new(dirs.clone(), &moralis, &opensea, &mut scraper, opts);
            let snapshot = report(pipeline.build_with_progress(resync, use_cached, &mut progress)?);
            if export {
                write_export(&snapshot, &dirs, &ExportOptions::default())?;
            }
        }

        Command::Export { no_hygiene, compact } => {
            let table = read_dataset(&dirs.final_table())?;
            let snapshot = report(convert_all(&table)?);
            let opts = ExportOptions { hygiene: !no_hygiene, pretty: !compact, ..Default::default() };
            write_export(&snapshot, &dirs, &opts)?;
        }

        Command::Load { endpoint, pause_ms, fill_blanks, dry_run } => {
            let opts = SinkOptions { pause: Duration::from_millis(pause_ms), fill_blanks };
            let items = prepare_items(&dirs, &opts)?;
            let mut sink = HttpTableSink::new(endpoint)?;
            if dry_run {
                crate::sink::check_keys(&items, &crate::sink::TableSink::key_fields(&sink))?;
                println!("{} items ready to load", items.len());
            } else {
                let n = load_items(&mut sink, &items, opts.pause, &mut progress)?;
                println!("Loaded {n} items");
            }
        }

        Command::MuseumTransfers => {
            let key = cli
                .moralis_api_key
                .ok_or_else(|| Error::Config(format!("{} is not set", moralis::API_KEY_ENV)))?;
            let source = MoralisClient::new(key)?;
            let (path, ds) = crate::museum::transfers_to_museum(&source, &dirs)?;
            println!("{} transfers -> {}", ds.len(), path.display());
        }

        Command::MuseumTokens => {
            let today = chrono::Local::now().date_naive();
            let (path, ds) = crate::museum::tokens_in_museum(&dirs, today)?;
            println!("{} tokens -> {}", ds.len(), path.display());
        }
    }
    Ok(())
}

fn report<T>(outcome: StageOutcome<T>) -> T {
    if !outcome.warnings.is_empty() {
        warn!("Finished with {} warnings (details above and in the log)", outcome.warnings.len());
    }
    outcome.data
}

fn write_export(snapshot: &Snapshot, dirs: &DataDirs, opts: &ExportOptions) -> Result<()> {
    let summary = snapshot.write(dirs, opts)?;
    println!("Wrote {} files for {} Affen", summary.files_written.len(), snapshot.len());
    Ok(())
}
