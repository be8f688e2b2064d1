// src/config/consts.rs

// Collection
/// OpenSea shared storefront (ERC-1155) where the Affen were minted.
pub const AFFE_CONTRACT: &str = "0x495f947276749ce646f68ac8c248420045cb7b5e";
/// Wallet that created the Affen (Monkeyverse DAO).
pub const CREATOR_WALLET: &str = "0x023a3905e3b33634758871712f4293ddb919b67f";
pub const MUSEUM_WALLET: &str = "0x11f515b85d46ba8aba99cc7a7b385fe9986fe964";

// Net config
pub const MORALIS_BASE: &str = "https://deep-index.moralis.io/api/v2";
pub const MORALIS_CHAIN: &str = "eth";
pub const OPENSEA_METADATA_BASE: &str = "https://api.opensea.io/api/v1/metadata";
pub const OPENSEA_ASSET_BASE: &str = "https://opensea.io/assets/ethereum";
pub const USER_AGENT: &str = concat!("affe_data/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Pacing (be polite)
pub const REQUEST_PAUSE_MS: u64 = 250;
pub const RESYNC_PAUSE_MS: u64 = 1_000;
pub const SCRAPE_PAUSE_MS: u64 = 1_500;
pub const SINK_PAUSE_MS: u64 = 200;

// Data layout under DATA_PATH
pub const DATA_PATH_ENV: &str = "DATA_PATH";
pub const INTERMEDIATE_DIR: &str = "intermediate_files";
pub const MANUAL_DIR: &str = "manual_files";
pub const OUTPUT_DIR: &str = "output";
pub const FLAT_JSON_DIR: &str = "flat_json";
pub const NFT_JSON_DIR: &str = "nft_json";
pub const MUSEUM_TOKENS_DIR: &str = "museum_tokens";
pub const MUSEUM_TRANSFERS_DIR: &str = "museum_transfers";

pub const ADDITIONAL_URLS_FILE: &str = "additional_opensea_urls.csv";
pub const ADDITIONAL_URLS_COLUMN: &str = "opensea_url";
pub const CORRECTIONS_FILE: &str = "corrections.json";
pub const FINAL_FILE: &str = "affe.csv";
pub const FLAT_AGGREGATE_FILE: &str = "00_all_affen_flat.json";
pub const NFT_AGGREGATE_FILE: &str = "00_all_affen_nft.json";
pub const MUSEUM_TRANSFERS_FILE: &str = "transfers_to_museum.csv";

// Metadata
pub const METADATA_FIELDS: [&str; 5] = ["name", "description", "image", "external_link", "animation_url"];

/// Traits every Affe has, in attribute order. CHIMP doubles as the friendly name.
pub const COMMON_ATTRIBUTES: [&str; 2] = ["CHIMP", "AK47"];
pub const FRIENDLY_NAME_COLUMN: &str = "CHIMP";

/// Emotion traits, scored "X of 5".
pub const EMOTIONS: [&str; 10] = [
    "Anger", "Anticipation", "Disgust", "Fear", "Joy",
    "Negative", "Positive", "Sadness", "Surprise", "Trust",
];
pub const EMOTION_MAX: u32 = 5;

/// Provenance and bookkeeping columns that never become traits.
pub const IGNORED_COLUMNS: &[&str] = &[
    "token_address", "token_id", "from_address", "to_address", "owner_of",
    "metadata", "amount", "contract_type", "token_uri", "token_hash",
    "block_number", "block_number_minted", "block_timestamp", "block_hash",
    "transaction_hash", "transaction_index", "transaction_type", "log_index",
    "value", "operator", "verified", "possible_spam", "symbol",
    "last_token_uri_sync", "last_metadata_sync", "minter_address",
    "name", "description", "image", "external_link", "animation_url",
];

/// Collection membership by name prefix: "affe mit" (any case) or exactly "Affe #".
pub const NAME_PREFIX_ANY_CASE: &str = "affe mit";
pub const NAME_PREFIX_EXACT: &str = "Affe #";

/// Columns moved to the front of the final table, in this order.
pub const COLUMN_ORDER: &[&str] = &[
    "name", "CHIMP", "AK47", "Anger", "Anticipation", "Disgust",
    "Fear", "Joy", "Negative", "Positive", "Sadness", "Surprise",
    "Trust", "description", "SPECIAL ABILITY", "TRINKET",
    "FIREWORKS", "HAT", "FLOWER", "SUNGLASSES",
    "PET", "MONOCLE", "APEBALL", "PIPE", "JEWELLERY", "CIGAR",
    "SEASON", "BOWTIE", "SPECIAL ATTRIBUTE", "DRINK", "PANTS",
    "FLAG", "Damage", "Parry", "Speed",
];

// Console preview
pub const PREVIEW_ROWS: usize = 250;
pub const PREVIEW_COLS: usize = 14;
pub const PREVIEW_WIDTH: usize = 25;

// Sink
pub const TABLE_KEY: &str = "id";
pub const TABLE_ENDPOINT_ENV: &str = "AFFE_TABLE_ENDPOINT";
