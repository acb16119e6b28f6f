use serde::{Deserialize, Serialize};
use crate::lib_constants::{DEFAULT_BLOB_CACHE_CAPACITY, DEFAULT_BLOB_CACHE_MAX_BYTES, DEFAULT_CID_VERSION, DEFAULT_IPFS_API_URL, DEFAULT_MAX_BLOB_SIZE, DEFAULT_SCAN_CONCURRENCY, DEFAULT_STORE_TIMEOUT_MS};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AppConfigData {
    #[serde(default = "app_config_default_ipfs_api_url")]
    pub ipfs_api_url: String,

    #[serde(default = "app_config_default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    #[serde(default = "app_config_default_scan_concurrency")]
    pub scan_concurrency: usize,

    #[serde(default = "app_config_default_max_blob_size")]
    pub max_blob_size: u64,

    #[serde(default = "app_config_default_blob_cache_capacity")]
    pub blob_cache_capacity: usize,

    #[serde(default = "app_config_default_blob_cache_max_bytes")]
    pub blob_cache_max_bytes: usize,

    #[serde(default = "app_config_default_cid_version")]
    pub cid_version: u8,
}

pub fn app_config_default_ipfs_api_url() -> String {
    DEFAULT_IPFS_API_URL.into()
}

pub fn app_config_default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}

pub fn app_config_default_scan_concurrency() -> usize {
    DEFAULT_SCAN_CONCURRENCY
}

pub fn app_config_default_max_blob_size() -> u64 {
    DEFAULT_MAX_BLOB_SIZE
}

pub fn app_config_default_blob_cache_capacity() -> usize {
    DEFAULT_BLOB_CACHE_CAPACITY
}

pub fn app_config_default_blob_cache_max_bytes() -> usize {
    DEFAULT_BLOB_CACHE_MAX_BYTES
}

pub fn app_config_default_cid_version() -> u8 {
    DEFAULT_CID_VERSION
}

impl Default for AppConfigData {
    fn default() -> Self {
        AppConfigData {
            ipfs_api_url: DEFAULT_IPFS_API_URL.into(),
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
            max_blob_size: DEFAULT_MAX_BLOB_SIZE,
            blob_cache_capacity: DEFAULT_BLOB_CACHE_CAPACITY,
            blob_cache_max_bytes: DEFAULT_BLOB_CACHE_MAX_BYTES,
            cid_version: DEFAULT_CID_VERSION,
        }
    }
}
