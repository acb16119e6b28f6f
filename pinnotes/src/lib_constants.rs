pub const DEFAULT_IPFS_API_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SCAN_CONCURRENCY: usize = 16;
pub const DEFAULT_MAX_BLOB_SIZE: u64 = 64 * 1024;
pub const DEFAULT_BLOB_CACHE_CAPACITY: usize = 1024;
pub const DEFAULT_BLOB_CACHE_MAX_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_CID_VERSION: u8 = 0;

// relative to the configured api url
pub const IPFS_RPC_PATH: &str = "api/v0/";

pub const ADDED_BLOB_FILE_NAME: &str = "note.json";
