pub const API_PREFIX: &str = "/";

// rocket's own limit name, so `limits.json` in the config applies
pub const NOTE_REQUEST_LIMIT_NAME: &str = "json";
pub const DEFAULT_NOTE_REQUEST_READ_LIMIT: u64 = 16 * 1024;
