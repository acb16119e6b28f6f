pub const DEFAULT_CONFIG_FILE: &str = "/etc/pinnotes/pinnotes.toml";
pub const APP_CONFIG_ENV_PREFIX: &str = "PINNOTES_";
