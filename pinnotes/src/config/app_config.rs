use std::num::NonZeroUsize;
use std::time::Duration;
use reqwest::Url;
use crate::config::ConfigError;
use crate::config::app_config::data::AppConfigData;

pub mod data;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base url of the node's RPC api, always ending with a `/`.
    pub ipfs_api_url: String,
    pub store_timeout: Duration,
    pub scan_concurrency: NonZeroUsize,
    pub max_blob_size: u64,
    pub blob_cache_capacity: usize,
    /// Budget for the note text and addresses held by the blob cache.
    pub blob_cache_max_bytes: usize,
    pub cid_version: u8,
}

impl TryFrom<AppConfigData> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: AppConfigData) -> Result<Self, Self::Error> {
        if value.store_timeout_ms == 0 {
            return Err(ConfigError::zero("store_timeout_ms"))
        }
        if value.max_blob_size == 0 {
            return Err(ConfigError::zero("max_blob_size"))
        }
        if value.cid_version > 1 {
            return Err(ConfigError::UnsupportedCidVersion(value.cid_version))
        }
        Ok(
            AppConfig {
                ipfs_api_url: normalize_api_url(&value.ipfs_api_url)?,
                store_timeout: Duration::from_millis(value.store_timeout_ms),
                scan_concurrency: NonZeroUsize::new(value.scan_concurrency)
                    .ok_or(ConfigError::zero("scan_concurrency"))?,
                max_blob_size: value.max_blob_size,
                blob_cache_capacity: value.blob_cache_capacity,
                blob_cache_max_bytes: value.blob_cache_max_bytes,
                cid_version: value.cid_version,
            }
        )
    }
}

fn normalize_api_url(url: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidIpfsApiUrl {
        url: url.to_owned(),
        reason,
    };
    let mut parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())))
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".into()))
    }
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Ok(parsed.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_url(url: &str) -> Result<AppConfig, ConfigError> {
        AppConfigData {
            ipfs_api_url: url.into(),
            ..AppConfigData::default()
        }.try_into()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::try_from(AppConfigData::default())
            .expect("default config should be valid");
        assert_eq!(config.ipfs_api_url, "http://127.0.0.1:5001/");
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.scan_concurrency.get(), 16);
        assert_eq!(config.cid_version, 0);
        assert_eq!(config.blob_cache_capacity, 1024);
        assert_eq!(config.blob_cache_max_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn api_url_gets_trailing_slash() {
        assert_eq!(
            config_with_url("https://gateway.example/ipfs-rpc").unwrap().ipfs_api_url,
            "https://gateway.example/ipfs-rpc/",
        );
        assert_eq!(
            config_with_url("http://localhost:5001/").unwrap().ipfs_api_url,
            "http://localhost:5001/",
        );
    }

    #[test]
    fn api_url_is_validated() {
        for url in ["localhost:5001", "ftp://localhost", "http://a/?x=1", ""] {
            let err = config_with_url(url).expect_err(url);
            assert!(
                matches!(err, ConfigError::InvalidIpfsApiUrl { .. }),
                "wrong error type for {url}: {err:#?}",
            );
        }
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = AppConfig::try_from(
            AppConfigData { store_timeout_ms: 0, ..AppConfigData::default() }
        ).expect_err("should fail");
        assert!(matches!(err, ConfigError::Zero { name: "store_timeout_ms" }));

        let err = AppConfig::try_from(
            AppConfigData { max_blob_size: 0, ..AppConfigData::default() }
        ).expect_err("should fail");
        assert!(matches!(err, ConfigError::Zero { name: "max_blob_size" }));
    }

    #[test]
    fn cid_version_is_validated() {
        let err = AppConfig::try_from(
            AppConfigData { cid_version: 2, ..AppConfigData::default() }
        ).expect_err("should fail");
        assert!(matches!(err, ConfigError::UnsupportedCidVersion(2)));
    }
}
