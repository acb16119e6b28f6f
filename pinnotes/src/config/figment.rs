use std::path::Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use crate::bin_constants::APP_CONFIG_ENV_PREFIX;
use crate::config::ConfigError;
use crate::config::app_config::AppConfig;
use crate::config::app_config::data::AppConfigData;

pub trait FigmentExt {
    fn setup_app_config(
        self,
        config_file: impl AsRef<Path>,
    ) -> Figment;

    fn extract_app_config(&self) -> Result<AppConfig, ConfigError>;
}

impl FigmentExt for Figment {
    fn setup_app_config(self, config_file: impl AsRef<Path>) -> Figment {
        self.merge(Serialized::defaults(AppConfigData::default()))
            .merge(Toml::file_exact(config_file))
            .merge(Env::prefixed(APP_CONFIG_ENV_PREFIX).global())
    }

    fn extract_app_config(&self) -> Result<AppConfig, ConfigError> {
        self.extract::<AppConfigData>()?.try_into()
    }
}
