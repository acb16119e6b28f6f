use std::path::Path;
use async_trait::async_trait;
use figment::Figment;
use log::{error, info};
use pinnotes::config::figment::FigmentExt;
use pinnotes::note_repository::{NoteRepository, ProductionNoteRepository};
use rocket::fairing::{Fairing, Info};
use rocket::{Build, Rocket};
use crate::routes::ApiRocketBuildExt;

pub fn build_rocket(config_file: impl AsRef<Path>) -> Rocket<Build> {
    let figment = Figment::from(rocket::Config::default())
        .setup_app_config(config_file);
    rocket::custom(figment)
        .attach(AppSetupFairing::new())
}

pub struct AppSetupFairing;

impl AppSetupFairing {
    pub fn new() -> Self {
        AppSetupFairing
    }
}

macro_rules! ok_or_bail {
    ($rocket:ident, $expr:expr, |$e:ident| $error_logger:expr) => ({
        match $expr {
            std::result::Result::Ok(ok) => ok,
            std::result::Result::Err(e) => {
                let $e = e;
                $error_logger;
                return std::result::Result::Err($rocket);
            },
        }
    });
}

#[async_trait]
impl Fairing for AppSetupFairing {
    fn info(&self) -> Info {
        use rocket::fairing::Kind;
        Info {
            name: "app setup",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(
        &self,
        rocket: Rocket<Build>,
    ) -> rocket::fairing::Result {
        let extracted = rocket.figment().extract_app_config();
        let app_config = ok_or_bail!(
            rocket,
            extracted,
            |e| error!("invalid configuration: {e}")
        );
        info!("serving notes pinned at {}", app_config.ipfs_api_url);

        let repository = ok_or_bail!(
            rocket,
            ProductionNoteRepository::new(&app_config),
            |e| error!("failed to set up the ipfs rpc client: {e}")
        );
        let repository: Box<dyn NoteRepository> = Box::new(repository);

        Ok(
            rocket
                .manage(repository)
                .install_pinnotes_api()
        )
    }
}
