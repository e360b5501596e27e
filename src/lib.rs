//! Core of the symptom and vitals monitor: heart-rate and respiratory-rate
//! estimation from sensor captures, plus local storage of symptom logs.
//!
//! The host app owns the UI, the camera and the asset bundle. It hands the
//! core capability objects ([`assets::AssetSource`],
//! [`sensing::MediaResolver`], [`sensing::FrameDecoderFactory`]) and drives a
//! [`session::SessionController`].

mod utils;

pub mod assets;
pub mod db;
pub mod error;
pub mod sensing;
pub mod session;
pub mod settings;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::info;

pub use db::{Database, HealthRecord, Symptom, SymptomRatings};
pub use error::{VitalsError, VitalsResult};
pub use session::{Estimate, SessionController, TaskHandle};
pub use settings::SettingsStore;

const DATABASE_FILE: &str = "vitals.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

/// Initialize logging (reads the RUST_LOG env var). Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Everything the host keeps alive for the lifetime of the app.
pub struct VitalsApp {
    pub db: Database,
    pub settings: Arc<SettingsStore>,
    pub session: SessionController,
}

impl VitalsApp {
    /// Open (or create) the store and settings under `app_data_dir` and wire
    /// up the session controller.
    pub fn bootstrap(app_data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(app_data_dir).with_context(|| {
            format!("failed to create app data directory {}", app_data_dir.display())
        })?;

        let database = Database::new(app_data_dir.join(DATABASE_FILE))?;
        let settings = Arc::new(SettingsStore::new(app_data_dir.join(SETTINGS_FILE))?);
        let session = SessionController::new(database.clone(), Arc::clone(&settings));

        info!("Vitals monitor ready in {}", app_data_dir.display());

        Ok(Self {
            db: database,
            settings,
            session,
        })
    }
}
