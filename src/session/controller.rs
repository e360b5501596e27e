use std::{collections::HashMap, sync::Arc};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    assets::AssetSource,
    db::{Database, HealthRecord, SymptomRatings},
    error::{VitalsError, VitalsResult},
    sensing::{
        estimate_respiratory_rate, load_series, FrameDecoderFactory, HeartRateEstimator,
        MediaResolver,
    },
    settings::SettingsStore,
};

use super::{Estimate, TaskHandle, ValueCell};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Owns the two current vitals and the save/query lifecycle for the UI.
///
/// Background work (heart-rate extraction, storage writes) is spawned on the
/// ambient Tokio runtime, so the trigger and save methods must be called from
/// within one. Overlapping heart-rate runs are not serialized: each publishes
/// when it completes and the last one to finish wins.
#[derive(Clone)]
pub struct SessionController {
    heart_rate: ValueCell<Estimate>,
    respiratory_rate: ValueCell<Estimate>,
    db: Database,
    settings: Arc<SettingsStore>,
}

impl SessionController {
    pub fn new(db: Database, settings: Arc<SettingsStore>) -> Self {
        Self {
            heart_rate: ValueCell::new(Estimate::unmeasured()),
            respiratory_rate: ValueCell::new(Estimate::unmeasured()),
            db,
            settings,
        }
    }

    pub fn heart_rate(&self) -> Estimate {
        self.heart_rate.get()
    }

    pub fn respiratory_rate(&self) -> Estimate {
        self.respiratory_rate.get()
    }

    pub fn subscribe_heart_rate(&self) -> watch::Receiver<Estimate> {
        self.heart_rate.subscribe()
    }

    pub fn subscribe_respiratory_rate(&self) -> watch::Receiver<Estimate> {
        self.respiratory_rate.subscribe()
    }

    /// Compute breaths per minute from three accelerometer axes and publish it.
    pub fn trigger_respiratory_estimate(&self, x: &[f32], y: &[f32], z: &[f32]) -> u32 {
        if x.len() != y.len() || y.len() != z.len() {
            log_warn!(
                "Accelerometer axes differ in length (x={}, y={}, z={}); using the shortest",
                x.len(),
                y.len(),
                z.len()
            );
        }

        let config = self.settings.calibration().respiratory;
        let rate = estimate_respiratory_rate(x, y, z, &config);
        self.respiratory_rate.set(Estimate::now(f64::from(rate)));
        log_info!("Respiratory rate {} breaths/min from {} samples", rate, x.len());
        rate
    }

    /// Load the configured breathing captures from `assets` and estimate from them.
    pub fn measure_respiratory_from_assets(&self, assets: &dyn AssetSource) -> VitalsResult<u32> {
        let names = self.settings.assets();
        let x = load_series(assets, &names.accel_x)?;
        let y = load_series(assets, &names.accel_y)?;
        let z = load_series(assets, &names.accel_z)?;
        Ok(self.trigger_respiratory_estimate(&x, &y, &z))
    }

    /// Start a heart-rate measurement for `media_ref` on the blocking pool.
    /// The observable keeps its previous value until the run completes.
    pub fn trigger_heart_rate_estimate(
        &self,
        media_ref: impl Into<String>,
        resolver: Arc<dyn MediaResolver>,
        decoders: Arc<dyn FrameDecoderFactory>,
    ) -> TaskHandle<u32> {
        let media_ref = media_ref.into();
        let id = Uuid::new_v4();
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let estimator = HeartRateEstimator::new(self.settings.calibration().heart_rate);
        let cell = self.heart_rate.clone();

        log_info!("Heart-rate measurement {} started for {}", id, media_ref);

        let handle = tokio::task::spawn_blocking(move || {
            let result = estimator.estimate(&media_ref, resolver.as_ref(), decoders.as_ref(), &token);
            match &result {
                Ok(rate) => {
                    cell.set(Estimate::now(f64::from(*rate)));
                    log_info!("Heart-rate measurement {} finished: {} bpm", id, rate);
                }
                Err(VitalsError::Cancelled) => {
                    log_info!("Heart-rate measurement {} cancelled", id);
                }
                Err(err) => {
                    log_error!("Heart-rate measurement {} failed: {err}", id);
                }
            }
            result
        });

        TaskHandle::new(id, cancel_token, handle)
    }

    /// Heart-rate measurement on the configured reference clip.
    pub fn trigger_default_heart_rate_estimate(
        &self,
        resolver: Arc<dyn MediaResolver>,
        decoders: Arc<dyn FrameDecoderFactory>,
    ) -> TaskHandle<u32> {
        let media_ref = self.settings.assets().heart_rate_video;
        self.trigger_heart_rate_estimate(media_ref, resolver, decoders)
    }

    /// Snapshot the current vitals with the picker's ratings and store them.
    /// The returned handle may be ignored; failures are logged either way.
    pub fn save(&self, symptom_ratings: &HashMap<String, i32>) -> TaskHandle<i64> {
        self.save_ratings(SymptomRatings::from_named(symptom_ratings))
    }

    pub fn save_ratings(&self, symptoms: SymptomRatings) -> TaskHandle<i64> {
        let record = HealthRecord::new(
            self.heart_rate.get().value,
            self.respiratory_rate.get().value,
            symptoms,
        );
        let id = Uuid::new_v4();
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let db = self.db.clone();

        let handle = tokio::spawn(async move {
            if token.is_cancelled() {
                return Err(VitalsError::Cancelled);
            }
            match db.insert_record(&record).await {
                Ok(record_id) => {
                    log_info!(
                        "Saved health record {} (heart {:.1}, respiratory {:.1})",
                        record_id,
                        record.heart_rate,
                        record.respiratory_rate
                    );
                    Ok(record_id)
                }
                Err(err) => {
                    log_error!("Failed to save health record: {err:#}");
                    Err(VitalsError::storage(err))
                }
            }
        });

        TaskHandle::new(id, cancel_token, handle)
    }

    pub async fn list_records(&self) -> VitalsResult<Vec<HealthRecord>> {
        self.db.get_all_records().await.map_err(VitalsError::storage)
    }

    /// Write every stored record to the log. Returns how many were logged.
    pub async fn log_all_records(&self) -> VitalsResult<usize> {
        let records = self.list_records().await?;
        for record in &records {
            log::info!("Health record: {record:?}");
        }
        Ok(records.len())
    }
}
