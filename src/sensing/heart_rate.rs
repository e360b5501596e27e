//! Heart rate from a fingertip-over-camera clip.
//!
//! Blood volume under the fingertip changes the colour intensity the camera
//! sees. A fixed region of sampled frames is summed, the sums are smoothed,
//! and sharp rises in the smoothed signal are counted as beats.

use std::path::{Path, PathBuf};

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{VitalsError, VitalsResult};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Maps an opaque media reference to a path a [`FrameDecoder`] can open.
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, media_ref: &str) -> VitalsResult<PathBuf>;
}

/// Random-access frame decoding for one opened clip.
///
/// Decoder resources are released when the value is dropped.
pub trait FrameDecoder: Send {
    fn frame_count(&mut self) -> VitalsResult<usize>;

    /// `Ok(None)` means the clip has no picture at this index; the frame is skipped.
    fn frame_at(&mut self, index: usize) -> VitalsResult<Option<RgbImage>>;
}

pub trait FrameDecoderFactory: Send + Sync {
    fn open(&self, path: &Path) -> VitalsResult<Box<dyn FrameDecoder>>;
}

/// Pixel rectangle summed on every sampled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        Self {
            x: 350,
            y: 350,
            width: 100,
            height: 100,
        }
    }
}

/// Calibration for [`HeartRateEstimator`].
///
/// The defaults assume the bundled clip's resolution and frame rate and a
/// finger centred over the lens. `smoothing_divisor` is deliberately not equal
/// to `smoothing_window`; the beat threshold was tuned against that scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeartRateConfig {
    /// Upper bound on the frame span examined, regardless of clip length.
    pub max_frames: usize,
    pub first_frame: usize,
    pub frame_stride: usize,
    pub roi: RegionOfInterest,
    pub smoothing_window: usize,
    pub smoothing_divisor: i64,
    /// Rise between consecutive smoothed values that counts as a beat.
    pub beat_threshold: i64,
    pub seconds_per_minute: i64,
    pub rate_divisor: i64,
}

impl Default for HeartRateConfig {
    fn default() -> Self {
        Self {
            max_frames: 425,
            first_frame: 10,
            frame_stride: 15,
            roi: RegionOfInterest::default(),
            smoothing_window: 5,
            smoothing_divisor: 4,
            beat_threshold: 3500,
            seconds_per_minute: 60,
            rate_divisor: 4,
        }
    }
}

/// Frame indices sampled from a clip with `frame_count` frames.
pub fn sampled_frame_indices(frame_count: usize, config: &HeartRateConfig) -> Vec<usize> {
    let span = frame_count.min(config.max_frames);
    let stride = config.frame_stride.max(1);
    (config.first_frame..span).step_by(stride).collect()
}

/// Sum of red, green and blue over the region of interest.
pub fn roi_intensity(frame: &RgbImage, roi: &RegionOfInterest) -> VitalsResult<i64> {
    let fits = roi.x.checked_add(roi.width).is_some_and(|end| end <= frame.width())
        && roi.y.checked_add(roi.height).is_some_and(|end| end <= frame.height());
    if !fits {
        return Err(VitalsError::Decode(format!(
            "frame {}x{} does not contain region {}x{} at ({}, {})",
            frame.width(),
            frame.height(),
            roi.width,
            roi.height,
            roi.x,
            roi.y
        )));
    }

    let mut total = 0i64;
    for y in roi.y..roi.y + roi.height {
        for x in roi.x..roi.x + roi.width {
            let [r, g, b] = frame.get_pixel(x, y).0;
            total += i64::from(r) + i64::from(g) + i64::from(b);
        }
    }
    Ok(total)
}

/// Moving sum over `smoothing_window` values divided by `smoothing_divisor`.
///
/// Produces `len - window - 1` values: the final full window is never
/// emitted, which the beat threshold was calibrated against.
pub fn smooth_intensities(intensities: &[i64], config: &HeartRateConfig) -> Vec<i64> {
    let window = config.smoothing_window.max(1);
    if config.smoothing_divisor == 0 {
        return Vec::new();
    }
    // A window wider than the input (or absurdly large) leaves nothing to smooth.
    let Some(count) = window
        .checked_add(1)
        .and_then(|span| intensities.len().checked_sub(span))
    else {
        return Vec::new();
    };

    (0..count)
        .map(|i| intensities[i..i + window].iter().sum::<i64>() / config.smoothing_divisor)
        .collect()
}

/// Number of rises above the beat threshold between consecutive smoothed
/// values. The last smoothed value is not compared.
pub fn count_beats(smoothed: &[i64], config: &HeartRateConfig) -> u32 {
    let Some(&first) = smoothed.first() else {
        return 0;
    };

    let mut previous = first;
    let mut beats = 0u32;
    for &value in smoothed.iter().take(smoothed.len().saturating_sub(1)).skip(1) {
        if value - previous > config.beat_threshold {
            beats += 1;
        }
        previous = value;
    }
    beats
}

/// Beats per minute from per-frame intensities.
pub fn rate_from_intensities(intensities: &[i64], config: &HeartRateConfig) -> u32 {
    let smoothed = smooth_intensities(intensities, config);
    let beats = count_beats(&smoothed, config);
    if config.rate_divisor <= 0 {
        return 0;
    }
    let rate = i64::from(beats).saturating_mul(config.seconds_per_minute) / config.rate_divisor;
    u32::try_from(rate.max(0)).unwrap_or(u32::MAX)
}

pub struct HeartRateEstimator {
    config: HeartRateConfig,
}

impl HeartRateEstimator {
    pub fn new(config: HeartRateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeartRateConfig {
        &self.config
    }

    /// Run the full pipeline for `media_ref`.
    ///
    /// Resolution failures abort. Anything that goes wrong while opening the
    /// clip or extracting frames is logged and the rate is computed from the
    /// frames collected so far. Blocks the calling thread while decoding.
    pub fn estimate(
        &self,
        media_ref: &str,
        resolver: &dyn MediaResolver,
        decoders: &dyn FrameDecoderFactory,
        cancel: &CancellationToken,
    ) -> VitalsResult<u32> {
        let path = resolver.resolve(media_ref)?;
        log_info!("Estimating heart rate from {}", path.display());

        let intensities = self.collect_intensities(&path, decoders, cancel)?;
        let rate = rate_from_intensities(&intensities, &self.config);

        log_info!(
            "Heart rate {} bpm from {} sampled frames",
            rate,
            intensities.len()
        );
        Ok(rate)
    }

    fn collect_intensities(
        &self,
        path: &Path,
        decoders: &dyn FrameDecoderFactory,
        cancel: &CancellationToken,
    ) -> VitalsResult<Vec<i64>> {
        let mut intensities = Vec::new();

        // The decoder lives only for this scope; dropping it releases the clip
        // on every path, including early returns.
        let extraction = (|| -> VitalsResult<()> {
            let mut decoder = decoders.open(path)?;
            let frame_count = decoder.frame_count()?;
            let indices = sampled_frame_indices(frame_count, &self.config);
            log_debug!("Clip has {} frames, sampling {}", frame_count, indices.len());

            for index in indices {
                if cancel.is_cancelled() {
                    return Err(VitalsError::Cancelled);
                }
                let Some(frame) = decoder.frame_at(index)? else {
                    continue;
                };
                intensities.push(roi_intensity(&frame, &self.config.roi)?);
            }
            Ok(())
        })();

        match extraction {
            Ok(()) => {}
            Err(VitalsError::Cancelled) => return Err(VitalsError::Cancelled),
            Err(err) => {
                log_warn!(
                    "Frame extraction stopped after {} frames: {err}",
                    intensities.len()
                );
            }
        }

        Ok(intensities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HeartRateConfig {
        HeartRateConfig::default()
    }

    #[test]
    fn samples_every_fifteenth_frame_from_ten() {
        assert_eq!(sampled_frame_indices(100, &config()), vec![10, 25, 40, 55, 70, 85]);
    }

    #[test]
    fn sampling_is_capped_at_max_frames() {
        let indices = sampled_frame_indices(10_000, &config());
        assert_eq!(indices.len(), 28);
        assert_eq!(indices.last(), Some(&415));
    }

    #[test]
    fn empty_clip_samples_nothing() {
        assert!(sampled_frame_indices(0, &config()).is_empty());
        assert!(sampled_frame_indices(10, &config()).is_empty());
    }

    #[test]
    fn roi_sums_all_three_channels() {
        let frame = RgbImage::from_pixel(460, 460, image::Rgb([1, 2, 3]));
        assert_eq!(roi_intensity(&frame, &config().roi).unwrap(), 60_000);
    }

    #[test]
    fn roi_outside_frame_is_a_decode_error() {
        let frame = RgbImage::new(320, 240);
        assert!(matches!(
            roi_intensity(&frame, &config().roi),
            Err(VitalsError::Decode(_))
        ));
    }

    #[test]
    fn smoothing_divides_window_sum_by_four() {
        let intensities = [0, 0, 0, 0, 0, 20_000, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            smooth_intensities(&intensities, &config()),
            vec![0, 5_000, 5_000, 5_000, 5_000, 5_000]
        );
    }

    #[test]
    fn smoothing_short_input_is_empty() {
        for len in 0..=6 {
            assert!(smooth_intensities(&vec![1; len], &config()).is_empty());
        }
    }

    #[test]
    fn oversized_window_smooths_to_nothing() {
        let mut config = config();
        config.smoothing_window = usize::MAX;
        assert!(smooth_intensities(&[1, 2, 3], &config).is_empty());
        assert_eq!(rate_from_intensities(&[1, 2, 3], &config), 0);

        config.smoothing_window = 28;
        assert!(smooth_intensities(&[90_000; 28], &config).is_empty());
    }

    #[test]
    fn huge_minute_scale_saturates() {
        let mut config = config();
        config.seconds_per_minute = i64::MAX;
        let intensities = [0, 0, 0, 0, 0, 20_000, 0, 0, 0, 0, 0, 0];
        assert_eq!(rate_from_intensities(&intensities, &config), u32::MAX);
    }

    #[test]
    fn single_rise_is_one_beat() {
        let intensities = [0, 0, 0, 0, 0, 20_000, 0, 0, 0, 0, 0, 0];
        assert_eq!(rate_from_intensities(&intensities, &config()), 15);
    }

    #[test]
    fn constant_intensity_has_no_beats() {
        assert_eq!(rate_from_intensities(&[90_000; 28], &config()), 0);
    }

    #[test]
    fn rises_below_threshold_are_ignored() {
        let smoothed = [0, 3_500, 7_000, 10_500, 0];
        assert_eq!(count_beats(&smoothed, &config()), 0);
    }

    #[test]
    fn last_smoothed_value_is_not_compared() {
        assert_eq!(count_beats(&[0, 0, 10_000], &config()), 0);
        assert_eq!(count_beats(&[0, 10_000, 10_000], &config()), 1);
    }

    #[test]
    fn empty_intensities_rate_is_zero() {
        assert_eq!(rate_from_intensities(&[], &config()), 0);
    }
}
