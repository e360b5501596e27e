// Integration tests for the heart-rate pipeline using synthetic clips.

mod common;

use common::{single_rise_clip, FailingResolver, StaticResolver, SyntheticClip};
use tokio_util::sync::CancellationToken;
use vitals_monitor_lib::{
    sensing::{HeartRateConfig, HeartRateEstimator},
    VitalsError,
};

fn estimator() -> HeartRateEstimator {
    HeartRateEstimator::new(HeartRateConfig::default())
}

#[test]
fn test_constant_intensity_yields_zero() {
    let clip = SyntheticClip::new(425, |_| 120);
    let rate = estimator()
        .estimate("clip", &StaticResolver, &clip, &CancellationToken::new())
        .unwrap();
    assert_eq!(rate, 0);
    assert_eq!(clip.decoded_frames(), 28);
}

#[test]
fn test_empty_clip_yields_zero() {
    let clip = SyntheticClip::new(0, |_| 0);
    let rate = estimator()
        .estimate("clip", &StaticResolver, &clip, &CancellationToken::new())
        .unwrap();
    assert_eq!(rate, 0);
    assert_eq!(clip.decoded_frames(), 0);
    assert!(clip.was_released());
}

#[test]
fn test_single_rise_counts_beats() {
    let clip = single_rise_clip();
    let rate = estimator()
        .estimate("clip", &StaticResolver, &clip, &CancellationToken::new())
        .unwrap();
    assert_eq!(rate, 75);
}

#[test]
fn test_long_clip_is_capped() {
    let clip = SyntheticClip::new(5_000, |_| 10);
    estimator()
        .estimate("clip", &StaticResolver, &clip, &CancellationToken::new())
        .unwrap();
    assert_eq!(clip.decoded_frames(), 28);
}

#[test]
fn test_decode_failure_uses_frames_collected_so_far() {
    // Frames 10 and 25 decode, 40 fails and extraction stops there.
    let clip = single_rise_clip().failing_at(40);
    let rate = estimator()
        .estimate("clip", &StaticResolver, &clip, &CancellationToken::new())
        .unwrap();
    assert_eq!(rate, 0);
    assert_eq!(clip.decoded_frames(), 2);
    assert!(clip.was_released());
}

#[test]
fn test_undersized_frames_degrade_to_zero() {
    let mut config = HeartRateConfig::default();
    config.roi.x = 1_000;
    let clip = single_rise_clip();
    let rate = HeartRateEstimator::new(config)
        .estimate("clip", &StaticResolver, &clip, &CancellationToken::new())
        .unwrap();
    assert_eq!(rate, 0);
    assert!(clip.was_released());
}

#[test]
fn test_unresolvable_reference_aborts() {
    let clip = single_rise_clip();
    let err = estimator()
        .estimate("missing", &FailingResolver, &clip, &CancellationToken::new())
        .unwrap_err();
    assert!(matches!(err, VitalsError::Resolution(_)));
    assert_eq!(clip.decoded_frames(), 0);
}

#[test]
fn test_cancelled_run_reports_cancellation() {
    let clip = single_rise_clip();
    let token = CancellationToken::new();
    token.cancel();
    let err = estimator()
        .estimate("clip", &StaticResolver, &clip, &token)
        .unwrap_err();
    assert!(matches!(err, VitalsError::Cancelled));
    assert!(clip.was_released());
}

#[test]
fn test_image_sequence_on_disk() {
    use vitals_monitor_lib::sensing::{FsMediaResolver, ImageSequenceDecoderFactory};

    let media = tempfile::tempdir().unwrap();
    let clip_dir = media.path().join("HeartRate.mp4");
    std::fs::create_dir(&clip_dir).unwrap();
    for index in 0..100u32 {
        image::RgbImage::from_pixel(460, 460, image::Rgb([50, 50, 50]))
            .save(clip_dir.join(format!("frame_{index:04}.png")))
            .unwrap();
    }

    let rate = estimator()
        .estimate(
            "media://HeartRate.mp4",
            &FsMediaResolver::new(media.path()),
            &ImageSequenceDecoderFactory,
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(rate, 0);
}
