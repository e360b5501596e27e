// Fake capabilities shared by the integration tests.
#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use image::{Rgb, RgbImage};
use vitals_monitor_lib::{
    sensing::{FrameDecoder, FrameDecoderFactory, MediaResolver},
    VitalsError, VitalsResult,
};

pub const FRAME_SIZE: u32 = 460;

/// Resolves any reference to a fixed path.
pub struct StaticResolver;

impl MediaResolver for StaticResolver {
    fn resolve(&self, media_ref: &str) -> VitalsResult<PathBuf> {
        Ok(PathBuf::from(format!("/fake/{media_ref}")))
    }
}

pub struct FailingResolver;

impl MediaResolver for FailingResolver {
    fn resolve(&self, media_ref: &str) -> VitalsResult<PathBuf> {
        Err(VitalsError::Resolution(media_ref.to_string()))
    }
}

type Brightness = dyn Fn(usize) -> u8 + Send + Sync;

/// Clip of solid-colour frames whose brightness is a function of the index.
#[derive(Clone)]
pub struct SyntheticClip {
    pub frame_count: usize,
    brightness: Arc<Brightness>,
    /// Decoding this index fails.
    pub fail_at: Option<usize>,
    /// Sleep before every decoded frame, to keep a run in flight.
    pub frame_delay: Option<Duration>,
    pub released: Arc<AtomicBool>,
    pub decoded: Arc<AtomicUsize>,
}

impl SyntheticClip {
    pub fn new(frame_count: usize, brightness: impl Fn(usize) -> u8 + Send + Sync + 'static) -> Self {
        Self {
            frame_count,
            brightness: Arc::new(brightness),
            fail_at: None,
            frame_delay: None,
            released: Arc::new(AtomicBool::new(false)),
            decoded: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn slowed_by(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    pub fn was_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    pub fn decoded_frames(&self) -> usize {
        self.decoded.load(Ordering::SeqCst)
    }
}

impl FrameDecoderFactory for SyntheticClip {
    fn open(&self, _path: &Path) -> VitalsResult<Box<dyn FrameDecoder>> {
        Ok(Box::new(SyntheticDecoder { clip: self.clone() }))
    }
}

struct SyntheticDecoder {
    clip: SyntheticClip,
}

impl FrameDecoder for SyntheticDecoder {
    fn frame_count(&mut self) -> VitalsResult<usize> {
        Ok(self.clip.frame_count)
    }

    fn frame_at(&mut self, index: usize) -> VitalsResult<Option<RgbImage>> {
        if self.clip.fail_at == Some(index) {
            return Err(VitalsError::Decode(format!("corrupt frame {index}")));
        }
        if let Some(delay) = self.clip.frame_delay {
            std::thread::sleep(delay);
        }
        self.clip.decoded.fetch_add(1, Ordering::SeqCst);
        let value = (self.clip.brightness)(index);
        Ok(Some(RgbImage::from_pixel(
            FRAME_SIZE,
            FRAME_SIZE,
            Rgb([value, value, value]),
        )))
    }
}

impl Drop for SyntheticDecoder {
    fn drop(&mut self) {
        self.clip.released.store(true, Ordering::SeqCst);
    }
}

/// A clip that brightens once, after the tenth sampled frame. The smoothed
/// signal rises in five steps of 7500, which reads as 75 bpm.
pub fn single_rise_clip() -> SyntheticClip {
    SyntheticClip::new(425, |index| if index < 160 { 0 } else { 1 })
}

pub fn write_axis(dir: &Path, name: &str, samples: &[f32]) {
    let body: String = samples.iter().map(|s| format!("{s}\n")).collect();
    std::fs::write(dir.join(name), body).unwrap();
}
