//! Filesystem-backed media capabilities.
//!
//! Clips are stored as a directory of still frames (one image per frame,
//! ordered by file name) under a media root. This keeps the estimator free of
//! any codec dependency; a host with a platform decoder plugs in its own
//! [`FrameDecoderFactory`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::RgbImage;

use crate::error::{VitalsError, VitalsResult};

use super::heart_rate::{FrameDecoder, FrameDecoderFactory, MediaResolver};

const MEDIA_SCHEME: &str = "media://";
const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Resolves `media://<name>` or a bare `<name>` against a media directory.
/// Absolute paths are accepted as-is when they exist.
#[derive(Debug, Clone)]
pub struct FsMediaResolver {
    media_root: PathBuf,
}

impl FsMediaResolver {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }
}

impl MediaResolver for FsMediaResolver {
    fn resolve(&self, media_ref: &str) -> VitalsResult<PathBuf> {
        let name = media_ref.strip_prefix(MEDIA_SCHEME).unwrap_or(media_ref);
        if name.is_empty() {
            return Err(VitalsError::Resolution(media_ref.to_string()));
        }

        let candidate = Path::new(name);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.media_root.join(candidate)
        };

        if path.exists() {
            Ok(path)
        } else {
            Err(VitalsError::Resolution(format!(
                "{media_ref} (looked for {})",
                path.display()
            )))
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageSequenceDecoderFactory;

impl FrameDecoderFactory for ImageSequenceDecoderFactory {
    fn open(&self, path: &Path) -> VitalsResult<Box<dyn FrameDecoder>> {
        Ok(Box::new(ImageSequenceDecoder::open(path)?))
    }
}

/// Decodes frames lazily from an ordered list of image files.
#[derive(Debug)]
pub struct ImageSequenceDecoder {
    frames: Vec<PathBuf>,
}

impl ImageSequenceDecoder {
    pub fn open(dir: &Path) -> VitalsResult<Self> {
        let entries = fs::read_dir(dir).map_err(|err| {
            VitalsError::Decode(format!("cannot list frames in {}: {err}", dir.display()))
        })?;

        let mut frames = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| VitalsError::Decode(err.to_string()))?;
            let path = entry.path();
            if path.is_file() && is_frame_file(&path) {
                frames.push(path);
            }
        }
        frames.sort();

        Ok(Self { frames })
    }
}

impl FrameDecoder for ImageSequenceDecoder {
    fn frame_count(&mut self) -> VitalsResult<usize> {
        Ok(self.frames.len())
    }

    fn frame_at(&mut self, index: usize) -> VitalsResult<Option<RgbImage>> {
        let Some(path) = self.frames.get(index) else {
            return Ok(None);
        };
        let frame = image::open(path).map_err(|err| {
            VitalsError::Decode(format!("frame {index} ({}): {err}", path.display()))
        })?;
        Ok(Some(frame.to_rgb8()))
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
