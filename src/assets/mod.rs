//! Read-only named resources bundled with the app (accelerometer CSVs, the
//! reference clip). The host decides where they live; the core only opens
//! them by name.

use std::{
    fs::{self, File},
    io::{BufReader, ErrorKind, Read},
    path::{Component, Path, PathBuf},
};

use log::warn;

use crate::error::{VitalsError, VitalsResult};

pub trait AssetSource: Send + Sync {
    fn open(&self, name: &str) -> VitalsResult<Box<dyn Read + Send>>;
}

/// Assets stored as plain files under one directory.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> VitalsResult<PathBuf> {
        let relative = Path::new(name);
        // Asset names are flat or nested relative paths; never allow escaping the root.
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || escapes {
            return Err(VitalsError::NotFound(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetSource for DirAssetSource {
    fn open(&self, name: &str) -> VitalsResult<Box<dyn Read + Send>> {
        let path = self.resolve(name)?;
        let read_error = |message: String| {
            warn!("Cannot read asset {name} at {}: {message}", path.display());
            VitalsError::AssetRead {
                name: name.to_string(),
                message,
            }
        };

        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => return Err(read_error("is a directory".into())),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(VitalsError::NotFound(name.to_string()))
            }
            Err(err) => return Err(read_error(format!("{:?}: {err}", err.kind()))),
        }

        match File::open(&path) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(VitalsError::NotFound(name.to_string()))
            }
            Err(err) => Err(read_error(format!("{:?}: {err}", err.kind()))),
        }
    }
}
