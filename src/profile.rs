//! Accessor for the `default` profile of the Terminator configuration.
//!
//! The file lives at a fixed user-scoped location, is created and primarily
//! managed by Terminator itself, and is never auto-created here. Saving is a
//! plain read-modify-write with no locking; a concurrent writer races us and
//! the last write wins.

use std::path::{Path, PathBuf};

use crate::ini::IniFile;
use crate::{Error, Result};

const PROFILES_SECTION: &str = "profiles";
const DEFAULT_PROFILE: &str = "default";

const DARKNESS_KEY: &str = "background_darkness";
const TYPE_KEY: &str = "background_type";
const IMAGE_KEY: &str = "background_image";
const MODE_KEY: &str = "background_image_mode";

/// How Terminator maps the background image onto the terminal area, stored
/// under `background_image_mode` as one of four fixed names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    ScaleAndFit,
    ScaleAndCrop,
    StretchAndFill,
    Tiling,
}

impl ImageMode {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "scale_and_fit" => Ok(Self::ScaleAndFit),
            "scale_and_crop" => Ok(Self::ScaleAndCrop),
            "stretch_and_fill" => Ok(Self::StretchAndFill),
            "tiling" => Ok(Self::Tiling),
            other => Err(Error::Config(format!(
                "Unrecognized background image mode: {other}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScaleAndFit => "scale_and_fit",
            Self::ScaleAndCrop => "scale_and_crop",
            Self::StretchAndFill => "stretch_and_fill",
            Self::Tiling => "tiling",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub background_darkness: f64,
    pub background_type: String,
    pub background_image: PathBuf,
    pub background_image_mode: ImageMode,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let store = open_terminator_config(path)?;
        if !store.contains_section(&[PROFILES_SECTION, DEFAULT_PROFILE]) {
            return Err(Error::Config(format!(
                "No [[{DEFAULT_PROFILE}]] profile under [{PROFILES_SECTION}] in {}",
                path.display()
            )));
        }

        let darkness = require(&store, DARKNESS_KEY, path)?;
        let background_darkness = darkness.parse().map_err(|_| {
            Error::Config(format!("Invalid '{DARKNESS_KEY}' value: {darkness}"))
        })?;

        Ok(Self {
            background_darkness,
            background_type: require(&store, TYPE_KEY, path)?.to_string(),
            background_image: PathBuf::from(require(&store, IMAGE_KEY, path)?),
            background_image_mode: ImageMode::parse(require(&store, MODE_KEY, path)?)?,
        })
    }

    /// Re-opens the terminal config and overwrites exactly the four profile
    /// keys, leaving everything else in the file as Terminator wrote it.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut store = open_terminator_config(path)?;
        let section = [PROFILES_SECTION, DEFAULT_PROFILE];
        store.set(&section, DARKNESS_KEY, &self.background_darkness.to_string());
        store.set(&section, TYPE_KEY, &self.background_type);
        store.set(&section, IMAGE_KEY, &self.background_image.to_string_lossy());
        store.set(&section, MODE_KEY, self.background_image_mode.as_str());
        store.write()
    }
}

fn open_terminator_config(path: &Path) -> Result<IniFile> {
    if !path.is_file() {
        return Err(Error::Config(format!(
            "Missing terminal config. Looking here: {}",
            path.display()
        )));
    }
    IniFile::load(path)
}

fn require<'a>(store: &'a IniFile, key: &str, path: &Path) -> Result<&'a str> {
    store
        .get(&[PROFILES_SECTION, DEFAULT_PROFILE], key)
        .ok_or_else(|| {
            Error::Config(format!(
                "Missing '{key}' in the {DEFAULT_PROFILE} profile of {}",
                path.display()
            ))
        })
}
