use std::fs;
use std::path::{Path, PathBuf};

use crate::ini::IniFile;
use crate::{Error, Result};

const IMAGE_FOLDER_KEY: &str = "image_folder";

/// The swapper's own settings store. Unlike the terminal config this file
/// belongs to us, so a missing file is created on first use instead of
/// being treated as an error.
pub struct SwapperConfig {
    store: IniFile,
}

impl SwapperConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            if let Some(parent) = path.parent()
                && !parent.is_dir()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, "")?;
        }
        Ok(Self {
            store: IniFile::load(path)?,
        })
    }

    pub fn image_folder(&self) -> Result<PathBuf> {
        let folder = self.store.get(&[], IMAGE_FOLDER_KEY).ok_or_else(|| {
            Error::Config(format!(
                "Missing '{IMAGE_FOLDER_KEY}' setting in config file ({})",
                self.store.path().display()
            ))
        })?;
        let folder = PathBuf::from(folder);
        if !folder.is_dir() {
            return Err(Error::Config(format!(
                "Configured '{IMAGE_FOLDER_KEY}' does not exist: {}",
                folder.display()
            )));
        }
        Ok(folder)
    }

    /// Validates before touching the store, so a bad path never reaches disk.
    pub fn set_image_folder(&mut self, folder: &Path) -> Result<()> {
        if !folder.is_dir() {
            return Err(Error::Config(format!(
                "Given image folder does not exist: {}",
                folder.display()
            )));
        }
        self.store
            .set(&[], IMAGE_FOLDER_KEY, &folder.to_string_lossy());
        self.store.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_missing_file_and_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_swapper").join("config");

        let config = SwapperConfig::load(&path).unwrap();
        assert!(path.is_file());
        // A fresh store has no folder configured yet.
        assert!(matches!(config.image_folder(), Err(Error::Config(_))));
    }

    #[test]
    fn test_set_then_get_image_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        let images = dir.path().join("images");
        fs::create_dir(&images).unwrap();

        let mut config = SwapperConfig::load(&path).unwrap();
        config.set_image_folder(&images).unwrap();

        // The value survives a fresh load.
        let reloaded = SwapperConfig::load(&path).unwrap();
        assert_eq!(reloaded.image_folder().unwrap(), images);
    }

    #[test]
    fn test_set_rejects_missing_directory_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "image_folder = /somewhere\n").unwrap();

        let mut config = SwapperConfig::load(&path).unwrap();
        let result = config.set_image_folder(&dir.path().join("missing"));

        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "image_folder = /somewhere\n"
        );
    }

    #[test]
    fn test_folder_pointing_nowhere_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        let gone = dir.path().join("gone");
        fs::write(
            &path,
            format!("image_folder = {}\n", gone.display()),
        )
        .unwrap();

        let config = SwapperConfig::load(&path).unwrap();
        assert!(matches!(config.image_folder(), Err(Error::Config(_))));
    }

    #[test]
    fn test_folder_pointing_at_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        fs::write(&path, format!("image_folder = {}\n", file.display())).unwrap();

        let config = SwapperConfig::load(&path).unwrap();
        assert!(matches!(config.image_folder(), Err(Error::Config(_))));
    }
}
