use std::path::PathBuf;

use crate::{Error, Result};

/// Terminator's own configuration file. Owned by the terminal; never
/// created here.
pub fn terminator_config_path() -> Result<PathBuf> {
    Ok(user_config_dir()?.join("terminator").join("config"))
}

/// The swapper's settings file, kept next to the terminal config.
pub fn swapper_config_path() -> Result<PathBuf> {
    Ok(user_config_dir()?
        .join("terminator")
        .join("image_swapper")
        .join("config"))
}

fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config"))
        })
        .ok_or_else(|| {
            Error::Config(
                "Could not find config directory. Please set HOME or XDG_CONFIG_HOME environment variable."
                    .to_string(),
            )
        })
}
