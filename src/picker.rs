use rand::seq::IndexedRandom;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SwapperConfig;
use crate::profile::Profile;
use crate::{Error, Result};

/// Picks the next background image from `folder`, never repeating
/// `previous` unless there is no alternative.
///
/// Every immediate entry of the folder counts as a candidate, files and
/// subdirectories alike. With two or more candidates the draw is uniform
/// with rejection: redraw until the result differs from `previous`.
pub fn pick_next(folder: &Path, previous: &Path) -> Result<PathBuf> {
    let mut pool = Vec::new();
    for entry in fs::read_dir(folder)? {
        pool.push(entry?.path());
    }

    match pool.as_slice() {
        [] => Err(Error::EmptyFolder(folder.to_path_buf())),
        [only] => Ok(only.clone()),
        pool => {
            let mut rng = rand::rng();
            loop {
                if let Some(candidate) = pool.choose(&mut rng)
                    && candidate.as_path() != previous
                {
                    return Ok(candidate.clone());
                }
            }
        }
    }
}

/// Rotates the terminal background: loads the profile, resolves the image
/// folder from the swapper settings, picks a fresh image and writes it back.
/// Nothing is saved unless every step before the save succeeded.
pub fn refresh_random_image(swapper_config: &Path, terminator_config: &Path) -> Result<PathBuf> {
    let mut profile = Profile::load(terminator_config)?;
    let settings = SwapperConfig::load(swapper_config)?;
    let folder = settings.image_folder()?;

    let next = pick_next(&folder, &profile.background_image)?;
    profile.background_image = next.clone();
    profile.save(terminator_config)?;

    Ok(next)
}
