pub mod config;
pub mod ini;
pub mod paths;
pub mod picker;
pub mod profile;

pub use config::SwapperConfig;
pub use profile::{ImageMode, Profile};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Image folder is empty: {}", .0.display())]
    EmptyFolder(std::path::PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
