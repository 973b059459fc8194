use clap::{Parser, Subcommand};
use std::path::PathBuf;

use terminator_image_swapper::{SwapperConfig, paths, picker};

#[derive(Parser)]
#[command(name = "terminator-image-swapper")]
#[command(
    version,
    about = "Rotates the Terminator background image. Picks a random image from the configured folder and writes it into the default terminal profile."
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Set the folder images are picked from")]
    SetFolder {
        #[arg(help = "Folder containing the background images")]
        image_folder: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Commands::SetFolder { image_folder }) => {
            let mut config = SwapperConfig::load(&paths::swapper_config_path()?)?;
            config.set_image_folder(&image_folder)?;
            println!("Image folder set to: {}", image_folder.display());
        }
        None => {
            let image = picker::refresh_random_image(
                &paths::swapper_config_path()?,
                &paths::terminator_config_path()?,
            )?;
            println!("Background image set to: {}", image.display());
        }
    }

    Ok(())
}
