use crate::config::{GameConfig, MazeConfig, Toggles};
use clap::Parser;
use std::path::PathBuf;

/// Find your way through a dark maze by torchlight
#[derive(Parser, Debug)]
#[command(name = "maze-of-kindred", version)]
pub struct Args {
  /// Directory with sprite sheets and music
  #[arg(value_name = "ASSETS", default_value = "assets")]
  pub asset_dir: PathBuf,

  /// Maze width, in tiles
  #[arg(long, default_value_t = 15)]
  pub width: u16,

  /// Maze height, in tiles
  #[arg(long, default_value_t = 8)]
  pub height: u16,

  /// Tile size, in pixels
  #[arg(long, default_value_t = 64)]
  pub tile_size: u32,

  /// Start with the fog of war disabled
  #[arg(long)]
  pub no_fog: bool,

  /// Start with the music muted
  #[arg(long)]
  pub mute: bool,

  /// Seed for maze generation; random if not given
  #[arg(long)]
  pub seed: Option<u64>,
}

impl Args {
  pub fn into_config(self) -> GameConfig {
    let defaults = GameConfig::default();
    GameConfig {
      asset_dir: self.asset_dir,
      maze: MazeConfig {
        width: self.width,
        height: self.height,
        tile_size: self.tile_size,
        ..defaults.maze
      },
      toggles: Toggles {
        fog: !self.no_fog,
        sound: !self.mute,
      },
      seed: self.seed,
      ..defaults
    }
  }
}
