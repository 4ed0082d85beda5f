//! Game configuration. Values are fixed for the whole run; only the toggles change during play.
use crate::sprite::SheetId;
use crate::world::position::Cursor;
use std::path::PathBuf;
use thiserror::Error;

/// Largest side of the maze image, in pixels. Keeps tile positions within `i32` and bounds the
/// fog buffer.
pub const MAX_IMAGE_SIDE: u32 = 8192;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Animation clip '{clip}' needs {needed} frames, but sheet {sheet:?} only has {available}")]
  MissingFrames {
    clip: &'static str,
    sheet: SheetId,
    needed: u32,
    available: u32,
  },

  #[error("Animation clip '{clip}' has no frames")]
  EmptyClip { clip: &'static str },

  #[error("Unknown animation clip '{0}'")]
  UnknownClip(String),

  #[error("Invalid value for '{name}': {reason}")]
  InvalidValue { name: &'static str, reason: String },
}

/// Maze construction parameters.
#[derive(Debug, Clone)]
pub struct MazeConfig {
  /// Width in cells
  pub width: u16,
  /// Height in cells
  pub height: u16,
  /// Size of one cell on the maze image, in pixels
  pub tile_size: u32,
  /// How many times generation is retried before giving up
  pub max_attempts: u32,
  /// Probability of knocking out an extra interior wall, which creates loops
  pub loop_chance: f64,
}

impl MazeConfig {
  /// Player start cell: bottom row of the interior, middle column.
  pub fn start(&self) -> Cursor {
    Cursor::new(self.height - 2, self.width / 2)
  }

  /// Door cell: bottom right corner of the interior.
  pub fn door(&self) -> Cursor {
    Cursor::new(self.height - 2, self.width - 2)
  }

  /// Size of the whole maze image in pixels
  pub fn image_size(&self) -> (u32, u32) {
    (
      u32::from(self.width) * self.tile_size,
      u32::from(self.height) * self.tile_size,
    )
  }
}

impl Default for MazeConfig {
  fn default() -> Self {
    MazeConfig {
      width: 15,
      height: 8,
      tile_size: 64,
      max_attempts: 64,
      loop_chance: 0.1,
    }
  }
}

#[derive(Debug, Clone)]
pub struct FogConfig {
  /// Alpha of unlit areas
  pub darkness: u8,
  /// Fog layer resolution divisor; `2` means one fog pixel covers 2x2 maze pixels.
  pub scale: u32,
}

impl Default for FogConfig {
  fn default() -> Self {
    FogConfig { darkness: 255, scale: 2 }
  }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
  pub asset_dir: PathBuf,
  pub screen_width: u32,
  pub screen_height: u32,
  pub maze: MazeConfig,
  pub fog: FogConfig,
  /// Duration of a single step between two cells, in milliseconds
  pub step_ms: u32,
  /// Duration of the fade in from black at session start, in milliseconds
  pub fade_ms: u32,
  /// Point of the screen (as a fraction of its size) the camera keeps the player at
  pub camera_anchor: (f32, f32),
  /// Music volume, from 0.0 to 1.0
  pub music_volume: f32,
  pub toggles: Toggles,
  pub seed: Option<u64>,
}

impl Default for GameConfig {
  fn default() -> Self {
    GameConfig {
      asset_dir: PathBuf::from("assets"),
      screen_width: 640,
      screen_height: 480,
      maze: MazeConfig::default(),
      fog: FogConfig::default(),
      step_ms: 200,
      fade_ms: 2000,
      camera_anchor: (0.5, 0.8),
      music_volume: 0.2,
      toggles: Toggles::default(),
      seed: None,
    }
  }
}

impl GameConfig {
  /// Reject configurations the game cannot run with.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let maze = &self.maze;
    if maze.width < 5 || maze.height < 5 {
      return Err(invalid("maze size", format!("{}x{} is smaller than 5x5", maze.width, maze.height)));
    }
    if maze.tile_size == 0 {
      return Err(invalid("tile size", "must be positive".to_owned()));
    }
    let widest = u64::from(maze.width.max(maze.height)) * u64::from(maze.tile_size);
    if widest > u64::from(MAX_IMAGE_SIDE) {
      return Err(invalid(
        "maze image size",
        format!(
          "{}x{} cells of {} pixels exceed {} pixels per side",
          maze.width, maze.height, maze.tile_size, MAX_IMAGE_SIDE
        ),
      ));
    }
    if maze.max_attempts == 0 {
      return Err(invalid("max attempts", "must be positive".to_owned()));
    }
    if !(0.0..=1.0).contains(&maze.loop_chance) {
      return Err(invalid("loop chance", format!("{} is not within [0, 1]", maze.loop_chance)));
    }
    if self.fog.scale == 0 {
      return Err(invalid("fog scale", "must be positive".to_owned()));
    }
    if self.screen_width == 0 || self.screen_height == 0 {
      return Err(invalid("screen size", "must be positive".to_owned()));
    }
    if !(0.0..=1.0).contains(&self.music_volume) {
      return Err(invalid("music volume", format!("{} is not within [0, 1]", self.music_volume)));
    }
    Ok(())
  }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
  ConfigError::InvalidValue { name, reason }
}

/// Switches the player can flip while playing. Rendering and audio read these; nothing else does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
  pub fog: bool,
  pub sound: bool,
}

impl Default for Toggles {
  fn default() -> Self {
    Toggles { fog: true, sound: true }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_layout() {
    let config = GameConfig::default();
    config.validate().unwrap();
    assert_eq!(Cursor::new(6, 7), config.maze.start());
    assert_eq!(Cursor::new(6, 13), config.maze.door());
    assert_eq!((960, 512), config.maze.image_size());
  }

  #[test]
  fn rejects_tiny_maze() {
    let mut config = GameConfig::default();
    config.maze.width = 4;
    match config.validate() {
      Err(ConfigError::InvalidValue { name, .. }) => assert_eq!("maze size", name),
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn rejects_bad_fractions() {
    let mut config = GameConfig::default();
    config.maze.loop_chance = 1.5;
    assert!(config.validate().is_err());

    let mut config = GameConfig::default();
    config.music_volume = -0.1;
    assert!(config.validate().is_err());
  }

  fn rejected_name(config: &GameConfig) -> &'static str {
    match config.validate() {
      Err(ConfigError::InvalidValue { name, .. }) => name,
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn rejects_oversized_image() {
    let mut config = GameConfig::default();
    config.maze.tile_size = 200_000_000;
    assert_eq!("maze image size", rejected_name(&config));

    let mut config = GameConfig::default();
    config.maze.width = 2101;
    config.maze.height = 2101;
    assert_eq!("maze image size", rejected_name(&config));

    let mut config = GameConfig::default();
    config.maze.width = 129;
    assert_eq!("maze image size", rejected_name(&config));
  }

  #[test]
  fn accepts_largest_image() {
    let mut config = GameConfig::default();
    config.maze.width = 128;
    config.maze.tile_size = MAX_IMAGE_SIDE / 128;
    config.validate().unwrap();
  }
}
