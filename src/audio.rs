use crate::error::ApplicationError::SdlError;
use sdl2::mixer::{Music, MAX_VOLUME};
use std::path::Path;

/// Background music file, relative to the asset directory
pub const MUSIC_FILE: &str = "longbust.ogg";

/// Looping background music. Muting keeps it playing at zero volume, so unmuting continues where
/// the music currently is.
pub struct Soundtrack {
  music: Music<'static>,
}

impl Soundtrack {
  pub fn load(asset_dir: &Path) -> Result<Self, anyhow::Error> {
    let music = Music::from_file(asset_dir.join(MUSIC_FILE)).map_err(SdlError)?;
    Ok(Soundtrack { music })
  }

  /// Start the music from the beginning, stopping it first if it is already playing.
  pub fn play(&self) -> Result<(), anyhow::Error> {
    self.music.play(-1).map_err(SdlError)?;
    Ok(())
  }

  /// Volume from 0.0 to 1.0
  pub fn set_volume(&self, volume: f32) {
    Music::set_volume((volume * MAX_VOLUME as f32).round() as i32);
  }
}
