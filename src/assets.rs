//! Sprite sheet textures
use crate::error::ApplicationError::{MissingTexture, SdlError};
use crate::sprite::{validate_clips, Frame, SheetId, SheetLayout};
use crate::world::decor::FireClip;
use crate::world::player::{LightClip, PlayerClip};
use log::info;
use sdl2::image::LoadTexture;
use sdl2::rect::Rect;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to load texture from '{path}'")]
pub struct TextureLoadingFailed {
  path: PathBuf,
  source: anyhow::Error,
}

#[derive(Debug, Error)]
#[error("Sheet image is {actual:?} pixels, expected at least {expected:?}")]
pub struct SheetTooSmall {
  expected: (u32, u32),
  actual: (u32, u32),
}

/// Textures of all the sheets that come from files, with the layouts of the loaded images.
pub struct Assets<'t> {
  textures: HashMap<SheetId, Texture<'t>>,
  layouts: HashMap<SheetId, SheetLayout>,
}

impl<'t> Assets<'t> {
  /// Load every sheet from `asset_dir` and check that all animation clips fit the loaded images.
  pub fn load(texture_creator: &'t TextureCreator<WindowContext>, asset_dir: &Path) -> Result<Self, anyhow::Error> {
    let mut textures = HashMap::new();
    let mut layouts = HashMap::new();
    for sheet in SheetId::all() {
      if let Some(file_name) = sheet.file_name() {
        let path = asset_dir.join(file_name);
        let (texture, layout) = load_sheet(texture_creator, &path, sheet)?;
        textures.insert(sheet, texture);
        layouts.insert(sheet, layout);
      }
    }

    let assets = Assets { textures, layouts };
    validate_clips::<PlayerClip>(|sheet| assets.layout(sheet))?;
    validate_clips::<FireClip>(|sheet| assets.layout(sheet))?;
    validate_clips::<LightClip>(|sheet| assets.layout(sheet))?;
    info!("Loaded {} sprite sheets from '{}'", assets.textures.len(), asset_dir.display());
    Ok(assets)
  }

  /// Layout of the loaded image; generated sheets keep their fixed layout.
  fn layout(&self, sheet: SheetId) -> SheetLayout {
    self.layouts.get(&sheet).copied().unwrap_or_else(|| sheet.layout())
  }

  /// Draw frame stretched into the `dst` rectangle
  pub fn draw(&self, canvas: &mut WindowCanvas, frame: Frame, dst: Rect) -> Result<(), anyhow::Error> {
    let texture = self.textures.get(&frame.sheet).ok_or(MissingTexture(frame.sheet))?;
    let (x, y, width, height) = self.layout(frame.sheet).frame_rect(frame.index);
    canvas
      .copy(texture, Rect::new(x, y, width, height), dst)
      .map_err(SdlError)?;
    Ok(())
  }

  /// Draw frame at its natural size with its top-left corner at `(x, y)`
  pub fn draw_at(&self, canvas: &mut WindowCanvas, frame: Frame, x: i32, y: i32) -> Result<(), anyhow::Error> {
    let layout = self.layout(frame.sheet);
    self.draw(canvas, frame, Rect::new(x, y, layout.frame_width, layout.frame_height))
  }
}

/// Load sheet image and figure out how many frames it actually holds.
pub fn load_sheet<'t>(
  texture_creator: &'t TextureCreator<WindowContext>,
  path: &Path,
  sheet: SheetId,
) -> Result<(Texture<'t>, SheetLayout), TextureLoadingFailed> {
  load_sheet_internal(texture_creator, path, sheet).map_err(|source| TextureLoadingFailed {
    path: path.to_owned(),
    source,
  })
}

fn load_sheet_internal<'t>(
  texture_creator: &'t TextureCreator<WindowContext>,
  path: &Path,
  sheet: SheetId,
) -> Result<(Texture<'t>, SheetLayout), anyhow::Error> {
  let texture = texture_creator.load_texture(path).map_err(SdlError)?;
  let query = texture.query();
  let expected = sheet.layout();
  let layout = sheet.fit_image(query.width, query.height).ok_or(SheetTooSmall {
    expected: (expected.frame_width, expected.frame_height),
    actual: (query.width, query.height),
  })?;
  Ok((texture, layout))
}
