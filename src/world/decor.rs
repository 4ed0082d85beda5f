//! Torches and flames hanging on the maze walls, with the light they cast.
use crate::sprite::{AnimatedSprite, Clip, SheetId};
use crate::world::maze::Maze;
use crate::world::player::LightClip;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireClip {
  Torch,
  Flame,
}

impl Clip for FireClip {
  fn all() -> &'static [Self] {
    &[FireClip::Torch, FireClip::Flame]
  }

  fn name(self) -> &'static str {
    match self {
      FireClip::Torch => "torch",
      FireClip::Flame => "flame",
    }
  }

  fn sheet(self) -> SheetId {
    match self {
      FireClip::Torch => SheetId::Torch,
      FireClip::Flame => SheetId::Flame,
    }
  }

  fn frames(self) -> Range<u32> {
    0..self.sheet().layout().frame_count()
  }

  fn frame_duration(self) -> u32 {
    match self {
      FireClip::Torch => 100,
      FireClip::Flame => 80,
    }
  }
}

/// Distance between two torches on the top wall, in cells
const TORCH_SPACING: u16 = 4;

pub struct Decor {
  pub fires: Vec<AnimatedSprite<FireClip>>,
  pub lights: Vec<AnimatedSprite<LightClip>>,
}

impl Decor {
  /// Hang torches along the top wall and a single flame on the left wall. Every fire gets its own
  /// light centered on it.
  pub fn create(maze: &Maze) -> Self {
    let tile = maze.tile_size() as f32;
    let (width, height) = maze.dimensions();
    let mut decor = Decor {
      fires: Vec::new(),
      lights: Vec::new(),
    };

    let torch = SheetId::Torch.layout();
    let mut col = TORCH_SPACING - 1;
    while col < width - 1 {
      let x = f32::from(col) * tile + (tile - torch.frame_width as f32) / 2.0;
      let y = tile - torch.frame_height as f32;
      decor.add(FireClip::Torch, x, y);
      col += TORCH_SPACING;
    }

    let flame = SheetId::Flame.layout();
    let x = (tile - flame.frame_width as f32) / 2.0;
    let y = f32::from(height / 2) * tile + (tile - flame.frame_height as f32) / 2.0;
    decor.add(FireClip::Flame, x, y);
    decor
  }

  fn add(&mut self, clip: FireClip, x: f32, y: f32) {
    let fire = AnimatedSprite::new(x, y, clip, true);
    let (fire_width, fire_height) = fire.frame_size();
    let light = SheetId::Light.layout();
    let light_x = x + (fire_width as f32 - light.frame_width as f32) / 2.0;
    let light_y = y + (fire_height as f32 - light.frame_height as f32) / 2.0;
    self.fires.push(fire);
    self.lights.push(AnimatedSprite::new(light_x, light_y, LightClip::Flicker, true));
  }

  pub fn update(&mut self, delta: u32) {
    for fire in &mut self.fires {
      fire.update(delta);
    }
    for light in &mut self.lights {
      light.update(delta);
    }
  }
}
