//! Fog of war: a darkness layer over the maze with holes wherever a light shines.
//!
//! The layer is owned and composed here, pixel by pixel, so the frontend only has to upload it as
//! an alpha texture and draw it over the maze at the camera offset. Composition never looks at the
//! maze or the player cell, so fog cannot influence gameplay.
use crate::config::FogConfig;
use crate::sprite::{AnimatedSprite, Frame, SheetId};
use crate::world::player::LightClip;

/// Radial gradient, brightest in the center. Intensity `255` removes the fog completely.
#[derive(Debug, Clone)]
pub struct LightMask {
  width: u32,
  height: u32,
  intensity: Vec<u8>,
}

impl LightMask {
  /// Circular light of the given radius, centered in a `size` x `size` square. Inner half of the
  /// radius is fully lit, outer half fades out linearly.
  pub fn radial(size: u32, radius: f32) -> LightMask {
    let center = size as f32 / 2.0;
    let mut intensity = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
      for x in 0..size {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        let t = if radius > 0.0 { 1.0 - distance / radius } else { 0.0 };
        let value = (t * 2.0).max(0.0).min(1.0);
        intensity.push((value * 255.0).round() as u8);
      }
    }
    LightMask {
      width: size,
      height: size,
      intensity,
    }
  }

  pub fn size(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  pub fn intensity(&self, x: u32, y: u32) -> u8 {
    self.intensity[(y * self.width + x) as usize]
  }
}

/// Masks for every frame of the light sheet, at fog resolution.
pub struct LightBank {
  masks: Vec<LightMask>,
}

impl LightBank {
  /// Generate flicker frames: each frame is a slightly different radius.
  pub fn new(scale: u32) -> LightBank {
    let layout = SheetId::Light.layout();
    let size = layout.frame_width / scale;
    let full_radius = size as f32 / 2.0;
    let masks = (0..layout.frame_count())
      .map(|frame| {
        let shrink = [0.0, 0.03, 0.06, 0.03, 0.015][frame as usize % 5];
        LightMask::radial(size, full_radius * (1.0 - shrink))
      })
      .collect();
    LightBank { masks }
  }

  pub fn mask(&self, frame: Frame) -> Option<&LightMask> {
    if frame.sheet != SheetId::Light {
      return None;
    }
    self.masks.get(frame.index as usize)
  }
}

/// Alpha of the darkness covering the maze image; one value per `scale` x `scale` block.
#[derive(Debug, Clone, PartialEq)]
pub struct FogLayer {
  width: u32,
  height: u32,
  scale: u32,
  alpha: Vec<u8>,
}

impl FogLayer {
  /// Layer covering `image_width` x `image_height` maze pixels.
  pub fn new(image_width: u32, image_height: u32, scale: u32) -> FogLayer {
    let width = (image_width + scale - 1) / scale;
    let height = (image_height + scale - 1) / scale;
    FogLayer {
      width,
      height,
      scale,
      alpha: vec![255; width as usize * height as usize],
    }
  }

  /// Cover everything with darkness
  pub fn reset(&mut self, darkness: u8) {
    for value in self.alpha.iter_mut() {
      *value = darkness;
    }
  }

  /// Apply light mask with its top-left corner at maze pixel `(x, y)`. Lights union: a pixel is
  /// only as dark as the brightest light on it allows.
  pub fn cut(&mut self, mask: &LightMask, x: i32, y: i32) {
    let scale = self.scale as i32;
    let left = x.div_euclid(scale);
    let top = y.div_euclid(scale);
    let (mask_width, mask_height) = mask.size();
    for my in 0..mask_height {
      let fy = top + my as i32;
      if fy < 0 || fy >= self.height as i32 {
        continue;
      }
      for mx in 0..mask_width {
        let fx = left + mx as i32;
        if fx < 0 || fx >= self.width as i32 {
          continue;
        }
        let idx = (fy as u32 * self.width + fx as u32) as usize;
        let lit = 255 - mask.intensity(mx, my);
        if lit < self.alpha[idx] {
          self.alpha[idx] = lit;
        }
      }
    }
  }

  pub fn size(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  pub fn scale(&self) -> u32 {
    self.scale
  }

  /// Darkness at fog pixel `(x, y)`
  pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
    self.alpha[(y * self.width + x) as usize]
  }
}

pub struct VisibilityCompositor {
  bank: LightBank,
  layer: FogLayer,
  darkness: u8,
}

impl VisibilityCompositor {
  pub fn new(image_size: (u32, u32), config: &FogConfig) -> Self {
    VisibilityCompositor {
      bank: LightBank::new(config.scale),
      layer: FogLayer::new(image_size.0, image_size.1, config.scale),
      darkness: config.darkness,
    }
  }

  /// Recompose the fog from the given lights. Returns `None` when fog is disabled, meaning nothing
  /// should be drawn over the maze.
  pub fn compose<'a>(
    &mut self,
    enabled: bool,
    lights: impl IntoIterator<Item = &'a AnimatedSprite<LightClip>>,
  ) -> Option<&FogLayer> {
    if !enabled {
      return None;
    }
    self.layer.reset(self.darkness);
    for light in lights {
      if let Some(mask) = self.bank.mask(light.current_frame()) {
        let (x, y) = light.draw_position();
        self.layer.cut(mask, x, y);
      }
    }
    Some(&self.layer)
  }
}

/// Scroll offset of the maze image on screen. Keeps `target` (a maze pixel) at `anchor` (fraction
/// of the screen) without scrolling past the maze edges. The fog layer is drawn at the same offset.
pub fn camera_offset(screen: (u32, u32), image: (u32, u32), anchor: (f32, f32), target: (f32, f32)) -> (i32, i32) {
  let axis = |screen: u32, image: u32, anchor: f32, target: f32| {
    let offset = (screen as f32 * anchor - target).round() as i32;
    let min = (screen as i32 - image as i32).min(0);
    offset.max(min).min(0)
  };
  (
    axis(screen.0, image.0, anchor.0, target.0),
    axis(screen.1, image.1, anchor.1, target.1),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn radial_mask_is_bright_in_the_middle() {
    let mask = LightMask::radial(100, 50.0);
    assert_eq!(255, mask.intensity(50, 50));
    assert_eq!(0, mask.intensity(0, 0));
    let edge = mask.intensity(90, 50);
    assert!(edge > 0 && edge < 255, "{}", edge);
  }

  #[test]
  fn overlapping_lights_union() {
    let mask = LightMask::radial(20, 10.0);
    let mut single = FogLayer::new(40, 20, 1);
    single.reset(255);
    single.cut(&mask, 0, 0);

    let mut double = single.clone();
    double.cut(&mask, 0, 0);
    // The same light twice is no brighter than once
    assert_eq!(single, double);

    double.cut(&mask, 12, 0);
    for y in 0..20 {
      for x in 0..40 {
        assert!(double.alpha_at(x, y) <= single.alpha_at(x, y));
      }
    }
    assert_eq!(0, double.alpha_at(22, 10));
    assert_eq!(255, single.alpha_at(22, 10));
  }

  #[test]
  fn cut_clips_to_layer() {
    let mask = LightMask::radial(20, 10.0);
    let mut layer = FogLayer::new(10, 10, 1);
    layer.reset(200);
    layer.cut(&mask, -10, -10);
    assert_eq!(0, layer.alpha_at(0, 0));
    assert_eq!(200, layer.alpha_at(9, 9));
    layer.cut(&mask, 100, 100);
  }

  #[test]
  fn scaled_layer_covers_image() {
    let mut layer = FogLayer::new(961, 512, 2);
    assert_eq!((481, 256), layer.size());
    let mask = LightMask::radial(10, 5.0);
    layer.reset(255);
    layer.cut(&mask, 100, 100);
    assert_eq!(0, layer.alpha_at(55, 55));
  }

  #[test]
  fn disabled_fog_composes_nothing() {
    let config = FogConfig::default();
    let mut compositor = VisibilityCompositor::new((960, 512), &config);
    let light = AnimatedSprite::new(100.0, 100.0, LightClip::Flicker, true);
    assert!(compositor.compose(false, std::iter::once(&light)).is_none());

    let layer = compositor.compose(true, std::iter::once(&light)).unwrap();
    // Light center: 100 + 112 maze pixels, at half resolution
    assert_eq!(0, layer.alpha_at(106, 106));
    assert_eq!(255, layer.alpha_at(450, 250));
  }

  #[test]
  fn light_bank_has_a_mask_per_frame() {
    let bank = LightBank::new(2);
    for index in 0..5 {
      let mask = bank.mask(Frame::new(SheetId::Light, index)).unwrap();
      assert_eq!((112, 112), mask.size());
    }
    assert!(bank.mask(Frame::new(SheetId::Light, 5)).is_none());
    assert!(bank.mask(Frame::new(SheetId::Torch, 0)).is_none());
  }

  #[test]
  fn camera_is_clamped_to_maze() {
    let screen = (640, 480);
    let image = (960, 512);
    let anchor = (0.5, 0.8);
    assert_eq!((0, 0), camera_offset(screen, image, anchor, (64.0, 64.0)));
    assert_eq!((-320, -32), camera_offset(screen, image, anchor, (900.0, 500.0)));
    assert_eq!((-128, 0), camera_offset(screen, image, anchor, (448.0, 384.0)));
    // Maze smaller than the screen never scrolls
    assert_eq!((0, 0), camera_offset(screen, (320, 200), anchor, (300.0, 180.0)));
  }
}
