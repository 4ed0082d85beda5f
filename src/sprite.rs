//! Sprite sheets, animation clips and animated sprites.
//!
//! Sprites never touch image data: they only know which sheet they are drawn from and which frame
//! of that sheet is current. The frontend maps `Frame` to an actual texture region.
use crate::config::ConfigError;
use std::fmt::Debug;
use std::ops::Range;

/// All sprite sheets used by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetId {
  Princess,
  Torch,
  Flame,
  /// Radial light masks; generated at startup, not loaded from disk.
  Light,
  Cement,
  Floor,
  Sound,
  NoSound,
  Restart,
  /// Castle drawn above the top of the maze; a single image of whatever size the file has.
  Castle,
}

impl SheetId {
  /// Iterate through all the sheets
  pub fn all() -> impl Iterator<Item = SheetId> {
    [
      SheetId::Princess,
      SheetId::Torch,
      SheetId::Flame,
      SheetId::Light,
      SheetId::Cement,
      SheetId::Floor,
      SheetId::Sound,
      SheetId::NoSound,
      SheetId::Restart,
      SheetId::Castle,
    ]
    .iter()
    .copied()
  }

  /// Image file of the sheet, relative to the asset directory. `None` for generated sheets.
  pub fn file_name(self) -> Option<&'static str> {
    match self {
      SheetId::Princess => Some("princess.png"),
      SheetId::Torch => Some("torch.png"),
      SheetId::Flame => Some("flame.png"),
      SheetId::Light => None,
      SheetId::Cement => Some("cement.png"),
      SheetId::Floor => Some("castlefloors_outside.png"),
      SheetId::Sound => Some("sound.png"),
      SheetId::NoSound => Some("no_sound.png"),
      SheetId::Restart => Some("restart.png"),
      SheetId::Castle => Some("castle.png"),
    }
  }

  pub fn layout(self) -> SheetLayout {
    match self {
      SheetId::Princess => SheetLayout::new(4, 9, 64, 64),
      SheetId::Torch => SheetLayout::new(1, 9, 48, 48),
      SheetId::Flame => SheetLayout::new(1, 12, 24, 36),
      SheetId::Light => SheetLayout::new(1, 5, 224, 224),
      SheetId::Cement => SheetLayout::new(6, 3, 32, 32),
      SheetId::Floor => SheetLayout::new(5, 4, 32, 32),
      SheetId::Sound => SheetLayout::new(1, 1, 64, 64),
      SheetId::NoSound => SheetLayout::new(1, 1, 64, 64),
      SheetId::Restart => SheetLayout::new(1, 1, 48, 48),
      SheetId::Castle => SheetLayout::new(1, 1, 960, 96),
    }
  }

  /// Layout of a loaded sheet image that is `width` x `height` pixels. Frame grids keep their
  /// frame size and take as many frames as fit; single images take the image size.
  /// `None` if the image cannot hold a single frame.
  pub fn fit_image(self, width: u32, height: u32) -> Option<SheetLayout> {
    if let SheetId::Castle = self {
      return if width > 0 && height > 0 {
        Some(SheetLayout::new(1, 1, width, height))
      } else {
        None
      };
    }
    let expected = self.layout();
    let cols = width / expected.frame_width;
    let rows = height / expected.frame_height;
    if cols == 0 || rows == 0 {
      return None;
    }
    Some(SheetLayout::new(rows, cols, expected.frame_width, expected.frame_height))
  }
}

/// Grid of equally sized frames, stored row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
  pub rows: u32,
  pub cols: u32,
  pub frame_width: u32,
  pub frame_height: u32,
}

impl SheetLayout {
  pub const fn new(rows: u32, cols: u32, frame_width: u32, frame_height: u32) -> Self {
    SheetLayout {
      rows,
      cols,
      frame_width,
      frame_height,
    }
  }

  pub fn frame_count(&self) -> u32 {
    self.rows * self.cols
  }

  /// Source rectangle `(x, y, width, height)` of the frame with the given index.
  pub fn frame_rect(&self, index: u32) -> (i32, i32, u32, u32) {
    let col = index % self.cols;
    let row = index / self.cols;
    (
      (col * self.frame_width) as i32,
      (row * self.frame_height) as i32,
      self.frame_width,
      self.frame_height,
    )
  }

  /// Size of the whole sheet image in pixels
  pub fn image_size(&self) -> (u32, u32) {
    (self.cols * self.frame_width, self.rows * self.frame_height)
  }
}

/// Reference to a single frame of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
  pub sheet: SheetId,
  pub index: u32,
}

impl Frame {
  pub fn new(sheet: SheetId, index: u32) -> Self {
    Frame { sheet, index }
  }
}

/// Closed set of animations for one kind of entity.
pub trait Clip: Copy + Eq + Debug + 'static {
  /// Every clip of this kind; used for load-time validation.
  fn all() -> &'static [Self];

  fn name(self) -> &'static str;

  fn sheet(self) -> SheetId;

  /// Range of sheet frame indices played by this clip.
  fn frames(self) -> Range<u32>;

  /// Time each frame stays on screen, in milliseconds. Zero means the clip never advances.
  fn frame_duration(self) -> u32;
}

/// Check that every clip of kind `C` only references frames its sheet actually has.
pub fn validate_clips<C: Clip>(layout: impl Fn(SheetId) -> SheetLayout) -> Result<(), ConfigError> {
  for &clip in C::all() {
    let frames = clip.frames();
    if frames.start >= frames.end {
      return Err(ConfigError::EmptyClip { clip: clip.name() });
    }
    let available = layout(clip.sheet()).frame_count();
    if frames.end > available {
      return Err(ConfigError::MissingFrames {
        clip: clip.name(),
        sheet: clip.sheet(),
        needed: frames.end,
        available,
      });
    }
  }
  Ok(())
}

/// Look up a clip by its name.
pub fn parse_clip<C: Clip>(name: &str) -> Result<C, ConfigError> {
  C::all()
    .iter()
    .copied()
    .find(|clip| clip.name() == name)
    .ok_or_else(|| ConfigError::UnknownClip(name.to_owned()))
}

/// Sprite playing one clip at a time.
#[derive(Debug, Clone)]
pub struct AnimatedSprite<C: Clip> {
  /// Position on the maze image, in pixels.
  pub x: f32,
  pub y: f32,
  /// Draw-time offset; does not affect position.
  pub offset_x: i32,
  pub offset_y: i32,
  clip: C,
  /// Frame index within the clip (not within the sheet)
  frame: u32,
  /// Time spent on the current frame
  elapsed: u32,
  looping: bool,
  finished: bool,
}

impl<C: Clip> AnimatedSprite<C> {
  pub fn new(x: f32, y: f32, clip: C, looping: bool) -> Self {
    AnimatedSprite {
      x,
      y,
      offset_x: 0,
      offset_y: 0,
      clip,
      frame: 0,
      elapsed: 0,
      looping,
      finished: false,
    }
  }

  /// Start playing `clip` from its first frame. Asking for the clip that is already playing keeps
  /// the current frame.
  pub fn play(&mut self, clip: C, looping: bool) {
    if clip == self.clip {
      return;
    }
    self.clip = clip;
    self.frame = 0;
    self.elapsed = 0;
    self.looping = looping;
    self.finished = false;
  }

  pub fn update(&mut self, delta: u32) {
    let duration = u64::from(self.clip.frame_duration());
    if self.finished || duration == 0 {
      return;
    }
    let count = u64::from(self.frame_count());
    let cycle = duration * count;
    let total = u64::from(self.frame) * duration + u64::from(self.elapsed) + u64::from(delta);

    if self.looping {
      let total = total % cycle;
      self.frame = (total / duration) as u32;
      self.elapsed = (total % duration) as u32;
    } else if total >= cycle {
      self.frame = (count - 1) as u32;
      self.elapsed = 0;
      self.finished = true;
    } else {
      self.frame = (total / duration) as u32;
      self.elapsed = (total % duration) as u32;
    }
  }

  pub fn clip(&self) -> C {
    self.clip
  }

  pub fn frame_index(&self) -> u32 {
    self.frame
  }

  pub fn frame_count(&self) -> u32 {
    let frames = self.clip.frames();
    frames.end - frames.start
  }

  pub fn is_looping(&self) -> bool {
    self.looping
  }

  /// Non-looping clip reached its last frame. Terminal until another clip is played.
  pub fn is_finished(&self) -> bool {
    self.finished
  }

  pub fn current_frame(&self) -> Frame {
    Frame::new(self.clip.sheet(), self.clip.frames().start + self.frame)
  }

  pub fn set_position(&mut self, x: f32, y: f32) {
    self.x = x;
    self.y = y;
  }

  /// Top-left corner to draw the current frame at.
  pub fn draw_position(&self) -> (i32, i32) {
    (
      self.x.round() as i32 + self.offset_x,
      self.y.round() as i32 + self.offset_y,
    )
  }

  /// Size of the frame on screen, in pixels
  pub fn frame_size(&self) -> (u32, u32) {
    let layout = self.clip.sheet().layout();
    (layout.frame_width, layout.frame_height)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  enum TestClip {
    Spin,
    Blink,
    Broken,
  }

  impl Clip for TestClip {
    fn all() -> &'static [Self] {
      &[TestClip::Spin, TestClip::Blink]
    }

    fn name(self) -> &'static str {
      match self {
        TestClip::Spin => "spin",
        TestClip::Blink => "blink",
        TestClip::Broken => "broken",
      }
    }

    fn sheet(self) -> SheetId {
      SheetId::Torch
    }

    fn frames(self) -> Range<u32> {
      match self {
        TestClip::Spin => 0..4,
        TestClip::Blink => 4..6,
        TestClip::Broken => 5..12,
      }
    }

    fn frame_duration(self) -> u32 {
      100
    }
  }

  #[test]
  fn loaded_images_define_frame_count() {
    assert_eq!(Some(SheetLayout::new(4, 9, 64, 64)), SheetId::Princess.fit_image(576, 256));
    assert_eq!(Some(SheetLayout::new(1, 10, 48, 48)), SheetId::Torch.fit_image(500, 50));
    assert_eq!(None, SheetId::Flame.fit_image(23, 36));

    assert_eq!(Some(SheetLayout::new(1, 1, 512, 80)), SheetId::Castle.fit_image(512, 80));
    assert_eq!(None, SheetId::Castle.fit_image(0, 80));
    assert_eq!(Some("castle.png"), SheetId::Castle.file_name());
    assert!(SheetId::all().any(|sheet| sheet == SheetId::Castle));
  }

  #[test]
  fn loops_through_frames() {
    let mut sprite = AnimatedSprite::new(0.0, 0.0, TestClip::Spin, true);
    sprite.update(99);
    assert_eq!(0, sprite.frame_index());
    sprite.update(1);
    assert_eq!(1, sprite.frame_index());
    sprite.update(250);
    assert_eq!(3, sprite.frame_index());
    sprite.update(100);
    assert_eq!(0, sprite.frame_index());
    assert!(!sprite.is_finished());
    assert_eq!(Frame::new(SheetId::Torch, 0), sprite.current_frame());
  }

  #[test]
  fn non_looping_clip_stops_on_last_frame() {
    let mut sprite = AnimatedSprite::new(0.0, 0.0, TestClip::Blink, false);
    sprite.update(150);
    assert_eq!(1, sprite.frame_index());
    assert!(!sprite.is_finished());
    sprite.update(1000);
    assert_eq!(1, sprite.frame_index());
    assert!(sprite.is_finished());
    assert_eq!(Frame::new(SheetId::Torch, 5), sprite.current_frame());

    sprite.update(1000);
    assert_eq!(1, sprite.frame_index());
    assert!(sprite.is_finished());
  }

  #[test]
  fn replaying_current_clip_keeps_frame() {
    let mut sprite = AnimatedSprite::new(0.0, 0.0, TestClip::Spin, true);
    sprite.update(230);
    assert_eq!(2, sprite.frame_index());

    sprite.play(TestClip::Spin, true);
    assert_eq!(2, sprite.frame_index());
    sprite.update(70);
    assert_eq!(3, sprite.frame_index());

    sprite.play(TestClip::Blink, true);
    assert_eq!(TestClip::Blink, sprite.clip());
    assert_eq!(0, sprite.frame_index());
    sprite.update(99);
    assert_eq!(0, sprite.frame_index());
  }

  #[test]
  fn playing_new_clip_clears_finished() {
    let mut sprite = AnimatedSprite::new(0.0, 0.0, TestClip::Blink, false);
    sprite.update(500);
    assert!(sprite.is_finished());
    sprite.play(TestClip::Spin, true);
    assert!(!sprite.is_finished());
    assert!(sprite.is_looping());
  }

  #[test]
  fn draw_position_applies_offset() {
    let mut sprite = AnimatedSprite::new(64.0, 128.4, TestClip::Spin, true);
    sprite.offset_x = -16;
    sprite.offset_y = -32;
    assert_eq!((48, 96), sprite.draw_position());
    assert_eq!((48, 48), sprite.frame_size());
  }

  #[test]
  fn validation_catches_missing_frames() {
    validate_clips::<TestClip>(SheetId::layout).unwrap();

    let tiny = |_: SheetId| SheetLayout::new(1, 3, 48, 48);
    match validate_clips::<TestClip>(tiny) {
      Err(ConfigError::MissingFrames {
        clip, needed, available, ..
      }) => {
        assert_eq!("spin", clip);
        assert_eq!(4, needed);
        assert_eq!(3, available);
      }
      other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(TestClip::Broken.frames().end, 12);
  }

  #[test]
  fn clips_parse_by_name() {
    assert_eq!(TestClip::Blink, parse_clip::<TestClip>("blink").unwrap());
    match parse_clip::<TestClip>("dance") {
      Err(ConfigError::UnknownClip(name)) => assert_eq!("dance", name),
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn frame_rects_follow_rows() {
    let layout = SheetId::Princess.layout();
    assert_eq!(36, layout.frame_count());
    assert_eq!((64, 0, 64, 64), layout.frame_rect(1));
    assert_eq!((0, 128, 64, 64), layout.frame_rect(18));
    assert_eq!((576, 256), layout.image_size());
  }
}
