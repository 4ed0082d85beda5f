use crate::sprite::{AnimatedSprite, Clip, SheetId};
use crate::timer::Timer;
use crate::world::maze::Maze;
use crate::world::position::{Cursor, Direction};
use log::{debug, trace};
use std::ops::Range;

/// Player animations. Princess sheet has one row per facing, first frame of the row is the
/// standing pose, the rest is the walk cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerClip {
  Idle(Direction),
  Walk(Direction),
}

const PLAYER_CLIPS: [PlayerClip; 8] = [
  PlayerClip::Idle(Direction::Up),
  PlayerClip::Idle(Direction::Left),
  PlayerClip::Idle(Direction::Down),
  PlayerClip::Idle(Direction::Right),
  PlayerClip::Walk(Direction::Up),
  PlayerClip::Walk(Direction::Left),
  PlayerClip::Walk(Direction::Down),
  PlayerClip::Walk(Direction::Right),
];

impl Clip for PlayerClip {
  fn all() -> &'static [Self] {
    &PLAYER_CLIPS
  }

  fn name(self) -> &'static str {
    match self {
      PlayerClip::Idle(Direction::Up) => "idle_up",
      PlayerClip::Idle(Direction::Left) => "idle_left",
      PlayerClip::Idle(Direction::Down) => "idle_down",
      PlayerClip::Idle(Direction::Right) => "idle_right",
      PlayerClip::Walk(Direction::Up) => "walk_up",
      PlayerClip::Walk(Direction::Left) => "walk_left",
      PlayerClip::Walk(Direction::Down) => "walk_down",
      PlayerClip::Walk(Direction::Right) => "walk_right",
    }
  }

  fn sheet(self) -> SheetId {
    SheetId::Princess
  }

  fn frames(self) -> Range<u32> {
    let cols = SheetId::Princess.layout().cols;
    match self {
      PlayerClip::Idle(dir) => {
        let row = dir as u32 * cols;
        row..row + 1
      }
      PlayerClip::Walk(dir) => {
        let row = dir as u32 * cols;
        row + 1..row + cols
      }
    }
  }

  fn frame_duration(self) -> u32 {
    match self {
      PlayerClip::Idle(_) => 0,
      PlayerClip::Walk(_) => 60,
    }
  }
}

/// Flicker of a light mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightClip {
  Flicker,
}

impl Clip for LightClip {
  fn all() -> &'static [Self] {
    &[LightClip::Flicker]
  }

  fn name(self) -> &'static str {
    "flicker"
  }

  fn sheet(self) -> SheetId {
    SheetId::Light
  }

  fn frames(self) -> Range<u32> {
    0..SheetId::Light.layout().frame_count()
  }

  fn frame_duration(self) -> u32 {
    120
  }
}

/// Result of a movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
  /// Stepped into the neighbouring cell
  Moved,
  /// Stopped and now standing
  Idle,
  /// Target cell is not walkable
  Blocked,
  /// Previous step is still being animated
  Busy,
  /// Not a unit step
  Invalid,
}

/// Step between two cells being animated.
#[derive(Debug, Clone)]
struct Step {
  from: (f32, f32),
  to: (f32, f32),
  timer: Timer,
}

impl Step {
  fn position(&self) -> (f32, f32) {
    let t = self.timer.percent_done();
    (
      self.from.0 + (self.to.0 - self.from.0) * t,
      self.from.1 + (self.to.1 - self.from.1) * t,
    )
  }
}

pub struct Player {
  pub sprite: AnimatedSprite<PlayerClip>,
  pub light: AnimatedSprite<LightClip>,
  /// Logical position; always a walkable cell.
  cell: Cursor,
  facing: Direction,
  tile_size: u32,
  step_ms: u32,
  step: Option<Step>,
  /// Offset of the light's top-left corner from the player's position
  light_offset: (f32, f32),
}

impl Player {
  /// Create player standing on the given cell, facing up (towards the maze).
  pub fn new(cell: Cursor, tile_size: u32, step_ms: u32) -> Self {
    let (x, y) = cell.pixels(tile_size);
    let facing = Direction::Up;

    let mut sprite = AnimatedSprite::new(x, y, PlayerClip::Idle(facing), false);
    let (frame_width, frame_height) = sprite.frame_size();
    // Center the frame horizontally, stand on the bottom edge of the tile
    sprite.offset_x = (tile_size as i32 - frame_width as i32) / 2;
    sprite.offset_y = tile_size as i32 - frame_height as i32;

    let mut light = AnimatedSprite::new(x, y, LightClip::Flicker, true);
    let (light_width, light_height) = light.frame_size();
    let light_offset = (
      (tile_size as f32 - light_width as f32) / 2.0,
      (tile_size as f32 - light_height as f32) / 2.0,
    );
    light.set_position(x + light_offset.0, y + light_offset.1);

    Player {
      sprite,
      light,
      cell,
      facing,
      tile_size,
      step_ms,
      step: None,
      light_offset,
    }
  }

  /// Try to move by one cell. `(0, 0)` stops the player. The logical position only ever changes
  /// to a walkable cell; the visual position follows over `step_ms`.
  pub fn attempt_move(&mut self, maze: &Maze, dx: i32, dy: i32) -> MoveOutcome {
    if self.is_stepping() {
      return MoveOutcome::Busy;
    }
    if (dx, dy) == (0, 0) {
      self.sprite.play(PlayerClip::Idle(self.facing), false);
      return MoveOutcome::Idle;
    }
    let dir = match Direction::from_delta(dx, dy) {
      Some(dir) => dir,
      None => return MoveOutcome::Invalid,
    };

    let target_x = i32::from(self.cell.col) + dx;
    let target_y = i32::from(self.cell.row) + dy;
    if !maze.is_walkable(target_x, target_y) {
      debug!("Move {:?} from {:?} is blocked", dir, self.cell);
      return MoveOutcome::Blocked;
    }

    let target = Cursor::new(target_y as u16, target_x as u16);
    trace!("Stepping {:?} from {:?} to {:?}", dir, self.cell, target);
    self.step = Some(Step {
      from: self.cell.pixels(self.tile_size),
      to: target.pixels(self.tile_size),
      timer: Timer::new(self.step_ms),
    });
    self.cell = target;
    self.facing = dir;
    self.sprite.play(PlayerClip::Walk(dir), true);
    MoveOutcome::Moved
  }

  /// Advance step animation, frame animations and drag the light along.
  pub fn update(&mut self, delta: u32) {
    if let Some(step) = &mut self.step {
      step.timer.update(delta);
    }
    let (x, y) = self.visual_position();
    if self.step.as_ref().map_or(false, |step| step.timer.is_complete()) {
      self.step = None;
    }
    self.sprite.set_position(x, y);
    self.sprite.update(delta);
    self.light.set_position(x + self.light_offset.0, y + self.light_offset.1);
    self.light.update(delta);
  }

  /// Interpolated position used for rendering
  pub fn visual_position(&self) -> (f32, f32) {
    match &self.step {
      Some(step) => step.position(),
      None => self.cell.pixels(self.tile_size),
    }
  }

  /// Logical position in pixels
  pub fn position(&self) -> (f32, f32) {
    self.cell.pixels(self.tile_size)
  }

  pub fn grid_position(&self) -> Cursor {
    self.cell
  }

  pub fn facing(&self) -> Direction {
    self.facing
  }

  pub fn is_stepping(&self) -> bool {
    self.step.is_some()
  }

  pub fn is_at_door(&self, maze: &Maze) -> bool {
    self.cell == maze.door()
  }
}
