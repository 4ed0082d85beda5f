//! One play session: the world plus everything around it (fade in, toggles, buttons, held keys).
//!
//! Frontends feed abstract input events and frame deltas in, and get back a `Scene` describing
//! exactly what to draw. Nothing here knows about windows, textures or audio devices.
use crate::config::{GameConfig, Toggles};
use crate::fog::{camera_offset, FogLayer, VisibilityCompositor};
use crate::sprite::{Frame, SheetId};
use crate::timer::Timer;
use crate::world::maze::{Backdrop, MazeError};
use crate::world::position::Direction;
use crate::world::World;
use log::{debug, info};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Darkness of the screen behind the restart button
const RESTART_DIM: u8 = 170;
/// Castle image position on the maze image; it sticks out above the top border.
const CASTLE_POSITION: (i32, i32) = (0, -16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
  /// Direction key pressed (or repeated)
  Move(Direction),
  /// Direction key released
  Stop,
  /// Pointer click at screen coordinates
  Click(i32, i32),
  ToggleFog,
  Quit,
}

/// What happened in response to an input event, for the parts of the frontend that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
  Nothing,
  SoundToggled(bool),
  /// World was rebuilt; any cached maze image is stale and the music starts over.
  Restarted,
  Quit,
}

/// Full screen layer drawn on top of everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
  /// Fading in from black; black with the given alpha.
  Fade(u8),
  /// Player reached the door: dimmed screen with the restart button.
  Restart(u8),
  /// Normal play, sound button shows whether sound is on.
  Sound(bool),
}

/// UI image placed at fixed screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
  pub frame: Frame,
  pub x: i32,
  pub y: i32,
}

impl Button {
  fn new(sheet: SheetId, x: i32, y: i32) -> Button {
    Button {
      frame: Frame::new(sheet, 0),
      x,
      y,
    }
  }

  pub fn contains(&self, x: i32, y: i32) -> bool {
    let layout = self.frame.sheet.layout();
    x >= self.x && y >= self.y && x < self.x + layout.frame_width as i32 && y < self.y + layout.frame_height as i32
  }
}

/// Sprite frame at a position on the maze image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
  pub frame: Frame,
  pub x: i32,
  pub y: i32,
}

/// Everything the renderer needs for one frame, in drawing order: the maze image with sprites on
/// it at `offset`, the fog at the same `offset`, then the overlay and its button.
pub struct Scene<'s> {
  pub offset: (i32, i32),
  pub backdrop: &'s Backdrop,
  pub sprites: Vec<Placement>,
  pub fog: Option<&'s FogLayer>,
  pub overlay: Overlay,
  pub button: Option<Button>,
}

pub struct Session {
  config: GameConfig,
  world: World,
  compositor: VisibilityCompositor,
  fade: Timer,
  toggles: Toggles,
  /// Movement held by the player, applied once per frame
  intent: (i32, i32),
  sound_button: Button,
  mute_button: Button,
  restart_button: Button,
  running: bool,
  rng: StdRng,
}

impl Session {
  pub fn new(config: GameConfig) -> Result<Session, anyhow::Error> {
    config.validate()?;
    let mut rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let world = World::create(&config, &mut rng)?;
    let compositor = VisibilityCompositor::new(world.maze.image_size(), &config.fog);
    let right = config.screen_width as i32;
    info!(
      "Started session on a {}x{} maze, door at {:?}",
      config.maze.width,
      config.maze.height,
      world.maze.door()
    );
    Ok(Session {
      fade: Timer::new(config.fade_ms),
      toggles: config.toggles,
      intent: (0, 0),
      sound_button: Button::new(SheetId::Sound, right - 80, 10),
      mute_button: Button::new(SheetId::NoSound, right - 80, 14),
      restart_button: Button::new(SheetId::Restart, right - 70, 15),
      running: true,
      world,
      compositor,
      config,
      rng,
    })
  }

  pub fn handle(&mut self, event: InputEvent) -> Result<Response, MazeError> {
    match event {
      InputEvent::Move(dir) if !self.world.is_at_door() => {
        self.intent = dir.delta();
      }
      InputEvent::Move(_) => {}
      InputEvent::Stop => {
        self.intent = (0, 0);
      }
      InputEvent::Click(x, y) if self.sound_button.contains(x, y) => {
        if self.world.is_at_door() {
          self.restart()?;
          return Ok(Response::Restarted);
        }
        self.toggles.sound = !self.toggles.sound;
        debug!("Sound is now {}", if self.toggles.sound { "on" } else { "off" });
        return Ok(Response::SoundToggled(self.toggles.sound));
      }
      InputEvent::Click(..) => {}
      InputEvent::ToggleFog => {
        self.toggles.fog = !self.toggles.fog;
        debug!("Fog is now {}", if self.toggles.fog { "on" } else { "off" });
      }
      InputEvent::Quit => {
        self.running = false;
        return Ok(Response::Quit);
      }
    }
    Ok(Response::Nothing)
  }

  /// Advance the session by one frame of `delta` milliseconds.
  pub fn update(&mut self, delta: u32) {
    self.fade.update(delta);
    if self.world.is_at_door() {
      self.intent = (0, 0);
    }
    let (dx, dy) = self.intent;
    self.world.attempt_move(dx, dy);
    self.world.update(delta);
  }

  /// Replace the world with a freshly generated one. The new world is fully built before it
  /// replaces the old one; on failure the old world stays.
  pub fn restart(&mut self) -> Result<(), MazeError> {
    let world = World::create(&self.config, &mut self.rng)?;
    self.world = world;
    self.intent = (0, 0);
    self.fade.reset();
    info!("Restarted, door at {:?}", self.world.maze.door());
    Ok(())
  }

  pub fn overlay(&self) -> Overlay {
    if !self.fade.is_complete() {
      let alpha = 255.0 - self.fade.percent_done() * 255.0;
      Overlay::Fade(alpha as u8)
    } else if self.world.is_at_door() {
      Overlay::Restart(RESTART_DIM)
    } else {
      Overlay::Sound(self.toggles.sound)
    }
  }

  fn overlay_button(&self, overlay: Overlay) -> Option<Button> {
    match overlay {
      Overlay::Fade(_) => None,
      Overlay::Restart(_) => Some(self.restart_button),
      Overlay::Sound(true) => Some(self.sound_button),
      Overlay::Sound(false) => Some(self.mute_button),
    }
  }

  /// Compose the frame: camera, sprites, fog and overlay.
  pub fn scene(&mut self) -> Scene<'_> {
    let world = &self.world;
    let offset = camera_offset(
      (self.config.screen_width, self.config.screen_height),
      world.maze.image_size(),
      self.config.camera_anchor,
      world.player.visual_position(),
    );

    let mut sprites = Vec::with_capacity(world.decor.fires.len() + 2);
    let (x, y) = CASTLE_POSITION;
    sprites.push(Placement {
      frame: Frame::new(SheetId::Castle, 0),
      x,
      y,
    });
    let (x, y) = world.player.sprite.draw_position();
    sprites.push(Placement {
      frame: world.player.sprite.current_frame(),
      x,
      y,
    });
    for fire in &world.decor.fires {
      let (x, y) = fire.draw_position();
      sprites.push(Placement {
        frame: fire.current_frame(),
        x,
        y,
      });
    }

    let overlay = self.overlay();
    let button = self.overlay_button(overlay);
    let fog = self.compositor.compose(self.toggles.fog, world.lights());
    Scene {
      offset,
      backdrop: world.maze.background_image(),
      sprites,
      fog,
      overlay,
      button,
    }
  }

  pub fn world(&self) -> &World {
    &self.world
  }

  pub fn toggles(&self) -> Toggles {
    self.toggles
  }

  /// Volume music should play at, from 0.0 to 1.0
  pub fn music_volume(&self) -> f32 {
    if self.toggles.sound {
      self.config.music_volume
    } else {
      0.0
    }
  }

  pub fn is_running(&self) -> bool {
    self.running
  }

  pub fn config(&self) -> &GameConfig {
    &self.config
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::world::position::Cursor;

  fn session(seed: u64) -> Session {
    let config = GameConfig {
      seed: Some(seed),
      ..GameConfig::default()
    };
    Session::new(config).unwrap()
  }

  /// Hold direction keys along the shortest path until the door is reached.
  fn walk_to_door(session: &mut Session) -> usize {
    let mut steps = 0;
    while !session.world().is_at_door() {
      let maze = &session.world().maze;
      let here = session.world().player.grid_position();
      let remaining = maze.shortest_path_len(here, maze.door()).unwrap();
      let dir = Direction::all()
        .find(|dir| {
          let (dx, dy) = dir.delta();
          let x = i32::from(here.col) + dx;
          let y = i32::from(here.row) + dy;
          maze.is_walkable(x, y)
            && maze.shortest_path_len(Cursor::new(y as u16, x as u16), maze.door()) == Some(remaining - 1)
        })
        .unwrap();
      session.handle(InputEvent::Move(dir)).unwrap();
      session.update(session.config().step_ms);
      steps += 1;
      assert!(steps < 15 * 8);
    }
    session.handle(InputEvent::Stop).unwrap();
    steps
  }

  #[test]
  fn fades_in_then_shows_sound_button() {
    let mut session = session(1);
    assert_eq!(Overlay::Fade(255), session.overlay());
    session.update(1000);
    assert_eq!(Overlay::Fade(127), session.overlay());
    session.update(1000);
    assert_eq!(Overlay::Sound(true), session.overlay());
    let scene = session.scene();
    assert_eq!(Some(SheetId::Sound), scene.button.map(|button| button.frame.sheet));
  }

  #[test]
  fn held_key_keeps_walking() {
    let mut session = session(2);
    let start = session.world().player.grid_position();
    session.handle(InputEvent::Move(Direction::Up)).unwrap();
    // First frame starts the step, the rest only animate it
    session.update(16);
    assert_eq!(Cursor::new(start.row - 1, start.col), session.world().player.grid_position());
    for _ in 0..5 {
      session.update(16);
    }
    assert!(session.world().player.is_stepping());
    assert_eq!(Cursor::new(start.row - 1, start.col), session.world().player.grid_position());

    session.handle(InputEvent::Stop).unwrap();
    for _ in 0..20 {
      session.update(16);
    }
    assert!(!session.world().player.is_stepping());
    let position = session.world().player.grid_position();
    assert_eq!(start.col, position.col);
    assert!(position.row < start.row);
  }

  #[test]
  fn click_on_button_toggles_sound() {
    let mut session = session(3);
    assert_eq!(0.2, session.music_volume());
    assert_eq!(Response::SoundToggled(false), session.handle(InputEvent::Click(580, 40)).unwrap());
    assert_eq!(0.0, session.music_volume());
    assert_eq!(Response::Nothing, session.handle(InputEvent::Click(10, 10)).unwrap());
    assert!(!session.toggles().sound);
    session.update(2000);
    assert_eq!(Overlay::Sound(false), session.overlay());
    let scene = session.scene();
    assert_eq!(Some(SheetId::NoSound), scene.button.map(|button| button.frame.sheet));
  }

  #[test]
  fn fog_is_rendering_only() {
    let mut fogged = session(4);
    let mut clear = session(4);
    clear.handle(InputEvent::ToggleFog).unwrap();
    assert!(!clear.toggles().fog);

    let moves = [Direction::Up, Direction::Up, Direction::Left, Direction::Right, Direction::Down];
    for dir in moves.iter() {
      for session in [&mut fogged, &mut clear].iter_mut() {
        session.handle(InputEvent::Move(*dir)).unwrap();
        session.update(250);
      }
      assert_eq!(
        fogged.world().player.grid_position(),
        clear.world().player.grid_position()
      );
      assert_eq!(
        fogged.world().player.visual_position(),
        clear.world().player.visual_position()
      );
    }
    let (width, height) = fogged.world().maze.dimensions();
    for y in -1..=i32::from(height) {
      for x in -1..=i32::from(width) {
        assert_eq!(fogged.world().maze.is_walkable(x, y), clear.world().maze.is_walkable(x, y));
      }
    }

    assert!(fogged.scene().fog.is_some());
    assert!(clear.scene().fog.is_none());
  }

  #[test]
  fn door_stops_input_and_offers_restart() {
    let mut session = session(5);
    session.update(2000);
    let steps = walk_to_door(&mut session);
    assert!(steps >= 6);
    assert_eq!(Overlay::Restart(RESTART_DIM), session.overlay());

    // Keys are ignored at the door
    session.handle(InputEvent::Move(Direction::Left)).unwrap();
    session.update(250);
    assert!(session.world().is_at_door());

    assert_eq!(Response::Restarted, session.handle(InputEvent::Click(600, 30)).unwrap());
    assert!(!session.world().is_at_door());
    assert_eq!(session.world().maze.start(), session.world().player.grid_position());
    assert_eq!(Overlay::Fade(255), session.overlay());
    assert!(session.toggles().sound);

    // Fade runs its full length again
    session.update(1000);
    assert_eq!(Overlay::Fade(127), session.overlay());
    session.update(1000);
    assert_eq!(Overlay::Sound(true), session.overlay());
  }

  #[test]
  fn oversized_maze_is_rejected_up_front() {
    let mut config = GameConfig {
      seed: Some(8),
      ..GameConfig::default()
    };
    config.maze.tile_size = 200_000_000;
    assert!(Session::new(config).is_err());

    let mut config = GameConfig {
      seed: Some(8),
      ..GameConfig::default()
    };
    config.maze.width = 2101;
    config.maze.height = 2101;
    assert!(Session::new(config).is_err());
  }

  #[test]
  fn scene_places_sprites_on_the_maze() {
    let mut session = session(6);
    let fires = session.world().decor.fires.len();
    let scene = session.scene();
    assert_eq!(fires + 2, scene.sprites.len());
    // Castle goes first so everything else is drawn over it
    assert_eq!(
      Placement {
        frame: Frame::new(SheetId::Castle, 0),
        x: 0,
        y: -16
      },
      scene.sprites[0]
    );
    assert_eq!(SheetId::Princess, scene.sprites[1].frame.sheet);
    // Player at (7, 6) on 64 px tiles, anchored at 80% of the screen height
    assert_eq!((-128, 0), scene.offset);
    assert_eq!((960, 512), (scene.backdrop.width, scene.backdrop.height));
  }

  #[test]
  fn quit_stops_the_session() {
    let mut session = session(7);
    assert!(session.is_running());
    assert_eq!(Response::Quit, session.handle(InputEvent::Quit).unwrap());
    assert!(!session.is_running());
  }
}
