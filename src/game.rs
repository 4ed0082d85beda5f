//! SDL2 frontend: translates SDL events into session input and draws session scenes.
use crate::assets::Assets;
use crate::audio::Soundtrack;
use crate::config::GameConfig;
use crate::context::ApplicationContext;
use crate::error::ApplicationError::SdlError;
use crate::fog::FogLayer;
use crate::session::{InputEvent, Overlay, Response, Scene, Session};
use crate::world::maze::Backdrop;
use crate::world::position::Direction;
use anyhow::bail;
use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;

pub fn run(config: GameConfig) -> Result<(), anyhow::Error> {
  if !config.asset_dir.is_dir() {
    bail!("'{}' is not an asset directory", config.asset_dir.display());
  }
  let mut session = Session::new(config.clone())?;
  let mut context = ApplicationContext::init(&config)?;
  let texture_creator = context.texture_creator();
  let assets = Assets::load(&texture_creator, &config.asset_dir)?;

  let soundtrack = Soundtrack::load(&config.asset_dir)?;
  soundtrack.set_volume(session.music_volume());
  soundtrack.play()?;

  let mut backdrop = render_backdrop(
    &mut context.canvas,
    &texture_creator,
    &assets,
    session.world().maze.background_image(),
  )?;
  let mut fog: Option<Texture> = None;

  while session.is_running() {
    for event in context.poll_events() {
      let input = match translate(&event) {
        Some(input) => input,
        None => continue,
      };
      match session.handle(input)? {
        Response::SoundToggled(_) => soundtrack.set_volume(session.music_volume()),
        Response::Restarted => {
          backdrop = render_backdrop(
            &mut context.canvas,
            &texture_creator,
            &assets,
            session.world().maze.background_image(),
          )?;
          fog = None;
          soundtrack.play()?;
          soundtrack.set_volume(session.music_volume());
        }
        Response::Quit | Response::Nothing => {}
      }
    }

    let delta = context.wait_frame();
    session.update(delta);

    let scene = session.scene();
    if fog.is_none() {
      if let Some(layer) = scene.fog {
        fog = Some(create_fog_texture(&texture_creator, layer)?);
      }
    }
    draw_scene(&mut context.canvas, &assets, &backdrop, fog.as_mut(), &scene)?;
    context.canvas.present();
  }
  info!("Bye");
  Ok(())
}

/// Map SDL event to the session input, if it is something the game reacts to.
fn translate(event: &Event) -> Option<InputEvent> {
  match *event {
    Event::Quit { .. } => Some(InputEvent::Quit),
    Event::KeyDown {
      scancode: Some(scancode),
      ..
    } => match scancode {
      Scancode::Escape => Some(InputEvent::Quit),
      Scancode::F => Some(InputEvent::ToggleFog),
      other => direction(other).map(InputEvent::Move),
    },
    Event::KeyUp {
      scancode: Some(scancode),
      ..
    } if direction(scancode).is_some() => Some(InputEvent::Stop),
    Event::MouseButtonUp { x, y, .. } => Some(InputEvent::Click(x, y)),
    _ => None,
  }
}

fn direction(scancode: Scancode) -> Option<Direction> {
  match scancode {
    Scancode::Up | Scancode::W => Some(Direction::Up),
    Scancode::Left | Scancode::A => Some(Direction::Left),
    Scancode::Down | Scancode::S => Some(Direction::Down),
    Scancode::Right | Scancode::D => Some(Direction::Right),
    _ => None,
  }
}

/// Rasterize maze tiles into a texture; done once per maze.
fn render_backdrop<'t>(
  canvas: &mut WindowCanvas,
  texture_creator: &'t TextureCreator<WindowContext>,
  assets: &Assets,
  backdrop: &Backdrop,
) -> Result<Texture<'t>, anyhow::Error> {
  let mut texture = texture_creator.create_texture_target(PixelFormatEnum::RGBA8888, backdrop.width, backdrop.height)?;
  let mut result = None;
  canvas.with_texture_canvas(&mut texture, |canvas| {
    canvas.set_draw_color(Color::BLACK);
    canvas.clear();
    let tile = backdrop.tile_size;
    result = Some(
      backdrop
        .tiles
        .iter()
        .try_for_each(|t| assets.draw(canvas, t.frame, Rect::new(t.x, t.y, tile, tile))),
    );
  })?;
  if let Some(result) = result {
    result?;
  }
  debug!("Rendered {} maze tiles", backdrop.tiles.len());
  Ok(texture)
}

fn create_fog_texture<'t>(
  texture_creator: &'t TextureCreator<WindowContext>,
  layer: &FogLayer,
) -> Result<Texture<'t>, anyhow::Error> {
  let (width, height) = layer.size();
  let mut texture = texture_creator.create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)?;
  texture.set_blend_mode(BlendMode::Blend);
  Ok(texture)
}

/// Copy fog alpha into the texture as black pixels with that alpha.
fn upload_fog(texture: &mut Texture, layer: &FogLayer) -> Result<(), anyhow::Error> {
  let (width, height) = layer.size();
  texture
    .with_lock(None, |buffer: &mut [u8], pitch: usize| {
      for y in 0..height {
        let line = &mut buffer[y as usize * pitch..][..width as usize * 4];
        for (x, pixel) in (0..width).zip(line.chunks_mut(4)) {
          pixel.copy_from_slice(&(u32::from(layer.alpha_at(x, y)) << 24).to_ne_bytes());
        }
      }
    })
    .map_err(SdlError)?;
  Ok(())
}

fn draw_scene(
  canvas: &mut WindowCanvas,
  assets: &Assets,
  backdrop: &Texture,
  fog: Option<&mut Texture>,
  scene: &Scene,
) -> Result<(), anyhow::Error> {
  let (dx, dy) = scene.offset;
  canvas.set_draw_color(Color::BLACK);
  canvas.clear();
  canvas
    .copy(
      backdrop,
      None,
      Rect::new(dx, dy, scene.backdrop.width, scene.backdrop.height),
    )
    .map_err(SdlError)?;

  for sprite in &scene.sprites {
    assets.draw_at(canvas, sprite.frame, dx + sprite.x, dy + sprite.y)?;
  }

  if let (Some(layer), Some(texture)) = (scene.fog, fog) {
    upload_fog(texture, layer)?;
    let (width, height) = layer.size();
    let scale = layer.scale();
    canvas
      .copy(texture, None, Rect::new(dx, dy, width * scale, height * scale))
      .map_err(SdlError)?;
  }

  match scene.overlay {
    Overlay::Fade(alpha) | Overlay::Restart(alpha) => {
      canvas.set_blend_mode(BlendMode::Blend);
      canvas.set_draw_color(Color::RGBA(0, 0, 0, alpha));
      canvas.fill_rect(None).map_err(SdlError)?;
    }
    Overlay::Sound(_) => {}
  }
  if let Some(button) = scene.button {
    assets.draw_at(canvas, button.frame, button.x, button.y)?;
  }
  Ok(())
}
