use crate::config::GameConfig;
use crate::error::ApplicationError::SdlError;
use sdl2::event::Event;
use sdl2::image::{InitFlag as ImageFlag, Sdl2ImageContext};
use sdl2::mixer::{InitFlag as MixerFlag, Sdl2MixerContext, AUDIO_S16LSB};
use sdl2::render::{BlendMode, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use sdl2::EventPump;
use std::time::{Duration, Instant};

/// Frames per second we are aiming for
const FRAME_RATE: u32 = 60;
/// Longest frame we report; a stall (window drag, breakpoint) should not teleport animations.
const MAX_FRAME_MS: u32 = 100;

/// Application environment resources packaged into one structs. Provides helper functions used
/// across the whole application.
pub struct ApplicationContext {
  pub canvas: WindowCanvas,
  events: EventPump,
  last_frame: Instant,
  _image: Sdl2ImageContext,
  _mixer: Sdl2MixerContext,
}

impl ApplicationContext {
  pub fn init(config: &GameConfig) -> Result<ApplicationContext, anyhow::Error> {
    let sdl_context = sdl2::init().map_err(SdlError)?;
    let video = sdl_context.video().map_err(SdlError)?;
    let window = video
      .window("Maze of Kindred", config.screen_width, config.screen_height)
      .position_centered()
      .allow_highdpi()
      .build()?;
    let mut canvas = window.into_canvas().present_vsync().build()?;
    canvas.set_blend_mode(BlendMode::Blend);
    let events = sdl_context.event_pump().map_err(SdlError)?;

    let image = sdl2::image::init(ImageFlag::PNG).map_err(SdlError)?;

    // Initialize audio
    sdl2::mixer::open_audio(48000, AUDIO_S16LSB, 2, 1024).map_err(SdlError)?;
    let mixer = sdl2::mixer::init(MixerFlag::OGG).map_err(SdlError)?;
    Ok(Self {
      canvas,
      events,
      last_frame: Instant::now(),
      _image: image,
      _mixer: mixer,
    })
  }

  pub fn texture_creator(&self) -> TextureCreator<WindowContext> {
    self.canvas.texture_creator()
  }

  /// Drain pending events without blocking
  pub fn poll_events(&mut self) -> Vec<Event> {
    self.events.poll_iter().collect()
  }

  /// Sleep for whatever is left of the current frame and return how long the frame took, in
  /// milliseconds.
  pub fn wait_frame(&mut self) -> u32 {
    let frame = Duration::new(0, 1_000_000_000u32 / FRAME_RATE);
    let spent = self.last_frame.elapsed();
    if spent < frame {
      ::std::thread::sleep(frame - spent);
    }
    let now = Instant::now();
    let elapsed = now.duration_since(self.last_frame).as_millis() as u32;
    self.last_frame = now;
    elapsed.min(MAX_FRAME_MS)
  }
}
