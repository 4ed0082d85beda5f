pub mod args;
pub mod config;
pub mod fog;
pub mod session;
pub mod sprite;
pub mod timer;
pub mod world;

#[cfg(feature = "sdl")]
mod assets;
#[cfg(feature = "sdl")]
mod audio;
#[cfg(feature = "sdl")]
mod context;
#[cfg(feature = "sdl")]
mod error;
#[cfg(feature = "sdl")]
mod game;

#[cfg(feature = "sdl")]
pub fn main() -> Result<(), anyhow::Error> {
  use clap::Parser;

  env_logger::init();
  let config = args::Args::parse().into_config();
  game::run(config)
}
