use crate::config::GameConfig;
use crate::sprite::AnimatedSprite;
use crate::world::decor::Decor;
use crate::world::maze::{Maze, MazeError};
use crate::world::player::{LightClip, MoveOutcome, Player};
use rand::prelude::*;

pub mod decor;
pub mod map;
pub mod maze;
pub mod player;
pub mod position;

/// Everything that gets rebuilt on restart.
pub struct World {
  pub maze: Maze,
  pub player: Player,
  pub decor: Decor,
}

impl World {
  /// Generate a new maze and populate it. Nothing is shared with any previous world.
  pub fn create(config: &GameConfig, rng: &mut impl Rng) -> Result<World, MazeError> {
    let maze = Maze::generate(&config.maze, rng)?;
    let player = Player::new(maze.start(), maze.tile_size(), config.step_ms);
    let decor = Decor::create(&maze);
    Ok(World { maze, player, decor })
  }

  pub fn attempt_move(&mut self, dx: i32, dy: i32) -> MoveOutcome {
    self.player.attempt_move(&self.maze, dx, dy)
  }

  /// Advance all the animations by `delta` milliseconds
  pub fn update(&mut self, delta: u32) {
    self.player.update(delta);
    self.decor.update(delta);
  }

  pub fn is_at_door(&self) -> bool {
    self.player.is_at_door(&self.maze)
  }

  /// All lights currently cutting through the fog: decorative ones first, then the player's.
  pub fn lights(&self) -> impl Iterator<Item = &AnimatedSprite<LightClip>> {
    self.decor.lights.iter().chain(std::iter::once(&self.player.light))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;

  #[test]
  fn new_world_starts_at_start() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let world = World::create(&config, &mut rng).unwrap();
    assert_eq!(world.maze.start(), world.player.grid_position());
    assert!(!world.is_at_door());
    assert_eq!(world.decor.lights.len() + 1, world.lights().count());
  }
}
