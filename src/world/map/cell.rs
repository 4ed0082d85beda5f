use num_enum::IntoPrimitive;

/// Maze cell. The numeric code is what the occupancy grid stores: `0` is walkable, everything
/// else blocks movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum Cell {
  Floor = 0,
  Wall = 1,
  /// Outer ring of the maze
  Border = 2,
}

impl Cell {
  pub fn is_walkable(self) -> bool {
    u8::from(self) == 0
  }

  /// ASCII representation used by the tooling
  pub fn glyph(self) -> char {
    match self {
      Cell::Floor => ' ',
      Cell::Wall => '#',
      Cell::Border => '@',
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes() {
    assert_eq!(0u8, Cell::Floor.into());
    assert!(Cell::Floor.is_walkable());
    assert!(!Cell::Wall.is_walkable());
    assert!(!Cell::Border.is_walkable());
    assert_eq!(1u8, Cell::Wall.into());
    assert_eq!(2u8, Cell::Border.into());
  }
}
