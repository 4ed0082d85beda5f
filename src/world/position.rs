/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
  Up,
  Left,
  Down,
  Right,
}

impl Direction {
  /// Iterate through all the directions
  pub fn all() -> impl Iterator<Item = Direction> {
    [Direction::Up, Direction::Left, Direction::Down, Direction::Right]
      .iter()
      .copied()
  }

  /// Reverse the direction
  pub fn reverse(self) -> Self {
    match self {
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
    }
  }

  /// Column and row delta of a single step in this direction
  pub fn delta(self) -> (i32, i32) {
    match self {
      Direction::Left => (-1, 0),
      Direction::Right => (1, 0),
      Direction::Up => (0, -1),
      Direction::Down => (0, 1),
    }
  }

  /// Direction of a unit step; `None` for anything else (including no movement).
  pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
    match (dx, dy) {
      (-1, 0) => Some(Direction::Left),
      (1, 0) => Some(Direction::Right),
      (0, -1) => Some(Direction::Up),
      (0, 1) => Some(Direction::Down),
      _ => None,
    }
  }
}

/// Map cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
  pub row: u16,
  pub col: u16,
}

impl Cursor {
  pub fn new(row: u16, col: u16) -> Cursor {
    Cursor { row, col }
  }

  /// Cell containing the given pixel position. Negative positions have no cell.
  pub fn from_pixels(x: f32, y: f32, tile_size: u32) -> Option<Cursor> {
    if x < 0.0 || y < 0.0 {
      return None;
    }
    let tile = tile_size as f32;
    Some(Cursor::new((y / tile) as u16, (x / tile) as u16))
  }

  /// Offset given cursor by given delta; returns `None` if the result is outside of the
  /// `rows` x `cols` map.
  pub fn offset(self, delta_col: i32, delta_row: i32, rows: u16, cols: u16) -> Option<Cursor> {
    let row = i32::from(self.row) + delta_row;
    let col = i32::from(self.col) + delta_col;
    if row >= 0 && row < i32::from(rows) && col >= 0 && col < i32::from(cols) {
      Some(Cursor::new(row as u16, col as u16))
    } else {
      None
    }
  }

  /// Neighbours in all four directions that are inside the `rows` x `cols` map
  pub fn neighbours(self, rows: u16, cols: u16) -> impl Iterator<Item = Cursor> {
    Direction::all().filter_map(move |dir| {
      let (dx, dy) = dir.delta();
      self.offset(dx, dy, rows, cols)
    })
  }

  /// Find absolute distance in both directions to a given target
  pub fn distance(self, other: Cursor) -> (u16, u16) {
    let delta_row = if self.row > other.row {
      self.row - other.row
    } else {
      other.row - self.row
    };
    let delta_col = if self.col > other.col {
      self.col - other.col
    } else {
      other.col - self.col
    };
    (delta_row, delta_col)
  }

  /// Check if this cursor is pointing at a border cell
  pub fn is_on_border(self, rows: u16, cols: u16) -> bool {
    self.row == 0 || self.row == rows - 1 || self.col == 0 || self.col == cols - 1
  }

  /// Top-left corner of the cell on the maze image
  pub fn pixels(self, tile_size: u32) -> (f32, f32) {
    (
      f32::from(self.col) * tile_size as f32,
      f32::from(self.row) * tile_size as f32,
    )
  }
}

/// Iterate through all cells of a `rows` x `cols` map (including the border ones)
pub fn all_cells(rows: u16, cols: u16) -> impl Iterator<Item = Cursor> {
  (0..rows)
    .flat_map(move |row| (0..cols).map(move |col| (row, col)))
    .map(|(row, col)| Cursor::new(row, col))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn offset_stays_in_bounds() {
    let cursor = Cursor::new(0, 3);
    assert_eq!(None, cursor.offset(0, -1, 8, 15));
    assert_eq!(Some(Cursor::new(1, 3)), cursor.offset(0, 1, 8, 15));
    assert_eq!(None, Cursor::new(7, 14).offset(1, 0, 8, 15));
    assert_eq!(2, Cursor::new(0, 0).neighbours(8, 15).count());
    assert_eq!(4, Cursor::new(3, 3).neighbours(8, 15).count());
  }

  #[test]
  fn deltas_round_trip() {
    for dir in Direction::all() {
      let (dx, dy) = dir.delta();
      assert_eq!(Some(dir), Direction::from_delta(dx, dy));
      assert_eq!(dir, dir.reverse().reverse());
    }
    assert_eq!(None, Direction::from_delta(0, 0));
    assert_eq!(None, Direction::from_delta(1, 1));
  }

  #[test]
  fn pixels_and_cells() {
    assert_eq!((448.0, 384.0), Cursor::new(6, 7).pixels(64));
    assert_eq!(Some(Cursor::new(6, 7)), Cursor::from_pixels(448.0, 390.5, 64));
    assert_eq!(None, Cursor::from_pixels(-1.0, 0.0, 64));
    assert_eq!(120, all_cells(8, 15).count());
    assert!(Cursor::new(7, 3).is_on_border(8, 15));
    assert!(!Cursor::new(6, 13).is_on_border(8, 15));
    assert_eq!((3, 2), Cursor::new(1, 5).distance(Cursor::new(4, 3)));
  }
}
