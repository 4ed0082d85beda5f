mod cell;

use crate::world::position::{all_cells, Cursor};
pub use cell::Cell;
use ref_cast::RefCast;

/// Row-major grid of values, `rows` x `cols`.
#[derive(Clone, Debug, PartialEq)]
pub struct Map<V> {
  rows: u16,
  cols: u16,
  data: Vec<V>,
}

#[derive(RefCast)]
#[repr(transparent)]
pub struct MapSlice<V> {
  slice: [V],
}

impl<V: Clone> Map<V> {
  /// Create map with every cell set to `value`
  pub fn filled(rows: u16, cols: u16, value: V) -> Self {
    Map {
      rows,
      cols,
      data: vec![value; usize::from(rows) * usize::from(cols)],
    }
  }
}

impl<V> Map<V> {
  pub fn rows(&self) -> u16 {
    self.rows
  }

  pub fn cols(&self) -> u16 {
    self.cols
  }

  /// Bounds-checked lookup
  pub fn get(&self, cursor: Cursor) -> Option<&V> {
    if self.contains(cursor) {
      Some(&self.data[self.offset(cursor)])
    } else {
      None
    }
  }

  /// Iterate through all map cells (including the border ones)
  pub fn cursors(&self) -> impl Iterator<Item = Cursor> {
    all_cells(self.rows, self.cols)
  }

  pub fn contains(&self, cursor: Cursor) -> bool {
    cursor.row < self.rows && cursor.col < self.cols
  }

  fn offset(&self, cursor: Cursor) -> usize {
    usize::from(cursor.row) * usize::from(self.cols) + usize::from(cursor.col)
  }
}

impl<V> std::ops::Index<u16> for Map<V> {
  type Output = MapSlice<V>;

  fn index(&self, row: u16) -> &MapSlice<V> {
    let cols = usize::from(self.cols);
    RefCast::ref_cast(&self.data[usize::from(row) * cols..][..cols])
  }
}

impl<V> std::ops::IndexMut<u16> for Map<V> {
  fn index_mut(&mut self, row: u16) -> &mut MapSlice<V> {
    let cols = usize::from(self.cols);
    RefCast::ref_cast_mut(&mut self.data[usize::from(row) * cols..][..cols])
  }
}

impl<V> std::ops::Index<u16> for MapSlice<V> {
  type Output = V;

  fn index(&self, col: u16) -> &V {
    &self.slice[usize::from(col)]
  }
}

impl<V> std::ops::IndexMut<u16> for MapSlice<V> {
  fn index_mut(&mut self, col: u16) -> &mut V {
    &mut self.slice[usize::from(col)]
  }
}

impl<V> std::ops::Index<Cursor> for Map<V> {
  type Output = V;

  fn index(&self, cursor: Cursor) -> &V {
    &self[cursor.row][cursor.col]
  }
}

impl<V> std::ops::IndexMut<Cursor> for Map<V> {
  fn index_mut(&mut self, cursor: Cursor) -> &mut V {
    &mut self[cursor.row][cursor.col]
  }
}

/// Occupancy grid of the maze
pub type CellMap = Map<Cell>;

impl CellMap {
  /// Raw cell codes, row by row; `0` is walkable.
  pub fn codes(&self) -> Vec<Vec<u8>> {
    self
      .data
      .chunks(usize::from(self.cols))
      .map(|row| row.iter().map(|cell| u8::from(*cell)).collect())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn index_by_row_and_cursor() {
    let mut map = Map::filled(3, 4, 0u8);
    map[1][2] = 7;
    map[Cursor::new(2, 3)] = 9;
    assert_eq!(7, map[Cursor::new(1, 2)]);
    assert_eq!(9, map[2][3]);
    assert_eq!(Some(&9), map.get(Cursor::new(2, 3)));
    assert_eq!(None, map.get(Cursor::new(3, 0)));
    assert_eq!(None, map.get(Cursor::new(0, 4)));
    assert_eq!(12, map.cursors().count());
  }

  #[test]
  fn codes_follow_rows() {
    let mut map = CellMap::filled(2, 3, Cell::Wall);
    map[1][1] = Cell::Floor;
    assert_eq!(vec![vec![1, 1, 1], vec![1, 0, 1]], map.codes());
  }
}
