//! Maze generation and occupancy queries.
use crate::config::{MazeConfig, MAX_IMAGE_SIDE};
use crate::sprite::{Frame, SheetId};
use crate::world::map::{Cell, CellMap, Map};
use crate::world::position::Cursor;
use log::{debug, info, warn};
use rand::prelude::*;
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MazeError {
  #[error("Invalid maze layout: {0}")]
  InvalidLayout(String),

  #[error("Door at {door:?} is not reachable from the start at {start:?}")]
  DoorUnreachable { start: Cursor, door: Cursor },

  #[error("Failed to generate a connected maze after {attempts} attempts")]
  Disconnected { attempts: u32 },
}

/// Floor variants in the first row of the floor sheet
const FLOOR_FRAMES: [u32; 4] = [0, 1, 2, 3];
const DOOR_FRAME: u32 = 18;
const WALL_TOP_FRAME: u32 = 4;
/// Front face of a wall, used when the player can see the wall from below
const WALL_FACE_FRAME: u32 = 13;
const BORDER_FRAME: u32 = 10;

/// One tile of the maze background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
  pub frame: Frame,
  pub x: i32,
  pub y: i32,
}

/// Flattened background image of the maze: every cell's tile, positioned on the maze image.
/// The renderer rasterizes it once per maze.
#[derive(Debug, Clone)]
pub struct Backdrop {
  pub width: u32,
  pub height: u32,
  /// Every tile is drawn stretched to a `tile_size` square.
  pub tile_size: u32,
  pub tiles: Vec<Tile>,
}

pub struct Maze {
  cells: CellMap,
  tile_size: u32,
  start: Cursor,
  door: Cursor,
  backdrop: Backdrop,
}

impl Maze {
  /// Generate a fresh random maze. Every returned maze has the door reachable from the start.
  pub fn generate(config: &MazeConfig, rng: &mut impl Rng) -> Result<Maze, MazeError> {
    let start = config.start();
    let door = config.door();
    check_layout(config.height, config.width, config.tile_size, start, door)?;

    for attempt in 1..=config.max_attempts {
      let cells = generate_cells(config, start, door, rng);
      if is_connected(&cells, start, door) {
        info!(
          "Generated {}x{} maze in {} attempt(s)",
          config.width, config.height, attempt
        );
        return Ok(Maze::assemble(cells, config.tile_size, start, door, rng));
      }
      warn!("Maze attempt {} has the door cut off from the start, retrying", attempt);
    }
    Err(MazeError::Disconnected {
      attempts: config.max_attempts,
    })
  }

  /// Build maze from a prepared occupancy grid. The grid is checked the same way generated ones
  /// are, so start and door must be walkable and connected.
  pub fn from_cells(
    cells: CellMap,
    tile_size: u32,
    start: Cursor,
    door: Cursor,
    rng: &mut impl Rng,
  ) -> Result<Maze, MazeError> {
    check_layout(cells.rows(), cells.cols(), tile_size, start, door)?;
    let border_open = cells
      .cursors()
      .any(|cursor| cursor.is_on_border(cells.rows(), cells.cols()) && cells[cursor].is_walkable());
    if border_open {
      return Err(MazeError::InvalidLayout("maze border must be closed".to_owned()));
    }
    if !is_connected(&cells, start, door) {
      return Err(MazeError::DoorUnreachable { start, door });
    }
    Ok(Maze::assemble(cells, tile_size, start, door, rng))
  }

  fn assemble(cells: CellMap, tile_size: u32, start: Cursor, door: Cursor, rng: &mut impl Rng) -> Maze {
    let backdrop = compose_backdrop(&cells, tile_size, door, rng);
    Maze {
      cells,
      tile_size,
      start,
      door,
      backdrop,
    }
  }

  /// Check if the given cell can be entered. Anything outside of the maze is solid.
  pub fn is_walkable(&self, grid_x: i32, grid_y: i32) -> bool {
    if grid_x < 0 || grid_y < 0 || grid_x > i32::from(u16::MAX) || grid_y > i32::from(u16::MAX) {
      return false;
    }
    self
      .cells
      .get(Cursor::new(grid_y as u16, grid_x as u16))
      .map_or(false, |cell| cell.is_walkable())
  }

  pub fn cell(&self, cursor: Cursor) -> Option<Cell> {
    self.cells.get(cursor).copied()
  }

  pub fn cells(&self) -> &CellMap {
    &self.cells
  }

  /// Width and height, in cells
  pub fn dimensions(&self) -> (u16, u16) {
    (self.cells.cols(), self.cells.rows())
  }

  pub fn tile_size(&self) -> u32 {
    self.tile_size
  }

  /// Size of the maze image, in pixels
  pub fn image_size(&self) -> (u32, u32) {
    (self.backdrop.width, self.backdrop.height)
  }

  pub fn background_image(&self) -> &Backdrop {
    &self.backdrop
  }

  pub fn start(&self) -> Cursor {
    self.start
  }

  pub fn door(&self) -> Cursor {
    self.door
  }

  /// Flood-fill from the given cell; `true` marks every cell reachable from it.
  pub fn reachable_from(&self, from: Cursor) -> Map<bool> {
    flood_fill(&self.cells, from)
  }

  /// Number of steps on the shortest walkable path between two cells.
  pub fn shortest_path_len(&self, from: Cursor, to: Cursor) -> Option<usize> {
    let mut distance = Map::filled(self.cells.rows(), self.cells.cols(), None::<usize>);
    if !self.cells.get(from).map_or(false, |cell| cell.is_walkable()) {
      return None;
    }
    distance[from] = Some(0);
    let mut queue = VecDeque::new();
    queue.push_back(from);
    while let Some(cursor) = queue.pop_front() {
      let steps = distance[cursor].unwrap_or(0);
      if cursor == to {
        return Some(steps);
      }
      for next in cursor.neighbours(self.cells.rows(), self.cells.cols()) {
        if self.cells[next].is_walkable() && distance[next].is_none() {
          distance[next] = Some(steps + 1);
          queue.push_back(next);
        }
      }
    }
    None
  }
}

fn check_layout(rows: u16, cols: u16, tile_size: u32, start: Cursor, door: Cursor) -> Result<(), MazeError> {
  if rows < 5 || cols < 5 {
    return Err(MazeError::InvalidLayout(format!("{}x{} is too small", cols, rows)));
  }
  if tile_size == 0 || u64::from(rows.max(cols)) * u64::from(tile_size) > u64::from(MAX_IMAGE_SIDE) {
    return Err(MazeError::InvalidLayout(format!(
      "{}x{} cells of {} pixels do not fit a {} pixel image",
      cols, rows, tile_size, MAX_IMAGE_SIDE
    )));
  }
  for (name, cursor) in [("start", start), ("door", door)].iter() {
    if cursor.row >= rows || cursor.col >= cols || cursor.is_on_border(rows, cols) {
      return Err(MazeError::InvalidLayout(format!(
        "{} {:?} is not an interior cell",
        name, cursor
      )));
    }
  }
  if start == door {
    return Err(MazeError::InvalidLayout("start and door are the same cell".to_owned()));
  }
  Ok(())
}

/// Randomized depth-first carving over the odd-coordinate cells, followed by random extra
/// openings and passages linking start and door to the carved cells.
fn generate_cells(config: &MazeConfig, start: Cursor, door: Cursor, rng: &mut impl Rng) -> CellMap {
  let rows = config.height;
  let cols = config.width;
  let mut cells = CellMap::filled(rows, cols, Cell::Wall);
  for cursor in cells.cursors().collect::<Vec<_>>() {
    if cursor.is_on_border(rows, cols) {
      cells[cursor] = Cell::Border;
    }
  }

  carve_passages(&mut cells, rng);
  knock_out_walls(&mut cells, config.loop_chance, rng);
  link_to_passages(&mut cells, start);
  link_to_passages(&mut cells, door);
  cells
}

fn is_lattice(cursor: Cursor, rows: u16, cols: u16) -> bool {
  cursor.row % 2 == 1 && cursor.col % 2 == 1 && cursor.row <= rows - 2 && cursor.col <= cols - 2
}

fn carve_passages(cells: &mut CellMap, rng: &mut impl Rng) {
  let rows = cells.rows();
  let cols = cells.cols();
  let lattice_rows = (rows - 1) / 2;
  let lattice_cols = (cols - 1) / 2;
  let first = Cursor::new(
    rng.gen_range(0..lattice_rows) * 2 + 1,
    rng.gen_range(0..lattice_cols) * 2 + 1,
  );

  cells[first] = Cell::Floor;
  let mut stack = vec![first];
  while let Some(&current) = stack.last() {
    let candidates: Vec<(Cursor, Cursor)> = [(0, -2), (-2, 0), (0, 2), (2, 0)]
      .iter()
      .filter_map(|&(dx, dy)| {
        let next = current.offset(dx, dy, rows, cols)?;
        let between = current.offset(dx / 2, dy / 2, rows, cols)?;
        if is_lattice(next, rows, cols) && cells[next] == Cell::Wall {
          Some((next, between))
        } else {
          None
        }
      })
      .collect();

    match candidates.choose(rng) {
      Some(&(next, between)) => {
        cells[between] = Cell::Floor;
        cells[next] = Cell::Floor;
        stack.push(next);
      }
      None => {
        stack.pop();
      }
    }
  }
}

/// Remove interior walls that sit between two passages, each with probability `chance`.
fn knock_out_walls(cells: &mut CellMap, chance: f64, rng: &mut impl Rng) {
  if chance <= 0.0 {
    return;
  }
  let rows = cells.rows();
  let cols = cells.cols();
  let walls: Vec<Cursor> = cells.cursors().filter(|cursor| cells[*cursor] == Cell::Wall).collect();
  for cursor in walls {
    let open = |dx: i32, dy: i32| {
      cursor
        .offset(dx, dy, rows, cols)
        .map_or(false, |next| cells[next].is_walkable())
    };
    let separates = (open(-1, 0) && open(1, 0)) || (open(0, -1) && open(0, 1));
    if separates && rng.gen_bool(chance) {
      cells[cursor] = Cell::Floor;
    }
  }
}

/// Open the cell and, if it has no open neighbour, dig towards the nearest carved cell.
fn link_to_passages(cells: &mut CellMap, target: Cursor) {
  let rows = cells.rows();
  let cols = cells.cols();
  let mut cursor = target;
  loop {
    cells[cursor] = Cell::Floor;
    let linked = cursor.neighbours(rows, cols).any(|next| cells[next].is_walkable());
    if linked || is_lattice(cursor, rows, cols) {
      break;
    }
    // Interior cells off the lattice have an even row or an even column; stepping back along it
    // lands next to (or on) a carved cell.
    cursor = if cursor.row % 2 == 0 {
      Cursor::new(cursor.row - 1, cursor.col)
    } else {
      Cursor::new(cursor.row, cursor.col - 1)
    };
  }
}

fn flood_fill(cells: &CellMap, from: Cursor) -> Map<bool> {
  let mut seen = Map::filled(cells.rows(), cells.cols(), false);
  if !cells.get(from).map_or(false, |cell| cell.is_walkable()) {
    return seen;
  }
  seen[from] = true;
  let mut queue = VecDeque::new();
  queue.push_back(from);
  while let Some(cursor) = queue.pop_front() {
    for next in cursor.neighbours(cells.rows(), cells.cols()) {
      if !seen[next] && cells[next].is_walkable() {
        seen[next] = true;
        queue.push_back(next);
      }
    }
  }
  seen
}

fn is_connected(cells: &CellMap, start: Cursor, door: Cursor) -> bool {
  let reachable = flood_fill(cells, start);
  let connected = reachable[door];
  if !connected {
    debug!("Door {:?} is not reachable from {:?}", door, start);
  }
  connected
}

fn compose_backdrop(cells: &CellMap, tile_size: u32, door: Cursor, rng: &mut impl Rng) -> Backdrop {
  let rows = cells.rows();
  let cols = cells.cols();
  let mut tiles = Vec::with_capacity(usize::from(rows) * usize::from(cols));
  for cursor in cells.cursors() {
    let frame = match cells[cursor] {
      _ if cursor == door => Frame::new(SheetId::Floor, DOOR_FRAME),
      Cell::Floor => Frame::new(SheetId::Floor, *FLOOR_FRAMES.choose(rng).unwrap_or(&0)),
      Cell::Wall => {
        let floor_below = cursor
          .offset(0, 1, rows, cols)
          .map_or(false, |below| cells[below].is_walkable());
        if floor_below {
          Frame::new(SheetId::Cement, WALL_FACE_FRAME)
        } else {
          Frame::new(SheetId::Cement, WALL_TOP_FRAME)
        }
      }
      Cell::Border => Frame::new(SheetId::Cement, BORDER_FRAME),
    };
    tiles.push(Tile {
      frame,
      x: i32::from(cursor.col) * tile_size as i32,
      y: i32::from(cursor.row) * tile_size as i32,
    });
  }
  Backdrop {
    width: u32::from(cols) * tile_size,
    height: u32::from(rows) * tile_size,
    tile_size,
    tiles,
  }
}
