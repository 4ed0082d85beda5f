use clap::Parser;
use maze_of_kindred::config::MazeConfig;
use maze_of_kindred::world::map::Cell;
use maze_of_kindred::world::maze::Maze;
use maze_of_kindred::world::position::Cursor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Generate random maze, print it and optionally save a PNG preview
#[derive(Parser)]
struct Args {
  /// Maze width, in tiles
  #[arg(long, default_value_t = 15)]
  width: u16,
  /// Maze height, in tiles
  #[arg(long, default_value_t = 8)]
  height: u16,
  /// Seed for the generator; random if not given
  #[arg(long, short)]
  seed: Option<u64>,
  /// PNG file to save preview to
  #[arg(long, short, value_name = "FILE")]
  output: Option<PathBuf>,
  /// Size of one cell in the preview, in pixels
  #[arg(long, default_value_t = 8)]
  cell_size: u32,
  /// Print raw occupancy codes (`0` is walkable) instead of glyphs
  #[arg(long)]
  codes: bool,
}

#[derive(Debug, Error)]
enum ToolError {
  #[error("Failed to write preview to '{path}'")]
  OutputWriteError {
    path: PathBuf,
    #[source]
    source: anyhow::Error,
  },
}

const FLOOR: [u8; 3] = [0xc8, 0xb4, 0x96];
const WALL: [u8; 3] = [0x50, 0x46, 0x3c];
const BORDER: [u8; 3] = [0x1e, 0x1e, 0x1e];
const START: [u8; 3] = [0x3c, 0xb4, 0x3c];
const DOOR: [u8; 3] = [0xc8, 0x3c, 0x3c];

fn main() -> Result<(), anyhow::Error> {
  let args: Args = Args::parse();

  let config = MazeConfig {
    width: args.width,
    height: args.height,
    ..MazeConfig::default()
  };
  let mut rng = match args.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let maze = Maze::generate(&config, &mut rng)?;

  if args.codes {
    for row in maze.cells().codes() {
      let line: String = row.iter().map(|code| char::from(b'0' + code)).collect();
      println!("{}", line);
    }
  } else {
    for row in 0..args.height {
      let line: String = (0..args.width)
        .map(|col| glyph(&maze, Cursor::new(row, col)))
        .collect();
      println!("{}", line);
    }
  }
  if let Some(steps) = maze.shortest_path_len(maze.start(), maze.door()) {
    println!("Shortest path to the door: {} steps", steps);
  }

  if let Some(output) = args.output {
    let image = render(&maze, args.cell_size);
    let (width, height) = (
      u32::from(args.width) * args.cell_size,
      u32::from(args.height) * args.cell_size,
    );
    write_image(&output, width, height, &image).map_err(|source| ToolError::OutputWriteError {
      path: output.to_owned(),
      source,
    })?;
  }
  Ok(())
}

fn glyph(maze: &Maze, cursor: Cursor) -> char {
  if cursor == maze.start() {
    'S'
  } else if cursor == maze.door() {
    'D'
  } else {
    maze.cell(cursor).map_or('?', Cell::glyph)
  }
}

fn color(maze: &Maze, cursor: Cursor) -> [u8; 3] {
  if cursor == maze.start() {
    return START;
  }
  if cursor == maze.door() {
    return DOOR;
  }
  match maze.cell(cursor) {
    Some(Cell::Floor) => FLOOR,
    Some(Cell::Wall) => WALL,
    Some(Cell::Border) | None => BORDER,
  }
}

/// RGB image with every cell drawn as a `cell_size` square
fn render(maze: &Maze, cell_size: u32) -> Vec<u8> {
  let (cols, rows) = maze.dimensions();
  let width = usize::from(cols) * cell_size as usize;
  let mut image = Vec::with_capacity(width * usize::from(rows) * cell_size as usize * 3);
  for row in 0..rows {
    for _ in 0..cell_size {
      for col in 0..cols {
        let rgb = color(maze, Cursor::new(row, col));
        for _ in 0..cell_size {
          image.extend_from_slice(&rgb);
        }
      }
    }
  }
  image
}

fn write_image(path: &Path, width: u32, height: u32, image: &[u8]) -> Result<(), anyhow::Error> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  let file = File::create(path)?;
  let buf = BufWriter::new(file);
  let mut encoder = png::Encoder::new(buf, width, height);
  encoder.set_color(png::ColorType::Rgb);
  encoder.set_depth(png::BitDepth::Eight);
  let mut writer = encoder.write_header()?;
  writer.write_image_data(image)?;
  Ok(())
}
