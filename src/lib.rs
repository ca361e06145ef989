pub mod game;
pub mod grid;
pub mod loader;
pub mod movement;
mod parse;
pub mod shift;
mod state;

pub use game::{Game, Outcome};
pub use grid::Grid;
pub use loader::{load_template, Catalogue, LevelTemplate, LoadError};
pub use parse::parse_catalogue;
pub use state::GameState;

use std::{fmt, ops::Add, str::FromStr};

use aglet::{CoordVec, Direction4};

/// The levels shipped with the game.
pub const DEFAULT_CATALOGUE: &str = include_str!("../levels/default.lvl");

/// A cell on the board.
///
/// Unlike [`aglet::Coord`] this is signed: shifting a line of tiles past the
/// top or left edge of a level pushes them into negative space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
  pub x: i32,
  pub y: i32,
}

impl Position {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// The neighbouring cell one step in `dir`.
  pub fn step(self, dir: Direction4) -> Self {
    self + Position::from(dir)
  }

  pub fn to_coord_vec(self) -> CoordVec {
    CoordVec::new(self.x, self.y)
  }
}

impl Add for Position {
  type Output = Position;

  fn add(self, rhs: Position) -> Position {
    Position::new(self.x + rhs.x, self.y + rhs.y)
  }
}

impl From<Direction4> for Position {
  fn from(dir: Direction4) -> Self {
    let deltas = dir.deltas();
    Position::new(deltas.x, deltas.y)
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// Which player a marker belongs to.
///
/// Only the primary player is ever controlled. A secondary marker can be
/// authored into a level, where it just sits there and blocks movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
  Primary,
  Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
  /// Nothing here. Absent cells read as this.
  Empty,
  Floor,
  SolidObstacle,
  IceFull,
  IceThin,
  IceMinimal,
  /// Can be walked over, but stops any shift running into it.
  Wall,
  StrongWall,
  Goal,
  PlayerMarker(PlayerId),
}

impl TileKind {
  /// Map a level template symbol to its tile.
  pub fn from_symbol(symbol: char) -> Option<TileKind> {
    let tile = match symbol {
      ' ' => TileKind::Empty,
      'o' => TileKind::IceFull,
      'O' => TileKind::SolidObstacle,
      '2' => TileKind::IceThin,
      '1' => TileKind::IceMinimal,
      'x' => TileKind::Wall,
      'X' => TileKind::StrongWall,
      'F' => TileKind::Goal,
      'A' => TileKind::PlayerMarker(PlayerId::Primary),
      'B' => TileKind::PlayerMarker(PlayerId::Secondary),
      _ => return None,
    };
    Some(tile)
  }

  /// The template symbol for this tile. Floor has none, so it prints as `_`.
  pub fn symbol(self) -> char {
    match self {
      TileKind::Empty => ' ',
      TileKind::Floor => '_',
      TileKind::SolidObstacle => 'O',
      TileKind::IceFull => 'o',
      TileKind::IceThin => '2',
      TileKind::IceMinimal => '1',
      TileKind::Wall => 'x',
      TileKind::StrongWall => 'X',
      TileKind::Goal => 'F',
      TileKind::PlayerMarker(PlayerId::Primary) => 'A',
      TileKind::PlayerMarker(PlayerId::Secondary) => 'B',
    }
  }

  /// Whether the player may step onto this tile.
  pub fn is_passable(self) -> bool {
    match self {
      TileKind::Empty
      | TileKind::SolidObstacle
      | TileKind::StrongWall
      | TileKind::PlayerMarker(_) => false,
      TileKind::Floor
      | TileKind::IceFull
      | TileKind::IceThin
      | TileKind::IceMinimal
      | TileKind::Wall
      | TileKind::Goal => true,
    }
  }

  /// Whether a shift scan running into this tile is refused.
  pub fn blocks_shift(self) -> bool {
    match self {
      TileKind::Wall | TileKind::StrongWall => true,
      TileKind::Empty
      | TileKind::Floor
      | TileKind::SolidObstacle
      | TileKind::IceFull
      | TileKind::IceThin
      | TileKind::IceMinimal
      | TileKind::Goal
      | TileKind::PlayerMarker(_) => false,
    }
  }

  /// One step down the ice erosion chain. Everything else is unchanged,
  /// and minimal ice stays minimal.
  pub fn erode(self) -> TileKind {
    match self {
      TileKind::IceFull => TileKind::IceThin,
      TileKind::IceThin | TileKind::IceMinimal => TileKind::IceMinimal,
      TileKind::Empty
      | TileKind::Floor
      | TileKind::SolidObstacle
      | TileKind::Wall
      | TileKind::StrongWall
      | TileKind::Goal
      | TileKind::PlayerMarker(_) => self,
    }
  }
}

/// One turn's worth of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Move(Direction4),
  Shift(Direction4),
  Restart,
}

impl FromStr for Action {
  type Err = ParseActionError;

  /// Script tokens, named after the keys that trigger them:
  /// `w a s d` move, `Up Down Left Right` shift, `r` restarts.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let action = match s {
      "w" => Action::Move(Direction4::North),
      "a" => Action::Move(Direction4::West),
      "s" => Action::Move(Direction4::South),
      "d" => Action::Move(Direction4::East),
      "Up" => Action::Shift(Direction4::North),
      "Left" => Action::Shift(Direction4::West),
      "Down" => Action::Shift(Direction4::South),
      "Right" => Action::Shift(Direction4::East),
      "r" => Action::Restart,
      _ => return Err(ParseActionError(s.to_string())),
    };
    Ok(action)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action token {0:?}")]
pub struct ParseActionError(pub String);

/// Read-only access to a board, for drawing it.
///
/// This is a trait so renderers don't need to know about the rest of the
/// game state.
pub trait TileView {
  fn tile(&self, pos: Position) -> TileKind;

  fn player_position(&self) -> Position;

  /// Inclusive corners of the area holding every stored tile.
  fn bounds(&self) -> (Position, Position);
}
