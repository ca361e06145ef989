//! Sparse tile storage.

use std::fmt;

use ahash::AHashMap;

use crate::{Position, TileKind};

/// A sparse board. Any cell that was never written reads as
/// [`TileKind::Empty`].
#[derive(Debug, Clone)]
pub struct Grid {
  tiles: AHashMap<Position, TileKind>,
  min: Position,
  max: Position,
}

impl Grid {
  pub fn new() -> Self {
    Self {
      tiles: AHashMap::new(),
      min: Position::new(0, 0),
      max: Position::new(0, 0),
    }
  }

  pub fn get(&self, pos: Position) -> TileKind {
    self.tiles.get(&pos).copied().unwrap_or(TileKind::Empty)
  }

  pub fn set(&mut self, pos: Position, tile: TileKind) {
    if self.tiles.is_empty() {
      self.min = pos;
      self.max = pos;
    } else {
      self.min = Position::new(self.min.x.min(pos.x), self.min.y.min(pos.y));
      self.max = Position::new(self.max.x.max(pos.x), self.max.y.max(pos.y));
    }
    self.tiles.insert(pos, tile);
  }

  /// Whether the cell has been written at all, even with `Empty`.
  pub fn contains(&self, pos: Position) -> bool {
    self.tiles.contains_key(&pos)
  }

  /// Stored cells, in no particular order.
  pub fn iter(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
    self.tiles.iter().map(|(&pos, &tile)| (pos, tile))
  }

  pub fn len(&self) -> usize {
    self.tiles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tiles.is_empty()
  }

  /// Inclusive corners of the rectangle covering every stored cell.
  pub fn bounds(&self) -> (Position, Position) {
    (self.min, self.max)
  }

  /// Fill every unwritten cell in `min..=max` with `Empty`.
  pub fn pad(&mut self, min: Position, max: Position) {
    for y in min.y..=max.y {
      for x in min.x..=max.x {
        let pos = Position::new(x, y);
        if !self.contains(pos) {
          self.set(pos, TileKind::Empty);
        }
      }
    }
  }
}

impl Default for Grid {
  fn default() -> Self {
    Self::new()
  }
}

// Two grids are the same board when every stored cell matches.
impl PartialEq for Grid {
  fn eq(&self, other: &Self) -> bool {
    self.tiles.len() == other.tiles.len()
      && self
        .tiles
        .iter()
        .all(|(pos, tile)| other.tiles.get(pos) == Some(tile))
  }
}

impl Eq for Grid {}

/// One line per row, in template symbols.
impl fmt::Display for Grid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return Ok(());
    }
    for y in self.min.y..=self.max.y {
      let row = (self.min.x..=self.max.x)
        .map(|x| self.get(Position::new(x, y)).symbol())
        .collect::<String>();
      writeln!(f, "{}", row.trim_end())?;
    }
    Ok(())
  }
}
