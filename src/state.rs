use crate::{Grid, PlayerId, Position, TileKind, TileView};

/// Everything about a level in progress.
///
/// Built wholesale by the loader; afterwards only [`crate::movement`] and
/// [`crate::shift`] touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
  pub(crate) grid: Grid,
  pub(crate) player: PlayerId,
  pub(crate) player_pos: Position,
  /// Put back into the grid when the player steps off.
  pub(crate) beneath_player: TileKind,
  pub(crate) level_index: usize,
  pub(crate) won: bool,
}

impl GameState {
  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  pub fn player(&self) -> PlayerId {
    self.player
  }

  pub fn player_position(&self) -> Position {
    self.player_pos
  }

  pub fn tile_beneath_player(&self) -> TileKind {
    self.beneath_player
  }

  pub fn level_index(&self) -> usize {
    self.level_index
  }

  pub fn won(&self) -> bool {
    self.won
  }
}

impl TileView for GameState {
  fn tile(&self, pos: Position) -> TileKind {
    self.grid.get(pos)
  }

  fn player_position(&self) -> Position {
    self.player_pos
  }

  fn bounds(&self) -> (Position, Position) {
    self.grid.bounds()
  }
}
