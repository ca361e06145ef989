//! Turning level templates into playable state.

use tracing::debug;

use crate::{parse, GameState, Grid, PlayerId, Position, TileKind};

/// What the player is assumed to be standing on when a level starts.
pub const INITIAL_BENEATH_PLAYER: TileKind = TileKind::Wall;

/// The authored layout of one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTemplate {
  title: String,
  rows: Vec<String>,
  /// Byte offset of each row in the text it was read from.
  row_offsets: Vec<usize>,
}

impl LevelTemplate {
  /// Build a template from rows of symbols, as if they were written one per
  /// line.
  pub fn new<S: Into<String>>(
    title: impl Into<String>,
    rows: impl IntoIterator<Item = S>,
  ) -> Self {
    let rows = rows.into_iter().map(Into::into).collect::<Vec<String>>();
    let mut row_offsets = Vec::with_capacity(rows.len());
    let mut offset = 0;
    for row in rows.iter() {
      row_offsets.push(offset);
      offset += row.len() + 1;
    }
    Self {
      title: title.into(),
      rows,
      row_offsets,
    }
  }

  pub(crate) fn with_offsets(
    title: String,
    rows: Vec<String>,
    row_offsets: Vec<usize>,
  ) -> Self {
    debug_assert_eq!(rows.len(), row_offsets.len());
    Self {
      title,
      rows,
      row_offsets,
    }
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn rows(&self) -> &[String] {
    &self.rows
  }

  /// Where row `y` starts in the source text.
  pub fn row_offset(&self, y: usize) -> Option<usize> {
    self.row_offsets.get(y).copied()
  }

  /// Where the symbol at `pos` lives in the source text, for error reports.
  pub fn source_offset(&self, pos: Position) -> Option<usize> {
    let y = usize::try_from(pos.y).ok()?;
    let x = usize::try_from(pos.x).ok()?;
    let row = self.rows.get(y)?;
    let (byte, _) = row.char_indices().nth(x)?;
    Some(self.row_offsets[y] + byte)
  }
}

/// The ordered list of levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
  levels: Vec<LevelTemplate>,
}

impl Catalogue {
  pub fn new(levels: Vec<LevelTemplate>) -> Self {
    Self { levels }
  }

  /// The levels that ship with the game.
  pub fn bundled(
  ) -> Result<Catalogue, nom::error::VerboseError<&'static str>> {
    parse::parse_catalogue(crate::DEFAULT_CATALOGUE)
  }

  pub fn len(&self) -> usize {
    self.levels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.levels.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&LevelTemplate> {
    self.levels.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &LevelTemplate> + '_ {
    self.levels.iter()
  }

  /// Build the starting state of the level at `index`.
  pub fn load(&self, index: usize) -> Result<GameState, LoadError> {
    let template =
      self
        .levels
        .get(index)
        .ok_or(LoadError::InvalidLevelIndex {
          index,
          count: self.levels.len(),
        })?;
    load_template(template, index)
  }
}

/// Build the starting state for `template`, recorded as level `level`.
///
/// Every symbol becomes a cell, spaces included. The board is then padded
/// with `Empty` out to one past the furthest authored cell, so scans moving
/// right or down always run into an empty cell.
pub fn load_template(
  template: &LevelTemplate,
  level: usize,
) -> Result<GameState, LoadError> {
  let mut grid = Grid::new();
  let mut player = None;

  for (y, row) in template.rows().iter().enumerate() {
    let tiles = parse::tile_row(row).map_err(|bad| {
      LoadError::InvalidTileSymbol {
        level,
        symbol: bad.symbol,
        position: Position::new(bad.column as i32, y as i32),
      }
    })?;
    for (x, tile) in tiles.into_iter().enumerate() {
      let pos = Position::new(x as i32, y as i32);
      if tile == TileKind::PlayerMarker(PlayerId::Primary) {
        if let Some(first) = player {
          return Err(LoadError::MultiplePlayers {
            level,
            first,
            second: pos,
          });
        }
        player = Some(pos);
      }
      grid.set(pos, tile);
    }
  }

  let player_pos = player.ok_or(LoadError::MissingPlayer { level })?;

  let (_, max) = grid.bounds();
  grid.pad(Position::new(0, 0), Position::new(max.x + 1, max.y + 1));

  debug!(
    level,
    title = template.title(),
    cells = grid.len(),
    player = %player_pos,
    "loaded level"
  );

  Ok(GameState {
    grid,
    player: PlayerId::Primary,
    player_pos,
    beneath_player: INITIAL_BENEATH_PLAYER,
    level_index: level,
    won: false,
  })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
  #[error("level {index} does not exist; there are {count} levels")]
  InvalidLevelIndex { index: usize, count: usize },
  #[error("level {level} has unknown tile symbol {symbol:?} at {position}")]
  InvalidTileSymbol {
    level: usize,
    symbol: char,
    position: Position,
  },
  #[error("level {level} has no player")]
  MissingPlayer { level: usize },
  #[error("level {level} has a second player at {second} (first at {first})")]
  MultiplePlayers {
    level: usize,
    first: Position,
    second: Position,
  },
}

impl LoadError {
  /// The level the error came from.
  pub fn level(&self) -> usize {
    match *self {
      LoadError::InvalidLevelIndex { index, .. } => index,
      LoadError::InvalidTileSymbol { level, .. }
      | LoadError::MissingPlayer { level }
      | LoadError::MultiplePlayers { level, .. } => level,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn template(rows: &[&str]) -> LevelTemplate {
    LevelTemplate::new("test", rows.iter().copied())
  }

  #[test]
  fn pads_one_past_authored_extent() {
    let state = load_template(&template(&["", "  ooA", " F"]), 0).unwrap();
    let grid = state.grid();
    assert_eq!(grid.bounds(), (Position::new(0, 0), Position::new(5, 3)));
    assert_eq!(grid.len(), 6 * 4);
    assert_eq!(grid.get(Position::new(1, 2)), TileKind::Goal);
    assert_eq!(grid.get(Position::new(5, 1)), TileKind::Empty);
    assert!(grid.contains(Position::new(5, 3)));
  }

  #[test]
  fn starts_on_a_wall() {
    let state = load_template(&template(&["oAo"]), 3).unwrap();
    assert_eq!(state.player_position(), Position::new(1, 0));
    assert_eq!(state.tile_beneath_player(), TileKind::Wall);
    assert_eq!(state.level_index(), 3);
    assert!(!state.won());
    assert_eq!(
      state.grid().get(Position::new(1, 0)),
      TileKind::PlayerMarker(PlayerId::Primary)
    );
  }

  #[test]
  fn rejects_unknown_symbols() {
    let err = load_template(&template(&["oAo", "o o?"]), 2).unwrap_err();
    assert_eq!(
      err,
      LoadError::InvalidTileSymbol {
        level: 2,
        symbol: '?',
        position: Position::new(3, 1),
      }
    );
  }

  #[test]
  fn needs_exactly_one_player() {
    assert_eq!(
      load_template(&template(&["ooo"]), 0),
      Err(LoadError::MissingPlayer { level: 0 })
    );
    assert_eq!(
      load_template(&template(&["A", " A"]), 0),
      Err(LoadError::MultiplePlayers {
        level: 0,
        first: Position::new(0, 0),
        second: Position::new(1, 1),
      })
    );
  }

  #[test]
  fn secondary_player_is_just_a_tile() {
    let state = load_template(&template(&["AB"]), 0).unwrap();
    assert_eq!(
      state.grid().get(Position::new(1, 0)),
      TileKind::PlayerMarker(PlayerId::Secondary)
    );
  }

  #[test]
  fn catalogue_checks_index() {
    let catalogue = Catalogue::new(vec![template(&["A"])]);
    assert!(catalogue.load(0).is_ok());
    assert_eq!(
      catalogue.load(1),
      Err(LoadError::InvalidLevelIndex { index: 1, count: 1 })
    );
  }

  #[test]
  fn source_offsets_follow_rows() {
    let t = template(&["ab", "", "xyz"]);
    assert_eq!(t.source_offset(Position::new(1, 0)), Some(1));
    assert_eq!(t.source_offset(Position::new(2, 2)), Some(6));
    assert_eq!(t.source_offset(Position::new(0, 1)), None);
  }
}
