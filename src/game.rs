//! Sequencing player actions into state changes.

use tracing::{debug, info};

use crate::{movement, shift, Action, Catalogue, GameState, LoadError};

/// A game in progress over a catalogue of levels.
#[derive(Debug, Clone)]
pub struct Game {
  catalogue: Catalogue,
  /// The starting state of every level, built once up front.
  initial: Vec<GameState>,
  state: GameState,
}

/// What an action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Moved,
  /// Moved onto a goal. The next action advances the level.
  Won,
  Shifted,
  /// The action was refused and nothing changed.
  Blocked,
  Restarted,
  /// The level was finished and this one loaded instead.
  Advanced(usize),
}

impl Game {
  /// Start a game at level `start`.
  ///
  /// Every level in the catalogue is loaded here, so a broken one is
  /// reported now rather than when the player reaches it.
  pub fn new(catalogue: Catalogue, start: usize) -> Result<Self, LoadError> {
    let initial = (0..catalogue.len())
      .map(|index| catalogue.load(index))
      .collect::<Result<Vec<_>, _>>()?;
    let state =
      initial
        .get(start)
        .cloned()
        .ok_or(LoadError::InvalidLevelIndex {
          index: start,
          count: catalogue.len(),
        })?;
    info!(levels = catalogue.len(), start, "game started");
    Ok(Self {
      catalogue,
      initial,
      state,
    })
  }

  pub fn state(&self) -> &GameState {
    &self.state
  }

  pub fn level_count(&self) -> usize {
    self.initial.len()
  }

  pub fn catalogue(&self) -> &Catalogue {
    &self.catalogue
  }

  /// Title of the current level.
  pub fn title(&self) -> &str {
    self
      .catalogue
      .get(self.state.level_index)
      .map(|level| level.title())
      .unwrap_or_default()
  }

  /// Resolve one action.
  ///
  /// If the last action won the level, this one is swallowed and the next
  /// level (or the last one again, once there are no more) is loaded.
  pub fn apply(&mut self, action: Action) -> Outcome {
    if self.state.won {
      let next = (self.state.level_index + 1).min(self.level_count() - 1);
      self.reload(next);
      info!(level = next, ?action, "advanced to next level");
      return Outcome::Advanced(next);
    }

    let outcome = match action {
      Action::Restart => {
        self.reload(self.state.level_index);
        Outcome::Restarted
      }
      Action::Move(dir) => {
        if !movement::step(&mut self.state, dir) {
          Outcome::Blocked
        } else if self.state.won {
          Outcome::Won
        } else {
          Outcome::Moved
        }
      }
      Action::Shift(dir) => {
        let origin = self.state.player_pos;
        if shift::can_shift(&self.state.grid, origin, dir) {
          shift::apply_shift(&mut self.state.grid, origin, dir);
          Outcome::Shifted
        } else {
          Outcome::Blocked
        }
      }
    };
    debug!(?action, ?outcome, level = self.state.level_index, "applied");
    outcome
  }

  fn reload(&mut self, level: usize) {
    self.state = self.initial[level].clone();
  }
}

#[cfg(test)]
mod tests {
  use aglet::Direction4;

  use super::*;
  use crate::{LevelTemplate, Position, TileKind};

  fn game() -> Game {
    let catalogue = Catalogue::new(vec![
      LevelTemplate::new("one", ["AoF"]),
      LevelTemplate::new("two", ["", " oA"]),
    ]);
    Game::new(catalogue, 0).unwrap()
  }

  #[test]
  fn win_swallows_the_next_action() {
    let mut game = game();
    assert_eq!(game.apply(Action::Move(Direction4::East)), Outcome::Moved);
    assert_eq!(game.apply(Action::Move(Direction4::East)), Outcome::Won);
    assert!(game.state().won());

    assert_eq!(
      game.apply(Action::Move(Direction4::West)),
      Outcome::Advanced(1)
    );
    assert_eq!(game.state().level_index(), 1);
    assert_eq!(game.state().player_position(), Position::new(2, 1));
    assert!(!game.state().won());
    assert_eq!(game.title(), "two");
  }

  #[test]
  fn last_level_repeats() {
    let catalogue = Catalogue::new(vec![LevelTemplate::new("only", ["AF"])]);
    let mut game = Game::new(catalogue, 0).unwrap();
    assert_eq!(game.apply(Action::Move(Direction4::East)), Outcome::Won);
    assert_eq!(game.apply(Action::Restart), Outcome::Advanced(0));
    assert_eq!(game.state().player_position(), Position::new(0, 0));
  }

  #[test]
  fn blocked_shift_is_a_no_op() {
    let catalogue = Catalogue::new(vec![LevelTemplate::new("", ["Aox"])]);
    let mut game = Game::new(catalogue, 0).unwrap();
    let before = game.state().clone();
    assert_eq!(
      game.apply(Action::Shift(Direction4::East)),
      Outcome::Blocked
    );
    assert_eq!(game.state(), &before);
  }

  #[test]
  fn shift_leaves_the_player_in_place() {
    let mut game = game();
    assert_eq!(
      game.apply(Action::Shift(Direction4::East)),
      Outcome::Shifted
    );
    let state = game.state();
    assert_eq!(state.player_position(), Position::new(0, 0));
    assert_eq!(state.grid().get(Position::new(1, 0)), TileKind::Empty);
    assert_eq!(state.grid().get(Position::new(2, 0)), TileKind::IceThin);
    assert_eq!(state.grid().get(Position::new(3, 0)), TileKind::Goal);
  }

  #[test]
  fn restart_rebuilds_the_level() {
    let mut game = game();
    let fresh = game.state().clone();
    game.apply(Action::Shift(Direction4::East));
    game.apply(Action::Move(Direction4::East));
    assert_ne!(game.state(), &fresh);
    assert_eq!(game.apply(Action::Restart), Outcome::Restarted);
    assert_eq!(game.state(), &fresh);
  }

  #[test]
  fn broken_levels_are_rejected_up_front() {
    let catalogue = Catalogue::new(vec![
      LevelTemplate::new("fine", ["AF"]),
      LevelTemplate::new("broken", ["A#"]),
    ]);
    assert!(matches!(
      Game::new(catalogue, 0),
      Err(LoadError::InvalidTileSymbol {
        level: 1,
        symbol: '#',
        ..
      })
    ));
    assert_eq!(
      Game::new(Catalogue::new(vec![]), 0).unwrap_err(),
      LoadError::InvalidLevelIndex { index: 0, count: 0 }
    );
  }
}
