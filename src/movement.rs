//! Stepping the player one cell.

use aglet::Direction4;
use tracing::debug;

use crate::{GameState, TileKind};

/// Try to step the active player one cell in `dir`.
///
/// The player swaps places with whatever it steps onto: the tile it was
/// covering goes back into the grid and the destination tile is kept
/// underneath. Walking onto a goal sets the win flag. A blocked step
/// changes nothing and returns `false`.
pub fn step(state: &mut GameState, dir: Direction4) -> bool {
  let from = state.player_pos;
  let to = from.step(dir);
  let dest = state.grid.get(to);

  if !dest.is_passable() {
    debug!(?dir, %to, ?dest, "step blocked");
    return false;
  }
  if dest == TileKind::Goal {
    state.won = true;
  }

  state.grid.set(from, state.beneath_player);
  state.grid.set(to, TileKind::PlayerMarker(state.player));
  state.beneath_player = dest;
  state.player_pos = to;

  debug!(?dir, %from, %to, ?dest, won = state.won, "stepped");
  true
}
