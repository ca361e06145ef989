//! Pushing lines of tiles away from the player.

use aglet::Direction4;
use tracing::trace;

use crate::{Grid, Position, TileKind};

/// Whether the line of tiles starting next to `origin` can be pushed one
/// cell in `dir`.
///
/// Scans outward until the first empty cell. Running into a wall of either
/// kind first refuses the shift.
pub fn can_shift(grid: &Grid, origin: Position, dir: Direction4) -> bool {
  let mut probe = origin.step(dir);
  loop {
    let tile = grid.get(probe);
    if tile.blocks_shift() {
      return false;
    }
    if tile == TileKind::Empty {
      return true;
    }
    probe = probe.step(dir);
  }
}

/// Push the line of tiles starting next to `origin` one cell in `dir`.
///
/// The cell next to `origin` is left empty and every tile up to the first
/// empty cell moves along by one, ice losing a stage of thickness as it
/// goes. The caller must have checked [`can_shift`].
pub fn apply_shift(grid: &mut Grid, origin: Position, dir: Direction4) {
  debug_assert!(
    can_shift(grid, origin, dir),
    "shift from {} refused",
    origin
  );

  let mut pos = origin.step(dir);
  let mut carried = grid.get(pos);
  grid.set(pos, TileKind::Empty);

  while carried != TileKind::Empty {
    pos = pos.step(dir);
    let displaced = grid.get(pos);
    let landed = carried.erode();
    trace!(%pos, ?carried, ?landed, "shifted tile");
    grid.set(pos, landed);
    carried = displaced;
  }
}
