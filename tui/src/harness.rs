//! Play harness

use std::io::{self, Stdout, Write};

use aglet::{Coord, Direction4};
use crossterm::{
  cursor::{Hide, MoveTo, Show},
  event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
  style::{
    Attribute, Attributes, Color, Colors, Print, ResetColor, SetAttributes,
    SetColors, SetForegroundColor,
  },
  terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
  },
  QueueableCommand,
};
use terminal_icepush::{
  Action, Game, Outcome, PlayerId, Position, TileKind, TileView,
};

const START_X: u16 = 2;
const START_Y: u16 = 1;

const TILE_STRIDE_X: u16 = 2;
const TILE_STRIDE_Y: u16 = 1;

/// Where the top left of the board is drawn.
const BOARD_X: u16 = 2;
const BOARD_Y: u16 = 4;

pub struct PlayHarness {
  game: Game,
  last: Option<Outcome>,
  must_redraw: bool,
}

impl PlayHarness {
  /// Transfer runtime to the harness.
  /// This will only return once the player quits.
  pub fn enter(game: Game) -> io::Result<()> {
    let mut harness = Self {
      game,
      last: None,
      must_redraw: true,
    };

    harness.spin()?;

    Ok(())
  }

  fn spin(&mut self) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.queue(EnterAlternateScreen)?.queue(Hide)?.flush()?;

    loop {
      self.draw(&mut stdout)?;

      if let Event::Key(ev) = event::read()? {
        if matches!(ev.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
          let quit = self.update(ev.code, ev.modifiers);
          if quit {
            break;
          }
        }
      }
    }

    stdout.queue(Show)?.queue(LeaveAlternateScreen)?.flush()?;
    disable_raw_mode()?;

    Ok(())
  }

  /// return whether to quit
  fn update(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
    if mods.contains(KeyModifiers::CONTROL) {
      match key {
        KeyCode::Char('c') => return true,
        KeyCode::Char('l') => {
          self.must_redraw = true;
          return false;
        }
        _ => {}
      }
    }

    if let Some(action) = key_action(key, self.game.state().won()) {
      let before = self.game.state().bounds();
      let outcome = self.game.apply(action);
      // Tiles pushed off the old edges or a new level mean stale cells.
      if self.game.state().bounds() != before
        || matches!(outcome, Outcome::Advanced(_))
      {
        self.must_redraw = true;
      }
      self.last = Some(outcome);
    }
    false
  }

  fn draw(&mut self, stdout: &mut Stdout) -> io::Result<()> {
    if self.must_redraw {
      stdout.queue(Clear(ClearType::All))?;
      self.must_redraw = false;
    }

    let state = self.game.state();
    let title = format!(
      "Level {}/{}: {}",
      state.level_index() + 1,
      self.game.level_count(),
      self.game.title()
    );
    stdout
      .queue(MoveTo(START_X, START_Y))?
      .queue(ResetColor)?
      .queue(Clear(ClearType::UntilNewLine))?
      .queue(Print(title))?;

    let (status, color) = match self.last {
      None => ("WASD walk, arrows shift, R restarts", Color::DarkGrey),
      Some(Outcome::Won) => ("You made it! Press any key.", Color::Green),
      Some(Outcome::Blocked) => ("Can't do that.", Color::Red),
      Some(Outcome::Restarted) => ("Restarted.", Color::White),
      Some(Outcome::Advanced(_)) => ("On to the next one.", Color::Green),
      Some(Outcome::Moved | Outcome::Shifted) => ("", Color::Reset),
    };
    stdout
      .queue(MoveTo(START_X, START_Y + 1))?
      .queue(Clear(ClearType::UntilNewLine))?
      .queue(SetForegroundColor(color))?
      .queue(Print(status))?;

    let (min, max) = state.bounds();
    for y in min.y..=max.y {
      for x in min.x..=max.x {
        let pos = Position::new(x, y);
        let (ch, cols, fmt) = tile_display(state.tile(pos));
        let Some(coord) = board_coord(pos, min) else {
          continue;
        };
        let screenpos = grid_to_screen(coord);
        stdout
          .queue(MoveTo(screenpos.0, screenpos.1))?
          .queue(SetColors(cols))?
          .queue(SetAttributes(fmt))?
          .queue(Print(ch))?;
      }
    }
    stdout.queue(ResetColor)?;

    stdout.flush()?;
    Ok(())
  }
}

/// Once the level is won any key moves on; the game swallows the action.
fn key_action(key: KeyCode, won: bool) -> Option<Action> {
  let action = match key {
    KeyCode::Char('w' | 'W' | 'k' | 'K') => Action::Move(Direction4::North),
    KeyCode::Char('a' | 'A' | 'h' | 'H') => Action::Move(Direction4::West),
    KeyCode::Char('s' | 'S' | 'j' | 'J') => Action::Move(Direction4::South),
    KeyCode::Char('d' | 'D' | 'l' | 'L') => Action::Move(Direction4::East),
    KeyCode::Up => Action::Shift(Direction4::North),
    KeyCode::Left => Action::Shift(Direction4::West),
    KeyCode::Down => Action::Shift(Direction4::South),
    KeyCode::Right => Action::Shift(Direction4::East),
    KeyCode::Char('r' | 'R') => Action::Restart,
    _ if won => Action::Restart,
    _ => return None,
  };
  Some(action)
}

fn tile_display(tile: TileKind) -> (char, Colors, Attributes) {
  let plain = Attribute::NormalIntensity.into();
  let bold = Attributes::default() | Attribute::Bold;
  match tile {
    TileKind::Empty => (' ', Colors::new(Color::Reset, Color::Reset), plain),
    TileKind::Floor => {
      ('.', Colors::new(Color::DarkGrey, Color::Reset), plain)
    }
    TileKind::SolidObstacle => {
      ('O', Colors::new(Color::White, Color::DarkGrey), bold)
    }
    TileKind::IceFull => ('o', Colors::new(Color::White, Color::Blue), bold),
    TileKind::IceThin => {
      ('2', Colors::new(Color::Blue, Color::DarkCyan), plain)
    }
    TileKind::IceMinimal => {
      ('1', Colors::new(Color::DarkBlue, Color::Cyan), plain)
    }
    TileKind::Wall => ('x', Colors::new(Color::Magenta, Color::Reset), plain),
    TileKind::StrongWall => {
      ('X', Colors::new(Color::White, Color::DarkMagenta), bold)
    }
    TileKind::Goal => ('F', Colors::new(Color::Yellow, Color::Reset), bold),
    TileKind::PlayerMarker(PlayerId::Primary) => {
      ('@', Colors::new(Color::Green, Color::Reset), bold)
    }
    TileKind::PlayerMarker(PlayerId::Secondary) => {
      ('@', Colors::new(Color::DarkYellow, Color::Reset), plain)
    }
  }
}

/// Board cells relative to the top left of the stored area, so tiles pushed
/// into negative space still get drawn.
fn board_coord(pos: Position, min: Position) -> Option<Coord> {
  Position::new(pos.x - min.x, pos.y - min.y)
    .to_coord_vec()
    .to_coord()
}

fn grid_to_screen(coord: Coord) -> (u16, u16) {
  (
    coord.x as u16 * TILE_STRIDE_X + BOARD_X,
    coord.y as u16 * TILE_STRIDE_Y + BOARD_Y,
  )
}
