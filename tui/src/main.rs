mod harness;
mod report;

use std::{
  fs::{self, File},
  io::{self, Read},
  sync::Mutex,
};

use argh::FromArgs;
use eyre::eyre;
use harness::PlayHarness;
use terminal_icepush::{Action, Catalogue, Game, DEFAULT_CATALOGUE};
use tracing_subscriber::EnvFilter;

fn main() -> eyre::Result<()> {
  let args: ArgsEntrypoint = argh::from_env();

  match args.sub {
    Subcommands::Play(play) => play.run()?,
    Subcommands::Replay(replay) => replay.run()?,
    Subcommands::Check(check) => check.run()?,
  }

  Ok(())
}

#[derive(FromArgs, Debug)]
/// Push lines of ice around until you reach the flag.
struct ArgsEntrypoint {
  #[argh(subcommand)]
  sub: Subcommands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Subcommands {
  Play(CmdPlay),
  Replay(CmdReplay),
  Check(CmdCheck),
}

/// Play in the terminal.
///
/// Controls:
/// - WASD or HJKL to walk.
/// - Arrow keys to shift the line of tiles next to you.
/// - R to restart the level.
/// - Ctrl+C to quit.
/// - Ctrl+L to redraw the screen.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "play")]
struct CmdPlay {
  /// path to a level catalogue; defaults to the bundled levels.
  #[argh(option)]
  levels: Option<String>,
  /// index of the level to start on.
  #[argh(option, default = "0")]
  start: usize,
  /// write logs to this file. The terminal is busy drawing the game.
  #[argh(option)]
  log: Option<String>,
}

impl CmdPlay {
  fn run(&self) -> eyre::Result<()> {
    if let Some(path) = &self.log {
      tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(File::create(path)?))
        .init();
    }

    let game = start_game(self.levels.as_deref(), self.start)?;
    PlayHarness::enter(game)?;
    Ok(())
  }
}

/// Apply a script of actions and print where it ends up.
///
/// Tokens are whitespace separated: `w a s d` walk, `Up Down Left Right`
/// shift, `r` restarts.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "replay")]
struct CmdReplay {
  /// path to the script, or `-` for stdin.
  #[argh(positional)]
  script: String,
  /// path to a level catalogue; defaults to the bundled levels.
  #[argh(option)]
  levels: Option<String>,
  /// index of the level to start on.
  #[argh(option, default = "0")]
  start: usize,
}

impl CmdReplay {
  fn run(&self) -> eyre::Result<()> {
    tracing_subscriber::fmt()
      .with_env_filter(env_filter())
      .with_writer(io::stderr)
      .init();

    let script = if self.script == "-" {
      let mut buf = String::new();
      io::stdin().read_to_string(&mut buf)?;
      buf
    } else {
      fs::read_to_string(&self.script)?
    };
    let actions = script
      .split_whitespace()
      .map(|token| token.parse::<Action>())
      .collect::<Result<Vec<_>, _>>()?;

    let mut game = start_game(self.levels.as_deref(), self.start)?;
    for action in actions {
      game.apply(action);
    }

    let state = game.state();
    println!("level {}: {}", state.level_index(), game.title());
    println!("won: {}", state.won());
    println!("player: {}", state.player_position());
    print!("{}", state.grid());
    Ok(())
  }
}

/// Load every level of a catalogue and report any problems.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "check")]
struct CmdCheck {
  /// path to a level catalogue; defaults to the bundled levels.
  #[argh(positional)]
  levels: Option<String>,
}

impl CmdCheck {
  fn run(&self) -> eyre::Result<()> {
    let (src, catalogue) = read_catalogue(self.levels.as_deref())?;
    for line in check_lines(&src, catalogue)? {
      println!("{}", line);
    }
    Ok(())
  }
}

fn check_lines(
  src: &str,
  catalogue: Catalogue,
) -> eyre::Result<Vec<String>> {
  // No levels is a valid, if boring, catalogue.
  if catalogue.is_empty() {
    return Ok(vec!["0 levels ok".to_string()]);
  }
  let game = new_game(src, catalogue, 0)?;
  let mut lines = vec![format!("{} levels ok", game.level_count())];
  for (index, level) in game.catalogue().iter().enumerate() {
    lines.push(format!("{:>3}  {}", index, level.title()));
  }
  Ok(lines)
}

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn read_catalogue(path: Option<&str>) -> eyre::Result<(String, Catalogue)> {
  let src = match path {
    Some(path) => fs::read_to_string(path)?,
    None => DEFAULT_CATALOGUE.to_string(),
  };
  let catalogue = terminal_icepush::parse_catalogue(&src)
    .map_err(|e| eyre!("{}", e.to_string()))?;
  Ok((src, catalogue))
}

fn start_game(path: Option<&str>, start: usize) -> eyre::Result<Game> {
  let (src, catalogue) = read_catalogue(path)?;
  new_game(&src, catalogue, start)
}

fn new_game(
  src: &str,
  catalogue: Catalogue,
  start: usize,
) -> eyre::Result<Game> {
  match Game::new(catalogue.clone(), start) {
    Ok(game) => Ok(game),
    Err(err) => {
      report::load_error(src, &catalogue, &err)?;
      Err(err.into())
    }
  }
}
