use terminal_icepush::{Action, Catalogue, Game, Outcome, DEFAULT_CATALOGUE};

fn play(start: usize, script: &str) -> (Game, Vec<Outcome>) {
  let mut game = Game::new(Catalogue::bundled().unwrap(), start).unwrap();
  let outcomes = script
    .split_whitespace()
    .map(|token| game.apply(token.parse::<Action>().unwrap()))
    .collect();
  (game, outcomes)
}

#[test]
fn bundled_catalogue_loads() {
  let catalogue = Catalogue::bundled().unwrap();
  assert_eq!(catalogue.len(), 14);
  assert_eq!(catalogue.get(4).unwrap().title(), "Ausfahrer");
  assert!(DEFAULT_CATALOGUE.starts_with('='));
  for index in 0..catalogue.len() {
    assert!(catalogue.load(index).is_ok(), "level {} broken", index);
  }
}

#[test]
fn first_level_can_be_solved() {
  let (game, outcomes) = play(0, "d d d d d d d d s s a a a a");
  assert_eq!(outcomes.last(), Some(&Outcome::Won));
  assert!(game.state().won());
  assert_eq!(
    game.state().grid().to_string(),
    "\n   oooxx\n  ooxoooooooo\n            o\n        Aoooo\n\n"
  );

  let (game, outcomes) = play(0, "d d d d d d d d s s a a a a w");
  assert_eq!(outcomes.last(), Some(&Outcome::Advanced(1)));
  assert_eq!(game.state().level_index(), 1);
  assert_eq!(game.state().grid().to_string(), "\n\n  Aoo\n  oo oooF\n\n");
}

#[test]
fn shifts_replay_exactly() {
  let script = "Left w Up Up a Right";
  let (first, _) = play(4, script);
  let (second, _) = play(4, script);
  assert_eq!(first.state(), second.state());
  assert_eq!(
    first.state().grid().to_string(),
    "\n    F\n\n  xo\n  xA 2\n  xxx\n\n"
  );
}

#[test]
fn long_scripts_are_deterministic() {
  let script = "d Right s a Left Up w w d Down r d d Right a Up s Left \
                a a Down d w Right";
  for start in 0..14 {
    let (a, a_out) = play(start, script);
    let (b, b_out) = play(start, script);
    assert_eq!(a_out, b_out);
    assert_eq!(a.state(), b.state());
    assert_eq!(
      a.state().grid().to_string(),
      b.state().grid().to_string()
    );
  }
}
