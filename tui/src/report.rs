//! Pointing load errors at the catalogue text.

use std::{io, ops::Range};

use ariadne::{Label, Report, ReportKind, Source};
use terminal_icepush::{Catalogue, LevelTemplate, LoadError, Position};

/// Print `err` against the catalogue source it came from.
///
/// Errors with nothing to point at (a bad start index) are left for the
/// caller to print.
pub fn load_error(
  src: &str,
  catalogue: &Catalogue,
  err: &LoadError,
) -> io::Result<()> {
  let level = match catalogue.get(err.level()) {
    Some(it) => it,
    None => return Ok(()),
  };

  let labels = labels(src, level, err);
  let offset = match labels.first() {
    Some((span, _)) => span.start,
    None => return Ok(()),
  };
  let mut report =
    Report::<Range<usize>>::build(ReportKind::Error, (), offset)
      .with_message(format!("cannot load `{}`: {}", level.title(), err));
  for (span, msg) in labels {
    report = report.with_label(Label::new(span).with_message(msg));
  }
  report.finish().eprint(Source::from(src))
}

/// Labelled spans for `err`, counted in characters as ariadne expects.
fn labels(
  src: &str,
  level: &LevelTemplate,
  err: &LoadError,
) -> Vec<(Range<usize>, String)> {
  let byte_spans = match *err {
    LoadError::InvalidLevelIndex { .. } => Vec::new(),
    LoadError::InvalidTileSymbol {
      symbol, position, ..
    } => symbol_span(level, position, symbol)
      .map(|span| vec![(span, "no tile uses this symbol".to_string())])
      .unwrap_or_default(),
    LoadError::MissingPlayer { .. } => level_span(level, src)
      .map(|span| vec![(span, "add an `A` somewhere".to_string())])
      .unwrap_or_default(),
    LoadError::MultiplePlayers { first, second, .. } => [
      (first, "first player here"),
      (second, "another one here"),
    ]
    .into_iter()
    .filter_map(|(pos, msg)| {
      symbol_span(level, pos, 'A').map(|span| (span, msg.to_string()))
    })
    .collect(),
  };
  byte_spans
    .into_iter()
    .filter_map(|(bytes, msg)| {
      char_span(src, bytes).map(|chars| (chars, msg))
    })
    .collect()
}

fn char_span(src: &str, bytes: Range<usize>) -> Option<Range<usize>> {
  let start = src.get(..bytes.start)?.chars().count();
  let end = src.get(..bytes.end)?.chars().count();
  Some(start..end)
}

fn symbol_span(
  level: &LevelTemplate,
  pos: Position,
  symbol: char,
) -> Option<Range<usize>> {
  let start = level.source_offset(pos)?;
  Some(start..start + symbol.len_utf8())
}

/// The whole block of rows, for errors about the level as a whole.
fn level_span(level: &LevelTemplate, src: &str) -> Option<Range<usize>> {
  let first = level.row_offset(0)?;
  let last_row = level.rows().len() - 1;
  let end = level.row_offset(last_row)? + level.rows()[last_row].len();
  Some(first..end.min(src.len()).max(first))
}
