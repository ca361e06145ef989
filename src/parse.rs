use nom::{
  bytes::complete::tag,
  character::complete::{
    anychar, char, line_ending, multispace0, not_line_ending, space0,
  },
  combinator::{eof, map_opt, not},
  error::{context, VerboseError},
  multi::many0,
  sequence::{preceded, terminated},
  Finish, IResult, Offset,
};

use crate::{Catalogue, LevelTemplate, TileKind};

/// Parse a catalogue of levels.
///
/// Each level is a header line starting with `=` (the rest of the line is
/// the title) followed by its rows. Rows are kept verbatim, blank ones
/// included.
pub fn parse_catalogue(s: &str) -> Result<Catalogue, VerboseError<&str>> {
  // Every row must end in a line ending, so make sure the last one does.
  let owned;
  let input = if s.is_empty() || s.ends_with('\n') {
    s
  } else {
    owned = format!("{}\n", s);
    owned.as_str()
  };

  let (_, raw) = catalogue(input)
    .finish()
    .map_err(|e| relocate(e, input, s))?;
  let levels = raw
    .into_iter()
    .map(|level| {
      let (rows, offsets): (Vec<String>, Vec<usize>) = level
        .rows
        .into_iter()
        .map(|row| (row.to_string(), input.offset(row)))
        .unzip();
      LevelTemplate::with_offsets(level.title.to_string(), rows, offsets)
    })
    .collect();
  Ok(Catalogue::new(levels))
}

fn catalogue(s: &str) -> IResult<&str, Vec<RawLevel>, VerboseError<&str>> {
  let (s, _) = multispace0(s)?;
  let (s, levels) = many0(level)(s)?;
  let (s, _) = context("level header", eof)(s)?;
  Ok((s, levels))
}

fn level(s: &str) -> IResult<&str, RawLevel, VerboseError<&str>> {
  let (s, title) = header(s)?;
  let (s, rows) = many0(row)(s)?;
  Ok((s, RawLevel { title, rows }))
}

fn header(s: &str) -> IResult<&str, &str, VerboseError<&str>> {
  context(
    "header",
    preceded(
      tag("="),
      preceded(space0, terminated(not_line_ending, line_ending)),
    ),
  )(s)
}

fn row(s: &str) -> IResult<&str, &str, VerboseError<&str>> {
  preceded(not(char('=')), terminated(not_line_ending, line_ending))(s)
}

fn a_tile(s: &str) -> IResult<&str, TileKind, VerboseError<&str>> {
  context("tile", map_opt(anychar, TileKind::from_symbol))(s)
}

/// A row symbol with no tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnknownSymbol {
  pub column: usize,
  pub symbol: char,
}

/// Map one template row to tiles, one per character.
pub(crate) fn tile_row(row: &str) -> Result<Vec<TileKind>, UnknownSymbol> {
  match many0(a_tile)(row) {
    Ok((rest, tiles)) => match rest.chars().next() {
      None => Ok(tiles),
      Some(symbol) => Err(UnknownSymbol {
        column: tiles.len(),
        symbol,
      }),
    },
    // a_tile always consumes when it succeeds, so many0 only ever stops
    Err(_) => unreachable!("many0 over a consuming parser failed"),
  }
}

// Errors from the newline-patched copy have to point back into the
// caller's string.
fn relocate<'a>(
  err: VerboseError<&str>,
  parsed: &str,
  original: &'a str,
) -> VerboseError<&'a str> {
  let errors = err
    .errors
    .into_iter()
    .map(|(at, kind)| {
      let offset = parsed.offset(at).min(original.len());
      (&original[offset..], kind)
    })
    .collect();
  VerboseError { errors }
}

struct RawLevel<'a> {
  title: &'a str,
  rows: Vec<&'a str>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Position;

  #[test]
  fn splits_levels_on_headers() {
    let catalogue =
      parse_catalogue("\n= First\n\n  A o\n=Second\nAF\n\n").unwrap();
    assert_eq!(catalogue.len(), 2);

    let first = catalogue.get(0).unwrap();
    assert_eq!(first.title(), "First");
    assert_eq!(first.rows(), &["".to_string(), "  A o".to_string()]);

    let second = catalogue.get(1).unwrap();
    assert_eq!(second.title(), "Second");
    assert_eq!(second.rows(), &["AF".to_string(), "".to_string()]);
  }

  #[test]
  fn accepts_missing_final_newline_and_crlf() {
    let catalogue = parse_catalogue("= a\r\nA o\r\n= \r\n oA").unwrap();
    assert_eq!(catalogue.len(), 2);
    assert_eq!(catalogue.get(0).unwrap().rows(), &["A o".to_string()]);
    assert_eq!(catalogue.get(1).unwrap().title(), "");
    assert_eq!(catalogue.get(1).unwrap().rows(), &[" oA".to_string()]);
  }

  #[test]
  fn rows_before_any_header_are_an_error() {
    assert!(parse_catalogue("  oA\n= late\nA\n").is_err());
  }

  #[test]
  fn empty_catalogue_has_no_levels() {
    assert!(parse_catalogue("").unwrap().is_empty());
    assert!(parse_catalogue("\n\n").unwrap().is_empty());
  }

  #[test]
  fn remembers_where_rows_came_from() {
    let src = "= t\n\n oA?\n";
    let catalogue = parse_catalogue(src).unwrap();
    let offset = catalogue
      .get(0)
      .unwrap()
      .source_offset(Position::new(3, 1))
      .unwrap();
    assert_eq!(&src[offset..offset + 1], "?");
  }

  #[test]
  fn tile_rows_stop_at_unknown_symbols() {
    assert_eq!(
      tile_row("oO21"),
      Ok(vec![
        TileKind::IceFull,
        TileKind::SolidObstacle,
        TileKind::IceThin,
        TileKind::IceMinimal,
      ])
    );
    assert_eq!(
      tile_row("xx3x"),
      Err(UnknownSymbol {
        column: 2,
        symbol: '3'
      })
    );
    assert_eq!(tile_row(""), Ok(vec![]));
  }
}
