//! Parsing of delimited numeric text files into matrices.
use crate::{
  config::ReadParams,
  error::{Error, ReadErrorKind, Result},
};
use flate2::read::GzDecoder;
use itertools::Itertools;
use ndarray::Array2;
use std::{
  convert::TryFrom,
  fs::File,
  io::{prelude::*, BufReader},
  path::Path,
};
use tracing::debug;

const COMMENT: &str = "#";

/// Row-major buffer that checks every row has the same number of fields.
#[derive(Default)]
struct MatrixBuilder {
  values: Vec<f64>,
  ncols: Option<usize>,
  nrows: usize,
}

impl MatrixBuilder {
  fn push_row<'a>(
    &mut self,
    line: usize,
    fields: impl IntoIterator<Item = &'a str>,
  ) -> std::result::Result<(), ReadErrorKind> {
    let start = self.values.len();
    for (column, token) in fields.into_iter().enumerate() {
      let token = token.trim();
      let value = token.parse::<f64>().map_err(|_| ReadErrorKind::NonNumeric {
        line,
        column: column + 1,
        token: token.to_owned(),
      })?;
      self.values.push(value);
    }

    let found = self.values.len() - start;
    let expected = *self.ncols.get_or_insert(found);
    if found != expected {
      return Err(ReadErrorKind::Ragged {
        line,
        expected,
        found,
      });
    }
    self.nrows += 1;
    Ok(())
  }

  fn finish(self) -> std::result::Result<Array2<f64>, ReadErrorKind> {
    let shape = (self.nrows, self.ncols.unwrap_or(0));
    Ok(Array2::from_shape_vec(shape, self.values)?)
  }
}

/// Drop the first `n` lines. Returns the rest of the text and how many lines
/// were actually dropped.
fn skip_lines(content: &str, n: usize) -> (&str, usize) {
  let mut rest = content;
  for skipped in 0..n {
    match rest.find('\n') {
      Some(end) => rest = &rest[end + 1..],
      None => return ("", skipped + usize::from(!rest.is_empty())),
    }
  }
  (rest, n)
}

/// Drop a trailing `# ...` comment, wherever it starts on the line.
fn strip_comment(line: &str) -> &str {
  line.find(COMMENT).map_or(line, |start| &line[..start])
}

/// Comments are removed line by line and the line breaks kept, so record
/// positions still match lines of the original text.
fn strip_comments(content: &str) -> String {
  content.lines().map(strip_comment).join("\n")
}

fn parse_single_byte(
  content: &str,
  delimiter: u8,
  line_offset: usize,
) -> std::result::Result<Array2<f64>, ReadErrorKind> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .delimiter(delimiter)
    .quoting(false)
    .flexible(true)
    .from_reader(content.as_bytes());

  let mut builder = MatrixBuilder::default();
  for record in reader.records() {
    let record = record?;
    if record.len() == 1 && record[0].trim().is_empty() {
      continue;
    }
    let line = record.position().map_or(0, |position| {
      usize::try_from(position.line()).unwrap_or(usize::MAX)
    });
    builder.push_row(line_offset.saturating_add(line), record.iter())?;
  }
  builder.finish()
}

fn parse_multi_char(
  content: &str,
  delimiter: &str,
  line_offset: usize,
) -> std::result::Result<Array2<f64>, ReadErrorKind> {
  let mut builder = MatrixBuilder::default();
  for (idx, line) in content.lines().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    builder.push_row(line_offset + idx + 1, line.split(delimiter))?;
  }
  builder.finish()
}

/// Parse already loaded text. `skip_rows` leading lines are dropped before
/// anything is interpreted, so headers may have any shape.
pub fn parse_matrix(
  content: &str,
  delimiter: &str,
  skip_rows: usize,
) -> std::result::Result<Array2<f64>, ReadErrorKind> {
  let (rest, skipped) = skip_lines(content, skip_rows);
  let rest = strip_comments(rest);
  match delimiter.as_bytes() {
    &[byte] => parse_single_byte(&rest, byte, skipped),
    _ => parse_multi_char(&rest, delimiter, skipped),
  }
}

fn is_gzip(path: &Path) -> bool {
  path.extension().map_or(false, |ext| ext == "gz")
}

fn read_to_string(path: &Path) -> std::io::Result<String> {
  let mut reader = BufReader::new(File::open(path)?);
  let mut content = String::new();
  if is_gzip(path) {
    GzDecoder::new(reader).read_to_string(&mut content)?;
  } else {
    reader.read_to_string(&mut content)?;
  }
  Ok(content)
}

pub fn read_matrix(params: &ReadParams) -> Result<Array2<f64>> {
  let ReadParams {
    path,
    delimiter,
    skip_rows,
  } = params;

  let content =
    read_to_string(path).map_err(|e| Error::data_read(path.clone(), e))?;
  let matrix = parse_matrix(&content, delimiter, *skip_rows)
    .map_err(|kind| Error::data_read(path.clone(), kind))?;

  debug!(
    path = %path.display(),
    rows = matrix.nrows(),
    columns = matrix.ncols(),
    "read matrix"
  );

  Ok(matrix)
}
