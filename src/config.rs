//! Configuration for the split files.
//!
//! A [`SplitTable`] maps split names (`train`, `test`, `x_validation`, ...) to
//! the file they come from. Defaults are only applied in
//! [`SplitTable::resolve`], which hands back a [`ReadParams`] for the reader.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
  collections::BTreeMap,
  fs::File,
  io::BufReader,
  path::{Path, PathBuf},
};

pub const DEFAULT_DELIMITER: &str = ",";
pub const DEFAULT_SKIP_ROWS: usize = 1;

/// `skip_head` is usually a flag for "the file has a header", but an explicit
/// row count is accepted as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkipHead {
  Flag(bool),
  Rows(usize),
}

impl SkipHead {
  pub fn rows(self) -> usize {
    match self {
      Self::Flag(skip) => skip as usize,
      Self::Rows(rows) => rows,
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitSpec {
  #[serde(default)]
  pub path: Option<PathBuf>,
  #[serde(default)]
  pub file_delimiter: Option<String>,
  #[serde(default)]
  pub skip_head: Option<SkipHead>,
}

impl SplitSpec {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: Some(path.into()),
      ..Default::default()
    }
  }

  pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
    self.file_delimiter = Some(delimiter.into());
    self
  }

  pub fn skip_head(mut self, skip_head: SkipHead) -> Self {
    self.skip_head = Some(skip_head);
    self
  }
}

/// Everything needed to read one split, with defaults filled in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadParams {
  pub path: PathBuf,
  pub delimiter: String,
  pub skip_rows: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitTable(BTreeMap<String, SplitSpec>);

impl SplitTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, split: impl Into<String>, spec: SplitSpec) -> Self {
    self.insert(split, spec);
    self
  }

  pub fn insert(&mut self, split: impl Into<String>, spec: SplitSpec) {
    self.0.insert(split.into(), spec);
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, split: &str) -> Option<&SplitSpec> {
    self.0.get(split)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn resolve(&self, split: &str) -> Result<ReadParams> {
    let (spec, path) = self
      .get(split)
      .and_then(|spec| Some((spec, spec.path.clone()?)))
      .ok_or_else(|| Error::MissingSplit {
        split: split.to_owned(),
      })?;

    let delimiter = spec
      .file_delimiter
      .clone()
      .unwrap_or_else(|| DEFAULT_DELIMITER.to_owned());
    if delimiter.is_empty() {
      return Err(Error::configuration(format!(
        "empty file_delimiter for {}",
        split
      )));
    }

    Ok(ReadParams {
      path,
      delimiter,
      skip_rows: spec.skip_head.map_or(DEFAULT_SKIP_ROWS, SkipHead::rows),
    })
  }
}

/// The whole configuration document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
  pub dataset: SplitTable,
  #[serde(default)]
  pub validation: Option<SplitTable>,
}

impl LoaderConfig {
  pub fn from_json_str(s: &str) -> Result<Self> {
    serde_json::from_str(s).map_err(|e| Error::configuration(e.to_string()))
  }

  pub fn load(path: &Path) -> Result<Self> {
    let file = File::open(path).map_err(|e| {
      Error::configuration(format!("cannot open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
      Error::configuration(format!("{}: {}", path.display(), e))
    })
  }
}
