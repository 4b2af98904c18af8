use crate::dataset::DatasetError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Everything `SplitData` can fail with. Configuration problems and data
/// problems are separate variants so callers can tell them apart.
#[derive(Error, Debug)]
pub enum Error {
  #[error("malformed dataset configuration: {reason}")]
  Configuration { reason: String },

  #[error(
    "you must define your {split} data and its path to be read by the system"
  )]
  MissingSplit { split: String },

  #[error("could not read data from {}: {kind}", .path.display())]
  DataRead {
    path: PathBuf,
    #[source]
    kind: ReadErrorKind,
  },
}

impl Error {
  pub(crate) fn configuration(reason: impl Into<String>) -> Self {
    Self::Configuration {
      reason: reason.into(),
    }
  }

  pub(crate) fn data_read(
    path: impl Into<PathBuf>,
    kind: impl Into<ReadErrorKind>,
  ) -> Self {
    Self::DataRead {
      path: path.into(),
      kind: kind.into(),
    }
  }
}

#[derive(Error, Debug)]
pub enum ReadErrorKind {
  #[error(transparent)]
  Io(#[from] io::Error),

  #[error(transparent)]
  Csv(#[from] csv::Error),

  #[error("non-numeric token {token:?} at line {line}, column {column}")]
  NonNumeric {
    line: usize,
    column: usize,
    token: String,
  },

  #[error("line {line} has {found} fields, expected {expected}")]
  Ragged {
    line: usize,
    expected: usize,
    found: usize,
  },

  #[error(transparent)]
  Shape(#[from] ndarray::ShapeError),

  #[error(transparent)]
  Dataset(#[from] DatasetError),
}

pub type Result<T> = std::result::Result<T, Error>;
