use crate::{
  dataset::Dataset,
  output_data::csv_writer,
  split_data::{ProcessedSplits, TEST, TRAIN, X_VALIDATION, Y_VALIDATION},
};
use anyhow::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SplitSummaryCsvEntry {
  pub split: String,
  pub rows: usize,
  pub columns: usize,
  pub num_users: Option<usize>,
  pub num_items: Option<usize>,
  pub max_uid: Option<usize>,
  pub max_iid: Option<usize>,
  pub num_total_users: Option<usize>,
  pub num_total_items: Option<usize>,
  pub mean_rating: Option<f64>,
}

impl SplitSummaryCsvEntry {
  fn from_matrix(split: &str, matrix: &Array2<f64>) -> Self {
    Self {
      split: split.to_owned(),
      rows: matrix.nrows(),
      columns: matrix.ncols(),
      num_users: None,
      num_items: None,
      max_uid: None,
      max_iid: None,
      num_total_users: None,
      num_total_items: None,
      mean_rating: None,
    }
  }

  fn from_dataset(split: &str, dataset: &Dataset) -> Self {
    Self {
      num_users: Some(dataset.num_users()),
      num_items: Some(dataset.num_items()),
      max_uid: Some(dataset.max_uid()),
      max_iid: Some(dataset.max_iid()),
      num_total_users: Some(dataset.num_total_users()),
      num_total_items: Some(dataset.num_total_items()),
      mean_rating: Some(dataset.mean_rating()),
      ..Self::from_matrix(split, dataset.data())
    }
  }
}

pub fn split_summary(splits: &ProcessedSplits) -> Vec<SplitSummaryCsvEntry> {
  let mut entries = vec![
    SplitSummaryCsvEntry::from_dataset(TRAIN, &splits.train),
    SplitSummaryCsvEntry::from_dataset(TEST, &splits.test),
  ];
  if let Some(validation) = &splits.validation {
    entries.extend(vec![
      SplitSummaryCsvEntry::from_matrix(X_VALIDATION, &validation.x),
      SplitSummaryCsvEntry::from_matrix(Y_VALIDATION, &validation.y),
    ]);
  }
  entries
}

pub fn save_split_summary(
  csv_path: &Path,
  splits: &ProcessedSplits,
) -> Result<()> {
  let mut writer = csv_writer(csv_path)?;
  for entry in split_summary(splits) {
    writer.serialize(entry)?;
  }
  writer.flush()?;

  Ok(())
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::split_data::Validation;
  use ndarray::array;

  fn splits(validation: bool) -> ProcessedSplits {
    let mut train = Dataset::new(array![[0., 1., 4.], [2., 1., 2.]]).unwrap();
    train.set_parameters().unwrap();
    let mut test = Dataset::new(array![[4., 0., 5.]]).unwrap();
    test.set_parameters().unwrap();
    for dataset in &mut [&mut train, &mut test] {
      dataset.update_num_total_users_items(5, 2);
    }

    ProcessedSplits {
      train,
      test,
      validation: if validation {
        Some(Validation {
          x: Array2::zeros((4, 2)),
          y: Array2::zeros((4, 1)),
        })
      } else {
        None
      },
    }
  }

  #[test]
  fn summary_rows() {
    let entries = split_summary(&splits(false));
    assert_eq!(entries.len(), 2);

    let train = &entries[0];
    assert_eq!(train.split, "train");
    assert_eq!((train.rows, train.columns), (2, 3));
    assert_eq!(train.num_users, Some(2));
    assert_eq!(train.num_items, Some(1));
    assert_eq!(train.max_uid, Some(2));
    assert_eq!(train.num_total_users, Some(5));
    assert_eq!(train.num_total_items, Some(2));
    assert_eq!(train.mean_rating, Some(3.));
  }

  #[test]
  fn save_and_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("summary.csv");
    save_split_summary(&path, &splits(true)).unwrap();

    let entries: Vec<SplitSummaryCsvEntry> = csv::Reader::from_path(&path)
      .unwrap()
      .deserialize()
      .collect::<csv::Result<_>>()
      .unwrap();
    assert_eq!(entries, split_summary(&splits(true)));

    let x = &entries[2];
    assert_eq!(x.split, "x_validation");
    assert_eq!((x.rows, x.columns), (4, 2));
    assert_eq!(x.max_uid, None);
  }
}
