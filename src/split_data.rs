use crate::{
  config::{LoaderConfig, ReadParams, SplitTable},
  dataset::Dataset,
  delimited::read_matrix,
  error::{Error, Result},
  types::{ItemType, UserItemPair},
};
use ndarray::Array2;
use std::path::Path;
use tracing::info;

pub const TRAIN: &str = "train";
pub const TEST: &str = "test";
pub const X_VALIDATION: &str = "x_validation";
pub const Y_VALIDATION: &str = "y_validation";

/// Loads the train/test files (and optionally the validation files) described
/// by a configuration and reconciles the id spaces of train and test.
#[derive(Clone, Debug)]
pub struct SplitData {
  dataset: SplitTable,
  validation: Option<SplitTable>,
}

#[derive(Clone, Debug)]
pub struct Validation {
  pub x: Array2<f64>,
  pub y: Array2<f64>,
}

#[derive(Clone, Debug)]
pub struct ProcessedSplits {
  pub train: Dataset,
  pub test: Dataset,
  pub validation: Option<Validation>,
}

impl ProcessedSplits {
  pub fn x_validation(&self) -> Option<&Array2<f64>> {
    self.validation.as_ref().map(|v| &v.x)
  }

  pub fn y_validation(&self) -> Option<&Array2<f64>> {
    self.validation.as_ref().map(|v| &v.y)
  }

  pub fn into_parts(
    self,
  ) -> (Dataset, Dataset, Option<Array2<f64>>, Option<Array2<f64>>) {
    let (x, y) = match self.validation {
      Some(Validation { x, y }) => (Some(x), Some(y)),
      None => (None, None),
    };
    (self.train, self.test, x, y)
  }
}

fn load_dataset(params: &ReadParams) -> Result<Dataset> {
  let data = read_matrix(params)?;
  let mut dataset =
    Dataset::new(data).map_err(|e| Error::data_read(params.path.clone(), e))?;
  dataset
    .set_parameters()
    .map_err(|e| Error::data_read(params.path.clone(), e))?;
  Ok(dataset)
}

/// Size of each id space so that every id seen in either split fits. Max ids
/// are below `usize::MAX` (see `dataset::MAX_ID`).
pub fn num_total(train: &Dataset, test: &Dataset) -> UserItemPair<usize> {
  UserItemPair::from_fn(|item_type: ItemType| {
    train.max_id(item_type).max(test.max_id(item_type)) + 1
  })
}

impl SplitData {
  pub fn new(
    dataset: SplitTable,
    validation: Option<SplitTable>,
  ) -> Result<Self> {
    if dataset.len() != 2 {
      return Err(Error::configuration(format!(
        "you must define files for train and test sets, got {} entries",
        dataset.len()
      )));
    }

    Ok(Self {
      dataset,
      validation,
    })
  }

  pub fn from_config(config: LoaderConfig) -> Result<Self> {
    Self::new(config.dataset, config.validation)
  }

  pub fn from_json_path(path: &Path) -> Result<Self> {
    Self::from_config(LoaderConfig::load(path)?)
  }

  fn load_validation(table: &SplitTable) -> Result<Validation> {
    info!("reading x_validation and y_validation");
    let x = read_matrix(&table.resolve(X_VALIDATION)?)?;
    let y = read_matrix(&table.resolve(Y_VALIDATION)?)?;
    info!(x_shape = ?x.dim(), y_shape = ?y.dim(), "validation shapes");
    Ok(Validation { x, y })
  }

  pub fn process(&self) -> Result<ProcessedSplits> {
    let mut train = load_dataset(&self.dataset.resolve(TRAIN)?)?;
    let mut test = load_dataset(&self.dataset.resolve(TEST)?)?;

    let num_total = num_total(&train, &test);
    for dataset in &mut [&mut train, &mut test] {
      dataset.update_num_total_users_items(num_total.user, num_total.item);
    }

    info!(shape = ?test.data().dim(), "test");
    info!(shape = ?train.data().dim(), "train");
    info!(
      num_total_users = num_total.user,
      num_total_items = num_total.item,
      "reconciled id spaces"
    );

    let validation = self
      .validation
      .as_ref()
      .map(Self::load_validation)
      .transpose()?;

    Ok(ProcessedSplits {
      train,
      test,
      validation,
    })
  }
}
