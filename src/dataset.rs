use crate::types::{ItemType, UserItemPair};
use itertools::Itertools;
use ndarray::{Array2, ArrayView1};
use ordered_float::NotNan;
#[cfg(test)]
use proptest::prelude::*;
use std::{collections::BTreeSet, convert::TryFrom};
use thiserror::Error;

pub const RATING_COLUMN: usize = 2;
/// user id, item id, rating
pub const MIN_COLUMNS: usize = 3;
/// Largest id an f64 column holds exactly (2^53 - 1).
pub const MAX_ID: f64 = 9_007_199_254_740_991.;

/// Ids are non-negative integers no larger than [`MAX_ID`] and below
/// `usize::MAX`, so `id + 1` never overflows.
fn to_id(value: f64) -> Option<usize> {
  if value >= 0. && value <= MAX_ID && value.fract() == 0. {
    usize::try_from(value as u64)
      .ok()
      .filter(|&id| id < usize::MAX)
  } else {
    None
  }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
  #[error(
    "expected at least {} columns (uid, iid, rating), found {found}",
    MIN_COLUMNS
  )]
  TooFewColumns { found: usize },

  #[error("dataset has no rows")]
  Empty,

  #[error("invalid {} id {value} in row {row}", .item_type.name())]
  InvalidId {
    item_type: ItemType,
    row: usize,
    value: f64,
  },

  #[error("invalid rating in row {row}")]
  InvalidRating { row: usize },
}

/// Interaction matrix of one split, with statistics derived from it.
///
/// The statistics are all zero until [`Dataset::set_parameters`] is called.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
  data: Array2<f64>,
  ids: UserItemPair<Vec<usize>>,
  max_id: UserItemPair<usize>,
  num_total: UserItemPair<usize>,
  rate_domain: BTreeSet<NotNan<f64>>,
  mean_rating: f64,
  min_rating: f64,
  max_rating: f64,
}

impl Dataset {
  pub fn new(data: Array2<f64>) -> Result<Self, DatasetError> {
    if data.nrows() > 0 && data.ncols() < MIN_COLUMNS {
      return Err(DatasetError::TooFewColumns { found: data.ncols() });
    }
    Ok(Self {
      data,
      ..Default::default()
    })
  }

  fn unique_ids(
    item_type: ItemType,
    column: ArrayView1<f64>,
  ) -> Result<Vec<usize>, DatasetError> {
    let ids = column
      .iter()
      .enumerate()
      .map(|(row, &value)| {
        to_id(value).ok_or(DatasetError::InvalidId {
          item_type,
          row,
          value,
        })
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(ids.into_iter().sorted().dedup().collect())
  }

  pub fn set_parameters(&mut self) -> Result<(), DatasetError> {
    if self.data.nrows() == 0 {
      return Err(DatasetError::Empty);
    }

    let data = &self.data;
    let ids = UserItemPair {
      user: Self::unique_ids(
        ItemType::User,
        data.column(ItemType::User.column()),
      )?,
      item: Self::unique_ids(
        ItemType::Item,
        data.column(ItemType::Item.column()),
      )?,
    };

    let ratings = data
      .column(RATING_COLUMN)
      .iter()
      .enumerate()
      .map(|(row, &rating)| {
        NotNan::new(rating).map_err(|_| DatasetError::InvalidRating { row })
      })
      .collect::<Result<Vec<_>, _>>()?;

    // non-empty, checked above
    let (min, max) = ratings
      .iter()
      .minmax()
      .into_option()
      .ok_or(DatasetError::Empty)?;
    self.min_rating = min.into_inner();
    self.max_rating = max.into_inner();
    self.mean_rating = ratings.iter().map(|r| r.into_inner()).sum::<f64>()
      / ratings.len() as f64;
    self.rate_domain = ratings.into_iter().collect();

    self.max_id = ids
      .as_ref()
      .map(|ids| ids.last().copied().unwrap_or_default());
    self.num_total = self.max_id.map(|max_id| max_id + 1);
    self.ids = ids;

    Ok(())
  }

  /// Set the size of the id spaces shared with the other splits. Never goes
  /// below what this split itself has seen.
  pub fn update_num_total_users_items(
    &mut self,
    num_total_users: usize,
    num_total_items: usize,
  ) {
    let requested = UserItemPair {
      user: num_total_users,
      item: num_total_items,
    };
    self.num_total = requested
      .zip(self.max_id)
      .map(|(requested, max_id)| requested.max(max_id + 1));
  }

  pub fn data(&self) -> &Array2<f64> {
    &self.data
  }

  pub fn uids(&self) -> &[usize] {
    &self.ids[ItemType::User]
  }

  pub fn iids(&self) -> &[usize] {
    &self.ids[ItemType::Item]
  }

  pub fn max_id(&self, item_type: ItemType) -> usize {
    self.max_id[item_type]
  }

  pub fn max_uid(&self) -> usize {
    self.max_id(ItemType::User)
  }

  pub fn max_iid(&self) -> usize {
    self.max_id(ItemType::Item)
  }

  /// Number of distinct ids of `item_type` present in this split.
  pub fn len(&self, item_type: ItemType) -> usize {
    self.ids[item_type].len()
  }

  pub fn num_users(&self) -> usize {
    self.len(ItemType::User)
  }

  pub fn num_items(&self) -> usize {
    self.len(ItemType::Item)
  }

  pub fn num_total(&self) -> UserItemPair<usize> {
    self.num_total
  }

  pub fn num_total_users(&self) -> usize {
    self.num_total[ItemType::User]
  }

  pub fn num_total_items(&self) -> usize {
    self.num_total[ItemType::Item]
  }

  pub fn rate_domain(&self) -> &BTreeSet<NotNan<f64>> {
    &self.rate_domain
  }

  pub fn mean_rating(&self) -> f64 {
    self.mean_rating
  }

  pub fn min_rating(&self) -> f64 {
    self.min_rating
  }

  pub fn max_rating(&self) -> f64 {
    self.max_rating
  }
}

/// Random interaction matrices with ids below `max_ids` and ratings in 1..=5.
#[cfg(test)]
pub fn strategy(
  max_ids: UserItemPair<usize>,
  rows: impl Into<proptest::collection::SizeRange>,
) -> impl Strategy<Value = Array2<f64>> {
  proptest::collection::vec((0..max_ids.user, 0..max_ids.item, 1..=5u8), rows)
    .prop_map(|rows| {
      let values = rows
        .iter()
        .flat_map(|&(u, i, r)| vec![u as f64, i as f64, r as f64])
        .collect();
      Array2::from_shape_vec((rows.len(), MIN_COLUMNS), values).unwrap()
    })
}

#[cfg(test)]
mod test {
  use super::*;
  use ndarray::array;

  fn interactions() -> Array2<f64> {
    array![
      [0., 3., 4., 100.],
      [2., 3., 5., 101.],
      [2., 7., 1., 102.],
      [5., 1., 4., 103.],
    ]
  }

  #[test]
  fn parameters_start_at_zero() {
    let dataset = Dataset::new(interactions()).unwrap();
    assert_eq!(dataset.max_uid(), 0);
    assert_eq!(dataset.num_total_items(), 0);
    assert!(dataset.rate_domain().is_empty());
  }

  #[test]
  fn set_parameters() {
    let mut dataset = Dataset::new(interactions()).unwrap();
    dataset.set_parameters().unwrap();

    assert_eq!(dataset.uids(), &[0, 2, 5]);
    assert_eq!(dataset.iids(), &[1, 3, 7]);
    assert_eq!(dataset.num_users(), 3);
    assert_eq!(dataset.num_items(), 3);
    assert_eq!(dataset.max_uid(), 5);
    assert_eq!(dataset.max_iid(), 7);
    assert_eq!(dataset.num_total_users(), 6);
    assert_eq!(dataset.num_total_items(), 8);
    assert_eq!(dataset.min_rating(), 1.);
    assert_eq!(dataset.max_rating(), 5.);
    assert_eq!(dataset.mean_rating(), 3.5);
    let domain: Vec<f64> =
      dataset.rate_domain().iter().map(|r| r.into_inner()).collect();
    assert_eq!(domain, vec![1., 4., 5.]);
    // extra columns are kept
    assert_eq!(dataset.data().ncols(), 4);
  }

  #[test]
  fn update_totals_never_shrinks() {
    let mut dataset = Dataset::new(interactions()).unwrap();
    dataset.set_parameters().unwrap();

    dataset.update_num_total_users_items(10, 20);
    assert_eq!(dataset.num_total(), UserItemPair { user: 10, item: 20 });

    dataset.update_num_total_users_items(1, 1);
    assert_eq!(dataset.num_total(), UserItemPair { user: 6, item: 8 });
  }

  #[test]
  fn too_few_columns() {
    assert_eq!(
      Dataset::new(array![[1., 2.]]).unwrap_err(),
      DatasetError::TooFewColumns { found: 2 }
    );
  }

  #[test]
  fn empty() {
    let mut dataset = Dataset::new(Array2::zeros((0, 0))).unwrap();
    assert_eq!(dataset.set_parameters(), Err(DatasetError::Empty));
  }

  #[test]
  fn invalid_ids() {
    for (data, item_type) in vec![
      (array![[0., 1., 3.], [-1., 1., 3.]], ItemType::User),
      (array![[0., 1.5, 3.]], ItemType::Item),
      (array![[0., f64::INFINITY, 3.]], ItemType::Item),
    ] {
      let mut dataset = Dataset::new(data).unwrap();
      match dataset.set_parameters() {
        Err(DatasetError::InvalidId { item_type: t, .. }) => {
          assert_eq!(t, item_type)
        }
        other => panic!("unexpected {:?}", other),
      }
    }
  }

  #[test]
  fn ids_beyond_exact_f64_range() {
    for &value in &[1e20, 9_007_199_254_740_992., f64::MAX] {
      let mut dataset = Dataset::new(array![[0., value, 3.]]).unwrap();
      assert_eq!(
        dataset.set_parameters(),
        Err(DatasetError::InvalidId {
          item_type: ItemType::Item,
          row: 0,
          value,
        })
      );
    }

    let mut dataset = Dataset::new(array![[MAX_ID, 0., 3.]]).unwrap();
    dataset.set_parameters().unwrap();
    assert_eq!(dataset.max_uid() as f64, MAX_ID);
    assert_eq!(dataset.num_total_users(), dataset.max_uid() + 1);
  }

  #[test]
  fn nan_rating() {
    let mut dataset = Dataset::new(array![[0., 1., f64::NAN]]).unwrap();
    assert_eq!(
      dataset.set_parameters(),
      Err(DatasetError::InvalidRating { row: 0 })
    );
  }

  proptest! {
    #[test]
    fn max_ids_bound_all_ids(
      data in strategy(UserItemPair { user: 50, item: 80 }, 1..100)
    ) {
      let mut dataset = Dataset::new(data.clone()).unwrap();
      dataset.set_parameters().unwrap();

      for row in data.outer_iter() {
        prop_assert!(row[0] as usize <= dataset.max_uid());
        prop_assert!(row[1] as usize <= dataset.max_iid());
        prop_assert!(dataset.uids().binary_search(&(row[0] as usize)).is_ok());
      }
      prop_assert_eq!(dataset.num_total_users(), dataset.max_uid() + 1);
      prop_assert!(dataset.num_users() <= dataset.num_total_users());
      prop_assert!(dataset.rate_domain().len() <= 5);
    }
  }
}
