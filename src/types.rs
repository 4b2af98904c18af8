use std::ops;

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum ItemType {
  User,
  Item,
}

impl ItemType {
  /// Column holding this id in an interaction matrix.
  pub fn column(self) -> usize {
    match self {
      Self::User => 0,
      Self::Item => 1,
    }
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Item => "item",
    }
  }
}

#[derive(Eq, PartialEq, Debug, Copy, Clone, Default, Hash)]
pub struct UserItemPair<T> {
  pub user: T,
  pub item: T,
}

impl<T> UserItemPair<T> {
  pub fn from_fn(f: impl Fn(ItemType) -> T) -> Self {
    Self {
      user: f(ItemType::User),
      item: f(ItemType::Item),
    }
  }

  pub fn as_ref(&self) -> UserItemPair<&T> {
    UserItemPair {
      user: &self.user,
      item: &self.item,
    }
  }

  pub fn map<U>(self, f: impl Fn(T) -> U) -> UserItemPair<U> {
    UserItemPair {
      user: f(self.user),
      item: f(self.item),
    }
  }

  pub fn zip<U>(self, other: UserItemPair<U>) -> UserItemPair<(T, U)> {
    UserItemPair {
      user: (self.user, other.user),
      item: (self.item, other.item),
    }
  }
}

impl<T> ops::Index<ItemType> for UserItemPair<T> {
  type Output = T;

  fn index(&self, item_type: ItemType) -> &Self::Output {
    match item_type {
      ItemType::User => &self.user,
      ItemType::Item => &self.item,
    }
  }
}
