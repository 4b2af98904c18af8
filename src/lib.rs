pub mod config;
pub mod dataset;
pub mod delimited;
pub mod error;
pub mod output_data;
pub mod split_data;
pub mod summary_csv;
pub mod types;

pub use config::{LoaderConfig, ReadParams, SkipHead, SplitSpec, SplitTable};
pub use dataset::Dataset;
pub use error::{Error, ReadErrorKind, Result};
pub use split_data::{ProcessedSplits, SplitData, Validation};
pub use types::{ItemType, UserItemPair};
