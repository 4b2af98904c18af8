use anyhow::{anyhow, Context, Result};
use irec_data::{summary_csv::save_split_summary, SplitData};
use std::{env, path::PathBuf};
use structopt::StructOpt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const CONFIG_ENV_VAR: &str = "IREC_DATASET_CONFIG";

#[derive(StructOpt)]
#[structopt(
  name = "split_data",
  about = "load train/test (and validation) files and reconcile their user/item ids"
)]
struct Opt {
  /// JSON configuration with the `dataset` (and optional `validation`)
  /// files. Defaults to $IREC_DATASET_CONFIG (a .env file is read).
  #[structopt(short, long, parse(from_os_str))]
  config: Option<PathBuf>,

  /// Save per split statistics to this csv.
  #[structopt(short, long, parse(from_os_str))]
  summary: Option<PathBuf>,

  /// Log every file read.
  #[structopt(short, long)]
  verbose: bool,
}

fn config_path(opt: &Opt) -> Result<PathBuf> {
  if let Some(path) = &opt.config {
    return Ok(path.clone());
  }
  dotenv::dotenv().ok();
  env::var(CONFIG_ENV_VAR).map(Into::into).map_err(|_| {
    anyhow!("no --config given and {} is not set", CONFIG_ENV_VAR)
  })
}

pub fn main() -> Result<()> {
  let opt = Opt::from_args();

  let subscriber = FmtSubscriber::builder()
    .with_max_level(if opt.verbose { Level::DEBUG } else { Level::INFO })
    .finish();
  tracing::subscriber::set_global_default(subscriber)
    .context("setting default subscriber failed")?;

  let config_path = config_path(&opt)?;
  let splits = SplitData::from_json_path(&config_path)
    .and_then(|split_data| split_data.process())
    .with_context(|| {
      format!("loading splits from {}", config_path.display())
    })?;

  info!(
    num_users = splits.train.num_total_users(),
    num_items = splits.train.num_total_items(),
    validation = splits.validation.is_some(),
    "splits loaded"
  );

  if let Some(summary) = &opt.summary {
    save_split_summary(summary, &splits)?;
    info!(path = %summary.display(), "saved summary");
  }

  Ok(())
}
