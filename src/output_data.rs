use anyhow::{Context, Result};
use std::{fs::File, path::Path};

pub fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
  if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("creating {}", dir.display()))?;
  }
  let file = File::create(path)
    .with_context(|| format!("creating {}", path.display()))?;
  Ok(csv::Writer::from_writer(file))
}
