//! Append-only CSV persistence.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tokio::task::spawn_blocking;

use crate::models::Review;
use crate::{Result, CSV_HEADER};

/// Appends review batches to CSV files, one batch at a time.
///
/// The header row is written only when the destination does not exist yet.
#[derive(Debug, Default)]
pub struct CsvSink {
    write_lock: Mutex<()>,
}

impl CsvSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, reviews: &[Review], path: impl AsRef<Path>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path: PathBuf = path.as_ref().to_path_buf();
        let rows = reviews.to_vec();
        spawn_blocking(move || write_rows(&rows, &path)).await?
    }
}

fn write_rows(reviews: &[Review], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);

    if is_new {
        writer.write_record(CSV_HEADER)?;
    }
    for review in reviews {
        writer.write_record(review.as_record())?;
    }
    writer.flush()?;
    Ok(())
}
