use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::record::ScreeningRecord;

pub const DEFAULT_FILE_NAME: &str = "fracture_screening_result.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Save a result record as UTF-8 CSV atomically
///
/// Uses atomic-write-file so a partially written export never replaces an
/// existing file.
pub fn save_csv(path: &Path, record: &ScreeningRecord) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(record.to_csv().as_bytes())
        .context("Failed to write screening record")?;

    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    log::debug!("Exported {} ({}) to {}", DEFAULT_FILE_NAME, CSV_MIME_TYPE, path.display());
    Ok(())
}
