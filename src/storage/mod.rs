// src/storage/mod.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::models::{RunSummary, TheoremRecord};
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes the records as `<name>.jsonl`, one JSON object per line
    pub fn save_records(&self, name: &str, records: &[TheoremRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}.jsonl", name));

        let mut file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            file.write_all(line.as_bytes()).map_err(StorageError::IoError)?;
            file.write_all(b"\n").map_err(StorageError::IoError)?;
        }

        tracing::info!("Saved {} records to {}", records.len(), file_path.display());

        Ok(file_path)
    }

    /// Saves the run summary as `<name>_meta.json`
    pub fn save_run_metadata(&self, name: &str, summary: &RunSummary) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_meta.json", name));

        let metadata = serde_json::json!({
            "dataset": name,
            "papers_processed": summary.papers_processed,
            "total_theorems": summary.total_theorems,
            "unique_theorems": summary.unique_theorems,
            "records_written": summary.records_written,
            "model": summary.model,
            "skip_appendix": summary.skip_appendix,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}
