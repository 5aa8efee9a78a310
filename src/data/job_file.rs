//! JSON job files: a serialized [`SearchRequest`] on disk.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::SearchRequest;

pub fn load_request(path: &Path) -> Result<SearchRequest> {
    let file = File::open(path).context(format!("Failed to open job file: {:?}", path))?;
    let reader = BufReader::new(file);
    let request = serde_json::from_reader(reader)
        .context(format!("Failed to parse job file: {:?}", path))?;
    Ok(request)
}

pub fn save_request(path: &Path, request: &SearchRequest) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path).context(format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, request)
        .context(format!("Failed to write job file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::demo_job;
    use crate::models::SearchMode;

    #[test]
    fn test_save_then_load_preserves_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("job.json");
        let request = demo_job(SearchMode::BestPrice);

        save_request(&path, &request).unwrap();
        let loaded = load_request(&path).unwrap();

        assert_eq!(loaded.pool.len(), request.pool.len());
        assert_eq!(loaded.outcomes, request.outcomes);
        assert_eq!(loaded.mode, SearchMode::BestPrice);
        assert_eq!(loaded.combination_size, request.combination_size);
    }

    #[test]
    fn test_minimal_job_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.json");
        std::fs::write(
            &path,
            r#"{"target": 0.3, "tolerance": 0.01, "pool": [{"wear": 0.3, "price": 2.5}]}"#,
        )
        .unwrap();

        let loaded = load_request(&path).unwrap();
        assert_eq!(loaded.mode, SearchMode::Exhaustive);
        assert_eq!(loaded.combination_size, crate::config::SEARCH.combination_size);
        assert!(loaded.filter.is_empty());
        assert_eq!(loaded.pool[0].name, "");
    }

    #[test]
    fn test_missing_or_malformed_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = load_request(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open job file"));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = load_request(&broken).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse job file"));
    }
}
