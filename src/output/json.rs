//! JSON file persister
//!
//! Snapshots land in `<snapshot_dir>/movies<page>.json` (pretty printed) and
//! the consolidated artifact at `movies_path` (compact). Each write goes to a
//! temporary sibling first and is renamed into place, so a reader never sees
//! a half-written artifact.

use crate::config::OutputConfig;
use crate::models::Movie;
use crate::output::traits::{MovieStore, OutputError, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Persists movies as JSON arrays on the local filesystem
#[derive(Debug, Clone)]
pub struct JsonMovieStore {
    movies_path: PathBuf,
    snapshot_dir: PathBuf,
}

impl JsonMovieStore {
    pub fn new(movies_path: impl Into<PathBuf>, snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            movies_path: movies_path.into(),
            snapshot_dir: snapshot_dir.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.movies_path, &config.snapshot_dir)
    }

    /// Location of the snapshot for listing page `page`
    pub fn snapshot_path(&self, page: u32) -> PathBuf {
        self.snapshot_dir.join(format!("movies{}.json", page))
    }

    pub fn movies_path(&self) -> &Path {
        &self.movies_path
    }
}

impl MovieStore for JsonMovieStore {
    fn snapshot(&self, page: u32, movies: &[Movie]) -> OutputResult<PathBuf> {
        let path = self.snapshot_path(page);
        let data = serde_json::to_vec_pretty(movies)?;
        write_atomically(&path, &data)?;
        tracing::debug!("Wrote snapshot {} ({} movies)", path.display(), movies.len());
        Ok(path)
    }

    fn finalize(&self, movies: &[Movie]) -> OutputResult<PathBuf> {
        let data = serde_json::to_vec(movies)?;
        write_atomically(&self.movies_path, &data)?;
        tracing::info!(
            "Wrote {} movies to {}",
            movies.len(),
            self.movies_path.display()
        );
        Ok(self.movies_path.clone())
    }

    fn load(&self) -> OutputResult<Vec<Movie>> {
        let data = fs::read(&self.movies_path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

/// Writes `data` to a temporary sibling of `path` and renames it into place
fn write_atomically(path: &Path, data: &[u8]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::Write(format!("{} has no file name", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, data)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
